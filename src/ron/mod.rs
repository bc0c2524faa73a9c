//! Utilities for loading RON files and watching directories for changes.
//!
//! This module provides a small helper for reading RON files from disk
//! and a filesystem watcher resource that sets a shared boolean when files
//! change. The settings are read through `load_ron_files`; the watcher
//! drives hot-reloading of a content pack during development.

use bevy::log::error;
use bevy::prelude::Resource;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Resource)]
/// File-watcher resource for hot-reload.
pub struct DirWatcher {
    pub changed: Arc<Mutex<bool>>, // Shared boolean set to `true` when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, //watcher handle kept to prevent immediate drop.
}

impl DirWatcher {
    /// Create a stub `DirWatcher` that does not have an active OS watcher.
    ///
    /// # Return
    /// Returns a `DirWatcher` with `changed` initialized to `false` and
    /// no underlying OS watcher. Useful as a fallback when watcher
    /// creation fails or when hot-reload is disabled.
    #[must_use]
    pub fn stub() -> Self {
        DirWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Read and clear the changed flag. A poisoned mutex is recovered, the
    /// flag is a plain bool and cannot be left half-written.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *flag, false)
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// # Arguments
/// * `path` - Directory path to scan for `.ron` files.
///
/// # Return
/// A `Vec<T>` containing all successfully deserialized items found in
/// the directory, in file-name order. Files that fail to parse are
/// skipped and logged.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let mut items = Vec::new();

    let Ok(entries) = std::fs::read_dir(path) else {
        return items;
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    for file in files {
        if let Ok(content) = std::fs::read_to_string(&file) {
            match ::ron::from_str::<T>(&content) {
                Ok(item) => items.push(item),
                Err(e) => error!("Failed to parse {}: {e}", file.display()),
            }
        }
    }

    items
}

/// Whether an event should raise the changed flag: a create, modify or
/// remove under `watched` that does not touch one of the `ignored` paths.
#[must_use]
pub fn is_relevant(kind: &EventKind, paths: &[PathBuf], watched: &Path, ignored: &[PathBuf]) -> bool {
    if !matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)) {
        return false;
    }
    paths
        .iter()
        .any(|p| p.starts_with(watched) && !ignored.iter().any(|i| i == p))
}

/// Create a `DirWatcher` that watches a directory tree for changes.
///
/// # Arguments
/// * `path` - Directory to watch, recursively.
/// * `ignored` - Paths relative to `path` whose changes are not reported,
///   typically files the program itself writes into the watched tree.
///
/// # Return
/// Returns a `DirWatcher` on success. Its `changed` flag is set to `true`
/// whenever [`is_relevant`] accepts an event.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_dir_watcher(path: &Path, ignored: &[PathBuf]) -> Result<DirWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    // Watch the canonical path so event paths can be compared directly
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let ignored: Vec<PathBuf> = ignored.iter().map(|p| watched_path.join(p)).collect();
    let filter_root = watched_path.clone();

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if is_relevant(&event.kind, &event.paths, &filter_root, &ignored) {
                    let mut flag = match changed_clone.lock() {
                        Ok(flag) => flag,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    *flag = true;
                }
            }
            Err(e) => error!("Watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(&watched_path, RecursiveMode::Recursive)?;
    Ok(DirWatcher { changed, _watcher: Some(watcher) })
}
