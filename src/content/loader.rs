//! Content hot-reloading.
//!
//! A recursive watcher on the pack directory raises a flag whenever a
//! sprite or config changes. The `check_content_changes` system then builds
//! a complete new `IsometricAssets` from disk and replaces the resource in
//! one assignment; the registry already being served is never mutated. If
//! the rebuild fails the previous instance stays in place.
//!
//! The atlas PNGs and layout files the build writes into the pack are
//! excluded from the watch so a rebuild does not trigger the next one.
use crate::content::{ContentPaths, IsometricAssets};
use crate::draw::AtlasTextures;
use crate::ron::{setup_dir_watcher, DirWatcher};
use bevy::log::{error, info};
use bevy::prelude::{Assets, Image, Res, ResMut, Resource};

#[derive(Resource)]
pub struct ContentWatcher(pub DirWatcher);

impl ContentWatcher {
    #[must_use]
    pub fn stub() -> Self {
        ContentWatcher(DirWatcher::stub())
    }
}

/// Create a watcher for the pack directory of `paths`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or the
/// pack directory cannot be watched.
pub fn setup_content_watcher(paths: &ContentPaths) -> Result<ContentWatcher, notify::Error> {
    setup_dir_watcher(&paths.pack_dir(), &ContentPaths::generated_files()).map(ContentWatcher)
}

/// Rebuild the content pack when files change and swap the result in.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, isoforge::content::check_content_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_content_changes(
    watcher: Res<ContentWatcher>,
    mut assets: ResMut<IsometricAssets>,
    mut textures: ResMut<AtlasTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    if !watcher.0.take_changed() {
        return;
    }

    info!("Content changed, rebuilding atlases...");
    match IsometricAssets::open(assets.paths()) {
        Ok(rebuilt) => {
            *assets = rebuilt;
            images.remove(&textures.tiles);
            images.remove(&textures.blocks);
            *textures = AtlasTextures::upload(&assets, &mut images);
            info!("Content reloaded");
        }
        Err(e) => {
            error!("Failed to rebuild content, keeping previous atlases: {e}");
        }
    }
}
