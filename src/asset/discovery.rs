//! Asset discovery: walk one asset-type root of a content pack.
//!
//! ```text
//! tiles/
//!   config.yml        (reserved, skipped)
//!   _wip/             (underscore: disabled)
//!   grass/
//!     config.yml      (required, else the asset is skipped)
//!     default.png     -> tag `default`, row 0
//!     rotated.png     -> tag `rotated`, row 1
//!   water/ ...        -> next column
//! ```
//!
//! Entries are sorted by file name at every level so a build is reproducible
//! for an unchanged directory. Each registered asset takes the next column;
//! its images take consecutive rows of that column. The resulting path grid
//! (outer = column, inner = row) is what the stitcher consumes.

use super::config::{AssetConfig, CONFIG_FILE_NAME};
use super::{Asset, AssetName, AssetType, Tag};
use crate::error::DiscoveryError;
use bevy::log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// File extensions accepted as sub-images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png"];

/// Everything discovered under one asset-type root.
#[derive(Debug, Default)]
pub struct Discovery {
    pub assets: BTreeMap<AssetName, Asset>,
    pub collections: BTreeMap<String, BTreeSet<AssetName>>,
    /// Image paths, indexed `[column][row]`. Columns may differ in length.
    pub grid: Vec<Vec<PathBuf>>,
}

/// Discover all assets of `asset_type` under `root`.
///
/// # Errors
/// Returns `DiscoveryError::ReadDir` if `root` or an asset directory cannot
/// be listed, and `DiscoveryError::Config` if an asset's `config.yml` exists
/// but is malformed. A missing per-asset config is not an error: that asset
/// is skipped.
pub fn discover(asset_type: AssetType, root: &Path) -> Result<Discovery, DiscoveryError> {
    let mut discovery = Discovery::default();

    for (name, asset_dir) in visible_entries(root)? {
        if !asset_dir.is_dir() {
            continue;
        }

        let config_path = asset_dir.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            debug!("skipping /{asset_type}/{name}: no {CONFIG_FILE_NAME}");
            continue;
        }

        info!("loading /{asset_type}/{name}");
        let config = AssetConfig::load(&config_path)?;

        let images = image_files(&asset_dir)?;
        if images.is_empty() {
            debug!("skipping /{asset_type}/{name}: no images");
            continue;
        }

        let column = discovery.grid.len() as u32;
        let asset_name = AssetName::new(name);
        let mut asset = Asset::new(asset_type, asset_name.clone(), column);
        let mut paths = Vec::with_capacity(images.len());
        for (stem, path) in images {
            asset.push_tag(Tag::new(stem));
            paths.push(path);
        }

        for collection in config.collections {
            discovery
                .collections
                .entry(collection)
                .or_default()
                .insert(asset_name.clone());
        }

        discovery.grid.push(paths);
        discovery.assets.insert(asset_name, asset);
    }

    Ok(discovery)
}

/// Sorted `(name, path)` pairs of `dir`, without dotfiles, `_`-prefixed
/// entries and the reserved config file.
fn visible_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!("ignoring non UTF-8 entry in {}", dir.display());
            continue;
        };
        if name.starts_with('.') || name.starts_with('_') || name == CONFIG_FILE_NAME {
            continue;
        }
        entries.push((name, entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(entries)
}

/// Sorted `(stem, path)` pairs of the image files directly inside `dir`.
/// Stems are unique: a later file with an already seen stem is skipped.
fn image_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let mut images = Vec::new();
    let mut seen = BTreeSet::new();
    for (name, path) in visible_entries(dir)? {
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)));
        if !is_image || !path.is_file() {
            continue;
        }
        // "grass.top.png" -> "grass", like the stem up to the first dot
        let stem = name.split('.').next().unwrap_or_default().to_string();
        if stem.is_empty() {
            continue;
        }
        if !seen.insert(stem.clone()) {
            warn!("ignoring {}: tag '{stem}' is already provided", path.display());
            continue;
        }
        images.push((stem, path));
    }
    Ok(images)
}
