//! Loader for the `config.yml` files of a content pack.
//!
//! Two shapes exist. The pack-level file carries the atlas cell sizes:
//!
//! ```yaml
//! tile_width: 32
//! tile_height: 32
//! block_width: 32
//! block_height: 48
//! ```
//!
//! and every asset directory carries one naming the collections the asset
//! belongs to:
//!
//! ```yaml
//! collections:
//!   - ground
//!   - natural
//! ```
//!
//! Files are read as free-form YAML mappings. Keys are trimmed and
//! lower-cased before lookup, unknown keys are ignored, and a missing
//! required key is a `ConfigError`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::path::Path;

/// Reserved file name for configs at every level of a content pack.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Global cell sizes for the two atlases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    pub tile_width: u32,
    pub tile_height: u32,
    pub block_width: u32,
    pub block_height: u32,
}

impl AtlasConfig {
    /// Read and validate a pack-level `config.yml`.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read, is not a YAML
    /// mapping, or lacks one of the four sizes as a positive integer.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = read_config(path)?;
        Self::parse(&src, path)
    }

    /// Parse the contents of a pack-level config. `path` is used for errors only.
    ///
    /// # Errors
    /// See [`AtlasConfig::load`].
    pub fn parse(src: &str, path: &Path) -> Result<Self, ConfigError> {
        let map = parse_mapping(src, path)?;
        Ok(Self {
            tile_width: positive(&map, path, "tile_width")?,
            tile_height: positive(&map, path, "tile_height")?,
            block_width: positive(&map, path, "block_width")?,
            block_height: positive(&map, path, "block_height")?,
        })
    }

    /// Cell size `(width, height)` used by the atlas of `asset_type`.
    #[must_use]
    pub fn cell_size(&self, asset_type: crate::asset::AssetType) -> (u32, u32) {
        match asset_type {
            crate::asset::AssetType::Tile => (self.tile_width, self.tile_height),
            crate::asset::AssetType::Block => (self.block_width, self.block_height),
        }
    }
}

/// Per-asset configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetConfig {
    /// Normalized (trimmed, lower-case) collection names, duplicates merged.
    pub collections: BTreeSet<String>,
}

impl AssetConfig {
    /// Read and validate an asset's `config.yml`.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read, is not a YAML
    /// mapping, has no `collections` key, or lists a blank/non-string name.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = read_config(path)?;
        Self::parse(&src, path)
    }

    /// Parse the contents of an asset config. `path` is used for errors only.
    ///
    /// # Errors
    /// See [`AssetConfig::load`].
    pub fn parse(src: &str, path: &Path) -> Result<Self, ConfigError> {
        const KEY: &str = "collections";

        let map = parse_mapping(src, path)?;
        let entries = match lookup(&map, KEY) {
            None => {
                return Err(ConfigError::MissingKey {
                    path: path.to_path_buf(),
                    key: KEY,
                });
            }
            // `collections:` with nothing after it
            Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Sequence(entries)) => entries,
            Some(_) => {
                return Err(ConfigError::NotAList {
                    path: path.to_path_buf(),
                    key: KEY,
                });
            }
        };

        let mut collections = BTreeSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let name = entry
                .as_str()
                .map(normalize)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ConfigError::InvalidEntry {
                    path: path.to_path_buf(),
                    key: KEY,
                    index,
                })?;
            collections.insert(name);
        }

        Ok(Self { collections })
    }
}

/// Trim and lower-case a key or collection name.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_mapping(src: &str, path: &Path) -> Result<Mapping, ConfigError> {
    let value: Value = serde_yaml::from_str(src).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Find `key` in `map`, comparing against normalized string keys.
fn lookup<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_str().is_some_and(|k| normalize(k) == key))
        .map(|(_, v)| v)
}

fn positive(map: &Mapping, path: &Path, key: &'static str) -> Result<u32, ConfigError> {
    let not_positive = || ConfigError::NotPositive {
        path: path.to_path_buf(),
        key,
    };
    let value = lookup(map, key).ok_or_else(|| ConfigError::MissingKey {
        path: path.to_path_buf(),
        key,
    })?;

    let number = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    number
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(not_positive)
}
