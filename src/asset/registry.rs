//! The asset registry: every asset and collection of a content pack.
//!
//! The registry is a two-entry table indexed by `AssetType`. Each entry
//! tracks where its atlas is in the build (`AtlasState`) so the mapper can
//! refuse to run before the atlas image exists or a second time.
//!
//! Mutation is crate-private. Outside the build pipeline the registry is
//! only ever seen through `&AssetRegistry`, which makes it read-only for the
//! draw facade and the render loop.
//!
//! Example:
//! ```rust
//! use isoforge::asset::{AssetRegistry, AssetType, AtlasState};
//!
//! let registry = AssetRegistry::default();
//! assert_eq!(registry.state(AssetType::Tile), AtlasState::Discovered);
//! assert!(registry.get(AssetType::Tile, "grass").is_none());
//! ```
//!
//! Build state cannot be changed from outside the crate:
//! ```compile_fail
//! use isoforge::asset::{AssetRegistry, AssetType};
//!
//! let mut registry = AssetRegistry::default();
//! registry.mark_stitched(AssetType::Tile, 8, 8).unwrap();
//! ```

use super::discovery::Discovery;
use super::{Asset, AssetName, AssetType};
use crate::error::StateError;
use std::collections::{BTreeMap, BTreeSet};

/// Build progress of one atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AtlasState {
    /// Assets hold grid positions; no atlas image exists yet.
    #[default]
    Discovered,
    /// The atlas image exists with these dimensions; not yet mapped.
    Stitched { width: u32, height: u32 },
    /// Every tag holds its pixel rectangle.
    Mapped { width: u32, height: u32 },
}

/// Assets and collections of one `AssetType`.
#[derive(Clone, Debug, Default)]
pub struct AssetTable {
    assets: BTreeMap<AssetName, Asset>,
    collections: BTreeMap<String, BTreeSet<AssetName>>,
    state: AtlasState,
}

impl AssetTable {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    /// Assets ordered by name.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> AtlasState {
        self.state
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&BTreeSet<AssetName>> {
        self.collections.get(&crate::asset::config::normalize(name))
    }

    pub fn collections(&self) -> impl Iterator<Item = (&str, &BTreeSet<AssetName>)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn assets_mut(&mut self) -> impl Iterator<Item = &mut Asset> {
        self.assets.values_mut()
    }

    pub(crate) fn set_state(&mut self, state: AtlasState) {
        self.state = state;
    }
}

/// Owner of all assets, keyed by type then name.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    tables: [AssetTable; 2],
}

impl AssetRegistry {
    /// Install the result of discovering `asset_type`, replacing whatever
    /// was there. Returns the image grid for the stitcher.
    pub(crate) fn register(&mut self, asset_type: AssetType, discovery: Discovery) -> Vec<Vec<std::path::PathBuf>> {
        let table = &mut self.tables[asset_type.index()];
        table.assets = discovery.assets;
        table.collections = discovery.collections;
        table.state = AtlasState::Discovered;
        discovery.grid
    }

    /// Record that the atlas of `asset_type` has been built and loaded.
    ///
    /// # Errors
    /// Returns `StateError::AlreadyMapped` if the mapper already ran for
    /// this type.
    pub(crate) fn mark_stitched(&mut self, asset_type: AssetType, width: u32, height: u32) -> Result<(), StateError> {
        let table = &mut self.tables[asset_type.index()];
        if let AtlasState::Mapped { .. } = table.state {
            return Err(StateError::AlreadyMapped(asset_type));
        }
        table.state = AtlasState::Stitched { width, height };
        Ok(())
    }

    #[must_use]
    pub fn table(&self, asset_type: AssetType) -> &AssetTable {
        &self.tables[asset_type.index()]
    }

    pub(crate) fn table_mut(&mut self, asset_type: AssetType) -> &mut AssetTable {
        &mut self.tables[asset_type.index()]
    }

    #[must_use]
    pub fn get(&self, asset_type: AssetType, name: &str) -> Option<&Asset> {
        self.table(asset_type).get(name)
    }

    pub fn assets(&self, asset_type: AssetType) -> impl Iterator<Item = &Asset> {
        self.table(asset_type).assets()
    }

    #[must_use]
    pub fn state(&self, asset_type: AssetType) -> AtlasState {
        self.table(asset_type).state()
    }

    /// Names in collection `name` for `asset_type`. The name is normalized
    /// the same way config files are.
    #[must_use]
    pub fn collection(&self, asset_type: AssetType, name: &str) -> Option<&BTreeSet<AssetName>> {
        self.table(asset_type).collection(name)
    }

    /// True once both atlases are mapped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        AssetType::ALL
            .iter()
            .all(|t| matches!(self.state(*t), AtlasState::Mapped { .. }))
    }
}
