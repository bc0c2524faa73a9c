//! Content packs and the startup build that turns one into drawable atlases.
//!
//! ```text
//! content/
//!   default/              (pack)
//!     config.yml          atlas cell sizes
//!     tiles/<asset>/...   tile assets
//!     blocks/<asset>/...  block assets
//!     tiles.png           written by the build
//!     tiles.ron           layout of tiles.png, written by the build
//!     blocks.png / blocks.ron
//! cache/                  sibling of the content root, for collaborators
//! saves/
//! ```
//!
//! `IsometricAssets::open` is the only way to obtain a registry that can be
//! drawn from. It either returns a fully mapped pair of atlases or an error;
//! nothing half-built ever leaves this module.

use crate::asset::config::CONFIG_FILE_NAME;
use crate::asset::{discover, AssetRegistry, AssetType, AtlasConfig};
use crate::atlas::{map_to_pixels, persist, stitch, AtlasLayout};
use crate::draw::{Block, RenderTarget, Tile};
use crate::error::{BuildError, DrawError};
use bevy::log::info;
use bevy::math::Vec2;
use bevy::prelude::Resource;
use image::RgbaImage;
use std::path::{Path, PathBuf};

pub mod loader;

pub use loader::{check_content_changes, setup_content_watcher, ContentWatcher};

/// File system layout of one content pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentPaths {
    root: PathBuf,
    pack: String,
}

impl ContentPaths {
    /// # Arguments
    /// * `root` - Directory holding the packs (e.g. `content`).
    /// * `pack` - Name of the pack directory inside `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, pack: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pack: pack.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn pack(&self) -> &str {
        &self.pack
    }

    #[must_use]
    pub fn pack_dir(&self) -> PathBuf {
        self.root.join(&self.pack)
    }

    #[must_use]
    pub fn tiles_dir(&self) -> PathBuf {
        self.asset_dir(AssetType::Tile)
    }

    #[must_use]
    pub fn blocks_dir(&self) -> PathBuf {
        self.asset_dir(AssetType::Block)
    }

    #[must_use]
    pub fn asset_dir(&self, asset_type: AssetType) -> PathBuf {
        self.pack_dir().join(asset_type.dir_name())
    }

    /// The pack-level `config.yml` with the atlas cell sizes.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.pack_dir().join(CONFIG_FILE_NAME)
    }

    /// `tiles.png` or `blocks.png`, relative to the pack directory.
    #[must_use]
    pub fn atlas_file_name(asset_type: AssetType) -> String {
        format!("{}.png", asset_type.dir_name())
    }

    /// `tiles.ron` or `blocks.ron`, relative to the pack directory.
    #[must_use]
    pub fn layout_file_name(asset_type: AssetType) -> String {
        format!("{}.ron", asset_type.dir_name())
    }

    #[must_use]
    pub fn atlas_path(&self, asset_type: AssetType) -> PathBuf {
        self.pack_dir().join(Self::atlas_file_name(asset_type))
    }

    #[must_use]
    pub fn layout_path(&self, asset_type: AssetType) -> PathBuf {
        self.pack_dir().join(Self::layout_file_name(asset_type))
    }

    /// Every file the build writes, relative to the pack directory.
    #[must_use]
    pub fn generated_files() -> Vec<PathBuf> {
        AssetType::ALL
            .iter()
            .flat_map(|t| [Self::atlas_file_name(*t), Self::layout_file_name(*t)])
            .map(PathBuf::from)
            .collect()
    }

    /// `cache/`, next to the content root.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.sibling("cache")
    }

    /// `saves/`, next to the content root.
    #[must_use]
    pub fn saves_dir(&self) -> PathBuf {
        self.sibling("saves")
    }

    fn sibling(&self, name: &str) -> PathBuf {
        match self.root.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// A fully built content pack: cell sizes, the mapped registry and both
/// atlas images as read back from disk.
#[derive(Resource, Debug)]
pub struct IsometricAssets {
    config: AtlasConfig,
    registry: AssetRegistry,
    atlases: [RgbaImage; 2],
    paths: ContentPaths,
}

impl IsometricAssets {
    /// Build every atlas of the pack at `paths`.
    ///
    /// Both asset types are discovered, stitched and mapped in memory first.
    /// Only then are the atlas PNGs written and read back, followed by the
    /// RON layouts, so a content error in either type leaves the files of a
    /// previous build untouched.
    ///
    /// # Errors
    /// Returns the first `BuildError` hit. No partially built value is
    /// returned. An I/O failure while writing may still leave the first
    /// atlas updated on disk.
    pub fn open(paths: &ContentPaths) -> Result<Self, BuildError> {
        let config = AtlasConfig::load(&paths.config_path())?;
        let mut registry = AssetRegistry::default();
        let mut atlases: [RgbaImage; 2] = Default::default();
        let mut layouts = Vec::with_capacity(AssetType::ALL.len());

        for asset_type in AssetType::ALL {
            let discovery = discover(asset_type, &paths.asset_dir(asset_type))?;
            let grid = registry.register(asset_type, discovery);
            let (cell_width, cell_height) = config.cell_size(asset_type);

            let atlas = stitch(&grid, cell_width, cell_height)?;
            registry.mark_stitched(asset_type, atlas.width(), atlas.height())?;
            map_to_pixels(&mut registry, &config, asset_type)?;

            layouts.push(AtlasLayout::from_registry(&registry, asset_type, (cell_width, cell_height))?);
            atlases[asset_type.index()] = atlas;
        }

        for (asset_type, layout) in AssetType::ALL.into_iter().zip(&layouts) {
            let atlas_path = paths.atlas_path(asset_type);
            let reloaded = persist(&atlases[asset_type.index()], &atlas_path)?;
            layout.write(&paths.layout_path(asset_type))?;

            info!(
                "built {asset_type} atlas: {} assets, {}x{} px -> {}",
                registry.table(asset_type).len(),
                reloaded.width(),
                reloaded.height(),
                atlas_path.display()
            );
            atlases[asset_type.index()] = reloaded;
        }

        Ok(Self {
            config,
            registry,
            atlases,
            paths: paths.clone(),
        })
    }

    #[must_use]
    pub fn tile_width(&self) -> u32 {
        self.config.tile_width
    }

    #[must_use]
    pub fn tile_height(&self) -> u32 {
        self.config.tile_height
    }

    #[must_use]
    pub fn block_width(&self) -> u32 {
        self.config.block_width
    }

    #[must_use]
    pub fn block_height(&self) -> u32 {
        self.config.block_height
    }

    #[must_use]
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    #[must_use]
    pub fn paths(&self) -> &ContentPaths {
        &self.paths
    }

    /// The atlas image of `asset_type`, pixel-identical to the file on disk.
    #[must_use]
    pub fn atlas(&self, asset_type: AssetType) -> &RgbaImage {
        &self.atlases[asset_type.index()]
    }

    /// # Errors
    /// See [`AssetRegistry::draw_tile`].
    pub fn draw_tile<T: RenderTarget + ?Sized>(&self, tile: &Tile, target: &mut T, position: Vec2) -> Result<(), DrawError> {
        self.registry.draw_tile(tile, target, position)
    }

    /// # Errors
    /// See [`AssetRegistry::draw_block`].
    pub fn draw_block<T: RenderTarget + ?Sized>(&self, block: &Block, target: &mut T, position: Vec2) -> Result<(), DrawError> {
        self.registry.draw_block(block, target, position)
    }
}
