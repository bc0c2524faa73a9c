//! Atlas: stitching sub-images into one image per asset type and binding
//! registry entries to pixel rectangles inside it.
//!
//! The grid convention used by both halves is fixed: an atlas is
//! `columns * cell_width` pixels wide and `max_rows * cell_height` pixels
//! tall, and the tag at `GridPosition { row, column }` occupies
//! `(column * cell_width, row * cell_height, cell_width, cell_height)`.
//!
//! Next to every atlas PNG an `AtlasLayout` is written as RON so the
//! placement of each `asset/tag` can be inspected without running the game.

use crate::asset::{AssetRegistry, AssetType, AtlasState, PixelRect};
use crate::error::{StateError, StitchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub mod mapper;
pub mod stitcher;

pub use mapper::map_to_pixels;
pub use stitcher::{persist, stitch};

/// Cell rectangle for a grid position under the fixed convention.
#[must_use]
pub fn cell_rect(row: u32, column: u32, cell_width: u32, cell_height: u32) -> PixelRect {
    PixelRect {
        x: column * cell_width,
        y: row * cell_height,
        width: cell_width,
        height: cell_height,
    }
}

/// Human-readable description of a mapped atlas, written as `<atlas>.ron`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    pub asset_type: AssetType,
    pub width: u32,       // Atlas image width in pixels
    pub height: u32,      // Atlas image height in pixels
    pub cell_width: u32,  // Width of a single cell in pixels
    pub cell_height: u32, // Height of a single cell in pixels
    pub regions: BTreeMap<String, PixelRect>, // "asset/tag" -> rectangle
}

impl AtlasLayout {
    /// Collect the mapped rectangles of `asset_type`.
    ///
    /// # Errors
    /// Returns `StateError::NotStitched` if the type has not been mapped yet.
    pub fn from_registry(
        registry: &AssetRegistry,
        asset_type: AssetType,
        cell_size: (u32, u32),
    ) -> Result<Self, StateError> {
        let AtlasState::Mapped { width, height } = registry.state(asset_type) else {
            return Err(StateError::NotStitched(asset_type));
        };

        let mut regions = BTreeMap::new();
        for asset in registry.assets(asset_type) {
            for tag in asset.tags() {
                if let Some(rect) = asset.pixel_rect(tag.as_str())? {
                    regions.insert(format!("{}/{}", asset.name(), tag), rect);
                }
            }
        }

        Ok(Self {
            asset_type,
            width,
            height,
            cell_width: cell_size.0,
            cell_height: cell_size.1,
            regions,
        })
    }

    /// Write the layout next to its atlas as pretty RON.
    ///
    /// # Errors
    /// Returns `StitchError::Layout` if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<(), StitchError> {
        let layout_err = |reason: String| StitchError::Layout {
            path: path.to_path_buf(),
            reason,
        };
        let s = ::ron::ser::to_string_pretty(self, ::ron::ser::PrettyConfig::default())
            .map_err(|e| layout_err(e.to_string()))?;
        std::fs::write(path, s).map_err(|e| layout_err(e.to_string()))
    }

    /// Read a layout previously written by [`AtlasLayout::write`].
    ///
    /// # Errors
    /// Returns `StitchError::Layout` if the file is missing or not a layout.
    pub fn read(path: &Path) -> Result<Self, StitchError> {
        let layout_err = |reason: String| StitchError::Layout {
            path: path.to_path_buf(),
            reason,
        };
        let s = std::fs::read_to_string(path).map_err(|e| layout_err(e.to_string()))?;
        ::ron::from_str(&s).map_err(|e| layout_err(e.to_string()))
    }
}
