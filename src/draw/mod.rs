//! Draw facade: resolve a logical tile or block through the registry and
//! issue one draw of its atlas region.
//!
//! The facade does no I/O and keeps no state of its own. Drawing a cell is
//! a lookup in the mapped registry followed by a single call to a
//! `RenderTarget`, which is the only thing that knows about textures and the
//! GPU. `sprite::SpriteTarget` is the Bevy implementation used by the
//! viewer; tests use a recording target.
//!
//! Tag selection, first match wins:
//! 1. the cell's explicit `tag` (an unknown tag is an error),
//! 2. the tag named after the cell's rotation (`north`, `east`, ...),
//! 3. `default`,
//! 4. the asset's first tag (row 0).

use crate::asset::{AssetName, AssetRegistry, AssetType, PixelRect, Tag};
use crate::error::{DrawError, UnknownAssetError};
use bevy::color::Color;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

pub mod sprite;

pub use sprite::{AtlasTextures, IsoSprite, SpriteTarget};

/// Name of the fallback tag used when no rotation-specific tag exists.
pub const DEFAULT_TAG: &str = "default";

/// Quarter-turn orientation of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Tag name an asset can provide for this orientation.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }

    /// Clockwise angle in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        match self {
            Rotation::North => 0.0,
            Rotation::East => std::f32::consts::FRAC_PI_2,
            Rotation::South => std::f32::consts::PI,
            Rotation::West => 3.0 * std::f32::consts::FRAC_PI_2,
        }
    }
}

/// A logical tile or block as the world model hands it to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldCell {
    pub kind: Option<AssetName>, // `None` is air: nothing to draw.
    pub tag: Option<Tag>,        // Explicit pose; overrides rotation lookup.
    pub color: Color,            // Tint applied to the sprite.
    pub rotation: Rotation,
}

pub type Tile = WorldCell;
pub type Block = WorldCell;

impl Default for WorldCell {
    fn default() -> Self {
        Self::empty()
    }
}

impl WorldCell {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: None,
            tag: None,
            color: Color::WHITE,
            rotation: Rotation::North,
        }
    }

    #[must_use]
    pub fn new(kind: impl Into<AssetName>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::empty()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A rectangle of a specific atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub atlas: AssetType,
    pub rect: PixelRect,
}

/// The rectangle-draw primitive the facade delegates to.
pub trait RenderTarget {
    /// Draw `region` with its top-left corner at `position` (screen
    /// space, y down), tinted by `tint` and rotated by `rotation`.
    fn draw_region(&mut self, region: AtlasRegion, position: Vec2, tint: Color, rotation: Rotation);
}

impl AssetRegistry {
    /// Draw a tile. Air is a no-op.
    ///
    /// # Errors
    /// `DrawError::UnknownAsset` if the tile's type or explicit tag is not
    /// registered; `DrawError::State` if the tile atlas is not mapped.
    /// No draw call is issued on error.
    pub fn draw_tile<T: RenderTarget + ?Sized>(&self, tile: &Tile, target: &mut T, position: Vec2) -> Result<(), DrawError> {
        self.draw_cell(AssetType::Tile, tile, target, position)
    }

    /// Draw a block. Air is a no-op.
    ///
    /// # Errors
    /// See [`AssetRegistry::draw_tile`].
    pub fn draw_block<T: RenderTarget + ?Sized>(&self, block: &Block, target: &mut T, position: Vec2) -> Result<(), DrawError> {
        self.draw_cell(AssetType::Block, block, target, position)
    }

    /// Atlas region a cell would be drawn with, or `None` for air.
    ///
    /// # Errors
    /// See [`AssetRegistry::draw_tile`].
    pub fn resolve(&self, asset_type: AssetType, cell: &WorldCell) -> Result<Option<AtlasRegion>, DrawError> {
        let Some(kind) = &cell.kind else {
            return Ok(None);
        };
        let asset = self
            .get(asset_type, kind.as_str())
            .ok_or_else(|| UnknownAssetError::Asset {
                asset_type,
                asset: kind.clone(),
            })?;

        let tag = match &cell.tag {
            Some(tag) => tag.as_str(),
            None => [cell.rotation.tag_name(), DEFAULT_TAG]
                .into_iter()
                .find(|t| asset.has_tag(t))
                .or_else(|| asset.first_tag().map(Tag::as_str))
                .unwrap_or(DEFAULT_TAG),
        };

        let rect = asset.pixel_rect(tag)?.ok_or_else(|| UnknownAssetError::Tag {
            asset_type,
            asset: kind.clone(),
            tag: Tag::new(tag),
        })?;

        Ok(Some(AtlasRegion { atlas: asset_type, rect }))
    }

    fn draw_cell<T: RenderTarget + ?Sized>(
        &self,
        asset_type: AssetType,
        cell: &WorldCell,
        target: &mut T,
        position: Vec2,
    ) -> Result<(), DrawError> {
        if let Some(region) = self.resolve(asset_type, cell)? {
            target.draw_region(region, position, cell.color, cell.rotation);
        }
        Ok(())
    }
}
