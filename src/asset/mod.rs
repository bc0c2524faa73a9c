//! Core asset types shared by discovery, the registry and the draw facade.
//!
//! An asset is one subdirectory of a `tiles/` or `blocks/` root. Each image
//! file inside it is a *tag* (a pose or variant). During discovery every tag
//! gets a `GridPosition` (row = tag index, column = asset index); once the
//! atlas image exists the mapper replaces it with a `PixelRect`. The two
//! coordinate kinds live in separate variants of `Placement` so a grid cell
//! can never be read as pixels.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

pub mod config;
pub mod discovery;
pub mod registry;

pub use config::{AssetConfig, AtlasConfig};
pub use discovery::{discover, Discovery};
pub use registry::{AssetRegistry, AssetTable, AtlasState};

/// Which atlas an asset belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    Tile,
    Block,
}

impl AssetType {
    pub const ALL: [AssetType; 2] = [AssetType::Tile, AssetType::Block];

    /// Position in the registry's two-entry table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AssetType::Tile => 0,
            AssetType::Block => 1,
        }
    }

    /// Directory name of this type's root inside a content pack.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            AssetType::Tile => "tiles",
            AssetType::Block => "blocks",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Symbolic asset identifier, taken from the asset's directory name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetName(String);

/// Symbolic pose identifier, taken from an image file's stem.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }
    };
}

string_id!(AssetName);
string_id!(Tag);

/// Cell coordinate assigned at discovery time, before any atlas exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u32,    // Index of the tag within its asset.
    pub column: u32, // Index of the asset among its siblings.
}

/// Region of a built atlas image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[must_use]
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Where a tag lives: a grid cell until mapped, pixels afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Unmapped(GridPosition),
    Mapped(PixelRect),
}

/// One asset: its tags and where each of them is placed.
#[derive(Clone, Debug)]
pub struct Asset {
    asset_type: AssetType,
    name: AssetName,
    column: u32,
    tags: BTreeMap<Tag, Placement>,
    rows: Vec<Tag>, // Tags in row order.
}

impl Asset {
    pub(crate) fn new(asset_type: AssetType, name: AssetName, column: u32) -> Self {
        Self {
            asset_type,
            name,
            column,
            tags: BTreeMap::new(),
            rows: Vec::new(),
        }
    }

    /// Append a tag in the next free row and return its grid position.
    pub(crate) fn push_tag(&mut self, tag: Tag) -> GridPosition {
        let position = GridPosition {
            row: self.rows.len() as u32,
            column: self.column,
        };
        self.rows.push(tag.clone());
        self.tags.insert(tag, Placement::Unmapped(position));
        position
    }

    pub(crate) fn placements_mut(&mut self) -> impl Iterator<Item = (&Tag, &mut Placement)> {
        self.tags.iter_mut()
    }

    #[must_use]
    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    #[must_use]
    pub fn name(&self) -> &AssetName {
        &self.name
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.rows.len()
    }

    /// Tags in row order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.rows.iter()
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    #[must_use]
    pub fn placement(&self, tag: &str) -> Option<Placement> {
        self.tags.get(tag).copied()
    }

    /// The tag in row 0. Every registered asset has one.
    #[must_use]
    pub fn first_tag(&self) -> Option<&Tag> {
        self.rows.first()
    }

    /// Pixel region of `tag`, or `None` if the asset has no such tag.
    ///
    /// # Errors
    /// Returns `StateError::Unmapped` when the tag still holds its grid
    /// position, i.e. the atlas mapper has not run for this asset type.
    pub fn pixel_rect(&self, tag: &str) -> Result<Option<PixelRect>, crate::error::StateError> {
        match self.tags.get_key_value(tag) {
            None => Ok(None),
            Some((_, Placement::Mapped(rect))) => Ok(Some(*rect)),
            Some((tag, Placement::Unmapped(_))) => Err(crate::error::StateError::Unmapped {
                asset_type: self.asset_type,
                asset: self.name.clone(),
                tag: tag.clone(),
            }),
        }
    }
}
