pub mod asset;
pub mod atlas;
pub mod content;
pub mod draw;
pub mod error;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;

pub use asset::{AssetRegistry, AssetType};
pub use content::{ContentPaths, IsometricAssets};
pub use draw::{Block, RenderTarget, Rotation, Tile, WorldCell};
pub use error::{BuildError, DrawError};
