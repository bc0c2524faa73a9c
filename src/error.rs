//! Error types for the atlas build pipeline and the draw facade.
//!
//! Every stage of the build has its own error enum so callers can tell a
//! content mistake (`ConfigError`) from an I/O failure (`DiscoveryError`,
//! `StitchError`) or a misuse of the pipeline (`StateError`). `BuildError`
//! wraps all of them for `IsometricAssets::open`, which aborts on the first
//! failure and never hands out a partially built registry.

use crate::asset::{AssetName, AssetType, Tag};
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or normalizing a `config.yml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("config {} is not a key/value mapping", .path.display())]
    NotAMapping { path: PathBuf },
    #[error("config {} is missing required key '{key}'", .path.display())]
    MissingKey { path: PathBuf, key: &'static str },
    #[error("config {}: '{key}' must be a positive integer", .path.display())]
    NotPositive { path: PathBuf, key: &'static str },
    #[error("config {}: '{key}' must be a list of names", .path.display())]
    NotAList { path: PathBuf, key: &'static str },
    #[error("config {}: entry {index} of '{key}' must be a non-empty string", .path.display())]
    InvalidEntry {
        path: PathBuf,
        key: &'static str,
        index: usize,
    },
}

/// Failure while walking a content directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure while composing, writing or reloading an atlas image.
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("atlas of {columns}x{rows} cells of {cell_width}x{cell_height} px does not fit in u32")]
    TooLarge {
        columns: usize,
        rows: usize,
        cell_width: u32,
        cell_height: u32,
    },
    #[error("failed to create atlas directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write atlas {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to reload atlas {}: {source}", .path.display())]
    Reload {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to write atlas layout {}: {reason}", .path.display())]
    Layout { path: PathBuf, reason: String },
}

/// The pipeline was driven out of order. Always a programming error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("{0} atlas has not been stitched yet")]
    NotStitched(AssetType),
    #[error("{0} atlas has already been mapped")]
    AlreadyMapped(AssetType),
    #[error("{asset_type} asset '{asset}' tag '{tag}' has not been mapped to the atlas")]
    Unmapped {
        asset_type: AssetType,
        asset: AssetName,
        tag: Tag,
    },
    #[error("{asset_type} asset '{asset}' tag '{tag}' lies outside the {width}x{height} atlas")]
    OutOfBounds {
        asset_type: AssetType,
        asset: AssetName,
        tag: Tag,
        width: u32,
        height: u32,
    },
}

/// A draw-time lookup that found nothing to draw.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownAssetError {
    #[error("unknown {asset_type} asset '{asset}'")]
    Asset {
        asset_type: AssetType,
        asset: AssetName,
    },
    #[error("{asset_type} asset '{asset}' has no tag '{tag}'")]
    Tag {
        asset_type: AssetType,
        asset: AssetName,
        tag: Tag,
    },
}

/// Any failure of the startup build. Fatal: nothing is served.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Stitch(#[from] StitchError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Failure of a single draw call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error(transparent)]
    UnknownAsset(#[from] UnknownAssetError),
    #[error(transparent)]
    State(#[from] StateError),
}
