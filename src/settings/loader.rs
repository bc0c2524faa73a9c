//! Settings loading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` (in file-name
//! order) will be used. If no RON files are found or if no parsing succeeds,
//! default settings will be used.
use crate::ron_loader::load_ron_files;
use crate::settings::Settings;
use std::path::Path;

/// Load settings from `path` (directory). If multiple `.ron` files are present
/// the first parsed `Settings` will be used. If none exist the `Default` is used.
///
/// # Arguments
/// * `path` - The directory path where settings RON files are located (e.g., "data/settings").
///
/// # Returns
/// A `Settings` struct loaded from the first successfully parsed RON file in the specified directory
/// or default settings if no valid RON files are found.
///
/// # Example
/// ```
/// let settings = isoforge::settings::loader::load_settings_from_dir("data/settings");
/// assert!(!settings.content.pack.is_empty());
/// ```
#[must_use]
pub fn load_settings_from_dir(path: impl AsRef<Path>) -> Settings {
    let items: Vec<Settings> = load_ron_files(path.as_ref());
    items.into_iter().next().unwrap_or_default()
}
