//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/`. Every field has
//! a serde default, so a settings file only needs the values it changes.
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

pub mod loader;

/// Where the content pack lives and whether it is watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "ContentSettings::default_root")]
    pub root: String, // Directory holding every content pack.
    #[serde(default = "ContentSettings::default_pack")]
    pub pack: String, // Pack directory name under `root`.
    #[serde(default)]
    pub hot_reload: bool, // Rebuild the atlases when the pack changes on disk.
}

impl ContentSettings {
    fn default_root() -> String { "content".to_string() }
    fn default_pack() -> String { "default".to_string() }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            pack: Self::default_pack(),
            hot_reload: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "WindowSettings::default_title")]
    pub title: String,
    #[serde(default = "WindowSettings::default_width")]
    pub width: u32,
    #[serde(default = "WindowSettings::default_height")]
    pub height: u32,
}

impl WindowSettings {
    fn default_title() -> String { "isoforge".to_string() }
    fn default_width() -> u32 { 1300 }
    fn default_height() -> u32 { 800 }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

/// Layout of the asset preview grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "PreviewSettings::default_spacing")]
    pub spacing: f32, // Gap between cells in pixels.
    #[serde(default = "PreviewSettings::default_columns")]
    pub columns: usize, // Cells per row before wrapping.
}

impl PreviewSettings {
    fn default_spacing() -> f32 { 8.0 }
    fn default_columns() -> usize { 12 }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            spacing: Self::default_spacing(),
            columns: Self::default_columns(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Resource)]
pub struct Settings {
    #[serde(default)]
    pub content: ContentSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = ::ron::from_str("(content: (pack: \"castle\"))").unwrap();
        assert_eq!(settings.content.pack, "castle");
        assert_eq!(settings.content.root, "content");
        assert!(!settings.content.hot_reload);
        assert_eq!(settings.window, WindowSettings::default());
        assert_eq!(settings.preview.columns, 12);
    }

    #[test]
    fn empty_struct_is_all_defaults() {
        let settings: Settings = ::ron::from_str("()").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window.width, 1300);
        assert_eq!(settings.window.height, 800);
    }
}
