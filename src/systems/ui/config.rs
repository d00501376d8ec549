//! JSON-backed selector configuration.
use std::{fs::File, io::BufReader, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::segmented::SegmentedSelector;

/// Declarative selector description loaded at startup.
///
/// Titles and the initial index are mandatory; style fields fall back to the
/// widget defaults when absent. Converting into a [`SegmentedSelector`]
/// enforces the same fatal preconditions as direct construction.
#[derive(Deserialize, Clone, Debug)]
pub struct SegmentedSelectorConfig {
    pub titles: Vec<String>,
    pub selected: usize,
    #[serde(default)]
    pub track_size: Option<[f32; 2]>,
    #[serde(default)]
    pub normal_color: Option<[f32; 3]>,
    #[serde(default)]
    pub selected_color: Option<[f32; 3]>,
    #[serde(default)]
    pub indicator_color: Option<[f32; 3]>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub selected_font_size: Option<f32>,
    #[serde(default)]
    pub indicator_thickness: Option<f32>,
}

impl SegmentedSelectorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, serde_json::Error> {
        let file = File::open(path).expect("Could not open selector configuration file");
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl From<SegmentedSelectorConfig> for SegmentedSelector {
    fn from(config: SegmentedSelectorConfig) -> Self {
        let mut selector = SegmentedSelector::new(config.titles, config.selected);
        if let Some([x, y]) = config.track_size {
            selector.track_size = Vec2::new(x, y);
        }
        if let Some([r, g, b]) = config.normal_color {
            selector.normal_color = Color::srgb(r, g, b);
        }
        if let Some([r, g, b]) = config.selected_color {
            selector.selected_color = Color::srgb(r, g, b);
        }
        if let Some([r, g, b]) = config.indicator_color {
            selector.indicator_color = Color::srgb(r, g, b);
        }
        if let Some(font_size) = config.font_size {
            selector.normal_font.font_size = font_size;
        }
        if let Some(font_size) = config.selected_font_size {
            selector.selected_font.font_size = font_size;
        }
        if let Some(thickness) = config.indicator_thickness {
            selector.indicator_thickness = thickness;
        }
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config_into_selector() {
        let raw = r#"{
            "titles": ["hourly", "daily", "weekly"],
            "selected": 1,
            "track_size": [240.0, 40.0],
            "indicator_color": [0.9, 0.2, 0.2],
            "font_size": 12.0,
            "indicator_thickness": 4.0
        }"#;

        let config = SegmentedSelectorConfig::from_json_str(raw).expect("config");
        let selector = SegmentedSelector::from(config);
        assert_eq!(selector.len(), 3);
        assert_eq!(selector.selected_index(), 1);
        assert_eq!(selector.track_size, Vec2::new(240.0, 40.0));
        assert_eq!(selector.indicator_color, Color::srgb(0.9, 0.2, 0.2));
        assert_eq!(selector.normal_font.font_size, 12.0);
        assert_eq!(selector.indicator_thickness, 4.0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(SegmentedSelectorConfig::from_json_str("{\"titles\": [").is_err());
    }

    #[test]
    #[should_panic(expected = "at least one title")]
    fn empty_title_config_panics_on_conversion() {
        let raw = r#"{ "titles": [], "selected": 0 }"#;
        let config = SegmentedSelectorConfig::from_json_str(raw).expect("config");
        let _ = SegmentedSelector::from(config);
    }
}
