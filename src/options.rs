//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (API endpoint, base viewer style, slider
//! defaults, chart constants) are consolidated here. Options serialize
//! to/from TOML for presets, and UI-exposed sections publish a JSON
//! schema for the host's settings panel.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpbError;

/// Inference API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ApiOptions {
    /// Base URL all request paths are resolved against.
    #[schemars(title = "Base URL")]
    pub base_url: String,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
        }
    }
}

/// Base style for both 3D molecule viewers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ViewerOptions {
    /// Whether the molecule viewer auto-rotates.
    #[schemars(title = "Spin")]
    pub spin: bool,
    /// Bond stick radius in the base style.
    #[schemars(title = "Stick Radius")]
    pub stick_radius: f64,
    /// Atom sphere radius in the base style. Also the radius kept by
    /// hydrogens and by degenerate attention input.
    #[schemars(title = "Sphere Radius")]
    pub sphere_radius: f64,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            spin: true,
            stick_radius: 0.15,
            sphere_radius: 0.1,
        }
    }
}

/// Initial positions for the three attention sliders (percent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SliderOptions {
    /// Contrast ratio slider.
    #[schemars(title = "Ratio")]
    pub ratio: f64,
    /// Percentile cutoff slider.
    #[schemars(title = "Percentile")]
    pub percentile: f64,
    /// Radius cap slider.
    #[schemars(title = "Max")]
    pub max: f64,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            ratio: 50.0,
            percentile: 50.0,
            max: 50.0,
        }
    }
}

/// Constants for the volumetric energy scatter chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ChartOptions {
    /// Samples with `|value|` at or below this cutoff are not plotted.
    #[schemars(title = "Energy Epsilon")]
    pub energy_epsilon: f64,
    /// Smallest and largest rendered point size.
    #[schemars(title = "Symbol Size Range")]
    pub symbol_size: [f64; 2],
    /// Opacity range mapped across the color scale.
    #[schemars(title = "Color Alpha Range")]
    pub color_alpha: [f64; 2],
    /// Fixed upper bound of the color scale.
    #[schemars(title = "Visual Max")]
    pub visual_max: f64,
    /// Color ramp stops, cold to hot.
    #[schemars(skip)]
    pub color_ramp: Vec<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            energy_epsilon: 1e-8,
            symbol_size: [0.5, 25.0],
            color_alpha: [0.2, 1.0],
            visual_max: 1_000_000.0,
            color_ramp: vec![
                "#313695".to_owned(),
                "#4575b4".to_owned(),
                "#74add1".to_owned(),
                "#abd9e9".to_owned(),
                "#e0f3f8".to_owned(),
                "#ffffbf".to_owned(),
                "#fee090".to_owned(),
                "#fdae61".to_owned(),
                "#f46d43".to_owned(),
                "#d73027".to_owned(),
                "#a50026".to_owned(),
            ],
        }
    }
}

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[api]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Inference API endpoint.
    pub api: ApiOptions,
    /// Base 3D viewer style.
    pub viewer: ViewerOptions,
    /// Attention slider defaults.
    pub sliders: SliderOptions,
    /// Energy chart constants.
    pub charts: ChartOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::Io`] if the file cannot be read and
    /// [`SpbError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, SpbError> {
        let content = std::fs::read_to_string(path).map_err(SpbError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SpbError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::OptionsParse`] on serialization failure and
    /// [`SpbError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SpbError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SpbError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SpbError::Io)?;
        }
        std::fs::write(path, content).map_err(SpbError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[api]
base_url = "https://spbnet.internal:9000"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.api.base_url, "https://spbnet.internal:9000");
        // Everything else should be default
        assert!(opts.viewer.spin);
        assert_eq!(opts.sliders.ratio, 50.0);
        assert_eq!(opts.charts.color_ramp.len(), 11);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("api"));
        assert!(props.contains_key("viewer"));
        assert!(props.contains_key("sliders"));
        assert!(props.contains_key("charts"));
    }
}
