//! Export configuration.
//!
//! Lengths are stored in the configured `unit` and only become pixels through
//! [`SvgConfig::resolve_pixels`], which is the single place geometry code reads them from.

use crate::selector::SubtechniqueVisibility;
use crate::units::Unit;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgConfig {
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub unit: String,
    pub show_subtechniques: SubtechniqueVisibility,
    pub font: String,
    pub table_border_color: String,
    pub show_header: bool,
    pub legend_docked: bool,
    pub legend_x: Option<f64>,
    pub legend_y: Option<f64>,
    pub legend_width: f64,
    pub legend_height: f64,
    pub show_legend: bool,
    pub show_filters: bool,
    pub show_about: bool,
    pub border: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: 11.0,
            height: 8.5,
            header_height: 1.0,
            unit: "in".to_string(),
            show_subtechniques: SubtechniqueVisibility::Expanded,
            font: "sans-serif".to_string(),
            table_border_color: "#6B7279".to_string(),
            show_header: true,
            legend_docked: true,
            legend_x: None,
            legend_y: None,
            legend_width: 2.0,
            legend_height: 1.0,
            show_legend: true,
            show_filters: true,
            show_about: true,
            border: 0.104,
        }
    }
}

/// Every configured length, converted to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelConfig {
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub border: f64,
    pub legend_width: f64,
    pub legend_height: f64,
    pub legend_x: Option<f64>,
    pub legend_y: Option<f64>,
}

impl SvgConfig {
    pub fn unit(&self) -> Result<Unit> {
        self.unit.parse()
    }

    pub fn resolve_pixels(&self) -> Result<PixelConfig> {
        let unit = self.unit()?;
        let px = |v: f64| unit.to_pixels(v);
        let out = PixelConfig {
            width: px(self.width),
            height: px(self.height),
            header_height: px(self.header_height),
            border: px(self.border),
            legend_width: px(self.legend_width),
            legend_height: px(self.legend_height),
            legend_x: self.legend_x.map(px),
            legend_y: self.legend_y.map(px),
        };
        if !(out.width > 0.0 && out.height > 0.0) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "canvas must have a positive size, got {}x{} {}",
                    self.width, self.height, unit
                ),
            });
        }
        Ok(out)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json5_str(text: &str) -> Result<Self> {
        json5::from_str(text).map_err(|e| Error::Json5 {
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a config file, picking the format from its extension (`.yaml`/`.yml`, `.json5`,
    /// anything else as JSON).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json5") => Self::from_json5_str(&text),
            _ => Self::from_json_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_letter_landscape() {
        let px = SvgConfig::default().resolve_pixels().unwrap();
        assert_eq!(px.width, 1056.0);
        assert_eq!(px.height, 816.0);
        assert_eq!(px.header_height, 96.0);
        assert!((px.border - 9.984).abs() < 1e-9);
        assert_eq!(px.legend_x, None);
    }

    #[test]
    fn explicit_zero_coordinates_stay_explicit() {
        let cfg = SvgConfig {
            legend_x: Some(0.0),
            legend_y: Some(2.0),
            ..SvgConfig::default()
        };
        let px = cfg.resolve_pixels().unwrap();
        assert_eq!(px.legend_x, Some(0.0));
        assert_eq!(px.legend_y, Some(192.0));
    }

    #[test]
    fn unsupported_unit_fails_before_geometry() {
        let cfg = SvgConfig {
            unit: "league".into(),
            ..SvgConfig::default()
        };
        assert!(matches!(
            cfg.resolve_pixels(),
            Err(Error::UnsupportedUnit { .. })
        ));
    }

    #[test]
    fn loads_camel_case_keys_from_every_format() {
        let json = SvgConfig::from_json_str(
            r#"{"width": 800, "height": 600, "unit": "px", "showSubtechniques": "all", "legendDocked": false}"#,
        )
        .unwrap();
        assert_eq!(json.width, 800.0);
        assert_eq!(json.show_subtechniques, SubtechniqueVisibility::All);
        assert!(!json.legend_docked);
        assert_eq!(json.font, "sans-serif");

        let json5 = SvgConfig::from_json5_str("{ width: 10, unit: 'cm', /* c */ showHeader: false }")
            .unwrap();
        assert_eq!(json5.unit, "cm");
        assert!(!json5.show_header);

        let yaml = SvgConfig::from_yaml_str("width: 5\nlegendX: 1.5\nshowSubtechniques: none\n")
            .unwrap();
        assert_eq!(yaml.legend_x, Some(1.5));
        assert_eq!(yaml.show_subtechniques, SubtechniqueVisibility::None);
    }
}
