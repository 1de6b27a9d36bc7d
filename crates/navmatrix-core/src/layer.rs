//! Navigator-style layer documents: the scored annotations laid over a matrix.

use crate::color::Rgb;
use crate::gradient::Gradient;
use crate::ordering::SortMode;
use crate::selector::{ItemFilters, ItemTable, Scope};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub filters: Option<LayerFilters>,
    #[serde(default)]
    pub gradient: Option<Gradient>,
    #[serde(default)]
    pub sorting: i64,
    #[serde(default)]
    pub hide_disabled: bool,
    #[serde(default)]
    pub techniques: Vec<LayerTechnique>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerFilters {
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub stages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTechnique {
    #[serde(rename = "techniqueID")]
    pub technique_id: String,
    /// Tactic shortname; absent means the annotation applies in every tactic.
    #[serde(default)]
    pub tactic: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub show_subtechniques: bool,
}

fn default_enabled() -> bool {
    true
}

/// Per-item lookups derived from a layer's technique annotations.
#[derive(Debug, Clone, Default)]
pub struct ItemAnnotations {
    pub scores: ItemTable<f64>,
    pub colors: ItemTable<Rgb>,
    pub filters: ItemFilters,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            domain: None,
            filters: None,
            gradient: None,
            sorting: 0,
            hide_disabled: false,
            techniques: Vec::new(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn sort_mode(&self) -> Result<SortMode> {
        SortMode::try_from(self.sorting)
    }

    /// Builds the score table, fallback colors, expansion set and exclusion set.
    ///
    /// Disabled techniques are only excluded when the layer hides disabled techniques.
    pub fn annotations(&self) -> Result<ItemAnnotations> {
        let mut out = ItemAnnotations::default();
        for t in &self.techniques {
            let id = t.technique_id.trim();
            if id.is_empty() {
                return Err(Error::InvalidLayer {
                    message: "technique annotation without techniqueID".to_string(),
                });
            }
            let scope = Scope::from_key(t.tactic.as_deref());

            if let Some(score) = t.score.filter(|s| s.is_finite()) {
                out.scores.insert(scope.clone(), id, score);
            }
            if let Some(raw) = t.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                let Some(color) = Rgb::parse(raw) else {
                    return Err(Error::InvalidLayer {
                        message: format!("invalid color {raw:?} for technique {id}"),
                    });
                };
                out.colors.insert(scope.clone(), id, color);
            }
            if t.show_subtechniques {
                out.filters.expanded.insert(scope.clone(), id);
            }
            if !t.enabled && self.hide_disabled {
                out.filters.excluded.insert(scope, id);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYER: &str = r##"{
        "name": "example",
        "domain": "enterprise-attack",
        "sorting": 3,
        "hideDisabled": true,
        "filters": {"platforms": ["Windows", "Linux"], "stages": ["act"]},
        "gradient": {"colors": ["#ffffff", "#ff0000"], "minValue": 0, "maxValue": 10},
        "techniques": [
            {"techniqueID": "T1059", "tactic": "execution", "score": 7, "showSubtechniques": true},
            {"techniqueID": "T1203", "color": "#00ff00"},
            {"techniqueID": "T1078", "enabled": false},
            {"techniqueID": "T1133", "tactic": "", "score": 1, "color": ""}
        ]
    }"##;

    #[test]
    fn parses_navigator_layer_fields() {
        let layer = Layer::from_json_str(LAYER).unwrap();
        assert_eq!(layer.name, "example");
        assert_eq!(layer.sort_mode().unwrap(), SortMode::ScoreDescending);
        assert_eq!(layer.filters.as_ref().unwrap().platforms.len(), 2);
        assert_eq!(layer.gradient.as_ref().unwrap().max_value, 10.0);
        assert!(layer.techniques[0].enabled);
        assert!(!layer.techniques[2].enabled);
    }

    #[test]
    fn annotations_split_into_typed_tables() {
        let layer = Layer::from_json_str(LAYER).unwrap();
        let a = layer.annotations().unwrap();
        assert_eq!(a.scores.get("execution", "T1059"), Some(&7.0));
        assert_eq!(a.scores.get("persistence", "T1059"), None);
        assert_eq!(a.scores.get("persistence", "T1133"), Some(&1.0));
        assert_eq!(
            a.colors.get("execution", "T1203"),
            Some(&Rgb::new(0, 255, 0))
        );
        assert!(a.colors.get("initial-access", "T1133").is_none());
        assert!(a.filters.expanded.contains("execution", "T1059"));
        assert!(a.filters.excluded.contains("defense-evasion", "T1078"));
    }

    #[test]
    fn disabled_techniques_stay_visible_unless_hidden() {
        let mut layer = Layer::from_json_str(LAYER).unwrap();
        layer.hide_disabled = false;
        let a = layer.annotations().unwrap();
        assert!(a.filters.excluded.is_empty());
    }

    #[test]
    fn invalid_color_is_reported() {
        let mut layer = Layer::new("bad");
        layer.techniques.push(LayerTechnique {
            technique_id: "T1".into(),
            tactic: None,
            score: None,
            color: Some("#zzzzzz".into()),
            enabled: true,
            show_subtechniques: false,
        });
        assert!(matches!(
            layer.annotations(),
            Err(Error::InvalidLayer { .. })
        ));
    }
}
