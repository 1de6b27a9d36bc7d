use crate::color::Rgb;
use serde::{Deserialize, Serialize};

/// Score → color mapping with evenly spaced base color stops over `[min_value, max_value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub colors: Vec<Rgb>,
    #[serde(default)]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

fn default_max_value() -> f64 {
    100.0
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb::new(0xff, 0x66, 0x66),
                Rgb::new(0xff, 0xe7, 0x66),
                Rgb::new(0x8e, 0xc8, 0x43),
            ],
            min_value: 0.0,
            max_value: 100.0,
        }
    }
}

impl Gradient {
    pub fn new(colors: Vec<Rgb>, min_value: f64, max_value: f64) -> Self {
        Self {
            colors,
            min_value,
            max_value,
        }
    }

    /// Color for `score`, clamped to the gradient's domain.
    ///
    /// An empty gradient maps everything to white; a degenerate domain (`min == max`) maps
    /// everything to the first stop.
    pub fn color_for(&self, score: f64) -> Rgb {
        let Some(first) = self.colors.first().copied() else {
            return Rgb::WHITE;
        };
        if self.colors.len() == 1 {
            return first;
        }
        let (lo, hi) = if self.min_value <= self.max_value {
            (self.min_value, self.max_value)
        } else {
            (self.max_value, self.min_value)
        };
        let span = hi - lo;
        if !(span.is_finite() && span > 0.0) || !score.is_finite() {
            return first;
        }

        let mut t = (score.clamp(lo, hi) - lo) / span;
        if self.min_value > self.max_value {
            t = 1.0 - t;
        }
        let segments = (self.colors.len() - 1) as f64;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(self.colors.len() - 2);
        let local = pos - idx as f64;
        self.colors[idx].lerp(self.colors[idx + 1], local)
    }
}
