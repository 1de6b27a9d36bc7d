mod wrap;


pub use wrap::wrap_on_spaces;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_family: Option<&str>, font_size: f64) -> Self {
        Self {
            font_family: font_family.map(str::to_string),
            font_size,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Measures a (possibly multi-line, `\n`-separated) text block.
///
/// Implementations must be deterministic: equal inputs yield equal metrics.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent measurer: every column of a character cell costs `char_width_factor` em.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

pub const DEFAULT_CHAR_WIDTH_FACTOR: f64 = 0.6;
pub const DEFAULT_LINE_HEIGHT_FACTOR: f64 = 1.2;

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<String> {
        let t = text.replace("\r\n", "\n");
        let out = t.split('\n').map(|s| s.to_string()).collect::<Vec<_>>();
        if out.is_empty() {
            return vec!["".to_string()];
        }
        out
    }

    fn factors(&self) -> (f64, f64) {
        let char_width_factor = if self.char_width_factor == 0.0 {
            DEFAULT_CHAR_WIDTH_FACTOR
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            DEFAULT_LINE_HEIGHT_FACTOR
        } else {
            self.line_height_factor
        };
        (char_width_factor, line_height_factor)
    }
}

/// Display columns of a line; East Asian wide glyphs count twice, control characters zero.
pub fn line_columns(line: &str) -> usize {
    line.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let (char_width_factor, line_height_factor) = self.factors();

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let mut max_cols = 0usize;
        for line in &lines {
            max_cols = max_cols.max(line_columns(line));
        }

        let width = max_cols as f64 * font_size * char_width_factor;
        let height = lines.len() as f64 * font_size * line_height_factor;
        TextMetrics {
            width,
            height,
            line_count: lines.len(),
        }
    }
}
