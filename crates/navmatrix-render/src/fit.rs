//! Largest font size at which a label fits its box.

use crate::text::{TextMeasurer, TextStyle, wrap_on_spaces};
use serde::{Deserialize, Serialize};

/// Smallest font size the sizer will return.
pub const MIN_FONT_SIZE: f64 = 5.0;

/// Decrement used while searching downwards from the maximum size.
pub const FONT_SIZE_STEP: f64 = 0.5;

const FIT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFit {
    pub font_size: f64,
    pub lines: Vec<String>,
}

/// Candidate sizes from `max` down to `min`, inclusive of both ends.
fn candidate_sizes(max: f64, min: f64) -> impl Iterator<Item = f64> {
    std::iter::successors(Some(max), move |s| {
        if *s <= min {
            None
        } else {
            Some((s - FONT_SIZE_STEP).max(min))
        }
    })
}

/// Finds the largest size in `[min_font_size, max_font_size]` at which `text` fits inside
/// `box_width × box_height`.
///
/// The text is first tried on a single line. When no single-line size fits, it is wrapped at
/// spaces (re-wrapped for every candidate size) and the search runs again. If nothing fits, the
/// floor size and its wrapping are returned; overflow is left to the caller.
pub fn fit_text(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_family: Option<&str>,
    box_width: f64,
    box_height: f64,
    max_font_size: f64,
    min_font_size: f64,
) -> FontFit {
    let min = if min_font_size.is_finite() && min_font_size > 0.0 {
        min_font_size
    } else {
        MIN_FONT_SIZE
    };
    let max = if max_font_size.is_finite() {
        max_font_size.max(min)
    } else {
        min
    };

    let text = text.trim();
    if text.is_empty() {
        return FontFit {
            font_size: max,
            lines: Vec::new(),
        };
    }

    let fits = |block: &str, style: &TextStyle| {
        let m = measurer.measure(block, style);
        m.width <= box_width + FIT_EPSILON && m.height <= box_height + FIT_EPSILON
    };

    for size in candidate_sizes(max, min) {
        let style = TextStyle::sized(font_family, size);
        if fits(text, &style) {
            return FontFit {
                font_size: size,
                lines: vec![text.to_string()],
            };
        }
    }

    let wrapped_at = |size: f64| {
        let style = TextStyle::sized(font_family, size);
        let lines = wrap_on_spaces(text, measurer, &style, box_width);
        (style, lines)
    };

    for size in candidate_sizes(max, min) {
        let (style, lines) = wrapped_at(size);
        if lines.len() > 1 && fits(&lines.join("\n"), &style) {
            return FontFit {
                font_size: size,
                lines,
            };
        }
    }

    let (_, lines) = wrapped_at(min);
    FontFit {
        font_size: min,
        lines,
    }
}
