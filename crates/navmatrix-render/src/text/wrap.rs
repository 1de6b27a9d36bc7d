//! Greedy word wrapping driven by a [`TextMeasurer`].

use super::{DeterministicTextMeasurer, TextMeasurer, TextStyle};

/// Breaks `text` at spaces so that each line measures at most `max_width_px`.
///
/// A word wider than the limit gets a line of its own and is never split. Existing `\n` breaks
/// are kept, runs of spaces collapse, and a non-positive limit leaves every line as is.
pub fn wrap_on_spaces(
    text: &str,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    max_width_px: f64,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in DeterministicTextMeasurer::normalized_text_lines(text) {
        if !max_width_px.is_finite() || max_width_px <= 0.0 {
            out.push(line);
            continue;
        }

        let mut cur = String::new();
        for word in line.split(' ').filter(|w| !w.is_empty()) {
            if cur.is_empty() {
                cur.push_str(word);
                continue;
            }
            let joined = format!("{cur} {word}");
            if measurer.measure(&joined, style).width <= max_width_px {
                cur = joined;
            } else {
                out.push(std::mem::replace(&mut cur, word.to_string()));
            }
        }
        out.push(cur);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
