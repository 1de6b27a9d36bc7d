//! One technique block, optionally followed by its expanded sub-technique rows.

use crate::fit::{MIN_FONT_SIZE, fit_text};
use crate::model::{Group, Rect, Text, TextAnchor};
use crate::text::{DEFAULT_LINE_HEIGHT_FACTOR, TextMeasurer};
use navmatrix_core::{Gradient, Item, ItemTable, Rgb};

pub const CELL_MAX_FONT_SIZE: f64 = 12.0;
pub const CELL_TEXT_PADDING: f64 = 2.0;
/// Share of the column width used as the sub-technique indent.
pub const SUB_ITEM_INDENT_RATIO: f64 = 0.125;
pub const NEUTRAL_FILL: Rgb = Rgb::WHITE;
pub const CELL_STROKE_WIDTH: f64 = 1.0;

/// Which parts of an entry's identity are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub show_name: bool,
    pub show_id: bool,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            show_name: true,
            show_id: false,
        }
    }
}

impl DisplayMode {
    pub fn new(show_name: bool, show_id: bool) -> Self {
        Self { show_name, show_id }
    }

    pub fn label(self, id: &str, name: &str) -> String {
        match (self.show_name, self.show_id) {
            (true, true) => format!("{id}: {name}"),
            (true, false) => name.to_string(),
            (false, true) => id.to_string(),
            (false, false) => String::new(),
        }
    }
}

/// Everything a cell needs besides its own geometry; shared by all cells of one export.
#[derive(Clone, Copy)]
pub struct CellPainter<'a> {
    pub measurer: &'a dyn TextMeasurer,
    pub font_family: Option<&'a str>,
    pub gradient: &'a Gradient,
    pub scores: &'a ItemTable<f64>,
    pub colors: &'a ItemTable<Rgb>,
    pub border_color: &'a str,
    pub display: DisplayMode,
}

impl<'a> CellPainter<'a> {
    /// Explicit score through the gradient, then the fallback color, then [`NEUTRAL_FILL`].
    pub fn fill_for(&self, category_key: &str, item_id: &str) -> Rgb {
        if let Some(score) = self.scores.get(category_key, item_id) {
            return self.gradient.color_for(*score);
        }
        self.colors
            .get(category_key, item_id)
            .copied()
            .unwrap_or(NEUTRAL_FILL)
    }

    /// Builds the block for `item` at `offset` and returns it with the offset just below it.
    ///
    /// The block is `cell_height` tall plus one `cell_height` row per entry in `sub_items`.
    pub fn build(
        &self,
        offset: f64,
        item: &Item,
        cell_height: f64,
        cell_width: f64,
        sub_items: &[Item],
        category_key: &str,
    ) -> (Group, f64) {
        let fill = self.fill_for(category_key, &item.id);
        let mut cell = Group::new("cell").with_id(item.id.clone()).at(0.0, offset);
        cell.push(self.block_rect(cell_width, cell_height, fill));
        if let Some(text) = self.block_text(&item.id, &item.name, cell_width, cell_height, fill) {
            cell.push(text);
        }

        if !sub_items.is_empty() {
            let indent = cell_width * SUB_ITEM_INDENT_RATIO;
            let sub_width = (cell_width - indent).max(0.0);
            cell.push(Rect {
                x: 0.0,
                y: cell_height,
                width: indent,
                height: cell_height * sub_items.len() as f64,
                fill: Some(fill),
                stroke: Some(self.border_color.to_string()),
                stroke_width: CELL_STROKE_WIDTH,
                rx: 0.0,
            });
            for (idx, sub) in sub_items.iter().enumerate() {
                let sub_fill = self.fill_for(category_key, &sub.id);
                let mut row = Group::new("subcell")
                    .with_id(sub.id.clone())
                    .at(indent, cell_height * (idx + 1) as f64);
                row.push(self.block_rect(sub_width, cell_height, sub_fill));
                if let Some(text) =
                    self.block_text(&sub.id, &sub.name, sub_width, cell_height, sub_fill)
                {
                    row.push(text);
                }
                cell.push(row);
            }
        }

        let consumed = cell_height * (1 + sub_items.len()) as f64;
        (cell, offset + consumed)
    }

    fn block_rect(&self, width: f64, height: f64, fill: Rgb) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            fill: Some(fill),
            stroke: Some(self.border_color.to_string()),
            stroke_width: CELL_STROKE_WIDTH,
            rx: 0.0,
        }
    }

    fn block_text(&self, id: &str, name: &str, width: f64, height: f64, fill: Rgb) -> Option<Text> {
        let label = self.display.label(id, name);
        if label.is_empty() {
            return None;
        }
        let fitted = fit_text(
            self.measurer,
            &label,
            self.font_family,
            (width - 2.0 * CELL_TEXT_PADDING).max(0.0),
            (height - 2.0 * CELL_TEXT_PADDING).max(0.0),
            CELL_MAX_FONT_SIZE,
            MIN_FONT_SIZE,
        );
        Some(Text {
            class: Some("cell-label".to_string()),
            x: width / 2.0,
            y: height / 2.0,
            lines: fitted.lines,
            font_size: fitted.font_size,
            line_height: fitted.font_size * DEFAULT_LINE_HEIGHT_FACTOR,
            anchor: TextAnchor::Middle,
            fill: fill.contrasting_text(),
            bold: false,
        })
    }
}
