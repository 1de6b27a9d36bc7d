//! Matrix layout: header strip, uniform grid of columns, floating legend.

use crate::cell::{CellPainter, DisplayMode};
use crate::column::{build_column, visible_row_count};
use crate::fit::{MIN_FONT_SIZE, fit_text};
use crate::header::{HEADER_INSET, HeaderContent, build_header};
use crate::model::{Canvas, Element, Group, Text, TextAnchor};
use crate::text::DEFAULT_LINE_HEIGHT_FACTOR;
use crate::{Error, ExportOptions, Result};
use navmatrix_core::{
    Category, Domain, ItemAnnotations, Layer, MatrixProvider, Rgb, SvgConfig, order_columns,
    reorder,
};

/// Horizontal space between two columns.
pub const COLUMN_GUTTER: f64 = 10.0;
/// Space between the header and the top of the columns; holds the column labels.
pub const HEADER_MARGIN: f64 = 30.0;
pub const LABEL_MAX_FONT_SIZE: f64 = 28.0;
/// Extra height granted to the column label box on top of one cell.
const LABEL_BOX_EXTRA_HEIGHT: f64 = 10.0;

/// Geometry shared by every column of one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub column_width: f64,
    pub cell_height: f64,
    /// `y` of every column's first cell.
    pub column_top: f64,
    pub rows: usize,
}

fn timing_enabled() -> bool {
    std::env::var("NAVMATRIX_EXPORT_TIMING").ok().as_deref() == Some("1")
}

/// Lays out `categories` (already in final order) into a canvas.
///
/// Sizing reserves one row per item plus the sub-items of expanded items, for the tallest
/// column; exclusions are only applied when the cells are built, so every column shares one cell
/// height. Nothing passed in is modified.
pub fn export(
    display: DisplayMode,
    layer: &Layer,
    config: &SvgConfig,
    categories: &[Category],
    annotations: &ItemAnnotations,
    options: &ExportOptions,
) -> Result<Canvas> {
    let total_start = timing_enabled().then(std::time::Instant::now);

    let px = config.resolve_pixels()?;
    let visibility = config.show_subtechniques;
    let rows = categories
        .iter()
        .map(|c| visible_row_count(c, &annotations.filters, visibility))
        .max()
        .unwrap_or(0);
    if rows == 0 {
        return Err(Error::EmptyMatrix);
    }

    let header_height = if config.show_header {
        px.header_height
    } else {
        0.0
    };
    let n = categories.len() as f64;
    let grid = Grid {
        column_width: px.width / n - COLUMN_GUTTER,
        cell_height: (px.height - header_height - HEADER_MARGIN - px.border) / rows as f64,
        column_top: header_height + HEADER_MARGIN,
        rows,
    };
    tracing::debug!(
        columns = categories.len(),
        rows = grid.rows,
        column_width = grid.column_width,
        cell_height = grid.cell_height,
        column_top = grid.column_top,
        "matrix grid"
    );

    let measurer = options.text_measurer.as_ref();
    let header_start = total_start.map(|_| std::time::Instant::now());
    let blocks = build_header(
        &HeaderContent {
            name: &layer.name,
            description: layer.description.as_deref(),
            filters: layer.filters.as_ref(),
            gradient: layer.gradient.as_ref(),
        },
        config,
        &px,
        measurer,
    );
    let header_elapsed = header_start.map(|s| s.elapsed());

    let cell_gradient = layer.gradient.clone().unwrap_or_default();
    let painter = CellPainter {
        measurer,
        font_family: Some(config.font.as_str()),
        gradient: &cell_gradient,
        scores: &annotations.scores,
        colors: &annotations.colors,
        border_color: &config.table_border_color,
        display,
    };

    let columns_start = total_start.map(|_| std::time::Instant::now());
    let mut matrix = Group::new("matrix");
    let mut label_font_size: Option<f64> = None;
    let mut x = HEADER_INSET;
    for category in categories {
        let mut column = Group::new("column")
            .with_id(category.key())
            .at(x, grid.column_top);

        let label = display.label(&category.id, &category.name);
        if !label.is_empty() {
            let font_size = *label_font_size.get_or_insert_with(|| {
                fit_text(
                    measurer,
                    &label,
                    painter.font_family,
                    grid.column_width,
                    grid.cell_height + LABEL_BOX_EXTRA_HEIGHT,
                    LABEL_MAX_FONT_SIZE,
                    MIN_FONT_SIZE,
                )
                .font_size
            });
            column.push(Text {
                class: Some("column-label".to_string()),
                x: grid.column_width / 2.0,
                y: -HEADER_MARGIN / 2.0,
                lines: vec![label],
                font_size,
                line_height: font_size * DEFAULT_LINE_HEIGHT_FACTOR,
                anchor: TextAnchor::Middle,
                fill: Rgb::BLACK,
                bold: true,
            });
        }

        let (cells, _) = build_column(
            &painter,
            category,
            grid.cell_height,
            grid.column_width,
            &annotations.filters,
            visibility,
        );
        column.push(cells);
        matrix.push(column);
        x += grid.column_width + COLUMN_GUTTER;
    }
    let columns_elapsed = columns_start.map(|s| s.elapsed());

    let mut children: Vec<Element> = Vec::with_capacity(3);
    if let Some(header) = blocks.header {
        children.push(header.into());
    }
    children.push(matrix.into());
    if let Some(legend) = blocks.floating_legend {
        children.push(legend.into());
    }

    if let Some(s) = total_start {
        eprintln!(
            "[export-timing] total={:?} header={:?} columns={:?} categories={} rows={}",
            s.elapsed(),
            header_elapsed.unwrap_or_default(),
            columns_elapsed.unwrap_or_default(),
            categories.len(),
            grid.rows,
        );
    }

    Ok(Canvas {
        width: px.width,
        height: px.height,
        font_family: config.font.clone(),
        children,
    })
}

/// A category catalog bound to one domain, ready to export layers against.
#[derive(Debug, Clone)]
pub struct MatrixExporter {
    domain: Domain,
    categories: Vec<Category>,
    column_order: Vec<String>,
}

impl MatrixExporter {
    /// Fails with `UnsupportedDomain` for an unknown domain key.
    pub fn new(domain: &str, provider: &dyn MatrixProvider) -> Result<Self> {
        let domain: Domain = domain.parse()?;
        let categories = provider.categories(domain)?;
        Ok(Self {
            domain,
            categories,
            column_order: Vec::new(),
        })
    }

    /// Category keys moved to the front of the matrix, in order.
    pub fn with_column_order(mut self, keys: Vec<String>) -> Self {
        self.column_order = keys;
        self
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Categories in catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category order a layer would be drawn in.
    pub fn ordered_categories(
        &self,
        layer: &Layer,
        annotations: &ItemAnnotations,
    ) -> Result<Vec<Category>> {
        let ordered = reorder(&self.categories, layer.sort_mode()?, &annotations.scores);
        if self.column_order.is_empty() {
            Ok(ordered)
        } else {
            Ok(order_columns(&ordered, &self.column_order))
        }
    }

    pub fn export(
        &self,
        display: DisplayMode,
        layer: &Layer,
        config: &SvgConfig,
        options: &ExportOptions,
    ) -> Result<Canvas> {
        let annotations = layer.annotations()?;
        let ordered = self.ordered_categories(layer, &annotations)?;
        export(display, layer, config, &ordered, &annotations, options)
    }
}
