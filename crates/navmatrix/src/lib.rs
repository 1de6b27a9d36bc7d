#![forbid(unsafe_code)]

//! `navmatrix` lays out scored tactic → technique → sub-technique matrices and exports them as
//! SVG (and, optionally, PNG/JPG/PDF).
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`navmatrix::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use navmatrix_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use navmatrix_render::model::Canvas;
    pub use navmatrix_render::svg::{SvgRenderOptions, render_canvas_svg};
    pub use navmatrix_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use navmatrix_render::{DisplayMode, ExportOptions, MatrixExporter, export};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] navmatrix_core::Error),
        #[error(transparent)]
        Render(#[from] navmatrix_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns a layer name into a conservative SVG `id` token.
    ///
    /// Unsupported characters become `-`, runs of `-` collapse, and the id always starts with an
    /// ASCII letter (`m-` is prefixed when needed).
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() {
            return "m-untitled".to_string();
        }
        if out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.to_string()
        } else {
            format!("m-{out}")
        }
    }

    /// Exports `layer` against `exporter`'s catalog and serializes the canvas to SVG.
    ///
    /// When `svg_options.diagram_id` is unset the root id is derived from the layer name.
    pub fn render_layer_svg(
        exporter: &MatrixExporter,
        display: DisplayMode,
        layer: &navmatrix_core::Layer,
        config: &navmatrix_core::SvgConfig,
        options: &ExportOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let canvas = exporter.export(display, layer, config, options)?;
        let svg = if svg_options.diagram_id.is_some() {
            render_canvas_svg(&canvas, svg_options)
        } else {
            let svg_options = SvgRenderOptions {
                diagram_id: Some(sanitize_svg_id(&layer.name)),
                ..svg_options.clone()
            };
            render_canvas_svg(&canvas, &svg_options)
        };
        Ok(svg)
    }

    /// Parses a layer document and a matrix catalog from strings, then renders SVG.
    ///
    /// The domain comes from the layer (`enterprise` when the layer names none).
    pub fn render_layer_json_svg(
        layer_json: &str,
        catalog_json: &str,
        config: &navmatrix_core::SvgConfig,
        display: DisplayMode,
    ) -> Result<String> {
        let layer = navmatrix_core::Layer::from_json_str(layer_json)?;
        let provider = navmatrix_core::JsonMatrixProvider::from_json_str(catalog_json)?;
        let domain = layer.domain.as_deref().unwrap_or("enterprise");
        let exporter = MatrixExporter::new(domain, &provider)?;
        render_layer_svg(
            &exporter,
            display,
            &layer,
            config,
            &ExportOptions::default(),
            &SvgRenderOptions::default(),
        )
    }
}
