#![forbid(unsafe_code)]

pub mod cell;
pub mod column;
pub mod export;
pub mod fit;
pub mod header;
pub mod model;
pub mod svg;
pub mod text;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use cell::DisplayMode;
pub use export::{MatrixExporter, export};
pub use model::Canvas;
pub use svg::{SvgRenderOptions, render_canvas_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("matrix has no visible rows to lay out")]
    EmptyMatrix,
    #[error(transparent)]
    Core(#[from] navmatrix_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct ExportOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}
