#![forbid(unsafe_code)]

//! Headless model for navmatrix: the category matrix, layer annotations, export configuration
//! and the unit conversion every layout length goes through.

pub mod color;
pub mod config;
pub mod error;
pub mod gradient;
pub mod layer;
pub mod matrix;
pub mod ordering;
pub mod selector;
pub mod units;

pub use color::Rgb;
pub use config::{PixelConfig, SvgConfig};
pub use error::{Error, Result};
pub use gradient::Gradient;
pub use layer::{ItemAnnotations, Layer, LayerFilters, LayerTechnique};
pub use matrix::{Category, Domain, Item, JsonMatrixProvider, MatrixProvider, shortname_for};
pub use ordering::{SortMode, order_columns, reorder};
pub use selector::{ItemFilters, ItemSet, ItemState, ItemTable, Scope, SubtechniqueVisibility};
pub use units::{Unit, to_pixels};
