//! Lazy raster algebra.
//!
//! Raster arithmetic in this crate never touches pixels. Each operation on a
//! [`Raster`] builds a node in an immutable, `Arc`-shared expression graph;
//! pixels are computed only when a backend evaluates the graph for an export
//! or a display request.
//!
//! # Architecture
//!
//! ```text
//! Raster::band("SR_B5") ──┐
//!                         ├──► Binary(Sub) ──► Binary(Div) ──► Raster "NDVI"
//! Raster::band("SR_B4") ──┘                         ▲
//!                                                   │
//!                              Binary(Add) ─────────┘
//! ```
//!
//! The remote compute platform owns evaluation in production. The
//! [`evaluate`] function is a reference evaluator over in-memory grids,
//! used for point retrievals and to pin the pixel semantics:
//!
//! - division by zero yields NaN
//! - the logarithm of a non-positive value yields NaN
//! - NaN propagates through every operation, including comparisons
//!
//! # Example
//!
//! ```
//! use landsat_lst::raster::{evaluate, BandGrid, Raster};
//! use std::collections::HashMap;
//!
//! let kelvin = Raster::band("ST_B10").multiply(0.00341802).add(149.0);
//! let mut bands = HashMap::new();
//! bands.insert("ST_B10".to_string(), BandGrid::single(45000.0));
//!
//! let grid = evaluate(&kelvin, &bands).unwrap();
//! assert!((grid.data()[0] - 302.8109).abs() < 1e-9);
//! ```

mod eval;
mod expr;

pub use eval::{evaluate, BandGrid, PixelSource};
pub use expr::{BinaryOp, Expr, Operand, Raster, UnaryOp};

use thiserror::Error;

/// Errors raised while evaluating an expression graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// The expression references a band the pixel source does not hold.
    #[error("Band '{0}' is not available")]
    MissingBand(String),

    /// Two input bands have different dimensions.
    #[error("Band '{band}' is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        band: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Pixel buffer length does not match width × height.
    #[error("Grid holds {actual} pixels, expected {expected}")]
    InvalidGridLength { expected: usize, actual: usize },
}
