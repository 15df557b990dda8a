//! Reference pixel evaluator.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use super::expr::{Expr, Raster};
use super::RasterError;

/// A dense single-band pixel grid in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl BandGrid {
    /// Create a grid from row-major pixel values.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self, RasterError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(RasterError::InvalidGridLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A grid with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// A 1×1 grid, used for point retrievals.
    pub fn single(value: f64) -> Self {
        Self::filled(1, 1, value)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Number of NaN (no-data) pixels.
    pub fn nodata_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

/// Source of raw band pixels for evaluation.
pub trait PixelSource {
    fn grid(&self, band: &str) -> Option<&BandGrid>;
}

impl PixelSource for HashMap<String, BandGrid> {
    fn grid(&self, band: &str) -> Option<&BandGrid> {
        self.get(band)
    }
}

impl PixelSource for BTreeMap<String, BandGrid> {
    fn grid(&self, band: &str) -> Option<&BandGrid> {
        self.get(band)
    }
}

/// Evaluate a raster against in-memory bands.
///
/// All referenced bands must share one shape. A raster that reads no bands
/// evaluates to a 1×1 grid.
pub fn evaluate<S: PixelSource + ?Sized>(
    raster: &Raster,
    source: &S,
) -> Result<BandGrid, RasterError> {
    let mut shape: Option<(String, (usize, usize))> = None;
    for band in raster.band_dependencies() {
        let grid = source
            .grid(&band)
            .ok_or_else(|| RasterError::MissingBand(band.clone()))?;
        match &shape {
            None => shape = Some((band, grid.shape())),
            Some((_, expected)) if *expected != grid.shape() => {
                return Err(RasterError::ShapeMismatch {
                    band,
                    expected: *expected,
                    actual: grid.shape(),
                });
            }
            Some(_) => {}
        }
    }
    let (width, height) = shape.map(|(_, s)| s).unwrap_or((1, 1));

    let evaluator = Evaluator {
        source,
        len: width * height,
    };
    let data = evaluator.eval(raster.expr())?.into_pixels(width * height);
    BandGrid::new(width, height, data)
}

enum Value {
    Scalar(f64),
    Pixels(Vec<f64>),
}

impl Value {
    fn into_pixels(self, len: usize) -> Vec<f64> {
        match self {
            Value::Scalar(v) => vec![v; len],
            Value::Pixels(p) => p,
        }
    }

    fn map<F>(self, f: F) -> Value
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        match self {
            Value::Scalar(v) => Value::Scalar(f(v)),
            Value::Pixels(p) => Value::Pixels(p.into_par_iter().map(f).collect()),
        }
    }
}

struct Evaluator<'a, S: ?Sized> {
    source: &'a S,
    len: usize,
}

impl<S: PixelSource + ?Sized> Evaluator<'_, S> {
    fn eval(&self, expr: &Expr) -> Result<Value, RasterError> {
        match expr {
            Expr::Band { name } => {
                let grid = self
                    .source
                    .grid(name)
                    .ok_or_else(|| RasterError::MissingBand(name.clone()))?;
                Ok(Value::Pixels(grid.data().to_vec()))
            }
            Expr::Constant { value } => Ok(Value::Scalar(*value)),
            Expr::Unary { op, input } => {
                let op = *op;
                Ok(self.eval(input)?.map(move |x| op.apply(x)))
            }
            Expr::Binary { op, lhs, rhs } => {
                let op = *op;
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                Ok(self.zip(lhs, rhs, move |a, b| op.apply(a, b)))
            }
            Expr::Where {
                input,
                condition,
                value,
            } => {
                let value = *value;
                let input = self.eval(input)?;
                let condition = self.eval(condition)?;
                Ok(self.zip(input, condition, move |x, c| {
                    if !c.is_nan() && c != 0.0 {
                        value
                    } else {
                        x
                    }
                }))
            }
            Expr::Clamp { input, min, max } => {
                let (min, max) = (*min, *max);
                Ok(self.eval(input)?.map(move |x| {
                    if x < min {
                        min
                    } else if x > max {
                        max
                    } else {
                        x
                    }
                }))
            }
        }
    }

    fn zip<F>(&self, a: Value, b: Value, f: F) -> Value
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(f(x, y)),
            (a, b) => {
                let a = a.into_pixels(self.len);
                let b = b.into_pixels(self.len);
                Value::Pixels(
                    a.par_iter()
                        .zip(b.par_iter())
                        .map(|(x, y)| f(*x, *y))
                        .collect(),
                )
            }
        }
    }
}
