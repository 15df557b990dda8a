//! Expression graph nodes and the `Raster` handle.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

/// Single-input pixel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Natural logarithm.
    Log,
}

/// Two-input pixel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// 1.0 where lhs > rhs, 0.0 otherwise.
    GreaterThan,
    /// 1.0 where lhs < rhs, 0.0 otherwise.
    LessThan,
}

impl UnaryOp {
    pub(crate) fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Log => {
                if x > 0.0 {
                    x.ln()
                } else {
                    f64::NAN
                }
            }
        }
    }
}

impl BinaryOp {
    pub(crate) fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => {
                if b == 0.0 {
                    f64::NAN
                } else {
                    a / b
                }
            }
            BinaryOp::GreaterThan => compare(a, b, a > b),
            BinaryOp::LessThan => compare(a, b, a < b),
        }
    }
}

fn compare(a: f64, b: f64, result: bool) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if result {
        1.0
    } else {
        0.0
    }
}

/// A node of the expression graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// A raw band read from the scene.
    Band { name: String },
    /// A constant image.
    Constant { value: f64 },
    Unary {
        op: UnaryOp,
        input: Arc<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Arc<Expr>,
        rhs: Arc<Expr>,
    },
    /// Replace `input` with `value` wherever `condition` is non-zero.
    Where {
        input: Arc<Expr>,
        condition: Arc<Expr>,
        value: f64,
    },
    Clamp {
        input: Arc<Expr>,
        min: f64,
        max: f64,
    },
}

impl Expr {
    fn collect_bands(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Band { name } => {
                out.insert(name.clone());
            }
            Expr::Constant { .. } => {}
            Expr::Unary { input, .. } | Expr::Clamp { input, .. } => input.collect_bands(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_bands(out);
                rhs.collect_bands(out);
            }
            Expr::Where {
                input, condition, ..
            } => {
                input.collect_bands(out);
                condition.collect_bands(out);
            }
        }
    }
}

/// Right-hand side of an arithmetic step: a scalar or another raster.
#[derive(Debug, Clone)]
pub enum Operand {
    Scalar(f64),
    Raster(Arc<Expr>),
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<&Raster> for Operand {
    fn from(raster: &Raster) -> Self {
        Operand::Raster(Arc::clone(&raster.expr))
    }
}

impl Operand {
    fn into_expr(self) -> Arc<Expr> {
        match self {
            Operand::Scalar(value) => Arc::new(Expr::Constant { value }),
            Operand::Raster(expr) => expr,
        }
    }
}

/// A named, lazily evaluated single-band raster.
///
/// Every method returns a new `Raster`; the receiver is never modified.
/// Arithmetic keeps the name of the left operand, as band algebra on the
/// compute platform does, so results are usually [`rename`](Raster::rename)d.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Raster {
    name: String,
    expr: Arc<Expr>,
}

impl Raster {
    /// Select a raw band by name.
    pub fn band(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            expr: Arc::new(Expr::Band { name: name.clone() }),
            name,
        }
    }

    /// A constant raster.
    pub fn constant(value: f64) -> Self {
        Self {
            name: "constant".to_string(),
            expr: Arc::new(Expr::Constant { value }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Same expression bound to a new name.
    pub fn rename(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expr: Arc::clone(&self.expr),
        }
    }

    pub fn add(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::Add, rhs.into())
    }

    pub fn subtract(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::Subtract, rhs.into())
    }

    pub fn multiply(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::Multiply, rhs.into())
    }

    pub fn divide(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::Divide, rhs.into())
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::GreaterThan, rhs.into())
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Self {
        self.binary(BinaryOp::LessThan, rhs.into())
    }

    /// Natural logarithm.
    pub fn log(&self) -> Self {
        self.derive(Expr::Unary {
            op: UnaryOp::Log,
            input: Arc::clone(&self.expr),
        })
    }

    /// Replace pixels with `value` where `condition` is non-zero.
    pub fn where_(&self, condition: &Raster, value: f64) -> Self {
        self.derive(Expr::Where {
            input: Arc::clone(&self.expr),
            condition: Arc::clone(&condition.expr),
            value,
        })
    }

    pub fn clamp(&self, min: f64, max: f64) -> Self {
        self.derive(Expr::Clamp {
            input: Arc::clone(&self.expr),
            min,
            max,
        })
    }

    /// Names of the raw bands this raster reads.
    pub fn band_dependencies(&self) -> BTreeSet<String> {
        let mut bands = BTreeSet::new();
        self.expr.collect_bands(&mut bands);
        bands
    }

    fn binary(&self, op: BinaryOp, rhs: Operand) -> Self {
        self.derive(Expr::Binary {
            op,
            lhs: Arc::clone(&self.expr),
            rhs: rhs.into_expr(),
        })
    }

    fn derive(&self, expr: Expr) -> Self {
        Self {
            name: self.name.clone(),
            expr: Arc::new(expr),
        }
    }
}
