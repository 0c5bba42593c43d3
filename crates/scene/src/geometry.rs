use glam::DAffine2;
use serde::{Deserialize, Serialize};

/// Margins around a node's rectangle, in `[top, right, bottom, left]` order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl From<[f64; 4]> for Margins {
    fn from([top, right, bottom, left]: [f64; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// 2×3 affine matrix laid out as `[[a, c, e], [b, d, f]]`.
///
/// `(a, b)` and `(c, d)` are the transformed x and y axes; `(e, f)` is the
/// translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2x3 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix2x3 {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn from_rows([[a, c, e], [b, d, f]]: [[f64; 3]; 2]) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn to_affine(&self) -> DAffine2 {
        DAffine2::from_cols_array(&[self.a, self.b, self.c, self.d, self.e, self.f])
    }
}

impl Default for Matrix2x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
