//! Shared types for the easel scene graph, renderer and clock.
//!
//! # Invariants
//! - Everything here is plain data or a contract; no crate state lives here.
//! - Constant tags keep their numeric values so scene data stays portable.

pub mod commons;
pub mod paint;
pub mod types;

pub use paint::{FillStyle, ImageRef, PaintContext};
pub use types::{
    BASE_LAYER, GradientKind, NodeId, Repeat, ShapeKind, TransformOrigin, Vector2D,
};

pub fn crate_info() -> &'static str {
    "easel-common v0.1.0"
}
