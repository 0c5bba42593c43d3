//! Scene graph: typed nodes owned by their parents, and the entity manager.
//!
//! # Invariants
//! - The tree has no cycles and no shared ownership; parents own children.
//! - Children are painted in insertion order.
//! - Geometry a shape needs to be painted is part of its variant payload.

pub mod body;
pub mod geometry;
pub mod manager;
pub mod node;

pub use body::{Body, BodyProps, BoundingBox, ColorStop, Gradient, Shape, Styles};
pub use geometry::{Margins, Matrix2x3};
pub use manager::EntityManager;
pub use node::{CustomNode, CustomTag, Hook, Node, NodeKind, NodeType, Origin, TransformNode};

/// Errors from building scene nodes.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("a polygon needs at least one vertex")]
    EmptyPolygon,
    #[error("{field} must be finite")]
    NonFiniteGeometry { field: &'static str },
}

pub fn crate_info() -> &'static str {
    "easel-scene v0.1.0"
}
