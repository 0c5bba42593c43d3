//! Layered 2D renderer for the scene graph.
//!
//! # Invariants
//! - Every `save` pushed for a transform node has exactly one `restore`,
//!   after the node's children are painted.
//! - Surfaces are created on first use and never destroyed by the renderer.
//! - A node referencing a missing surface is skipped for one frame, not failed.
//!
//! The surface host and the resource lookup are injected; the recording
//! backend stands in for a real canvas in tests and headless runs.

mod camera;
mod host;
pub mod painter;
pub mod recording;
mod renderer;

pub use camera::{Camera, Screen};
pub use host::{HostError, ResourceLookup, SurfaceHost, SurfaceRequest};
pub use recording::{MemoryResources, PaintCommand, RecordingHost, RecordingSurface};
pub use renderer::{RenderError, Renderer, RendererConfig, SurfaceEntry};

pub fn crate_info() -> &'static str {
    "easel-render v0.1.0"
}
