use easel_common::{ImageRef, PaintContext};

/// What the renderer asks the host for when it needs a new layer surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRequest {
    /// Host-unique id, `"{renderer}_{layer}"`.
    pub id: String,
    pub layer: String,
    pub width: u32,
    pub height: u32,
}

/// Errors a surface host can report.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no painting area to attach surfaces to")]
    NoPaintingArea,
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Environment that owns the real drawing surfaces.
///
/// The host creates a surface, attaches it to its painting area and hands
/// back the paint context. Surfaces are released by the host, never by the
/// renderer.
pub trait SurfaceHost {
    type Surface: PaintContext;

    fn create_surface(&mut self, request: &SurfaceRequest) -> Result<Self::Surface, HostError>;
}

/// Resolves image identifiers from body styles to paintable images.
pub trait ResourceLookup {
    fn get(&self, key: &str) -> Option<ImageRef>;
}
