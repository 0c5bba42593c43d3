use easel_common::{BASE_LAYER, PaintContext};
use easel_scene::{Node, NodeKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Screen};
use crate::host::{HostError, ResourceLookup, SurfaceHost, SurfaceRequest};
use crate::painter;

/// A surface counts as fresh while `last_updated_at - now` is below this.
const STALE_AFTER_MS: f64 = 1000.0;

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Prefix of the ids of every surface this renderer requests.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub smooth_image: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            name: "main".into(),
            width: 800,
            height: 600,
            smooth_image: false,
        }
    }
}

/// Errors from rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not create surface for layer {layer:?}: {source}")]
    SurfaceCreation {
        layer: String,
        #[source]
        source: HostError,
    },
}

/// A registered layer surface.
#[derive(Debug)]
pub struct SurfaceEntry<S> {
    pub surface: S,
    /// Frame time (ms) of the last node painted onto this surface.
    pub last_updated_at: Option<f64>,
    pub is_active: bool,
}

/// Paints a scene tree onto layered surfaces obtained from a host.
///
/// The renderer reads the tree and never restructures it; the only node
/// state it touches is the custom hooks it calls.
pub struct Renderer<H: SurfaceHost, R: ResourceLookup> {
    config: RendererConfig,
    screen: Screen,
    camera: Camera,
    surfaces: IndexMap<String, SurfaceEntry<H::Surface>>,
    host: H,
    resources: R,
}

impl<H: SurfaceHost, R: ResourceLookup> Renderer<H, R> {
    /// Create a renderer and its base surface.
    pub fn new(config: RendererConfig, host: H, resources: R) -> Result<Self, RenderError> {
        let screen = Screen::new(f64::from(config.width), f64::from(config.height));
        let mut renderer = Self {
            config,
            screen,
            camera: Camera::zero(screen),
            surfaces: IndexMap::new(),
            host,
            resources,
        };
        renderer.add_canvas(BASE_LAYER)?;
        Ok(renderer)
    }

    /// Register a surface for `layer` unless one already exists.
    pub fn add_canvas(&mut self, layer: &str) -> Result<(), RenderError> {
        if self.surfaces.contains_key(layer) {
            return Ok(());
        }

        let request = SurfaceRequest {
            id: format!("{}_{}", self.config.name, layer),
            layer: layer.to_string(),
            width: self.config.width,
            height: self.config.height,
        };
        let mut surface =
            self.host
                .create_surface(&request)
                .map_err(|source| RenderError::SurfaceCreation {
                    layer: layer.to_string(),
                    source,
                })?;
        surface.set_image_smoothing(self.config.smooth_image);

        tracing::debug!(layer, id = %request.id, "surface created");
        self.surfaces.insert(
            layer.to_string(),
            SurfaceEntry {
                surface,
                last_updated_at: None,
                is_active: true,
            },
        );
        Ok(())
    }

    pub fn bind_camera(&mut self, target: &Node) {
        self.camera.bind_target(target.id());
    }

    /// Clear the surfaces, update the camera and paint the tree rooted at
    /// `root`. `now` is the frame time in milliseconds.
    pub fn render_tree(&mut self, root: &mut Node, now: f64) -> Result<(), RenderError> {
        let _span = tracing::info_span!("render_tree").entered();
        let (width, height) = (self.screen.width, self.screen.height);

        for (layer, entry) in self.surfaces.iter_mut() {
            if entry.last_updated_at.unwrap_or(0.0) - now < STALE_AFTER_MS {
                entry.surface.clear_rect(0.0, 0.0, width, height);
            } else {
                entry.is_active = false;
                tracing::debug!(layer = %layer, "surface marked inactive");
            }
        }
        self.camera.update();

        self.render_node(root, now)
    }

    /// Paint `node` and its subtree, depth first.
    ///
    /// A node whose surface does not exist yet gets one created, and its
    /// subtree is skipped until the next frame. If the host refuses the
    /// surface, only that subtree is lost; the error is returned once the
    /// rest of the tree has been painted.
    pub fn render_node(&mut self, node: &mut Node, now: f64) -> Result<(), RenderError> {
        let Some(entry) = self.surfaces.get_mut(node.canvas_id()) else {
            tracing::debug!(layer = node.canvas_id(), "no surface yet, skipping subtree");
            return self.add_canvas(node.canvas_id()).inspect_err(|err| {
                tracing::warn!(error = %err, "surface refused, skipping subtree");
            });
        };
        entry.last_updated_at = Some(now);
        let ctx: &mut dyn PaintContext = &mut entry.surface;

        match &mut node.kind {
            NodeKind::World | NodeKind::Light => {}
            NodeKind::Transform(transform) => {
                painter::apply_transform(ctx, transform, &self.camera);
            }
            NodeKind::Body(body) | NodeKind::PhysicsBody(body) | NodeKind::FluidBody(body) => {
                ctx.begin_path();
                painter::render_body(ctx, body, &self.camera, &self.resources);
                ctx.close_path();

                if body.debug {
                    ctx.begin_path();
                    painter::draw_bounding_box(ctx, body, &self.camera);
                    ctx.close_path();
                }
            }
            NodeKind::Custom(custom) => {
                if let Some(render) = custom.render.as_mut() {
                    render(ctx);
                }
            }
        }

        // A failing subtree is skipped like a missing surface; its siblings
        // still paint. The first failure is reported after the pass.
        let mut result = Ok(());
        for child in node.children_mut() {
            if let Err(err) = self.render_node(child, now) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        if let Some(entry) = self.surfaces.get_mut(node.canvas_id()) {
            let ctx: &mut dyn PaintContext = &mut entry.surface;
            match &mut node.kind {
                NodeKind::Transform(_) => ctx.restore(),
                NodeKind::Custom(custom) => {
                    if let Some(cleanup) = custom.cleanup.as_mut() {
                        cleanup(ctx);
                    }
                }
                _ => {}
            }
        }

        result
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn surface(&self, layer: &str) -> Option<&SurfaceEntry<H::Surface>> {
        self.surfaces.get(layer)
    }

    pub fn surface_mut(&mut self, layer: &str) -> Option<&mut SurfaceEntry<H::Surface>> {
        self.surfaces.get_mut(layer)
    }

    /// Layer ids in creation order.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }
}
