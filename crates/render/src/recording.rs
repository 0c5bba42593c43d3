//! In-memory surface host that records every paint call.
//!
//! Stand-in for a real canvas backend: the CLI and the tests render into
//! recording surfaces and inspect the command log and the transform state.

use std::collections::{HashMap, HashSet};

use easel_common::{FillStyle, ImageRef, PaintContext};
use glam::{DAffine2, DVec2};

use crate::host::{HostError, ResourceLookup, SurfaceHost, SurfaceRequest};

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Save,
    Restore,
    Transform([f64; 6]),
    Rotate(f64),
    Translate(f64, f64),
    ClearRect(f64, f64, f64, f64),
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Rect(f64, f64, f64, f64),
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Fill,
    Stroke,
    StrokeRect(f64, f64, f64, f64),
    FillStyle(FillStyle),
    StrokeStyle(FillStyle),
    LineWidth(f64),
    LineDash(Vec<f64>),
    ImageSmoothing(bool),
    DrawImage {
        key: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A surface that logs paint calls and tracks the current transform.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    id: String,
    commands: Vec<PaintCommand>,
    matrix: DAffine2,
    stack: Vec<DAffine2>,
    smoothing: bool,
}

impl RecordingSurface {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Drain the log, keeping the transform state.
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, wanted: &PaintCommand) -> usize {
        self.commands.iter().filter(|c| *c == wanted).count()
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_transform(&self) -> DAffine2 {
        self.matrix
    }

    pub fn image_smoothing(&self) -> bool {
        self.smoothing
    }

    fn record(&mut self, command: PaintCommand) {
        self.commands.push(command);
    }
}

impl PaintContext for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.matrix);
        self.record(PaintCommand::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, as on a canvas.
        if let Some(matrix) = self.stack.pop() {
            self.matrix = matrix;
        }
        self.record(PaintCommand::Restore);
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.matrix = self.matrix * DAffine2::from_cols_array(&[a, b, c, d, e, f]);
        self.record(PaintCommand::Transform([a, b, c, d, e, f]));
    }

    fn rotate(&mut self, radians: f64) {
        self.matrix = self.matrix * DAffine2::from_angle(radians);
        self.record(PaintCommand::Rotate(radians));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.matrix = self.matrix * DAffine2::from_translation(DVec2::new(x, y));
        self.record(PaintCommand::Translate(x, y));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(PaintCommand::ClearRect(x, y, width, height));
    }

    fn begin_path(&mut self) {
        self.record(PaintCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.record(PaintCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(PaintCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(PaintCommand::LineTo(x, y));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(PaintCommand::Rect(x, y, width, height));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.record(PaintCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        self.record(PaintCommand::Fill);
    }

    fn stroke(&mut self) {
        self.record(PaintCommand::Stroke);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(PaintCommand::StrokeRect(x, y, width, height));
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.record(PaintCommand::FillStyle(style));
    }

    fn set_stroke_style(&mut self, style: FillStyle) {
        self.record(PaintCommand::StrokeStyle(style));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(PaintCommand::LineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.record(PaintCommand::LineDash(segments.to_vec()));
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
        self.record(PaintCommand::ImageSmoothing(enabled));
    }

    fn draw_image(&mut self, image: &ImageRef, x: f64, y: f64, width: f64, height: f64) {
        self.record(PaintCommand::DrawImage {
            key: image.key.clone(),
            x,
            y,
            width,
            height,
        });
    }
}

/// Surface host producing [`RecordingSurface`]s.
#[derive(Debug, Default)]
pub struct RecordingHost {
    requests: Vec<SurfaceRequest>,
    failing_layers: HashSet<String>,
    detached: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make surface creation fail for `layer`.
    pub fn fail_on(mut self, layer: impl Into<String>) -> Self {
        self.failing_layers.insert(layer.into());
        self
    }

    /// A host with no painting area; every request fails.
    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    /// Every request that produced a surface, in order.
    pub fn requests(&self) -> &[SurfaceRequest] {
        &self.requests
    }
}

impl SurfaceHost for RecordingHost {
    type Surface = RecordingSurface;

    fn create_surface(&mut self, request: &SurfaceRequest) -> Result<RecordingSurface, HostError> {
        if self.detached {
            return Err(HostError::NoPaintingArea);
        }
        if self.failing_layers.contains(&request.layer) {
            return Err(HostError::Backend(format!(
                "refusing to create {}",
                request.id
            )));
        }
        self.requests.push(request.clone());
        Ok(RecordingSurface::new(request.id.clone()))
    }
}

/// Resource table backed by a map of image handles.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    images: HashMap<String, ImageRef>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, width: u32, height: u32) {
        let key = key.into();
        self.images.insert(
            key.clone(),
            ImageRef {
                key,
                width,
                height,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ResourceLookup for MemoryResources {
    fn get(&self, key: &str) -> Option<ImageRef> {
        self.images.get(key).cloned()
    }
}
