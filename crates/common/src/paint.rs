use serde::{Deserialize, Serialize};

use crate::types::Repeat;

/// A paintable image resolved by a resource lookup.
///
/// The handle is opaque to the core: hosts map `key` back to their own
/// decoded image when a draw or pattern call reaches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    /// CSS-style colour string, e.g. `"#ff0000"` or `"transparent"`.
    Color(String),
    Pattern { image: ImageRef, repeat: Repeat },
}

impl FillStyle {
    pub fn color(value: impl Into<String>) -> Self {
        Self::Color(value.into())
    }

    pub fn transparent() -> Self {
        Self::Color("transparent".into())
    }
}

/// Immediate-mode 2D paint context, modelled on the HTML canvas 2D API.
///
/// Transform calls compose onto the current matrix; `save`/`restore` push and
/// pop the full drawing state. Callers are responsible for pairing them.
pub trait PaintContext {
    fn save(&mut self);
    fn restore(&mut self);

    /// Multiply the current matrix by `[[a, c, e], [b, d, f]]`.
    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);
    fn rotate(&mut self, radians: f64);
    fn translate(&mut self, x: f64, y: f64);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, style: FillStyle);
    fn set_stroke_style(&mut self, style: FillStyle);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_image_smoothing(&mut self, enabled: bool);

    fn draw_image(&mut self, image: &ImageRef, x: f64, y: f64, width: f64, height: f64);

    /// Build a repeating pattern from `image`. Hosts that cache patterns may
    /// override this.
    fn create_pattern(&mut self, image: &ImageRef, repeat: Repeat) -> FillStyle {
        FillStyle::Pattern {
            image: image.clone(),
            repeat,
        }
    }
}
