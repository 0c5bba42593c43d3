use std::collections::BTreeMap;
use std::f64::consts::TAU;

use easel_common::commons::{maximum, minimum};
use easel_common::{GradientKind, Repeat, ShapeKind, Vector2D};
use serde::{Deserialize, Serialize};

use crate::SceneError;
use crate::geometry::Margins;

/// Shape of a body, carrying the geometry each shape needs to be painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle,
    Arc {
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Polygon {
        /// Vertices relative to the body position.
        vertices: Vec<Vector2D>,
        edges: Vec<[usize; 2]>,
    },
    Triangle,
    Pentagon,
    Hexagon,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle => ShapeKind::Rectangle,
            Self::Arc { .. } => ShapeKind::Arc,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::Triangle => ShapeKind::Triangle,
            Self::Pentagon => ShapeKind::Pentagon,
            Self::Hexagon => ShapeKind::Hexagon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<ColorStop>,
}

/// Paint styles of a body. Image fields are resource identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub image: Option<String>,
    pub background_image: Option<String>,
    pub repeat: Repeat,
    pub background_color: Option<String>,
    pub background_gradient: Option<Gradient>,
    pub border_color: Option<String>,
    pub border_size: Option<f64>,
}

impl Styles {
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn outline(color: impl Into<String>, size: f64) -> Self {
        Self {
            border_color: Some(color.into()),
            border_size: Some(size),
            ..Self::default()
        }
    }

    /// Background colour, treating an empty string as unset.
    pub fn background_color(&self) -> Option<&str> {
        non_empty(self.background_color.as_deref())
    }

    /// Border colour, treating an empty string as unset.
    pub fn border_color(&self) -> Option<&str> {
        non_empty(self.border_color.as_deref())
    }

    /// Border size, treating zero as unset.
    pub fn border_size(&self) -> Option<f64> {
        self.border_size.filter(|s| *s != 0.0)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Debug outline descriptor drawn around a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub margins: Margins,
    pub shape: ShapeKind,
    pub color: String,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            margins: Margins::ZERO,
            shape: ShapeKind::Rectangle,
            color: "red".into(),
        }
    }
}

/// Fields shared by every body factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyProps {
    /// Top-left corner in world space.
    pub position: Vector2D,
    pub styles: Styles,
    pub debug: bool,
    pub bounding_box: BoundingBox,
    /// Caller data carried on the body untouched.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BodyProps {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Vector2D::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_debug(mut self, bounding_box: BoundingBox) -> Self {
        self.debug = true;
        self.bounding_box = bounding_box;
        self
    }
}

/// A drawable body: shape, extent, position and paint styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub shape: Shape,
    pub width: f64,
    pub height: f64,
    pub position: Vector2D,
    pub styles: Styles,
    pub debug: bool,
    pub bounding_box: BoundingBox,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Body {
    /// Build a body of any shape with an explicit extent.
    pub fn with_shape(
        shape: Shape,
        width: f64,
        height: f64,
        props: BodyProps,
    ) -> Result<Self, SceneError> {
        finite("width", width)?;
        finite("height", height)?;
        Ok(Self {
            shape,
            width,
            height,
            position: props.position,
            styles: props.styles,
            debug: props.debug,
            bounding_box: props.bounding_box,
            extra: props.extra,
        })
    }

    pub fn rectangle(width: f64, height: f64, props: BodyProps) -> Result<Self, SceneError> {
        Self::with_shape(Shape::Rectangle, width, height, props)
    }

    /// Full circle of the given radius.
    pub fn arc(radius: f64, props: BodyProps) -> Result<Self, SceneError> {
        Self::arc_between(radius, 0.0, TAU, props)
    }

    pub fn arc_between(
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        props: BodyProps,
    ) -> Result<Self, SceneError> {
        finite("radius", radius)?;
        Self::with_shape(
            Shape::Arc {
                radius,
                start_angle,
                end_angle,
            },
            2.0 * radius,
            2.0 * radius,
            props,
        )
    }

    /// Polygon from vertices relative to `props.position`.
    ///
    /// The extent is measured from bounds that start at the origin, so a
    /// polygon lying entirely on one side of an axis still counts the span
    /// back to zero on that axis.
    pub fn polygon(
        vertices: Vec<Vector2D>,
        edges: Vec<[usize; 2]>,
        props: BodyProps,
    ) -> Result<Self, SceneError> {
        if vertices.is_empty() {
            return Err(SceneError::EmptyPolygon);
        }
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0, 0.0, 0.0, 0.0);
        for v in &vertices {
            min_x = minimum(v.x, min_x);
            max_x = maximum(v.x, max_x);
            min_y = minimum(v.y, min_y);
            max_y = maximum(v.y, max_y);
        }
        Self::with_shape(
            Shape::Polygon { vertices, edges },
            max_x - min_x,
            max_y - min_y,
            props,
        )
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn debug_message(&self) -> String {
        format!("Pos :: {}, {}", self.position.x, self.position.y)
    }

    /// No-op; move bodies by writing `position` directly.
    pub fn rotate(&mut self) {}

    /// No-op; resize bodies by writing `width`/`height` directly.
    pub fn scale(&mut self) {}

    /// No-op; move bodies by writing `position` directly.
    pub fn translate(&mut self) {}
}

fn finite(field: &'static str, value: f64) -> Result<(), SceneError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFiniteGeometry { field })
    }
}
