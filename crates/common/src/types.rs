use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 2D point / vector used for positions and vertices. Screen space is y-down.
pub type Vector2D = DVec2;

/// Layer id of the surface every node paints to unless it names another one.
pub const BASE_LAYER: &str = "BASE";

/// Unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs and CLI output.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed set of body shapes. `as u8` gives the numeric tag; serde writes
/// the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeKind {
    Triangle = 0,
    #[default]
    Rectangle = 1,
    Pentagon = 2,
    Hexagon = 3,
    Arc = 4,
    Polygon = 5,
}

/// Named pivot anchors on a node's screen-space bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransformOrigin {
    Center = 0,
    LeftTop = 1,
    RightTop = 2,
    RightBottom = 3,
    LeftBottom = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GradientKind {
    Linear = 0,
    Radial = 1,
}

/// Repetition mode of a background-image pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

impl Repeat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::RepeatX => "repeat-x",
            Self::RepeatY => "repeat-y",
            Self::NoRepeat => "no-repeat",
        }
    }
}
