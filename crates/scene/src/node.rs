use std::fmt;

use easel_common::{BASE_LAYER, NodeId, PaintContext, TransformOrigin, Vector2D};
use indexmap::IndexMap;

use crate::body::Body;
use crate::geometry::{Margins, Matrix2x3};

/// Callback invoked by the renderer with the node's surface.
pub type Hook = Box<dyn FnMut(&mut dyn PaintContext)>;

/// Numeric node-type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    World = 0,
    Light = 1,
    Camera = 2,
    Grid = 3,
    TileMap = 4,
    Body = 5,
    PhysicsBody = 6,
    FluidBody = 7,
    Transform = 8,
    Layer = 9,
    Element = 10,
}

/// Kinds that the renderer does not paint itself; they paint through hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomTag {
    Camera,
    Grid,
    TileMap,
    Layer,
    Element,
}

/// A node that paints through optional render and cleanup hooks.
///
/// `render` runs before the node's children are painted, `cleanup` after.
pub struct CustomNode {
    pub tag: CustomTag,
    pub render: Option<Hook>,
    pub cleanup: Option<Hook>,
}

impl CustomNode {
    pub fn new(tag: CustomTag) -> Self {
        Self {
            tag,
            render: None,
            cleanup: None,
        }
    }

    pub fn on_render(mut self, hook: impl FnMut(&mut dyn PaintContext) + 'static) -> Self {
        self.render = Some(Box::new(hook));
        self
    }

    pub fn on_cleanup(mut self, hook: impl FnMut(&mut dyn PaintContext) + 'static) -> Self {
        self.cleanup = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for CustomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomNode")
            .field("tag", &self.tag)
            .field("render", &self.render.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Pivot of a transform node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Origin {
    /// Explicit world-space point.
    Point(Vector2D),
    /// Anchor on the node's screen-space rectangle.
    Anchor(TransformOrigin),
    /// Pivot at the screen origin `(0, 0)`.
    #[default]
    Unset,
}

/// Pushes an affine coordinate change for its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub matrix: Matrix2x3,
    /// Rotation in degrees; zero means no rotation.
    pub rotation: f64,
    pub origin: Origin,
    /// World-space top-left corner of the rectangle anchors are measured on.
    pub position: Vector2D,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self {
            matrix: Matrix2x3::IDENTITY,
            rotation: 0.0,
            origin: Origin::Unset,
            position: Vector2D::ZERO,
            width: 0.0,
            height: 0.0,
            margins: Margins::ZERO,
        }
    }
}

impl TransformNode {
    pub fn new(matrix: Matrix2x3) -> Self {
        Self {
            matrix,
            ..Self::default()
        }
    }

    /// Rotation of `degrees` about `anchor` on the given rectangle.
    pub fn rotation_about(
        degrees: f64,
        anchor: TransformOrigin,
        position: Vector2D,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            rotation: degrees,
            origin: Origin::Anchor(anchor),
            position,
            width,
            height,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    World,
    Light,
    Transform(TransformNode),
    Body(Body),
    PhysicsBody(Body),
    FluidBody(Body),
    Custom(CustomNode),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::World => NodeType::World,
            Self::Light => NodeType::Light,
            Self::Transform(_) => NodeType::Transform,
            Self::Body(_) => NodeType::Body,
            Self::PhysicsBody(_) => NodeType::PhysicsBody,
            Self::FluidBody(_) => NodeType::FluidBody,
            Self::Custom(custom) => match custom.tag {
                CustomTag::Camera => NodeType::Camera,
                CustomTag::Grid => NodeType::Grid,
                CustomTag::TileMap => NodeType::TileMap,
                CustomTag::Layer => NodeType::Layer,
                CustomTag::Element => NodeType::Element,
            },
        }
    }
}

/// A scene-graph node. Parents own their children; order of insertion is
/// the paint order.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub kind: NodeKind,
    canvas_id: Option<String>,
    children: IndexMap<NodeId, Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            canvas_id: None,
            children: IndexMap::new(),
        }
    }

    pub fn world() -> Self {
        Self::new(NodeKind::World)
    }

    pub fn light() -> Self {
        Self::new(NodeKind::Light)
    }

    pub fn transform(transform: TransformNode) -> Self {
        Self::new(NodeKind::Transform(transform))
    }

    pub fn body(body: Body) -> Self {
        Self::new(NodeKind::Body(body))
    }

    pub fn physics_body(body: Body) -> Self {
        Self::new(NodeKind::PhysicsBody(body))
    }

    pub fn fluid_body(body: Body) -> Self {
        Self::new(NodeKind::FluidBody(body))
    }

    pub fn custom(custom: CustomNode) -> Self {
        Self::new(NodeKind::Custom(custom))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Layer id of the surface this node paints to.
    pub fn canvas_id(&self) -> &str {
        self.canvas_id.as_deref().unwrap_or(BASE_LAYER)
    }

    pub fn set_canvas_id(&mut self, layer: impl Into<String>) {
        self.canvas_id = Some(layer.into());
    }

    pub fn on_canvas(mut self, layer: impl Into<String>) -> Self {
        self.set_canvas_id(layer);
        self
    }

    /// Body payload for any of the three body kinds.
    pub fn as_body(&self) -> Option<&Body> {
        match &self.kind {
            NodeKind::Body(body) | NodeKind::PhysicsBody(body) | NodeKind::FluidBody(body) => {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn as_body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            NodeKind::Body(body) | NodeKind::PhysicsBody(body) | NodeKind::FluidBody(body) => {
                Some(body)
            }
            _ => None,
        }
    }

    /// Append a child at the end of the paint order. Returns its id.
    pub fn add_child(&mut self, child: Node) -> NodeId {
        let id = child.id;
        self.children.insert(id, child);
        id
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Detach a direct child, keeping the order of the remaining siblings.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Node> {
        self.children.shift_remove(&id)
    }

    pub fn child(&self, id: NodeId) -> Option<&Node> {
        self.children.get(&id)
    }

    pub fn child_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.children.get_mut(&id)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.children.values_mut()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
