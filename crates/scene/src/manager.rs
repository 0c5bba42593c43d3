use std::collections::HashMap;

use easel_common::{NodeId, Vector2D};

use crate::SceneError;
use crate::body::{Body, BodyProps};
use crate::node::{CustomNode, CustomTag, Node, TransformNode};

/// Owns the scene root and flattens the tree into paint order.
///
/// Factories build unattached nodes; the caller inserts them into a parent.
#[derive(Debug, Default)]
pub struct EntityManager {
    root: Option<Node>,
    /// Child id → parent id. Filled by [`EntityManager::index_parents`].
    parent_index: HashMap<NodeId, NodeId>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root, returning the previous one.
    pub fn set_root(&mut self, root: Node) -> Option<Node> {
        self.parent_index.clear();
        self.root.replace(root)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Node> {
        self.root.as_mut()
    }

    /// Pre-order flattening of `node`'s subtree, or of the root when `None`.
    ///
    /// Each node appears once, before its children; siblings keep insertion
    /// order.
    pub fn items_to_render<'a>(&'a self, node: Option<&'a Node>) -> Vec<&'a Node> {
        let mut items = Vec::new();
        if let Some(start) = node.or(self.root.as_ref()) {
            collect_pre_order(start, &mut items);
        }
        items
    }

    /// Find a node anywhere under the root.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.root.as_ref().and_then(|root| find_in(root, id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.root.as_mut().and_then(|root| find_in_mut(root, id))
    }

    /// Rebuild the child → parent index from the current tree.
    pub fn index_parents(&mut self) {
        self.parent_index.clear();
        if let Some(root) = &self.root {
            index_subtree(root, &mut self.parent_index);
        }
        tracing::debug!(entries = self.parent_index.len(), "parent index rebuilt");
    }

    /// Parent of `id` as of the last [`EntityManager::index_parents`].
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent_index.get(&id).copied()
    }

    pub fn create_world() -> Node {
        Node::world()
    }

    pub fn create_light() -> Node {
        Node::light()
    }

    pub fn create_transform(transform: TransformNode) -> Node {
        Node::transform(transform)
    }

    pub fn create_layer() -> Node {
        Node::custom(CustomNode::new(CustomTag::Layer))
    }

    pub fn create_element(element: CustomNode) -> Node {
        Node::custom(element)
    }

    pub fn create_rectangle(width: f64, height: f64, props: BodyProps) -> Result<Node, SceneError> {
        Ok(Node::body(Body::rectangle(width, height, props)?))
    }

    pub fn create_arc(radius: f64, props: BodyProps) -> Result<Node, SceneError> {
        Ok(Node::body(Body::arc(radius, props)?))
    }

    pub fn create_arc_between(
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        props: BodyProps,
    ) -> Result<Node, SceneError> {
        Ok(Node::body(Body::arc_between(
            radius,
            start_angle,
            end_angle,
            props,
        )?))
    }

    pub fn create_polygon(
        vertices: Vec<Vector2D>,
        edges: Vec<[usize; 2]>,
        props: BodyProps,
    ) -> Result<Node, SceneError> {
        Ok(Node::body(Body::polygon(vertices, edges, props)?))
    }
}

fn collect_pre_order<'a>(node: &'a Node, items: &mut Vec<&'a Node>) {
    items.push(node);
    for child in node.children() {
        collect_pre_order(child, items);
    }
}

fn find_in(node: &Node, id: NodeId) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children().find_map(|child| find_in(child, id))
}

fn find_in_mut(node: &mut Node, id: NodeId) -> Option<&mut Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut().find_map(|child| find_in_mut(child, id))
}

fn index_subtree(node: &Node, index: &mut HashMap<NodeId, NodeId>) {
    for child in node.children() {
        index.insert(child.id(), node.id());
        index_subtree(child, index);
    }
}
