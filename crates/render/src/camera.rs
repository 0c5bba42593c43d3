use easel_common::{NodeId, Vector2D};

/// Screen geometry shared by the renderer and its camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
}

impl Screen {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            aspect_ratio: width / height,
        }
    }
}

/// 2D viewport. World positions are drawn at `world - camera.position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector2D,
    pub rotation: f64,
    pub screen: Screen,
    target: Option<NodeId>,
}

impl Camera {
    pub fn new(position: Vector2D, rotation: f64, screen: Screen) -> Self {
        Self {
            position,
            rotation,
            screen,
            target: None,
        }
    }

    /// Camera at the world origin with no rotation.
    pub fn zero(screen: Screen) -> Self {
        Self::new(Vector2D::ZERO, 0.0, screen)
    }

    /// Remember a node to follow. Following itself is left to the caller.
    pub fn bind_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub fn unbind(&mut self) -> Option<NodeId> {
        self.target.take()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Per-frame hook, called once before each render pass. Does not move
    /// the camera.
    pub fn update(&mut self) {
        tracing::trace!(target_bound = self.target.is_some(), "camera update");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_aspect_ratio() {
        let screen = Screen::new(800.0, 400.0);
        assert_eq!(screen.aspect_ratio, 2.0);
    }

    #[test]
    fn zero_camera() {
        let cam = Camera::zero(Screen::new(10.0, 10.0));
        assert_eq!(cam.position, Vector2D::ZERO);
        assert_eq!(cam.rotation, 0.0);
        assert!(cam.target().is_none());
    }

    #[test]
    fn bind_and_unbind_target() {
        let mut cam = Camera::zero(Screen::new(10.0, 10.0));
        let id = NodeId::new();
        cam.bind_target(id);
        assert_eq!(cam.target(), Some(id));
        assert_eq!(cam.unbind(), Some(id));
        assert!(cam.target().is_none());
    }

    #[test]
    fn update_leaves_position_alone() {
        let mut cam = Camera::new(Vector2D::new(3.0, 4.0), 0.0, Screen::new(10.0, 10.0));
        cam.bind_target(NodeId::new());
        cam.update();
        assert_eq!(cam.position, Vector2D::new(3.0, 4.0));
    }
}
