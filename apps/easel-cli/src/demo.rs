use anyhow::Result;
use easel_common::{FillStyle, NodeId, TransformOrigin, Vector2D};
use easel_scene::{
    BodyProps, BoundingBox, CustomNode, CustomTag, EntityManager, Margins, Node, Styles,
    TransformNode,
};

/// Layer the HUD element paints onto.
pub const HUD_LAYER: &str = "hud";

/// Pixels per millisecond the ball travels horizontally.
const BALL_SPEED: f64 = 0.2;
const BALL_RADIUS: f64 = 12.0;

/// The demo world plus handles to the nodes the simulation moves.
pub struct DemoScene {
    pub entities: EntityManager,
    pub ball: NodeId,
    ball_velocity: f64,
    width: f64,
}

impl DemoScene {
    /// World with a light, a rotated paddle group, a bouncing ball, a
    /// triangle outline and a HUD element on its own layer.
    pub fn build(width: f64, height: f64) -> Result<Self> {
        let mut world = EntityManager::create_world();
        world.add_child(EntityManager::create_light());

        let paddle_pos = Vector2D::new(40.0, height - 80.0);
        let mut paddle_group = EntityManager::create_transform(TransformNode::rotation_about(
            15.0,
            TransformOrigin::Center,
            paddle_pos,
            120.0,
            20.0,
        ));
        paddle_group.add_child(EntityManager::create_rectangle(
            120.0,
            20.0,
            BodyProps::at(paddle_pos.x, paddle_pos.y).with_styles(Styles::fill("steelblue")),
        )?);
        world.add_child(paddle_group);

        let ball = EntityManager::create_arc(
            BALL_RADIUS,
            BodyProps::at(width / 2.0, height / 2.0)
                .with_styles(Styles::fill("orange"))
                .with_debug(BoundingBox {
                    margins: Margins::uniform(2.0),
                    ..BoundingBox::default()
                }),
        )?;
        let ball_id = world.add_child(ball);

        world.add_child(EntityManager::create_polygon(
            vec![
                Vector2D::new(10.0, 10.0),
                Vector2D::new(50.0, 10.0),
                Vector2D::new(30.0, 40.0),
            ],
            vec![[0, 1], [1, 2], [2, 0]],
            BodyProps::at(20.0, 20.0).with_styles(Styles::outline("green", 2.0)),
        )?);

        let hud = CustomNode::new(CustomTag::Element)
            .on_render(|ctx| {
                ctx.save();
                ctx.set_fill_style(FillStyle::color("rgba(0,0,0,0.5)"));
                ctx.begin_path();
                ctx.rect(8.0, 8.0, 160.0, 32.0);
                ctx.fill();
            })
            .on_cleanup(|ctx| ctx.restore());
        world.add_child(EntityManager::create_element(hud).on_canvas(HUD_LAYER));

        let mut entities = EntityManager::new();
        entities.set_root(world);
        entities.index_parents();

        Ok(Self {
            entities,
            ball: ball_id,
            ball_velocity: BALL_SPEED,
            width,
        })
    }

    /// Advance the simulation by one fixed step of `dt` milliseconds.
    pub fn step(&mut self, dt: f64) {
        let Some(body) = self
            .entities
            .find_mut(self.ball)
            .and_then(Node::as_body_mut)
        else {
            return;
        };

        let next = body.position.x + self.ball_velocity * dt;
        let max_x = self.width - body.width;
        if next <= 0.0 || next >= max_x {
            self.ball_velocity = -self.ball_velocity;
            body.position.x = next.clamp(0.0, max_x.max(0.0));
        } else {
            body.position.x = next;
        }
    }

    pub fn ball_position(&self) -> Option<Vector2D> {
        self.entities
            .find(self.ball)
            .and_then(Node::as_body)
            .map(|body| body.position)
    }
}
