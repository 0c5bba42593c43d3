//! Per-node paint routines. Stateless; the renderer supplies the surface.

use std::f64::consts::TAU;

use easel_common::commons::round_off;
use easel_common::{FillStyle, PaintContext, ShapeKind, TransformOrigin, Vector2D};
use easel_scene::{Body, Origin, Shape, TransformNode};

use crate::camera::Camera;
use crate::host::ResourceLookup;

/// Dash pattern of the debug bounding box outline.
pub const BOUNDING_BOX_DASH: [f64; 8] = [25.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];

/// World position to whole-pixel screen position relative to the camera.
pub fn screen_position(position: Vector2D, camera: &Camera) -> Vector2D {
    Vector2D::new(
        round_off(position.x - camera.position.x),
        round_off(position.y - camera.position.y),
    )
}

/// Screen-space pivot a transform node rotates and scales about.
pub fn transform_pivot(transform: &TransformNode, camera: &Camera) -> Vector2D {
    match transform.origin {
        Origin::Point(point) => screen_position(point, camera),
        Origin::Anchor(anchor) => {
            let pos = screen_position(transform.position, camera);
            let m = transform.margins;
            let x_min = pos.x - m.left;
            let x_max = pos.x + transform.width + m.right;
            let y_min = pos.y - m.top;
            let y_max = pos.y + transform.height + m.bottom;
            match anchor {
                TransformOrigin::LeftTop => Vector2D::new(x_min, y_min),
                TransformOrigin::RightTop => Vector2D::new(x_max, y_min),
                TransformOrigin::RightBottom => Vector2D::new(x_max, y_max),
                TransformOrigin::LeftBottom => Vector2D::new(x_min, y_max),
                TransformOrigin::Center => Vector2D::new(
                    x_min + (x_max - x_min) / 2.0,
                    y_min + (y_max - y_min) / 2.0,
                ),
            }
        }
        Origin::Unset => Vector2D::ZERO,
    }
}

/// Save the surface state and compose the node's transform about its pivot.
///
/// Must be paired with exactly one `restore` once the subtree is painted.
pub fn apply_transform(ctx: &mut dyn PaintContext, transform: &TransformNode, camera: &Camera) {
    let pivot = transform_pivot(transform, camera);
    let m = transform.matrix;

    ctx.save();
    ctx.transform(m.a, m.b, m.c, m.d, m.e + pivot.x, m.f + pivot.y);
    if transform.rotation != 0.0 {
        ctx.rotate(transform.rotation.to_radians());
    }
    ctx.translate(-pivot.x, -pivot.y);
}

/// Paint a body's image and shape.
///
/// The image style is drawn first and unconditionally. Shapes are only
/// filled and stroked when at least one of background colour, border colour,
/// border size or a resolvable background image is present.
pub fn render_body(
    ctx: &mut dyn PaintContext,
    body: &Body,
    camera: &Camera,
    resources: &dyn ResourceLookup,
) {
    let styles = &body.styles;

    if let Some(image) = styles.image.as_deref().and_then(|key| resources.get(key)) {
        let pos = screen_position(body.position, camera);
        ctx.draw_image(&image, pos.x, pos.y, body.width, body.height);
    }

    let background_image = styles
        .background_image
        .as_deref()
        .and_then(|key| resources.get(key));

    if styles.background_color().is_none()
        && styles.border_color().is_none()
        && styles.border_size().is_none()
        && background_image.is_none()
    {
        return;
    }

    let fill = styles.background_color();
    let stroke = styles.border_color();
    ctx.set_fill_style(fill.map_or_else(FillStyle::transparent, FillStyle::color));
    ctx.set_stroke_style(stroke.map_or_else(FillStyle::transparent, FillStyle::color));
    ctx.set_line_width(styles.border_size().unwrap_or(0.0));

    if let Some(image) = background_image {
        let pattern = ctx.create_pattern(&image, styles.repeat);
        ctx.set_fill_style(pattern);
    } else if styles.background_gradient.is_some() {
        tracing::warn!("gradients are not supported, painting without one");
    }

    let pos = screen_position(body.position, camera);
    match &body.shape {
        Shape::Rectangle => {
            ctx.rect(pos.x, pos.y, body.width, body.height);
            ctx.fill();
            ctx.stroke();
        }
        Shape::Arc {
            radius,
            start_angle,
            end_angle,
        } => {
            ctx.arc(pos.x + radius, pos.y + radius, *radius, *start_angle, *end_angle);
            ctx.fill();
            ctx.stroke();
        }
        Shape::Polygon { vertices, .. } => {
            // Only closes if the last vertex repeats the first.
            let Some(first) = vertices.first() else {
                return;
            };
            ctx.move_to(pos.x + first.x, pos.y + first.y);
            for vertex in vertices {
                ctx.line_to(pos.x + vertex.x, pos.y + vertex.y);
            }
            ctx.fill();
            ctx.stroke();
        }
        Shape::Triangle | Shape::Pentagon | Shape::Hexagon => {}
    }
}

/// Dashed debug outline around the body's extent plus bounding-box margins.
pub fn draw_bounding_box(ctx: &mut dyn PaintContext, body: &Body, camera: &Camera) {
    let pos = screen_position(body.position, camera);
    let bb = &body.bounding_box;
    let m = bb.margins;

    ctx.set_stroke_style(FillStyle::color(bb.color.clone()));
    ctx.set_line_width(1.0);
    ctx.set_line_dash(&BOUNDING_BOX_DASH);
    if bb.shape == ShapeKind::Arc {
        let radius = body.width / 2.0 + m.right - m.left;
        ctx.arc(pos.x + radius, pos.y + radius, radius, 0.0, TAU);
        ctx.stroke();
    } else {
        ctx.stroke_rect(
            pos.x - m.left,
            pos.y - m.top,
            body.width + m.right + m.left,
            body.height + m.top + m.bottom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Screen;
    use crate::recording::{MemoryResources, PaintCommand, RecordingSurface};
    use easel_common::Repeat;
    use easel_scene::{BodyProps, BoundingBox, Gradient, Margins, Matrix2x3, Styles};

    fn camera_at(x: f64, y: f64) -> Camera {
        Camera::new(Vector2D::new(x, y), 0.0, Screen::new(800.0, 600.0))
    }

    fn v(x: f64, y: f64) -> Vector2D {
        Vector2D::new(x, y)
    }

    fn anchored(anchor: TransformOrigin, margins: Margins) -> TransformNode {
        TransformNode {
            origin: Origin::Anchor(anchor),
            position: v(100.0, 100.0),
            width: 50.0,
            height: 50.0,
            margins,
            ..TransformNode::default()
        }
    }

    fn paint(body: &Body, resources: &MemoryResources) -> Vec<PaintCommand> {
        let mut surface = RecordingSurface::new("test");
        render_body(&mut surface, body, &camera_at(0.0, 0.0), resources);
        surface.take_commands()
    }

    #[test]
    fn screen_position_is_camera_relative_and_rounded() {
        let cam = camera_at(10.0, -5.0);
        assert_eq!(screen_position(v(20.4, 0.0), &cam), v(10.0, 5.0));
        assert_eq!(screen_position(v(7.5, -7.5), &cam), v(-2.0, -2.0));
    }

    #[test]
    fn center_pivot() {
        let t = anchored(TransformOrigin::Center, Margins::ZERO);
        assert_eq!(transform_pivot(&t, &camera_at(0.0, 0.0)), v(125.0, 125.0));
    }

    #[test]
    fn anchors_include_margins() {
        let margins = Margins::from([1.0, 2.0, 3.0, 4.0]);
        let cam = camera_at(0.0, 0.0);
        let pivot = |a| transform_pivot(&anchored(a, margins), &cam);
        assert_eq!(pivot(TransformOrigin::LeftTop), v(96.0, 99.0));
        assert_eq!(pivot(TransformOrigin::RightTop), v(152.0, 99.0));
        assert_eq!(pivot(TransformOrigin::RightBottom), v(152.0, 153.0));
        assert_eq!(pivot(TransformOrigin::LeftBottom), v(96.0, 153.0));
        assert_eq!(pivot(TransformOrigin::Center), v(124.0, 126.0));
    }

    #[test]
    fn point_and_unset_pivots() {
        let cam = camera_at(20.0, 10.0);
        let t = TransformNode {
            origin: Origin::Point(v(50.0, 50.0)),
            ..TransformNode::default()
        };
        assert_eq!(transform_pivot(&t, &cam), v(30.0, 40.0));
        assert_eq!(transform_pivot(&TransformNode::default(), &cam), Vector2D::ZERO);
    }

    #[test]
    fn apply_transform_bakes_pivot_into_translation() {
        let mut surface = RecordingSurface::new("t");
        let t = TransformNode {
            matrix: Matrix2x3::translation(3.0, 4.0),
            rotation: 90.0,
            ..anchored(TransformOrigin::Center, Margins::ZERO)
        };
        apply_transform(&mut surface, &t, &camera_at(0.0, 0.0));
        assert_eq!(
            surface.commands(),
            &[
                PaintCommand::Save,
                PaintCommand::Transform([1.0, 0.0, 0.0, 1.0, 128.0, 129.0]),
                PaintCommand::Rotate(90f64.to_radians()),
                PaintCommand::Translate(-125.0, -125.0),
            ]
        );
        assert_eq!(surface.save_depth(), 1);
    }

    #[test]
    fn rotation_keeps_pivot_fixed() {
        let mut surface = RecordingSurface::new("t");
        let t = TransformNode {
            rotation: 37.0,
            ..anchored(TransformOrigin::Center, Margins::ZERO)
        };
        apply_transform(&mut surface, &t, &camera_at(0.0, 0.0));
        let p = surface.current_transform().transform_point2(v(125.0, 125.0));
        assert!((p - v(125.0, 125.0)).length() < 1e-9);
    }

    #[test]
    fn zero_rotation_skips_rotate_call() {
        let mut surface = RecordingSurface::new("t");
        apply_transform(&mut surface, &TransformNode::default(), &camera_at(0.0, 0.0));
        assert!(!surface.commands().iter().any(|c| matches!(c, PaintCommand::Rotate(_))));
    }

    #[test]
    fn unstyled_body_paints_nothing() {
        let body = Body::rectangle(10.0, 10.0, BodyProps::default()).unwrap();
        assert!(paint(&body, &MemoryResources::new()).is_empty());
    }

    #[test]
    fn image_is_drawn_even_without_shape_styles() {
        let mut res = MemoryResources::new();
        res.insert("hero", 8, 8);
        let styles = Styles {
            image: Some("hero".into()),
            ..Styles::default()
        };
        let props = BodyProps::at(4.0, 2.0).with_styles(styles);
        let body = Body::rectangle(16.0, 12.0, props).unwrap();
        assert_eq!(
            paint(&body, &res),
            vec![PaintCommand::DrawImage {
                key: "hero".into(),
                x: 4.0,
                y: 2.0,
                width: 16.0,
                height: 12.0,
            }]
        );
    }

    #[test]
    fn unresolved_background_image_does_not_open_the_gate() {
        let styles = Styles {
            background_image: Some("missing".into()),
            ..Styles::default()
        };
        let body = Body::rectangle(1.0, 1.0, BodyProps::default().with_styles(styles)).unwrap();
        assert!(paint(&body, &MemoryResources::new()).is_empty());
    }

    #[test]
    fn rectangle_fill_and_stroke() {
        let styles = Styles {
            background_color: Some("#00f".into()),
            ..Styles::outline("#fff", 2.0)
        };
        let props = BodyProps::at(5.0, 6.0).with_styles(styles);
        let body = Body::rectangle(30.0, 20.0, props).unwrap();
        assert_eq!(
            paint(&body, &MemoryResources::new()),
            vec![
                PaintCommand::FillStyle(FillStyle::color("#00f")),
                PaintCommand::StrokeStyle(FillStyle::color("#fff")),
                PaintCommand::LineWidth(2.0),
                PaintCommand::Rect(5.0, 6.0, 30.0, 20.0),
                PaintCommand::Fill,
                PaintCommand::Stroke,
            ]
        );
    }

    #[test]
    fn background_image_pattern_overrides_colour() {
        let mut res = MemoryResources::new();
        res.insert("brick", 16, 16);
        let styles = Styles {
            background_image: Some("brick".into()),
            repeat: Repeat::RepeatX,
            ..Styles::fill("red")
        };
        let body = Body::rectangle(1.0, 1.0, BodyProps::default().with_styles(styles)).unwrap();
        let commands = paint(&body, &res);
        let fills: Vec<&PaintCommand> = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillStyle(_)))
            .collect();
        assert_eq!(fills.len(), 2);
        let PaintCommand::FillStyle(FillStyle::Pattern { image, repeat }) = fills[1] else {
            panic!("expected a pattern fill, got {:?}", fills[1]);
        };
        assert_eq!(image.key, "brick");
        assert_eq!(*repeat, Repeat::RepeatX);
    }

    #[test]
    fn gradient_is_ignored() {
        let styles = Styles {
            background_gradient: Some(Gradient {
                kind: easel_common::GradientKind::Linear,
                stops: Vec::new(),
            }),
            ..Styles::fill("green")
        };
        let body = Body::rectangle(1.0, 1.0, BodyProps::default().with_styles(styles)).unwrap();
        let commands = paint(&body, &MemoryResources::new());
        assert_eq!(commands[0], PaintCommand::FillStyle(FillStyle::color("green")));
        assert!(commands.contains(&PaintCommand::Fill));
    }

    #[test]
    fn arc_is_centred_one_radius_in() {
        let body = Body::arc_between(
            10.0,
            0.0,
            std::f64::consts::PI,
            BodyProps::at(20.0, 30.0).with_styles(Styles::fill("red")),
        )
        .unwrap();
        let commands = paint(&body, &MemoryResources::new());
        assert!(commands.contains(&PaintCommand::Arc {
            x: 30.0,
            y: 40.0,
            radius: 10.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::PI,
        }));
    }

    #[test]
    fn polygon_moves_to_first_then_lines_through_all() {
        let body = Body::polygon(
            vec![v(0.0, 0.0), v(10.0, 0.0), v(5.0, 8.0)],
            Vec::new(),
            BodyProps::at(100.0, 100.0).with_styles(Styles::fill("red")),
        )
        .unwrap();
        let commands = paint(&body, &MemoryResources::new());
        let path: Vec<&PaintCommand> = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::MoveTo(..) | PaintCommand::LineTo(..)))
            .collect();
        assert_eq!(
            path,
            vec![
                &PaintCommand::MoveTo(100.0, 100.0),
                &PaintCommand::LineTo(100.0, 100.0),
                &PaintCommand::LineTo(110.0, 100.0),
                &PaintCommand::LineTo(105.0, 108.0),
            ]
        );
    }

    #[test]
    fn unimplemented_shapes_are_silent() {
        let body = Body::with_shape(
            Shape::Pentagon,
            10.0,
            10.0,
            BodyProps::default().with_styles(Styles::fill("red")),
        )
        .unwrap();
        let commands = paint(&body, &MemoryResources::new());
        assert!(!commands.contains(&PaintCommand::Fill));
        assert!(!commands.contains(&PaintCommand::Stroke));
    }

    #[test]
    fn rectangular_bounding_box_is_inflated_by_margins() {
        let bb = BoundingBox {
            margins: Margins::from([1.0, 2.0, 3.0, 4.0]),
            ..BoundingBox::default()
        };
        let body = Body::rectangle(10.0, 20.0, BodyProps::at(50.0, 60.0).with_debug(bb)).unwrap();
        let mut surface = RecordingSurface::new("t");
        draw_bounding_box(&mut surface, &body, &camera_at(0.0, 0.0));
        assert_eq!(
            surface.commands(),
            &[
                PaintCommand::StrokeStyle(FillStyle::color("red")),
                PaintCommand::LineWidth(1.0),
                PaintCommand::LineDash(BOUNDING_BOX_DASH.to_vec()),
                PaintCommand::StrokeRect(46.0, 59.0, 16.0, 24.0),
            ]
        );
    }

    #[test]
    fn arc_bounding_box_radius_uses_horizontal_margins() {
        let bb = BoundingBox {
            margins: Margins::from([0.0, 6.0, 0.0, 2.0]),
            shape: ShapeKind::Arc,
            color: "lime".into(),
        };
        let body = Body::arc(10.0, BodyProps::at(0.0, 0.0).with_debug(bb)).unwrap();
        let mut surface = RecordingSurface::new("t");
        draw_bounding_box(&mut surface, &body, &camera_at(0.0, 0.0));
        assert!(surface.commands().contains(&PaintCommand::Arc {
            x: 14.0,
            y: 14.0,
            radius: 14.0,
            start_angle: 0.0,
            end_angle: TAU,
        }));
        assert_eq!(surface.commands().last(), Some(&PaintCommand::Stroke));
    }
}
