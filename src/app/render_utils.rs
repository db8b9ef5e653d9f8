use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::engine::MapTransform;
use crate::model::Status;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn status_color(status: Status) -> Color32 {
    match status {
        Status::Considering => Color32::from_rgb(118, 142, 176),
        Status::Shelved => Color32::from_rgb(96, 96, 104),
        Status::Committed => Color32::from_rgb(92, 168, 222),
        Status::InProgress => Color32::from_rgb(236, 170, 82),
        Status::Complete => Color32::from_rgb(104, 196, 128),
    }
}

/// Canvas point for a map-space position; the transform works relative to
/// the canvas top-left.
pub(super) fn to_screen(rect: Rect, transform: &MapTransform, map: Vec2) -> Pos2 {
    transform.map_to_screen(map) + rect.min.to_vec2()
}

pub(super) fn to_map(rect: Rect, transform: &MapTransform, screen: Pos2) -> Vec2 {
    transform.screen_to_map(screen - rect.min.to_vec2())
}

/// On-screen radius of a node: grows with zoom but never vanishes.
pub(super) fn screen_radius(radius: f32, scale: f32) -> f32 {
    (radius * scale).max(3.0)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: &MapTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Bounding-box test for a polyline against the canvas.
pub(super) fn polyline_visible(rect: Rect, points: &[Pos2], padding: f32) -> bool {
    let Some(first) = points.first() else {
        return false;
    };
    let bounds = points
        .iter()
        .fold(Rect::from_min_max(*first, *first), |bounds, point| {
            bounds.union(Rect::from_min_max(*point, *point))
        })
        .expand(padding);
    bounds.intersects(rect)
}

/// Filled triangle with its tip at `tip`, pointing along `direction`.
pub(super) fn arrowhead(tip: Pos2, direction: Vec2, size: f32, color: Color32) -> Shape {
    if direction.length_sq() <= f32::EPSILON {
        return Shape::Noop;
    }
    let back = tip - direction * size;
    let side = vec2(-direction.y, direction.x) * (size * 0.5);
    Shape::convex_polygon(vec![tip, back + side, back - side], color, Stroke::NONE)
}
