use std::fmt;

use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::LinkConfig;

/// Geometry of one connector between two node centers. The arrowhead sits
/// at [`LinkPath::end`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkPath {
    Straight {
        start: Pos2,
        end: Pos2,
    },
    Curved {
        start: Pos2,
        /// Bezier control point.
        control: Pos2,
        /// Point the curve passes through at its midpoint.
        through: Pos2,
        end: Pos2,
    },
}

impl LinkPath {
    pub fn start(&self) -> Pos2 {
        match *self {
            Self::Straight { start, .. } | Self::Curved { start, .. } => start,
        }
    }

    pub fn end(&self) -> Pos2 {
        match *self {
            Self::Straight { end, .. } | Self::Curved { end, .. } => end,
        }
    }

    pub fn is_curved(&self) -> bool {
        matches!(self, Self::Curved { .. })
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Straight { start, end } => start + (end - start) * t,
            Self::Curved {
                start,
                control,
                end,
                ..
            } => {
                let u = 1.0 - t;
                let weighted = start.to_vec2() * (u * u)
                    + control.to_vec2() * (2.0 * u * t)
                    + end.to_vec2() * (t * t);
                weighted.to_pos2()
            }
        }
    }

    /// Polyline approximation with `segments + 1` points.
    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        if !self.is_curved() {
            return vec![self.start(), self.end()];
        }
        let segments = segments.max(1);
        (0..=segments)
            .map(|step| self.point_at(step as f32 / segments as f32))
            .collect()
    }

    /// Unit direction of travel at the end point, for orienting the arrowhead.
    pub fn end_direction(&self) -> Vec2 {
        let from = match *self {
            Self::Straight { start, .. } => start,
            Self::Curved { control, .. } => control,
        };
        let delta = self.end() - from;
        if delta.length_sq() > f32::EPSILON {
            delta.normalized()
        } else {
            Vec2::ZERO
        }
    }

    /// Applies `f` to every point, e.g. to move the path into screen space.
    pub fn map_points(&self, f: impl Fn(Pos2) -> Pos2) -> Self {
        match *self {
            Self::Straight { start, end } => Self::Straight {
                start: f(start),
                end: f(end),
            },
            Self::Curved {
                start,
                control,
                through,
                end,
            } => Self::Curved {
                start: f(start),
                control: f(control),
                through: f(through),
                end: f(end),
            },
        }
    }
}

/// SVG path data, `M x y L x y` or `M x y Q cx cy x y`.
impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Straight { start, end } => {
                write!(f, "M {} {} L {} {}", start.x, start.y, end.x, end.y)
            }
            Self::Curved {
                start,
                control,
                end,
                ..
            } => write!(
                f,
                "M {} {} Q {} {} {} {}",
                start.x, start.y, control.x, control.y, end.x, end.y
            ),
        }
    }
}

/// Straight when the centers are within `curve_threshold`, otherwise a
/// quadratic curve bowed to the left of the direction of travel by
/// `min(distance / 3, max_bend)`.
pub fn build_link_path(start: Pos2, end: Pos2, config: &LinkConfig) -> LinkPath {
    let delta = end - start;
    let distance = delta.length();
    if !distance.is_finite() || distance <= config.curve_threshold {
        return LinkPath::Straight { start, end };
    }

    let unit = delta / distance;
    let normal = vec2(-unit.y, unit.x);
    let bend = (distance / 3.0).min(config.max_bend);
    let midpoint = start + delta * 0.5;
    let through = midpoint + normal * bend;
    // B(0.5) = (start + end) / 4 + control / 2, so doubling the offset puts
    // `through` on the curve.
    let control = midpoint + normal * (bend * 2.0);

    LinkPath::Curved {
        start,
        control,
        through,
        end,
    }
}
