use std::collections::{HashMap, HashSet};

use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui, vec2};

use crate::engine::{SceneNode, Viewport};
use crate::util::{format_cost, format_hours};

use super::super::render_utils::{
    arrowhead, blend_color, circle_visible, dim_color, draw_background, polyline_visible,
    screen_radius, status_color, to_screen,
};
use super::super::{MapView, PointerMode};

const LINK_SEGMENTS: usize = 24;

impl MapView {
    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let viewport = Viewport::new(rect.width(), rect.height());
        if self.viewport != Some(viewport) {
            self.viewport = Some(viewport);
            self.engine.request_refresh();
        }
        self.engine.refresh_if_pending(&self.model, viewport);

        self.handle_map_zoom(ui, rect, &response);
        self.handle_map_pointer(ui, rect, &response);

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let animating = self.engine.step_animation(frame_delta_seconds);
        if animating || self.pointer_mode != PointerMode::Idle {
            ui.ctx().request_repaint();
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| self.node_at(rect, pointer));
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.pointer_mode == PointerMode::DraggingNode {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, &self.transform);

        let scene = self.engine.scene();
        if scene.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes yet. Add one from the controls panel.",
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        }

        let search_matches = self
            .ranked_search_matches()
            .into_iter()
            .map(|(id, _)| id)
            .collect::<HashSet<_>>();
        let search_active = !self.search.trim().is_empty();
        let scale = self.transform.scale;
        let scale_sqrt = scale.sqrt();
        let by_id = scene
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect::<HashMap<_, _>>();
        let selected = self.selected.as_deref();

        for link in &scene.links {
            let path = self
                .engine
                .displayed_link_path(link)
                .map_points(|point| to_screen(rect, &self.transform, point.to_vec2()));
            let points = path.sample(LINK_SEGMENTS);
            if !polyline_visible(rect, &points, 4.0) {
                continue;
            }

            let touches_selection =
                selected.is_some_and(|id| id == link.from.as_str() || id == link.to.as_str());
            let dimmed = [&link.from, &link.to]
                .iter()
                .any(|id| by_id.get(id.as_str()).is_some_and(|node| node.in_shelved_branch));

            let (line_width, mut line_color) = if touches_selection {
                (
                    (2.4 * scale_sqrt).clamp(1.2, 4.4),
                    Color32::from_rgb(245, 206, 93),
                )
            } else {
                (
                    (1.3 * scale_sqrt).clamp(0.6, 3.0),
                    Color32::from_rgba_unmultiplied(150, 160, 172, 200),
                )
            };
            if dimmed {
                line_color = dim_color(line_color, 0.45);
            }

            let target_radius = by_id
                .get(link.to.as_str())
                .map(|node| screen_radius(node.size.radius, scale))
                .unwrap_or(0.0);
            let direction = path.end_direction();
            let tip = path.end() - direction * target_radius;

            painter.add(Shape::line(points, Stroke::new(line_width, line_color)));
            painter.add(arrowhead(tip, direction, (9.0 * scale_sqrt).clamp(5.0, 14.0), line_color));
        }

        let selected_color = Color32::from_rgb(245, 206, 93);
        let mut selection_animating = false;

        for node in &scene.nodes {
            let Some(position) = self.engine.displayed_position(&node.id) else {
                continue;
            };
            let center = to_screen(rect, &self.transform, position);
            let radius = screen_radius(node.size.radius, scale);
            if !circle_visible(rect, center, radius + 80.0) {
                continue;
            }

            let is_selected = selected == Some(node.id.as_str());
            let is_hovered = hovered.as_deref() == Some(node.id.as_str());
            let is_match = search_matches.contains(&node.id);

            let base_color = status_color(node.status);
            let mut unselected_color = if is_hovered {
                blend_color(base_color, Color32::from_rgb(255, 164, 101), 0.45)
            } else if is_match {
                blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.68)
            } else if search_active {
                dim_color(base_color, 0.45)
            } else {
                base_color
            };
            if node.in_shelved_branch {
                unselected_color = dim_color(unselected_color, 0.42);
            }

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", node.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }
            let color = blend_color(unselected_color, selected_color, selection_mix * 0.35);

            painter.circle_filled(center, radius, color);
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(
                    1.0 + selection_mix * 1.8,
                    blend_color(
                        Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                        selected_color,
                        selection_mix,
                    ),
                ),
            );
            if node.locked {
                let pin = center + vec2(radius, -radius) * std::f32::consts::FRAC_1_SQRT_2;
                painter.circle_filled(pin, (radius * 0.12).clamp(2.0, 5.0), Color32::from_gray(230));
            }

            if is_selected || is_hovered || radius > 18.0 || scale > 1.35 {
                Self::draw_node_label(&painter, center, radius, node);
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(node) = hovered.as_deref().and_then(|id| by_id.get(id)) {
            let hour_rate = self.engine.config().sizing.hour_rate;
            let panel_text = format!(
                "{}  |  {}  |  {}  |  {}  |  estimate {}",
                node.name,
                node.status.label(),
                format_cost(node.totals.cost),
                format_hours(node.totals.time),
                format_cost(node.totals.estimate(hour_rate)),
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }

    fn draw_node_label(painter: &egui::Painter, center: egui::Pos2, radius: f32, node: &SceneNode) {
        let name = if node.name.is_empty() {
            node.id.as_str()
        } else {
            node.name.as_str()
        };
        painter.text(
            center + vec2(0.0, radius + 4.0),
            Align2::CENTER_TOP,
            name,
            FontId::proportional(12.0),
            Color32::from_gray(238),
        );
        painter.text(
            center + vec2(0.0, radius + 19.0),
            Align2::CENTER_TOP,
            format!(
                "{} · {}",
                format_cost(node.totals.cost),
                format_hours(node.totals.time)
            ),
            FontId::proportional(10.5),
            Color32::from_gray(176),
        );
    }
}
