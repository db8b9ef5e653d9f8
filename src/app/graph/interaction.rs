use eframe::egui::{self, PointerButton, Pos2, Rect, Ui};

use crate::engine::DragOutcome;

use super::super::render_utils::{screen_radius, to_map, to_screen};
use super::super::{MapView, PointerMode};

impl MapView {
    pub(in crate::app) fn handle_map_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform
            .zoom_around(pointer - rect.min.to_vec2(), zoom_factor, 0.05, 6.0);
    }

    /// Pan, subtree drag and click selection.
    pub(in crate::app) fn handle_map_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.dragged_by(PointerButton::Secondary) || response.dragged_by(PointerButton::Middle) {
            self.transform.pan += response.drag_delta();
        }

        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            self.pointer_mode = PointerMode::Panning;

            if let Some(origin) = origin
                && let Some(node_id) = self.node_at(rect, origin)
            {
                let pointer = to_map(rect, &self.transform, origin);
                if self.engine.begin_drag(&self.model, &node_id, pointer) {
                    self.pointer_mode = PointerMode::DraggingNode;
                }
            }
        }

        if response.dragged_by(PointerButton::Primary) {
            match self.pointer_mode {
                PointerMode::DraggingNode => {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        let pointer = to_map(rect, &self.transform, pointer);
                        if self.engine.update_drag(&mut self.model, pointer) {
                            ui.ctx().request_repaint();
                        }
                    }
                }
                PointerMode::Panning => self.transform.pan += response.drag_delta(),
                PointerMode::Idle => {}
            }
        }

        if response.drag_stopped() && std::mem::take(&mut self.pointer_mode) == PointerMode::DraggingNode {
            self.finish_node_drag();
        }

        if response.clicked_by(PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.node_at(rect, pointer));
            self.set_selected(hit);
        }
    }

    fn finish_node_drag(&mut self) {
        match self.engine.end_drag() {
            DragOutcome::Moved { node, moved } => {
                tracing::debug!(%node, moved = moved.len(), "persisting dragged subtree");
                self.unsaved = true;
                self.save();
            }
            DragOutcome::Click { node } => self.set_selected(Some(node)),
            DragOutcome::Idle => {}
        }
    }

    /// Topmost node under a canvas point, preferring the closest center.
    pub(in crate::app) fn node_at(&self, rect: Rect, screen: Pos2) -> Option<String> {
        self.engine
            .scene()
            .nodes
            .iter()
            .filter_map(|node| {
                let position = self.engine.displayed_position(&node.id)?;
                let center = to_screen(rect, &self.transform, position);
                let distance = center.distance(screen);
                (distance <= screen_radius(node.size.radius, self.transform.scale))
                    .then_some((node.id.as_str(), distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id.to_owned())
    }
}
