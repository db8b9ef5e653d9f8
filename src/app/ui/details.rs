use eframe::egui::{self, RichText, Ui};

use crate::model::Status;
use crate::util::{format_cost, format_hours};

use super::super::MapView;

/// A link row in the details panel: link id and the node on the other end.
struct LinkRow {
    link_id: String,
    other_id: String,
    other_name: String,
}

impl MapView {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a node on the map or from the ranking.");
            return;
        };

        if !self.model.contains(&selected_id) {
            ui.label("Selected node no longer exists.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_node_fields(ui, &selected_id);
                ui.separator();
                self.draw_rollup(ui, &selected_id);
                ui.separator();
                self.draw_links(ui, &selected_id);
            });
    }

    fn draw_node_fields(&mut self, ui: &mut Ui, id: &str) {
        let Some(node) = self.model.node_mut(id) else {
            return;
        };

        ui.small(id);
        let mut changed = false;

        ui.label("Name");
        changed |= ui.text_edit_singleline(&mut node.name).changed();
        ui.label("Description");
        changed |= ui
            .add(egui::TextEdit::multiline(&mut node.description).desired_rows(3))
            .changed();

        egui::Grid::new("node_fields")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Cost");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut node.estimated_cost)
                            .range(0.0..=f64::MAX)
                            .speed(10.0),
                    )
                    .changed();
                ui.end_row();

                ui.label("Time (h)");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut node.estimated_time)
                            .range(0.0..=f64::MAX)
                            .speed(0.5),
                    )
                    .changed();
                ui.end_row();

                ui.label("Status");
                egui::ComboBox::from_id_salt("node_status")
                    .selected_text(node.status.label())
                    .show_ui(ui, |ui| {
                        for status in Status::ALL {
                            changed |= ui
                                .selectable_value(&mut node.status, status, status.label())
                                .changed();
                        }
                    });
                ui.end_row();

                ui.label("Assigned to");
                changed |= ui.text_edit_singleline(&mut node.assigned_to).changed();
                ui.end_row();
            });

        if node.position_locked {
            ui.small("Position locked by drag.");
        }

        if changed {
            self.model_changed();
        }
    }

    fn draw_rollup(&self, ui: &mut Ui, id: &str) {
        ui.label(RichText::new("Rolled up").strong());
        let Some(node) = self.engine.scene().node(id) else {
            ui.label("Waiting for the next layout pass.");
            return;
        };

        let hour_rate = self.engine.config().sizing.hour_rate;
        ui.label(format!("Cost: {}", format_cost(node.totals.cost)));
        ui.label(format!("Time: {}", format_hours(node.totals.time)));
        ui.label(format!(
            "Estimate at {}/h: {}",
            format_cost(hour_rate),
            format_cost(node.totals.estimate(hour_rate))
        ));
        if node.in_shelved_branch {
            ui.label("Inside a shelved branch.");
        }
    }

    fn link_rows(&self, id: &str, outgoing: bool) -> Vec<LinkRow> {
        self.model
            .links
            .iter()
            .filter_map(|link| {
                let (near, far) = if outgoing {
                    (&link.from, &link.to)
                } else {
                    (&link.to, &link.from)
                };
                if near != id {
                    return None;
                }
                let other_name = self
                    .model
                    .node(far)
                    .map(|node| node.name.clone())
                    .unwrap_or_else(|| format!("{far} (missing)"));
                Some(LinkRow {
                    link_id: link.id.clone(),
                    other_id: far.clone(),
                    other_name,
                })
            })
            .collect()
    }

    fn draw_links(&mut self, ui: &mut Ui, id: &str) {
        let mut remove = None;
        let mut select = None;

        for (title, outgoing) in [("Dependents", true), ("Prerequisites", false)] {
            ui.label(RichText::new(title).strong());
            let rows = self.link_rows(id, outgoing);
            if rows.is_empty() {
                ui.label("None.");
            }
            for row in rows {
                ui.horizontal(|ui| {
                    if ui.link(row.other_name.as_str()).clicked() {
                        select = Some(row.other_id.clone());
                    }
                    if ui.small_button("✕").on_hover_text("Remove link").clicked() {
                        remove = Some(row.link_id.clone());
                    }
                });
            }
            ui.add_space(4.0);
        }

        if let Some(link_id) = remove {
            match self.model.remove_link(&link_id) {
                Ok(_) => self.model_changed(),
                Err(error) => tracing::warn!(%error, "could not remove link"),
            }
        }
        if let Some(other) = select {
            self.focus_node(&other);
            self.set_selected(Some(other));
            return;
        }

        ui.separator();
        ui.label(RichText::new("Add dependent").strong());
        let target_name = self
            .link_target
            .as_deref()
            .and_then(|target| self.model.node(target))
            .map(|node| node.name.clone())
            .unwrap_or_else(|| "Choose a node".to_owned());
        let candidates = self
            .model
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.name.clone()))
            .collect::<Vec<_>>();

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("link_target")
                .selected_text(target_name)
                .show_ui(ui, |ui| {
                    for (candidate_id, name) in &candidates {
                        ui.selectable_value(&mut self.link_target, Some(candidate_id.clone()), name.as_str());
                    }
                });

            let add = ui.add_enabled(self.link_target.is_some(), egui::Button::new("Link"));
            if add.clicked()
                && let Some(target) = self.link_target.take()
            {
                match self.model.add_link(id, &target) {
                    Ok(link_id) => {
                        tracing::debug!(%link_id, from = id, to = %target, "added link");
                        self.model_changed();
                    }
                    Err(error) => tracing::warn!(%error, "could not add link"),
                }
            }
        });
    }
}
