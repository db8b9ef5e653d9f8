use eframe::egui::{self, Align, Layout, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::config::LayoutKind;
use crate::util::format_cost;

use super::super::MapView;

const RANKING_ROWS: usize = 200;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl MapView {
    /// Node ids whose name fuzzy-matches the search box, best first.
    pub(in crate::app) fn ranked_search_matches(&self) -> Vec<(String, i64)> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut matches = self
            .model
            .nodes
            .iter()
            .filter_map(|node| {
                let score = fuzzy_match_score(&matcher, &node.name, query)?;
                Some((node.id.clone(), score))
            })
            .collect::<Vec<_>>();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Map Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search")
            .on_hover_text("Fuzzy-highlight nodes by name without changing the layout.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        self.draw_editing_controls(ui);

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        let current = self.engine.layout_kind();
        let mut chosen = current;
        ui.horizontal_wrapped(|ui| {
            for kind in [LayoutKind::Radial, LayoutKind::Force] {
                ui.selectable_value(&mut chosen, kind, kind.label());
            }
        });
        if chosen != current {
            self.engine.set_layout_kind(chosen);
        }
        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Relayout")
                .on_hover_text("Recompute positions; locked nodes stay put.")
                .clicked()
            {
                self.engine.request_refresh();
            }
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            let label = if self.unsaved { "Save *" } else { "Save" };
            if ui.button(label).clicked() {
                self.save();
            }
            ui.small(self.store.path().display().to_string());
        });

        ui.separator();
        self.draw_node_ranking(ui);
    }

    fn draw_editing_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Edit").strong());
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.new_node_name);
        });

        let name = match self.new_node_name.trim() {
            "" => "Untitled".to_owned(),
            trimmed => trimmed.to_owned(),
        };
        let selected = self.selected.clone();

        ui.horizontal_wrapped(|ui| {
            if ui.button("Add node").clicked() {
                let id = self.model.add_node(name.clone());
                tracing::debug!(%id, "added node");
                self.new_node_name.clear();
                self.set_selected(Some(id));
                self.model_changed();
            }

            let add_child = ui
                .add_enabled(selected.is_some(), egui::Button::new("Add child"))
                .on_hover_text("Create a node that depends on the selection.");
            if add_child.clicked()
                && let Some(parent) = &selected
            {
                match self.model.add_child(parent, name.clone()) {
                    Ok(id) => {
                        tracing::debug!(%id, %parent, "added child node");
                        self.new_node_name.clear();
                        self.set_selected(Some(id));
                        self.model_changed();
                    }
                    Err(error) => tracing::warn!(%error, "could not add child"),
                }
            }

            let delete = ui.add_enabled(selected.is_some(), egui::Button::new("Delete"));
            if delete.clicked()
                && let Some(id) = &selected
            {
                match self.model.delete_node(id) {
                    Ok(node) => {
                        tracing::debug!(id = %node.id, "deleted node");
                        self.set_selected(None);
                        self.model_changed();
                    }
                    Err(error) => tracing::warn!(%error, "could not delete node"),
                }
            }
        });
    }

    /// Search hits when searching, otherwise nodes by rolled-up estimate.
    fn draw_node_ranking(&mut self, ui: &mut Ui) {
        let hour_rate = self.engine.config().sizing.hour_rate;
        let searching = !self.search.trim().is_empty();

        let rows = if searching {
            self.ranked_search_matches()
                .into_iter()
                .map(|(id, _)| id)
                .collect::<Vec<_>>()
        } else {
            let mut ranked = self
                .engine
                .scene()
                .nodes
                .iter()
                .map(|node| (node.id.clone(), node.totals.estimate(hour_rate)))
                .collect::<Vec<_>>();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.into_iter().map(|(id, _)| id).collect()
        };

        ui.label(
            RichText::new(if searching { "Matches" } else { "Largest efforts" }).strong(),
        );
        if rows.is_empty() {
            ui.label(if searching { "No node names match." } else { "Nothing to rank yet." });
            return;
        }

        let row_count = rows.len().min(RANKING_ROWS);
        let mut clicked_id = None;

        egui::ScrollArea::vertical()
            .id_salt("node_ranking_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                for index in row_range {
                    let Some(id) = rows.get(index) else {
                        continue;
                    };
                    let Some(node) = self.engine.scene().node(id) else {
                        continue;
                    };

                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    let value_label = format_cost(node.totals.estimate(hour_rate));

                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui.selectable_label(is_selected, node.name.as_str()).clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(value_label);
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        clicked_id = Some(id.clone());
                    }
                }
            });

        if let Some(id) = clicked_id {
            self.focus_node(&id);
            self.set_selected(Some(id));
        }
    }
}
