use eframe::egui::{self, Align, Color32, Context, Layout};

use crate::util::{format_cost, format_hours};

use super::super::MapView;

impl MapView {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("effort-map");
                    ui.separator();
                    ui.label(format!("file: {}", self.store.path().display()));
                    ui.label(format!("nodes: {}", self.model.node_count()));
                    ui.label(format!("links: {}", self.model.links.len()));
                    ui.label(format!("layout: {}", self.engine.layout_kind().label()));

                    let scene = self.engine.scene();
                    if let Some(root) = scene.root.as_deref().and_then(|id| scene.node(id)) {
                        ui.label(format!(
                            "total: {} · {}",
                            format_cost(root.totals.cost),
                            format_hours(root.totals.time)
                        ));
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = &self.status_line {
                            let color = if status.is_error {
                                Color32::from_rgb(236, 110, 96)
                            } else {
                                Color32::from_gray(180)
                            };
                            ui.colored_label(color, status.text.as_str());
                        }
                        if self.unsaved {
                            ui.label("unsaved changes");
                        }
                        ui.label(format!("zoom {:.0}%", self.transform.scale * 100.0));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_map(ui));
    }
}
