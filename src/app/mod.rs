use eframe::egui::{Context, Vec2};

use crate::engine::{MapEngine, MapTransform, Viewport};
use crate::model::{JsonFileStore, ModelStore, ProjectModel};

mod graph;
mod render_utils;
mod ui;

pub struct EffortMapApp {
    view: MapView,
}

struct MapView {
    store: JsonFileStore,
    model: ProjectModel,
    engine: MapEngine,
    transform: MapTransform,
    viewport: Option<Viewport>,
    search: String,
    selected: Option<String>,
    new_node_name: String,
    link_target: Option<String>,
    pointer_mode: PointerMode,
    unsaved: bool,
    status_line: Option<StatusLine>,
}

/// What the primary button is doing on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PointerMode {
    #[default]
    Idle,
    Panning,
    DraggingNode,
}

struct StatusLine {
    text: String,
    is_error: bool,
}

impl EffortMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        store: JsonFileStore,
        model: ProjectModel,
        engine: MapEngine,
    ) -> Self {
        Self {
            view: MapView::new(store, model, engine),
        }
    }
}

impl eframe::App for EffortMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.view.show(ctx);
    }
}

impl MapView {
    fn new(store: JsonFileStore, model: ProjectModel, engine: MapEngine) -> Self {
        Self {
            store,
            model,
            engine,
            transform: MapTransform::default(),
            viewport: None,
            search: String::new(),
            selected: None,
            new_node_name: String::new(),
            link_target: None,
            pointer_mode: PointerMode::Idle,
            unsaved: false,
            status_line: None,
        }
    }

    /// Records a model edit and schedules a fresh layout pass.
    fn model_changed(&mut self) {
        self.unsaved = true;
        self.engine.request_refresh();
    }

    fn save(&mut self) {
        match self.store.save_model(&self.model) {
            Ok(()) => {
                self.unsaved = false;
                self.status_line = Some(StatusLine {
                    text: format!("Saved {}", self.store.path().display()),
                    is_error: false,
                });
            }
            Err(error) => {
                tracing::warn!(%error, "failed to save model");
                self.status_line = Some(StatusLine {
                    text: error.to_string(),
                    is_error: true,
                });
            }
        }
    }

    fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        self.link_target = None;
    }

    /// Centers the view on `id` at the current zoom.
    fn focus_node(&mut self, id: &str) {
        let (Some(position), Some(viewport)) = (self.engine.displayed_position(id), self.viewport)
        else {
            return;
        };
        self.transform.pan = viewport.center() - position * self.transform.scale;
    }

    fn reset_view(&mut self) {
        self.transform = MapTransform {
            pan: Vec2::ZERO,
            scale: 1.0,
        };
    }
}
