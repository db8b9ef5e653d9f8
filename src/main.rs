use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use effort_map::app::EffortMapApp;
use effort_map::config::{EngineConfig, LayoutKind};
use effort_map::engine::MapEngine;
use effort_map::model::{JsonFileStore, ModelStore};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Radial,
    Force,
}

impl From<LayoutArg> for LayoutKind {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Radial => Self::Radial,
            LayoutArg::Force => Self::Force,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Project model to open; created on first save.
    #[arg(default_value = "effort-map.json")]
    model: PathBuf,

    /// Engine settings (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the layout strategy from the config.
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,effort_map=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::load_or_default(args.config.as_deref());
    if let Some(layout) = args.layout {
        config.layout.strategy = layout.into();
    }

    let store = JsonFileStore::new(args.model.clone());
    let model = store
        .load_model()
        .with_context(|| format!("failed to open {}", args.model.display()))?;
    tracing::info!(
        path = %args.model.display(),
        nodes = model.node_count(),
        links = model.links.len(),
        "loaded project model"
    );

    let engine = MapEngine::new(config);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "effort-map",
        options,
        Box::new(move |cc| Ok(Box::new(EffortMapApp::new(cc, store, model, engine)))),
    )
    .map_err(|error| anyhow::anyhow!("{error}"))
    .context("window closed with an error")
}
