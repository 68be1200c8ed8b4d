use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::config::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::FeastBlissApp;

#[derive(Parser, Debug)]
#[command(name = "feastbliss-gui", about = "FeastBliss recipe browser and meal planner")]
struct Args {
    /// Base url of the recipe API, e.g. http://localhost:5000
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("FeastBliss")
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "FeastBliss",
        options,
        Box::new(move |cc| Ok(Box::new(FeastBlissApp::new(cc, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("desktop ui exited with error: {err}"))
}
