use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings_from, normalize_server_url, DEFAULT_SETTINGS_FILE};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::GameApp;

#[derive(Parser, Debug)]
#[command(about = "Play a remote 2048 game in a desktop window")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    board_size: Option<i64>,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config, |key| std::env::var(key).ok());
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }
    if let Some(board_size) = args.board_size {
        settings.board_size = board_size;
    }
    let board_size = settings.board_size;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("2048")
            .with_inner_size([600.0, 720.0])
            .with_min_inner_size([360.0, 440.0]),
        ..Default::default()
    };
    eframe::run_native(
        "2048",
        options,
        Box::new(move |_cc| Ok(Box::new(GameApp::new(cmd_tx, ui_rx, board_size)))),
    )
}
