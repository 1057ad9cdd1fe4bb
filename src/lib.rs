pub mod alerts;
pub mod analysis;
pub mod cli;
pub mod inference;
pub mod models;
pub mod monitor;
pub mod sensing;
pub mod settings;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use alerts::AlertService;
use analysis::AnalysisConfig;
use cli::Cli;
use inference::OllamaClient;
use models::Goal;
use monitor::{Collaborators, MonitorController};
use sensing::{ScreenTextSource, ScreencaptureGrabber, VisionJudge};
use settings::{MonitorConfig, DEFAULT_CONFIG_FILE};

pub async fn run() -> Result<()> {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = MonitorConfig::load(&config_path)?;
    cli.apply_overrides(&mut config);

    let goal = match &cli.goal {
        Some(text) => Goal::new(text.as_str())?,
        None => prompt_for_goal()?,
    };
    let goal = Arc::new(goal);

    log::info!(
        "FocusBuddy starting, goal: {:?} (set {})",
        goal.text(),
        goal.created_at().with_timezone(&chrono::Local).format("%H:%M:%S")
    );

    let text_backend = Arc::new(
        OllamaClient::new(&config.ollama_url, &config.text_model, config.request_timeout_secs)
            .context("failed to build text model client")?,
    );
    let vision_backend = Arc::new(
        OllamaClient::new(&config.ollama_url, &config.vision_model, config.request_timeout_secs)
            .context("failed to build vision model client")?,
    );

    let collaborators = Collaborators {
        text_source: Arc::new(ScreenTextSource::new(config.ocr_command.clone())),
        visual_source: Arc::new(VisionJudge::new(
            Arc::new(ScreencaptureGrabber),
            vision_backend,
            Arc::clone(&goal),
            config.screenshot_max_width,
        )),
        text_backend,
        alerts: Arc::new(AlertService::new(&config)?),
    };

    let mut controller = MonitorController::new();
    controller.start(goal, collaborators, &config, AnalysisConfig::default())?;
    log::info!("monitoring; press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    log::info!("FocusBuddy shutting down");
    controller.stop().await
}

fn prompt_for_goal() -> Result<Goal> {
    print!("What do you want to focus on? ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read focus goal")?;

    Goal::new(line)
}
