//! Where published judgments end up. Delivery is fire-and-forget: a failing sink
//! is logged and never reaches the cycles.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::models::{FinalJudgment, FocusState};
use crate::sensing::screen::run_applescript;
use crate::settings::MonitorConfig;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn notify(&self, judgment: &FinalJudgment);
}

/// Fans a judgment out to the terminal, the notification center and a daily log file,
/// each behind its own toggle.
pub struct AlertService {
    terminal: bool,
    system_notifications: bool,
    log_directory: Option<PathBuf>,
}

impl AlertService {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let log_directory = if config.enable_logging {
            std::fs::create_dir_all(&config.log_directory).with_context(|| {
                format!("failed to create log directory {}", config.log_directory.display())
            })?;
            Some(config.log_directory.clone())
        } else {
            None
        };

        Ok(Self {
            terminal: config.enable_terminal_alerts,
            system_notifications: config.enable_system_notifications,
            log_directory,
        })
    }

    async fn notify_system(&self, judgment: &FinalJudgment) -> Result<()> {
        let script = format!(
            "display notification \"{}\" with title \"FocusBuddy: {}\"",
            escape_applescript(&first_line(&judgment.reason)),
            judgment.state
        );
        run_applescript(&script).await.map(|_| ())
    }
}

#[async_trait]
impl AlertSink for AlertService {
    async fn notify(&self, judgment: &FinalJudgment) {
        if self.terminal {
            println!("{}", terminal_line(judgment));
        }

        if self.system_notifications {
            if let Err(err) = self.notify_system(judgment).await {
                log_warn!("system notification failed: {err:#}");
            }
        }

        if let Some(dir) = &self.log_directory {
            if let Err(err) = append_log_entry(dir, judgment).await {
                log_warn!("writing focus log failed: {err:#}");
            }
        }
    }
}

pub fn icon(state: FocusState) -> &'static str {
    match state {
        FocusState::Focused => "✓",
        FocusState::Distracted => "⚠",
        FocusState::Away => "⏸",
    }
}

pub fn terminal_line(judgment: &FinalJudgment) -> String {
    format!(
        "[{}] {} {}",
        judgment.state.as_str().to_uppercase(),
        icon(judgment.state),
        judgment.reason
    )
}

/// `[2026-10-19 14:03:22] Distracted - reason (Confidence: 53%)`, in local time.
pub fn log_entry(judgment: &FinalJudgment) -> String {
    format!(
        "[{}] {} - {} (Confidence: {:.0}%)\n",
        judgment.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        judgment.state,
        judgment.reason.replace('\n', " | "),
        judgment.confidence * 100.0
    )
}

/// One file per local calendar day.
pub fn log_file_path(dir: &Path, judgment: &FinalJudgment) -> PathBuf {
    let day = judgment.timestamp.with_timezone(&Local).format("%Y-%m-%d");
    dir.join(format!("focus-session-{day}.log"))
}

async fn append_log_entry(dir: &Path, judgment: &FinalJudgment) -> Result<()> {
    let path = log_file_path(dir, judgment);
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(log_entry(judgment).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
