use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const DEFAULT_CONFIG_FILE: &str = "focusbuddy.json";

/// Everything outside the judging logic: cadence, backends, toggles.
/// Any field missing from the file keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub quick_interval_secs: u64,
    pub deep_interval_secs: u64,
    /// Lets at least one quick result exist before the first deep cycle.
    pub deep_initial_delay_secs: u64,
    pub quick_backoff_secs: u64,
    pub deep_backoff_secs: u64,

    pub ollama_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub request_timeout_secs: u64,

    pub enable_terminal_alerts: bool,
    pub enable_system_notifications: bool,
    pub enable_logging: bool,
    pub log_directory: PathBuf,

    /// argv of the OCR helper; the screenshot path is appended. Empty disables OCR.
    pub ocr_command: Vec<String>,
    pub screenshot_max_width: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            quick_interval_secs: 5,
            deep_interval_secs: 15,
            deep_initial_delay_secs: 7,
            quick_backoff_secs: 5,
            deep_backoff_secs: 10,
            ollama_url: "http://localhost:11434".into(),
            text_model: "qwen3:0.6b".into(),
            vision_model: "qwen3-vl:4b".into(),
            request_timeout_secs: 120,
            enable_terminal_alerts: true,
            enable_system_notifications: false,
            enable_logging: true,
            log_directory: PathBuf::from("logs"),
            ocr_command: vec!["swift".into(), "helpers/VisionOCR.swift".into()],
            screenshot_max_width: 1920,
        }
    }
}

impl MonitorConfig {
    /// Missing file means defaults; a file that does not parse is reported and ignored.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            log_warn!("ignoring malformed settings in {}: {err}", path.display());
            Self::default()
        }))
    }

    pub fn quick_interval(&self) -> Duration {
        Duration::from_secs(self.quick_interval_secs)
    }

    pub fn deep_interval(&self) -> Duration {
        Duration::from_secs(self.deep_interval_secs)
    }

    pub fn deep_initial_delay(&self) -> Duration {
        Duration::from_secs(self.deep_initial_delay_secs)
    }

    pub fn quick_backoff(&self) -> Duration {
        Duration::from_secs(self.quick_backoff_secs)
    }

    pub fn deep_backoff(&self) -> Duration {
        Duration::from_secs(self.deep_backoff_secs)
    }
}
