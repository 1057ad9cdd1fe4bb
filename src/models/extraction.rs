use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text pulled off the screen by the window/OCR collaborators for one quick cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextExtraction {
    pub active_app: String,
    pub window_title: String,
    pub urls: Vec<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TextExtraction {
    /// Sentinel handed to the core when capture failed outright.
    pub fn unavailable(timestamp: DateTime<Utc>) -> Self {
        Self {
            active_app: "Error".to_string(),
            window_title: "Error".to_string(),
            urls: Vec::new(),
            text: String::new(),
            timestamp,
        }
    }
}

/// Verdict of the vision model over a full screenshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisualJudgment {
    pub is_focused: bool,
    pub screen_context: String,
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}
