#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

use focusbuddy_lib::alerts::AlertSink;
use focusbuddy_lib::inference::InferenceBackend;
use focusbuddy_lib::models::{FinalJudgment, TextExtraction, VisualJudgment};
use focusbuddy_lib::sensing::{TextSource, VisualSource};

pub struct FakeBackend {
    available: bool,
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            available: true,
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::replying("")
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for FakeBackend {
    async fn generate(&self, prompt: &str, _images: &[Vec<u8>]) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

pub struct FixedText(pub TextExtraction);

#[async_trait]
impl TextSource for FixedText {
    async fn capture(&self) -> Result<TextExtraction> {
        Ok(self.0.clone())
    }
}

pub struct FixedVisual {
    pub is_focused: bool,
}

#[async_trait]
impl VisualSource for FixedVisual {
    async fn capture(&self) -> Result<VisualJudgment> {
        Ok(VisualJudgment {
            is_focused: self.is_focused,
            screen_context: if self.is_focused { "On task" } else { "Distracted" }.into(),
            reasoning: "fixed visual verdict".into(),
            timestamp: Utc::now(),
        })
    }
}

pub struct FailingText;

#[async_trait]
impl TextSource for FailingText {
    async fn capture(&self) -> Result<TextExtraction> {
        bail!("accessibility permission denied")
    }
}

/// Fails the first `failures` captures, then reports a focused screen.
pub struct FlakyVisual {
    failures: AtomicUsize,
    calls: Mutex<Vec<Instant>>,
}

impl FlakyVisual {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisualSource for FlakyVisual {
    async fn capture(&self) -> Result<VisualJudgment> {
        self.calls.lock().unwrap().push(Instant::now());
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            bail!("screen capture failed");
        }
        FixedVisual { is_focused: true }.capture().await
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub received: Mutex<Vec<FinalJudgment>>,
}

impl RecordingAlerts {
    pub fn received(&self) -> Vec<FinalJudgment> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    async fn notify(&self, judgment: &FinalJudgment) {
        self.received.lock().unwrap().push(judgment.clone());
    }
}

pub fn youtube_extraction() -> TextExtraction {
    TextExtraction {
        active_app: "YouTube".into(),
        window_title: "Funny Cats".into(),
        urls: vec!["youtube.com/watch?v=1".into()],
        text: String::new(),
        timestamp: Utc::now(),
    }
}
