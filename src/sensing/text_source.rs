use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::ocr_text::{extract_urls, summarize_ocr_text};
use super::screen::{capture_screen_to, run_applescript, run_command, TempCapture};
use super::TextSource;
use crate::models::TextExtraction;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

const FRONTMOST_APP_SCRIPT: &str =
    "tell application \"System Events\" to get name of first application process whose frontmost is true";
const FRONTMOST_WINDOW_SCRIPT: &str =
    "tell application \"System Events\" to get name of window 1 of first application process whose frontmost is true";

/// macOS text extraction: frontmost app and window via AppleScript, screen text via
/// an external OCR helper that takes an image path and prints the recognised text.
pub struct ScreenTextSource {
    ocr_command: Vec<String>,
}

impl ScreenTextSource {
    pub fn new(ocr_command: Vec<String>) -> Self {
        Self { ocr_command }
    }

    async fn run_ocr(&self) -> Result<String> {
        let Some((program, args)) = self.ocr_command.split_first() else {
            log_debug!("no OCR command configured, skipping screen text");
            return Ok(String::new());
        };

        let capture = TempCapture::new();
        capture_screen_to(capture.path()).await?;

        let mut args = args.to_vec();
        args.push(capture.path().to_string_lossy().to_string());
        run_command(program, &args)
            .await
            .context("OCR helper failed")
    }
}

#[async_trait]
impl TextSource for ScreenTextSource {
    async fn capture(&self) -> Result<TextExtraction> {
        let timestamp = Utc::now();

        let (app, title) = tokio::join!(
            run_applescript(FRONTMOST_APP_SCRIPT),
            run_applescript(FRONTMOST_WINDOW_SCRIPT)
        );
        let active_app = app.context("frontmost app lookup failed")?;
        // Plenty of apps have no titled window; that is not a failure.
        let window_title = title.unwrap_or_default();

        let raw_text = match self.run_ocr().await {
            Ok(text) => text,
            Err(err) => {
                log_warn!("screen OCR failed: {err:#}");
                String::new()
            }
        };

        let urls = extract_urls(&raw_text);
        let text = summarize_ocr_text(&raw_text);

        let preview: String = text.chars().take(50).collect();
        log_info!(
            "{} - extracted {} chars, {} urls: {:?}",
            active_app,
            raw_text.chars().count(),
            urls.len(),
            preview
        );

        Ok(TextExtraction {
            active_app,
            window_title,
            urls,
            text,
            timestamp,
        })
    }
}
