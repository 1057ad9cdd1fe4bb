use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;

use super::screen::ScreenGrabber;
use super::VisualSource;
use crate::analysis::response::{parse_flagged_response, ResponseError};
use crate::inference::InferenceBackend;
use crate::models::{Goal, VisualJudgment};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub const FOCUS_LABEL: &str = "FOCUSED";

pub const UNAVAILABLE_CONTEXT: &str = "Unable to analyze (vision backend unavailable)";
pub const UNAVAILABLE_REASONING: &str = "Vision backend is not available, using fallback analysis.";
pub const UNPARSEABLE_REASONING: &str = "Vision response could not be parsed";

/// Screenshot + vision model, producing one visual judgment per call.
pub struct VisionJudge {
    grabber: Arc<dyn ScreenGrabber>,
    backend: Arc<dyn InferenceBackend>,
    goal: Arc<Goal>,
    max_width: u32,
}

impl VisionJudge {
    pub fn new(
        grabber: Arc<dyn ScreenGrabber>,
        backend: Arc<dyn InferenceBackend>,
        goal: Arc<Goal>,
        max_width: u32,
    ) -> Self {
        Self {
            grabber,
            backend,
            goal,
            max_width,
        }
    }
}

#[async_trait]
impl VisualSource for VisionJudge {
    async fn capture(&self) -> Result<VisualJudgment> {
        if !self.backend.is_available().await {
            log_warn!("vision backend unavailable, using fallback");
            return Ok(unavailable_judgment(Utc::now()));
        }

        let png = self
            .grabber
            .grab()
            .await
            .context("screenshot for vision check failed")?;
        let original_len = png.len();

        let max_width = self.max_width;
        let png = tokio::task::spawn_blocking(move || downscale_png(png, max_width))
            .await
            .context("downscale worker join failed")??;
        log_debug!("screenshot {} bytes -> {} bytes", original_len, png.len());

        let prompt = build_vision_prompt(&self.goal);
        let response = self.backend.generate(&prompt, &[png]).await;
        log_debug!("vision raw response:\n{}", response);

        let judgment = visual_from_response(&response, Utc::now());
        log_info!(
            "vision says focused={} ({})",
            judgment.is_focused,
            judgment.reasoning
        );
        Ok(judgment)
    }
}

pub fn build_vision_prompt(goal: &Goal) -> String {
    format!(
        "You are a focus monitoring assistant. The user wants to focus on: \"{goal}\"\n\
         \n\
         Look at the screenshot and decide:\n\
         1. Is the screen showing content DIRECTLY related to the focus goal?\n\
         2. Are obvious distractions visible (social media, entertainment, unrelated content)?\n\
         3. Does the visible content help accomplish the stated goal?\n\
         \n\
         Rules:\n\
         - This monitoring tool itself is not the goal\n\
         - Terminals and code editors count only when the goal is programming\n\
         - Be strict: if the content does not match the goal, answer no\n\
         \n\
         Answer in exactly two lines:\n\
         {FOCUS_LABEL}: yes/no\n\
         REASONING: one short sentence\n",
        goal = goal.text()
    )
}

/// Empty answers mean the backend dropped out; malformed answers count as distracted.
pub fn visual_from_response(response: &str, now: DateTime<Utc>) -> VisualJudgment {
    match parse_flagged_response(response, FOCUS_LABEL) {
        Ok(answer) => VisualJudgment {
            is_focused: answer.flag,
            screen_context: screen_context(answer.flag).to_string(),
            reasoning: answer.rationale,
            timestamp: now,
        },
        Err(ResponseError::Empty) => {
            log_warn!("empty response from vision backend");
            unavailable_judgment(now)
        }
        Err(err) => {
            log_warn!("vision answer unusable ({err}): {response:?}");
            VisualJudgment {
                is_focused: false,
                screen_context: screen_context(false).to_string(),
                reasoning: UNPARSEABLE_REASONING.to_string(),
                timestamp: now,
            }
        }
    }
}

fn screen_context(is_focused: bool) -> &'static str {
    if is_focused {
        "On task"
    } else {
        "Distracted"
    }
}

pub fn unavailable_judgment(now: DateTime<Utc>) -> VisualJudgment {
    VisualJudgment {
        is_focused: true,
        screen_context: UNAVAILABLE_CONTEXT.to_string(),
        reasoning: UNAVAILABLE_REASONING.to_string(),
        timestamp: now,
    }
}

/// Re-encode as PNG no wider than `max_width`; narrower images pass through untouched.
pub fn downscale_png(png: Vec<u8>, max_width: u32) -> Result<Vec<u8>> {
    let image = image::load_from_memory(&png).context("screenshot is not a decodable image")?;
    if image.width() <= max_width {
        return Ok(png);
    }

    let resized = image.resize(max_width, image.height(), FilterType::Triangle);
    let mut out = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("failed to encode downscaled screenshot")?;
    Ok(out)
}
