//! Screen-facing collaborators: where text and visual evidence come from.

pub mod ocr_text;
pub mod screen;
pub mod text_source;
pub mod vision;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{TextExtraction, VisualJudgment};

pub use screen::{ScreenGrabber, ScreencaptureGrabber};
pub use text_source::ScreenTextSource;
pub use vision::VisionJudge;

/// Produces one text extraction per quick cycle.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn capture(&self) -> Result<TextExtraction>;
}

/// Produces one visual judgment per deep cycle.
#[async_trait]
pub trait VisualSource: Send + Sync {
    async fn capture(&self) -> Result<VisualJudgment>;
}
