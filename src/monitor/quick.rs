use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use super::cycle::Cycle;
use crate::alerts::AlertSink;
use crate::analysis::Tier1Analyzer;
use crate::models::{FocusState, TextExtraction, Tier1Judgment};
use crate::sensing::TextSource;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Text capture -> tier-1 judgment -> publish; alerts only when distracted.
pub struct QuickCycle {
    source: Arc<dyn TextSource>,
    analyzer: Tier1Analyzer,
    latest: watch::Sender<Option<Tier1Judgment>>,
    alerts: Arc<dyn AlertSink>,
}

impl QuickCycle {
    pub fn new(
        source: Arc<dyn TextSource>,
        analyzer: Tier1Analyzer,
        latest: watch::Sender<Option<Tier1Judgment>>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            source,
            analyzer,
            latest,
            alerts,
        }
    }
}

#[async_trait]
impl Cycle for QuickCycle {
    fn name(&self) -> &'static str {
        "quick"
    }

    async fn iterate(&mut self) -> Result<()> {
        let extraction = match self.source.capture().await {
            Ok(extraction) => extraction,
            Err(err) => {
                log_warn!("[quick] text capture failed: {err:#}");
                TextExtraction::unavailable(Utc::now())
            }
        };

        let judgment = self.analyzer.judge(&extraction, Utc::now()).await;
        for summary in &judgment.unit_summaries {
            log_debug!("[quick]   {summary}");
        }

        let published = judgment.to_final();
        // Replaces the previous judgment; the deep cycle only ever wants the newest.
        self.latest.send_replace(Some(judgment));

        log_info!(
            "[quick] {} ({:.0}%) - {}",
            published.state,
            published.confidence * 100.0,
            published.reason
        );

        if published.state == FocusState::Distracted {
            self.alerts.notify(&published).await;
        }

        Ok(())
    }
}
