use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use super::cycle::Cycle;
use crate::alerts::AlertSink;
use crate::analysis::{fuse, AnalysisConfig, ContextMemoryWriter};
use crate::models::Tier1Judgment;
use crate::sensing::VisualSource;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Visual capture -> fusion with the latest quick judgment -> memory update -> publish.
pub struct DeepCycle {
    source: Arc<dyn VisualSource>,
    memory: ContextMemoryWriter,
    latest: watch::Receiver<Option<Tier1Judgment>>,
    alerts: Arc<dyn AlertSink>,
    config: AnalysisConfig,
}

impl DeepCycle {
    pub fn new(
        source: Arc<dyn VisualSource>,
        memory: ContextMemoryWriter,
        latest: watch::Receiver<Option<Tier1Judgment>>,
        alerts: Arc<dyn AlertSink>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            source,
            memory,
            latest,
            alerts,
            config,
        }
    }
}

#[async_trait]
impl Cycle for DeepCycle {
    fn name(&self) -> &'static str {
        "deep"
    }

    async fn iterate(&mut self) -> Result<()> {
        let visual = self
            .source
            .capture()
            .await
            .context("visual capture failed")?;
        let now = Utc::now();

        let tier1 = self.latest.borrow().clone();
        let fused = tier1
            .as_ref()
            .map(|tier1| fuse(tier1, &visual, &self.config, now));

        // Recorded even without a quick judgment so the next quick cycle sees it.
        self.memory.record(&visual, now);

        match fused {
            Some(judgment) => {
                log_info!(
                    "[deep] {} ({:.0}%) - vision: {}",
                    judgment.state,
                    judgment.confidence * 100.0,
                    visual.reasoning
                );
                self.alerts.notify(&judgment).await;
            }
            None => log_info!("[deep] waiting for the first quick judgment"),
        }

        Ok(())
    }
}
