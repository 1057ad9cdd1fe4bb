use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::time::Instant;

use crate::analysis::aggregator::{aggregate, fallback_judgment};
use crate::analysis::chunker::chunk_extraction;
use crate::analysis::config::AnalysisConfig;
use crate::analysis::memory::ContextMemory;
use crate::analysis::unit_analyzer::analyze_units;
use crate::inference::InferenceBackend;
use crate::models::{Goal, TextExtraction, Tier1Judgment};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Runs the text-only pass: chunk, fan out to the reasoning model, aggregate.
pub struct Tier1Analyzer {
    backend: Arc<dyn InferenceBackend>,
    memory: ContextMemory,
    goal: Arc<Goal>,
    config: AnalysisConfig,
}

impl Tier1Analyzer {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        memory: ContextMemory,
        goal: Arc<Goal>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            backend,
            memory,
            goal,
            config,
        }
    }

    pub async fn judge(&self, extraction: &TextExtraction, now: DateTime<Utc>) -> Tier1Judgment {
        if !self.backend.is_available().await {
            log_warn!("reasoning backend unavailable, using fallback judgment");
            return fallback_judgment(&self.config, now);
        }

        let started = Instant::now();
        let units = chunk_extraction(extraction, &self.config);
        let snapshot = self.memory.snapshot();
        log_info!(
            "analyzing {} units for {:?} (visual memory: {})",
            units.len(),
            extraction.active_app,
            if snapshot.is_some() { "present" } else { "none" }
        );

        let verdicts = analyze_units(
            self.backend.as_ref(),
            units,
            &self.goal,
            snapshot.as_ref(),
            &self.config,
            now,
        )
        .await;

        // Inference can take minutes; judge the visual override at aggregation time.
        let elapsed = ChronoDuration::from_std(started.elapsed()).unwrap_or_default();
        let aggregated_at = now + elapsed;
        let snapshot = self.memory.snapshot();
        aggregate(&verdicts, snapshot.as_ref(), &self.config, aggregated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::FALLBACK_RATIONALE;
    use crate::inference::mock::MockBackend;
    use crate::models::VisualJudgment;
    use std::time::Duration;

    fn distracted(at: DateTime<Utc>) -> VisualJudgment {
        VisualJudgment {
            is_focused: false,
            screen_context: "Distracted".into(),
            reasoning: "video".into(),
            timestamp: at,
        }
    }

    fn analyzer(backend: Arc<MockBackend>, memory: ContextMemory) -> Tier1Analyzer {
        Tier1Analyzer::new(
            backend,
            memory,
            Arc::new(Goal::new("write a report").unwrap()),
            AnalysisConfig::default(),
        )
    }

    fn extraction(text: &str) -> TextExtraction {
        TextExtraction {
            active_app: "Pages".into(),
            window_title: "Q3 Report".into(),
            urls: Vec::new(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unavailable_backend_short_circuits() {
        let backend = Arc::new(MockBackend::unavailable());
        let (_writer, memory) = ContextMemory::split();

        let judgment = analyzer(Arc::clone(&backend), memory)
            .judge(&extraction("Revenue grew."), Utc::now())
            .await;

        assert!(judgment.is_focused);
        assert_eq!(judgment.confidence, 0.3);
        assert_eq!(judgment.rationale, FALLBACK_RATIONALE);
        assert!(backend.prompts().is_empty());
    }

    #[tokio::test]
    async fn judges_every_unit() {
        let backend = Arc::new(MockBackend::replying("RELEVANT: yes\nREASONING: report open"));
        let (_writer, memory) = ContextMemory::split();

        let judgment = analyzer(Arc::clone(&backend), memory)
            .judge(&extraction("Revenue grew."), Utc::now())
            .await;

        assert_eq!(backend.prompts().len(), 2);
        assert!(judgment.is_focused);
        assert_eq!(judgment.confidence, 1.0);
        assert_eq!(judgment.rationale, "2/2 chunks relevant. report open");
    }

    #[tokio::test]
    async fn reads_visual_memory() {
        let backend = Arc::new(MockBackend::replying("RELEVANT: yes\nREASONING: report open"));
        let (writer, memory) = ContextMemory::split();
        let now = Utc::now();
        writer.record(
            &VisualJudgment {
                is_focused: false,
                screen_context: "Distracted".into(),
                reasoning: "video".into(),
                timestamp: now,
            },
            now,
        );

        let judgment = analyzer(Arc::clone(&backend), memory)
            .judge(&extraction(""), now)
            .await;

        assert!(!judgment.is_focused);
        assert!(judgment.confidence <= 0.4);
        assert!(backend.prompts()[0].contains("Recent visual check: Distracted"));
    }

    #[tokio::test(start_paused = true)]
    async fn visual_memory_that_expires_during_inference_is_ignored() {
        let backend = Arc::new(
            MockBackend::replying("RELEVANT: yes\nREASONING: report open")
                .with_delay(Duration::from_secs(30)),
        );
        let (writer, memory) = ContextMemory::split();
        let now = Utc::now();
        writer.record(&distracted(now), now - ChronoDuration::seconds(5));

        let judgment = analyzer(Arc::clone(&backend), memory)
            .judge(&extraction(""), now)
            .await;

        // Fresh when prompting, 35s old once the answers are in.
        assert!(backend.prompts()[0].contains("Recent visual check: Distracted"));
        assert!(judgment.is_focused);
        assert_eq!(judgment.confidence, 1.0);
    }
}
