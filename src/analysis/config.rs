use std::time::Duration;

/// Tunable thresholds for chunking, aggregation and fusion.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Upper bound on characters per unit
    pub max_unit_chars: usize,

    /// Content units beyond this are dropped to bound per-cycle cost
    pub max_content_units: usize,

    /// URLs folded into the context unit
    pub max_context_urls: usize,

    /// Visual memory younger than this overrides or boosts the text verdict
    pub fusion_window: Duration,

    /// Visual memory younger than this is quoted in unit prompts
    pub prompt_window: Duration,

    /// Confidence ceiling when recent vision says distracted
    pub distrust_cap: f64,
    /// Confidence floor when recent vision corroborates focus
    pub corroboration_floor: f64,

    /// Tier-1 confidence above which it may carry a focused visual verdict alone
    pub tier1_authority: f64,
    pub visual_focused_confidence: f64,
    pub visual_distracted_confidence: f64,

    /// Fixed confidence of the "backend down" quick judgment
    pub fallback_confidence: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_unit_chars: 600,
            max_content_units: 2,
            max_context_urls: 3,
            fusion_window: Duration::from_secs(20),
            prompt_window: Duration::from_secs(30),
            distrust_cap: 0.4,
            corroboration_floor: 0.7,
            tier1_authority: 0.7,
            visual_focused_confidence: 0.85,
            visual_distracted_confidence: 0.15,
            fallback_confidence: 0.3,
        }
    }
}
