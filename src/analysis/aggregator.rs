use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::memory::VisualSnapshot;
use crate::models::{Tier1Judgment, UnitVerdict};

/// Rationale of the quick judgment emitted while the reasoning backend is down.
pub const FALLBACK_RATIONALE: &str = "Reasoning service unavailable, assuming focused";

/// Merge unit verdicts into one quick judgment.
///
/// Pure in its inputs: majority vote over relevance, then a fresh visual verdict
/// either vetoes focus (capping confidence) or corroborates it (raising confidence).
pub fn aggregate(
    verdicts: &[UnitVerdict],
    memory: Option<&VisualSnapshot>,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> Tier1Judgment {
    let total = verdicts.len();
    let relevant = verdicts.iter().filter(|v| v.is_relevant).count();

    let mut confidence = if total > 0 {
        relevant as f64 / total as f64
    } else {
        0.5
    };
    // relevant >= ceil(total / 2)
    let mut is_focused = relevant * 2 >= total;

    if let Some(snapshot) = memory.filter(|s| s.is_fresh(now, config.fusion_window)) {
        if !snapshot.focused {
            is_focused = false;
            confidence = confidence.min(config.distrust_cap);
        } else if is_focused {
            confidence = confidence.max(config.corroboration_floor);
        }
    }

    Tier1Judgment {
        is_focused,
        confidence,
        rationale: build_rationale(verdicts, relevant),
        unit_summaries: verdicts.iter().map(UnitVerdict::summary).collect(),
        memory_snapshot: memory.map(VisualSnapshot::to_map).unwrap_or_default(),
        timestamp: now,
    }
}

/// Conservative judgment used when the reasoning backend reports unavailable.
/// Its fixed confidence keeps it distinguishable from a real low-confidence result.
pub fn fallback_judgment(config: &AnalysisConfig, now: DateTime<Utc>) -> Tier1Judgment {
    Tier1Judgment {
        is_focused: true,
        confidence: config.fallback_confidence,
        rationale: FALLBACK_RATIONALE.to_string(),
        unit_summaries: Vec::new(),
        memory_snapshot: BTreeMap::new(),
        timestamp: now,
    }
}

fn build_rationale(verdicts: &[UnitVerdict], relevant: usize) -> String {
    let mut rationale = format!("{}/{} chunks relevant. ", relevant, verdicts.len());

    // First relevant explanation wins; otherwise the first explanation at all.
    let explained = || verdicts.iter().filter(|v| !v.rationale.is_empty());
    let insight = explained()
        .find(|v| v.is_relevant)
        .or_else(|| explained().next());

    if let Some(verdict) = insight {
        rationale.push_str(&verdict.rationale);
    }

    rationale.trim().to_string()
}
