use chrono::{DateTime, Utc};

use crate::analysis::config::AnalysisConfig;
use crate::models::{FinalJudgment, FocusState, Tier1Judgment, VisualJudgment};

/// Combine the latest quick judgment with a fresh visual one.
///
/// A distracted visual verdict always wins. A focused one needs the text pass to
/// agree, or to be confident enough on its own.
pub fn fuse(
    tier1: &Tier1Judgment,
    visual: &VisualJudgment,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> FinalJudgment {
    #[allow(clippy::nonminimal_bool)]
    let is_focused = (tier1.is_focused && visual.is_focused)
        || (tier1.confidence > config.tier1_authority && visual.is_focused);

    let visual_confidence = if visual.is_focused {
        config.visual_focused_confidence
    } else {
        config.visual_distracted_confidence
    };

    FinalJudgment {
        state: if is_focused {
            FocusState::Focused
        } else {
            FocusState::Distracted
        },
        reason: format!("Text: {}\nVision: {}", tier1.rationale, visual.reasoning),
        confidence: (tier1.confidence + visual_confidence) / 2.0,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tier1(is_focused: bool, confidence: f64) -> Tier1Judgment {
        Tier1Judgment {
            is_focused,
            confidence,
            rationale: "1/1 chunks relevant. editor".into(),
            unit_summaries: Vec::new(),
            memory_snapshot: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    fn visual(is_focused: bool) -> VisualJudgment {
        VisualJudgment {
            is_focused,
            screen_context: String::new(),
            reasoning: "screen shows a video".into(),
            timestamp: Utc::now(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fused(text: Tier1Judgment, vision: VisualJudgment) -> FinalJudgment {
        fuse(&text, &vision, &AnalysisConfig::default(), Utc::now())
    }

    #[test]
    fn visual_distracted_wins_over_confident_text() {
        let judgment = fused(tier1(true, 0.9), visual(false));
        assert_eq!(judgment.state, FocusState::Distracted);
        assert!(close(judgment.confidence, 0.525));
    }

    #[test]
    fn agreement_is_focused() {
        let judgment = fused(tier1(true, 0.5), visual(true));
        assert_eq!(judgment.state, FocusState::Focused);
        assert!(close(judgment.confidence, 0.675));
    }

    #[test]
    fn confident_text_carries_focused_vision_even_when_text_said_distracted() {
        let judgment = fused(tier1(false, 0.75), visual(true));
        assert_eq!(judgment.state, FocusState::Focused);
    }

    #[test]
    fn unconfident_disagreeing_text_stays_distracted() {
        let judgment = fused(tier1(false, 0.7), visual(true));
        assert_eq!(judgment.state, FocusState::Distracted);
    }

    #[test]
    fn reason_labels_both_sources() {
        let judgment = fused(tier1(true, 0.5), visual(false));
        assert_eq!(
            judgment.reason,
            "Text: 1/1 chunks relevant. editor\nVision: screen shows a video"
        );
    }

    #[test]
    fn never_emits_away() {
        for (t, c, v) in [(true, 0.9, true), (false, 0.1, false), (true, 0.2, false)] {
            let judgment = fuse(&tier1(t, c), &visual(v), &AnalysisConfig::default(), Utc::now());
            assert_ne!(judgment.state, FocusState::Away);
        }
    }
}
