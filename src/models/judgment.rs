use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    Context,
    Content,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Context => "context",
            UnitKind::Content => "content",
        }
    }
}

/// One bounded slice of screen information submitted to the reasoning model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub kind: UnitKind,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitVerdict {
    pub unit: Unit,
    pub is_relevant: bool,
    pub rationale: String,
}

impl UnitVerdict {
    /// Diagnostic line, e.g. `context: ✓ editor shows the report draft`.
    pub fn summary(&self) -> String {
        let marker = if self.is_relevant { "✓" } else { "✗" };
        format!("{}: {} {}", self.unit.kind.as_str(), marker, self.rationale)
    }
}

/// Result of one quick cycle. Only the most recent one is retained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tier1Judgment {
    pub is_focused: bool,
    pub confidence: f64,
    pub rationale: String,
    pub unit_summaries: Vec<String>,
    pub memory_snapshot: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl Tier1Judgment {
    /// The quick cycle never emits `Away`.
    pub fn to_final(&self) -> FinalJudgment {
        FinalJudgment {
            state: if self.is_focused {
                FocusState::Focused
            } else {
                FocusState::Distracted
            },
            reason: self.rationale.clone(),
            confidence: self.confidence,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FocusState {
    Focused,
    Distracted,
    /// Reserved for a presence signal; nothing produces it yet.
    Away,
}

impl FocusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusState::Focused => "Focused",
            FocusState::Distracted => "Distracted",
            FocusState::Away => "Away",
        }
    }
}

impl fmt::Display for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only judgment shape handed to alerting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalJudgment {
    pub state: FocusState,
    pub reason: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}
