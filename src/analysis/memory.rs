use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::models::VisualJudgment;

/// The last visual verdict, copied out of the memory cell as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSnapshot {
    pub context: String,
    pub reasoning: String,
    pub focused: bool,
    pub timestamp: DateTime<Utc>,
}

impl VisualSnapshot {
    /// Zero when the snapshot claims to be from the future.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("last_visual_context".to_string(), self.context.clone()),
            ("last_visual_reasoning".to_string(), self.reasoning.clone()),
            ("last_visual_focused".to_string(), self.focused.to_string()),
            ("last_visual_timestamp".to_string(), self.timestamp.to_rfc3339()),
        ])
    }
}

type Cell = Arc<RwLock<Option<VisualSnapshot>>>;

/// Read side of the cross-cycle memory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ContextMemory {
    cell: Cell,
}

/// Write side of the cross-cycle memory; owned by the deep cycle alone.
#[derive(Debug)]
pub struct ContextMemoryWriter {
    cell: Cell,
}

impl ContextMemory {
    /// Create an empty memory, returning its only writer and a reader.
    pub fn split() -> (ContextMemoryWriter, ContextMemory) {
        let cell: Cell = Arc::new(RwLock::new(None));
        (
            ContextMemoryWriter {
                cell: Arc::clone(&cell),
            },
            ContextMemory { cell },
        )
    }

    /// `None` until the first deep cycle has recorded something.
    pub fn snapshot(&self) -> Option<VisualSnapshot> {
        // The cell is only ever replaced whole, so a poisoned lock still holds a consistent value.
        let guard = self.cell.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    }
}

impl ContextMemoryWriter {
    /// Overwrite all four fields at once.
    pub fn record(&self, visual: &VisualJudgment, at: DateTime<Utc>) {
        let snapshot = VisualSnapshot {
            context: visual.screen_context.clone(),
            reasoning: visual.reasoning.clone(),
            focused: visual.is_focused,
            timestamp: at,
        };

        let mut guard = self.cell.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(snapshot);
    }
}
