pub mod extraction;
pub mod goal;
pub mod judgment;

pub use extraction::{TextExtraction, VisualJudgment};
pub use goal::Goal;
pub use judgment::{FinalJudgment, FocusState, Tier1Judgment, Unit, UnitKind, UnitVerdict};
