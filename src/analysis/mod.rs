pub mod aggregator;
pub mod chunker;
pub mod config;
pub mod fusion;
pub mod memory;
pub mod response;
pub mod tier1;
pub mod unit_analyzer;

pub use aggregator::{aggregate, fallback_judgment};
pub use chunker::chunk_extraction;
pub use config::AnalysisConfig;
pub use fusion::fuse;
pub use memory::{ContextMemory, ContextMemoryWriter, VisualSnapshot};
pub use response::{parse_flagged_response, FlaggedAnswer, ResponseError};
pub use tier1::Tier1Analyzer;
pub use unit_analyzer::analyze_units;
