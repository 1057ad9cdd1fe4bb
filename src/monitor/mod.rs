pub mod controller;
pub mod cycle;
pub mod deep;
pub mod quick;

pub use controller::{Collaborators, MonitorController};
pub use cycle::{run_cycle, Cycle, CyclePhase, CyclePolicy};
pub use deep::DeepCycle;
pub use quick::QuickCycle;
