use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Where a periodic cycle is between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Running,
    Sleeping(Duration),
    Backoff(Duration),
}

/// Fixed period after a good iteration, fixed backoff after a failed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePolicy {
    pub period: Duration,
    pub backoff: Duration,
}

impl CyclePolicy {
    pub fn new(period: Duration, backoff: Duration) -> Self {
        Self { period, backoff }
    }

    pub fn after<T>(&self, outcome: &Result<T>) -> CyclePhase {
        match outcome {
            Ok(_) => CyclePhase::Sleeping(self.period),
            Err(_) => CyclePhase::Backoff(self.backoff),
        }
    }
}

/// One repeating unit of work driven by `run_cycle`.
#[async_trait]
pub trait Cycle: Send {
    fn name(&self) -> &'static str;

    async fn iterate(&mut self) -> Result<()>;
}

/// Drive `cycle` until `cancel` fires. Errors and panics inside an iteration are
/// logged and followed by the backoff sleep; nothing else ends the loop.
pub async fn run_cycle<C: Cycle>(
    mut cycle: C,
    policy: CyclePolicy,
    initial_delay: Duration,
    cancel: CancellationToken,
) {
    let name = cycle.name();
    let mut phase = if initial_delay.is_zero() {
        CyclePhase::Running
    } else {
        CyclePhase::Sleeping(initial_delay)
    };

    loop {
        phase = match phase {
            CyclePhase::Running => {
                let iteration = AssertUnwindSafe(cycle.iterate()).catch_unwind();
                let outcome = tokio::select! {
                    result = iteration => {
                        result.unwrap_or_else(|_| Err(anyhow!("iteration panicked")))
                    }
                    _ = cancel.cancelled() => break,
                };

                let next = policy.after(&outcome);
                if let Err(err) = &outcome {
                    log_error!(
                        "[{name}] iteration failed: {err:#}; retrying in {:?}",
                        policy.backoff
                    );
                }
                next
            }
            CyclePhase::Sleeping(delay) | CyclePhase::Backoff(delay) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => CyclePhase::Running,
                    _ = cancel.cancelled() => break,
                }
            }
        };
    }

    log_info!("[{name}] cycle shutting down");
}
