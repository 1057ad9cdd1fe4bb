use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::cycle::{run_cycle, CyclePolicy};
use super::deep::DeepCycle;
use super::quick::QuickCycle;
use crate::alerts::AlertSink;
use crate::analysis::{AnalysisConfig, ContextMemory, Tier1Analyzer};
use crate::inference::InferenceBackend;
use crate::models::Goal;
use crate::sensing::{TextSource, VisualSource};
use crate::settings::MonitorConfig;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// External capabilities the two cycles depend on.
pub struct Collaborators {
    pub text_source: Arc<dyn TextSource>,
    pub visual_source: Arc<dyn VisualSource>,
    pub text_backend: Arc<dyn InferenceBackend>,
    pub alerts: Arc<dyn AlertSink>,
}

/// Owns the quick and deep cycle tasks.
pub struct MonitorController {
    handles: Vec<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }

    pub fn start(
        &mut self,
        goal: Arc<Goal>,
        collaborators: Collaborators,
        config: &MonitorConfig,
        analysis: AnalysisConfig,
    ) -> Result<()> {
        if self.is_running() {
            bail!("monitoring already active");
        }

        let Collaborators {
            text_source,
            visual_source,
            text_backend,
            alerts,
        } = collaborators;

        let (memory_writer, memory) = ContextMemory::split();
        let (latest_tx, latest_rx) = watch::channel(None);

        let quick = QuickCycle::new(
            text_source,
            Tier1Analyzer::new(text_backend, memory, goal, analysis.clone()),
            latest_tx,
            Arc::clone(&alerts),
        );
        let deep = DeepCycle::new(visual_source, memory_writer, latest_rx, alerts, analysis);

        let cancel_token = CancellationToken::new();

        log_info!(
            "starting quick cycle every {:?} and deep cycle every {:?} (first in {:?})",
            config.quick_interval(),
            config.deep_interval(),
            config.deep_initial_delay()
        );

        self.handles.push(tokio::spawn(run_cycle(
            quick,
            CyclePolicy::new(config.quick_interval(), config.quick_backoff()),
            Duration::ZERO,
            cancel_token.clone(),
        )));
        self.handles.push(tokio::spawn(run_cycle(
            deep,
            CyclePolicy::new(config.deep_interval(), config.deep_backoff()),
            config.deep_initial_delay(),
            cancel_token.clone(),
        )));

        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        for handle in self.handles.drain(..) {
            handle.await.context("monitor cycle task failed to join")?;
        }
        Ok(())
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
