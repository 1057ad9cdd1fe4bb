use clap::Parser;
use std::path::PathBuf;

use crate::settings::MonitorConfig;

#[derive(Debug, Parser)]
#[command(
    name = "focusbuddy",
    version,
    about = "Watches your screen and nudges you back to your goal"
)]
pub struct Cli {
    /// What you want to focus on; asked interactively when omitted
    #[arg(short, long)]
    pub goal: Option<String>,

    /// Settings file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds between quick (text) checks
    #[arg(long)]
    pub quick_secs: Option<u64>,

    /// Seconds between deep (vision) checks
    #[arg(long)]
    pub deep_secs: Option<u64>,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut MonitorConfig) {
        if let Some(secs) = self.quick_secs {
            config.quick_interval_secs = secs;
        }
        if let Some(secs) = self.deep_secs {
            config.deep_interval_secs = secs;
        }
    }
}
