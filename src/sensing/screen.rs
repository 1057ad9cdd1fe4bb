use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use uuid::Uuid;

const SCREENCAPTURE_BIN: &str = "/usr/sbin/screencapture";
const OSASCRIPT_BIN: &str = "/usr/bin/osascript";

/// Source of full-screen PNG bytes.
#[async_trait]
pub trait ScreenGrabber: Send + Sync {
    async fn grab(&self) -> Result<Vec<u8>>;
}

/// Grabs the main display through the macOS `screencapture` tool.
pub struct ScreencaptureGrabber;

#[async_trait]
impl ScreenGrabber for ScreencaptureGrabber {
    async fn grab(&self) -> Result<Vec<u8>> {
        let capture = TempCapture::new();
        capture_screen_to(capture.path()).await?;
        tokio::fs::read(capture.path())
            .await
            .with_context(|| format!("failed to read screenshot {}", capture.path().display()))
    }
}

/// A uuid-named PNG path in the temp dir, removed on drop.
pub struct TempCapture {
    path: PathBuf,
}

impl TempCapture {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("focusbuddy_{}.png", Uuid::new_v4()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempCapture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// `-x` keeps the shutter sound off.
pub async fn capture_screen_to(path: &Path) -> Result<()> {
    let path_arg = path.to_string_lossy().to_string();
    run_command(SCREENCAPTURE_BIN, &["-x".to_string(), path_arg]).await?;

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        bail!("screencapture produced no file at {}", path.display());
    }
    Ok(())
}

pub async fn run_applescript(script: &str) -> Result<String> {
    run_command(OSASCRIPT_BIN, &["-e".to_string(), script.to_string()]).await
}

/// Run a helper to completion and return its trimmed stdout.
pub async fn run_command(program: &str, args: &[String]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to spawn {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{program} exited with {}: {}", output.status, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
