//! Screenshot capture controller.
//!
//! While a session is active, a timer fires at a fixed interval, picks a
//! capturable screen source, and hands `{timestamp, image}` to the session
//! lifecycle manager. Source selection prefers the source identified as the
//! full/primary screen, falls back to the first available one, and when
//! nothing is capturable the firing is skipped with a log line. Capture
//! trouble is never fatal to the session.
//!
//! How pixels are actually obtained is delegated to a `ScreenProvider`; the
//! platform implementation shells out to the OS screenshot tool.

use crate::libs::config::CaptureConfig;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// A capture event delivered to the session lifecycle manager.
#[derive(Debug, Clone)]
pub struct Capture {
    pub timestamp: NaiveDateTime,
    pub image: Vec<u8>,
}

/// A screen that can be captured.
#[derive(Debug, Clone)]
pub struct CaptureSource {
    pub id: String,
    pub name: String,
    pub is_primary: bool,
}

/// Provides capturable sources and raw image bytes for one of them.
pub trait ScreenProvider: Send + Sync + 'static {
    fn sources(&self) -> Result<Vec<CaptureSource>>;
    fn capture(&self, source: &CaptureSource) -> Result<Vec<u8>>;
}

/// Picks the source to capture: the full/primary screen when one is
/// identified as such, otherwise the first available.
pub fn select_source(sources: &[CaptureSource]) -> Option<&CaptureSource> {
    sources
        .iter()
        .find(|src| src.is_primary || src.name == "Entire Screen" || src.name == "Screen 1")
        .or_else(|| sources.first())
}

/// Owns the periodic capture timer.
///
/// `start` while already running is a no-op, not a reset; `stop` while not
/// running is likewise a no-op. The timer task is aborted on stop so no
/// timer survives a session teardown.
pub struct ScreenshotCapture {
    interval: Duration,
    provider: Arc<dyn ScreenProvider>,
    tx: mpsc::UnboundedSender<Capture>,
    task: Option<JoinHandle<()>>,
}

impl ScreenshotCapture {
    pub fn new(config: &CaptureConfig, provider: Arc<dyn ScreenProvider>, tx: mpsc::UnboundedSender<Capture>) -> Self {
        ScreenshotCapture {
            interval: Duration::from_secs(config.interval_minutes * 60),
            provider,
            tx,
            task: None,
        }
    }

    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }

        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let interval = self.interval;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval completes immediately; the
            // first capture belongs one full interval after activation.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let sources = match provider.sources() {
                    Ok(sources) => sources,
                    Err(e) => {
                        msg_warning!(Message::CaptureFailed(e.to_string()));
                        continue;
                    }
                };

                let Some(source) = select_source(&sources) else {
                    msg_warning!(Message::NoCaptureSourceFound);
                    continue;
                };

                match provider.capture(source) {
                    Ok(image) => {
                        msg_debug!(format!("captured {} bytes from '{}'", image.len(), source.name));
                        let _ = tx.send(Capture {
                            timestamp: Local::now().naive_local(),
                            image,
                        });
                    }
                    Err(e) => msg_warning!(Message::CaptureFailed(e.to_string())),
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for ScreenshotCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Captures the primary display by shelling out to the platform screenshot
/// tool. Platforms without a usable tool report no sources, which the
/// controller treats as skip-and-log.
pub struct PlatformScreenProvider {
    scratch: PathBuf,
}

impl PlatformScreenProvider {
    pub fn new(scratch: PathBuf) -> Self {
        PlatformScreenProvider { scratch }
    }

    #[cfg(target_os = "macos")]
    fn tool() -> Option<(&'static str, &'static [&'static str])> {
        Some(("screencapture", &["-x", "-t", "jpg"]))
    }

    #[cfg(target_os = "linux")]
    fn tool() -> Option<(&'static str, &'static [&'static str])> {
        // gnome-screenshot writes with -f; ImageMagick's import needs the
        // root window named explicitly.
        const CANDIDATES: [(&str, &[&str]); 2] = [("gnome-screenshot", &["-f"]), ("import", &["-window", "root"])];
        for (tool, args) in CANDIDATES {
            let found = Command::new("which").arg(tool).output().map(|out| out.status.success()).unwrap_or(false);
            if found {
                return Some((tool, args));
            }
        }
        None
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn tool() -> Option<(&'static str, &'static [&'static str])> {
        None
    }
}

impl ScreenProvider for PlatformScreenProvider {
    fn sources(&self) -> Result<Vec<CaptureSource>> {
        if Self::tool().is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![CaptureSource {
            id: "0".to_string(),
            name: "Entire Screen".to_string(),
            is_primary: true,
        }])
    }

    fn capture(&self, _source: &CaptureSource) -> Result<Vec<u8>> {
        let (tool, args) = Self::tool().ok_or_else(|| anyhow::anyhow!("no screenshot tool available"))?;

        let output = Command::new(tool).args(args).arg(&self.scratch).output()?;
        if !output.status.success() {
            anyhow::bail!("{} exited with {}", tool, output.status);
        }

        let image = fs::read(&self.scratch)?;
        let _ = fs::remove_file(&self.scratch);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, is_primary: bool) -> CaptureSource {
        CaptureSource {
            id: name.to_string(),
            name: name.to_string(),
            is_primary,
        }
    }

    #[test]
    fn prefers_primary_source() {
        let sources = vec![source("Window 3", false), source("Screen 1", false)];
        assert_eq!(select_source(&sources).unwrap().name, "Screen 1");

        let sources = vec![source("Window 3", false), source("Display", true)];
        assert_eq!(select_source(&sources).unwrap().name, "Display");
    }

    #[test]
    fn falls_back_to_first_source() {
        let sources = vec![source("Window 3", false), source("Window 7", false)];
        assert_eq!(select_source(&sources).unwrap().name, "Window 3");
    }

    #[test]
    fn no_sources_selects_nothing() {
        assert!(select_source(&[]).is_none());
    }
}
