//! Configuration management for the punchclock application.
//!
//! Settings live in a JSON file under the platform data directory and are
//! grouped into optional modules: idle monitoring, screenshot capture, and
//! the reporting server. Missing modules fall back to defaults at the point
//! of use, so a fresh install works without any setup beyond `init`.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Idle monitoring thresholds.
///
/// `idle_threshold` gates both the polled idle detection and the
/// suspend/resume path; `poll_interval` controls how often the
/// seconds-since-last-input value is sampled.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Inactivity threshold in seconds before the user counts as idle.
    pub idle_threshold: u64,
    /// Interval in milliseconds between idle-seconds samples.
    pub poll_interval: u64,
}

impl Default for MonitorConfig {
    /// 60 seconds of inactivity, sampled every 5 seconds.
    fn default() -> Self {
        MonitorConfig {
            idle_threshold: 60,
            poll_interval: 5000,
        }
    }
}

/// Screenshot capture cadence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    /// Minutes between screenshot captures while a session is active.
    pub interval_minutes: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { interval_minutes: 10 }
    }
}

/// Remote API connection parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the session store / auth API.
    pub api_url: String,
}

/// Root configuration object. Unconfigured modules are omitted from the
/// JSON output entirely.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl Config {
    /// Loads the configuration file, or returns defaults if none exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive setup wizard and returns the updated config.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = ["Monitor", "Capture", "Server"];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules)
            .interact()?;

        for &selection in &selected {
            match modules[selection] {
                "Monitor" => {
                    let default = config.monitor.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleMonitor);
                    config.monitor = Some(MonitorConfig {
                        idle_threshold: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleThreshold.to_string())
                            .default(default.idle_threshold)
                            .interact_text()?,
                        poll_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(default.poll_interval)
                            .interact_text()?,
                    });
                }
                "Capture" => {
                    let default = config.capture.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleCapture);
                    config.capture = Some(CaptureConfig {
                        interval_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCaptureInterval.to_string())
                            .default(default.interval_minutes)
                            .interact_text()?,
                    });
                }
                "Server" => {
                    let default = config.server.clone().unwrap_or(ServerConfig { api_url: String::new() });
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        api_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiUrl.to_string())
                            .default(default.api_url)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
