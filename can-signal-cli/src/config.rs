//! Application configuration loading and parsing
//!
//! The monitor itself is configured with a small TOML file (bus channel,
//! output directory, dashboard layout), separate from the JSON signal
//! configuration consumed by the decoder library. Every section is
//! optional; the defaults reproduce the stock vehicle monitor.

use crate::state::SignalState;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from monitor.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// SocketCAN interface to listen on
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
        }
    }
}

fn default_channel() -> String {
    "can0".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV output, created if missing
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Milliseconds between status-line redraws
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Items on the status line, left to right
    #[serde(default = "default_items")]
    pub items: Vec<DashboardItem>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            items: default_items(),
        }
    }
}

fn default_refresh_ms() -> u64 {
    200
}

/// One labelled readout on the dashboard line
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardItem {
    pub label: String,
    /// Candidate signal names; the first with a known value is shown
    pub signals: Vec<String>,
    /// Decimal places
    #[serde(default)]
    pub precision: usize,
    /// Unit suffix appended to the value
    #[serde(default)]
    pub unit: String,
    /// Render "-" instead of 0 while no value has been seen
    #[serde(default)]
    pub dash_when_missing: bool,
}

impl DashboardItem {
    /// Format this item against the current state snapshot
    pub fn format(&self, state: &SignalState) -> String {
        match state.first_of(&self.signals) {
            Some(value) => format!(
                "{}: {:.prec$}{}",
                self.label,
                value,
                self.unit,
                prec = self.precision
            ),
            None if self.dash_when_missing => format!("{}: -", self.label),
            None => format!(
                "{}: {:.prec$}{}",
                self.label,
                0.0,
                self.unit,
                prec = self.precision
            ),
        }
    }
}

/// The stock readout set of the vehicle monitor
fn default_items() -> Vec<DashboardItem> {
    fn item(
        label: &str,
        signals: &[&str],
        precision: usize,
        unit: &str,
        dash_when_missing: bool,
    ) -> DashboardItem {
        DashboardItem {
            label: label.to_string(),
            signals: signals.iter().map(|s| s.to_string()).collect(),
            precision,
            unit: unit.to_string(),
            dash_when_missing,
        }
    }

    vec![
        item("Speed", &["speed_kph"], 1, " km/h", false),
        item("Steer", &["steering_angle_deg"], 1, "\u{b0}", false),
        item("Brake", &["brake_position_pct"], 0, "%", false),
        item(
            "Throttle",
            &["accelerator_pct", "throttle_valve_pct"],
            0,
            "%",
            false,
        ),
        item("Gear", &["gear"], 0, "", true),
        item("Yaw", &["yaw_rate_deg_s"], 2, "\u{b0}/s", false),
        item("LatG", &["lat_accel_g"], 2, "", false),
        item("LongG", &["long_accel_g"], 2, "", false),
    ]
}

/// Load the application configuration from a TOML file
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
