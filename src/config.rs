//! Runtime configuration
//!
//! Optional TOML file under the OS config directory; every field has the
//! historical default, so a missing file means a fully working daemon.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unix socket the status line is served on
    pub socket_path: PathBuf,
    /// Pause between update cycles, measured from cycle completion
    pub tick_interval_ms: u64,
    /// Power-supply tree probed once at startup for battery presence
    pub power_supply_dir: PathBuf,
    /// Battery entry under the power-supply tree
    pub battery_name: String,
    /// Kernel CPU counters pseudo-file
    pub proc_stat_path: PathBuf,
    /// External commands for temperature, memory summary and hostname
    pub sensors_cmd: String,
    pub free_cmd: String,
    pub hostname_cmd: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/tmux-status.sock"),
            tick_interval_ms: 1000,
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
            battery_name: "BAT1".to_string(),
            proc_stat_path: PathBuf::from("/proc/stat"),
            sensors_cmd: "sensors".to_string(),
            free_cmd: "free".to_string(),
            hostname_cmd: "hostname".to_string(),
        }
    }
}

impl Config {
    /// Load config from the OS-specific location, falling back to defaults
    /// when no file exists
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get OS-specific config file path
    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

        path.push("tmux-statusd");
        path.push("config.toml");
        Ok(path)
    }

    /// Directory holding the battery status/charge pseudo-files
    pub fn battery_dir(&self) -> PathBuf {
        self.power_supply_dir.join(&self.battery_name)
    }
}
