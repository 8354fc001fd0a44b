use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use ferret_engine::EngineSettings;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

const DEFAULT_HOME: &str = "gopher://gopher.quux.org";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address opened at startup.
    pub home: String,
    pub downloads_dir: PathBuf,
    pub connect_timeout_secs: u64,
    /// Period of the consumer tick that drains engine messages.
    pub tick_ms: u64,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME.to_string(),
            downloads_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Downloads"),
            connect_timeout_secs: 10,
            tick_ms: 50,
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..EngineSettings::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ferret").join("ferret.ron"))
}

/// Reads the configuration; a missing file yields the defaults.
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()))
        }
    };
    ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
