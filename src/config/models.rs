#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

use std::sync::OnceLock;
use std::time::Duration;

use eyre::Result;
use serde::{Deserialize, Serialize};

use super::defaults::*;

static CONFIG: OnceLock<Configuration> = OnceLock::new();

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "notice_duration_secs")]
    pub notice_duration_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "base_url")]
    pub base_url: String,

    #[serde(default = "request_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "response_timeout_secs")]
    pub response_timeout_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UploadConfig {
    #[serde(default = "allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Configuration {
    /// The process-wide settings, once `init` has run.
    pub fn instance() -> Option<&'static Configuration> {
        CONFIG.get()
    }

    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))?;
        Ok(())
    }
}

impl GeneralConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_duration_secs)
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            notice_duration_secs: notice_duration_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: log_level(),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: log_file_path(),
            append: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: base_url(),
            timeout_secs: request_timeout_secs(),
            response_timeout_secs: response_timeout_secs(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: allowed_extensions(),
        }
    }
}
