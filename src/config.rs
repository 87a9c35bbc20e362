use crate::error::{MonitorError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub jdk_tools: JdkToolsConfig,
    pub notifications: NotificationConfig,
    pub report: ReportConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub event_window: usize,
    #[serde(with = "humantime_serde")]
    pub poll_initial_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Upper bound on one polling tick, so a slow JVM cannot stall the
    /// shared scheduler.
    #[serde(with = "humantime_serde")]
    pub tick_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            event_window: 20,
            poll_initial_delay: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1),
            tick_timeout: Duration::from_millis(900),
        }
    }
}

/// Pool and collector names are not configurable: they come from the
/// resolved runtime profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JdkToolsConfig {
    #[serde(with = "humantime_serde")]
    pub command_timeout: Duration,
}

impl Default for JdkToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    #[serde(with = "humantime_serde")]
    pub watch_interval: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            watch_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given (it must exist), otherwise the default location
    /// if a file is there, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => expand_path(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let source = std::fs::read_to_string(&path).map_err(|e| {
            MonitorError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&source)
    }

    /// Applies command-line report settings and checks the result again.
    pub fn override_report(&mut self, interval: Option<Duration>, json: bool) -> Result<()> {
        if let Some(interval) = interval {
            self.report.interval = interval;
        }
        self.report.json |= json;
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.monitor.event_window == 0 {
            return Err(MonitorError::Config(
                "monitor.event_window must be at least 1".to_string(),
            ));
        }
        if self.monitor.poll_interval.is_zero() {
            return Err(MonitorError::Config(
                "monitor.poll_interval must be positive".to_string(),
            ));
        }
        if self.monitor.tick_timeout.is_zero() {
            return Err(MonitorError::Config(
                "monitor.tick_timeout must be positive".to_string(),
            ));
        }
        if self.report.interval.is_zero() {
            return Err(MonitorError::Config(
                "report.interval must be positive".to_string(),
            ));
        }
        if self.notifications.watch_interval.is_zero() {
            return Err(MonitorError::Config(
                "notifications.watch_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jvm-gc-health").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| MonitorError::Config(format!("Cannot expand {}: {}", raw, e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
