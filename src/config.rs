use crate::classifier::{RuleTable, RuleTableError, SeverityRule, default_rules};
use crate::export::{ExportFormat, ExportOptions, is_valid_timestamp_format};
use crate::monitor::MonitorOptions;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid rule table: {0}")]
    Rules(#[from] RuleTableError),
    #[error("monitor.poll_interval_ms must be greater than zero")]
    ZeroPollInterval,
    #[error("export.timestamp_format '{0}' is not a valid chrono format for a file name")]
    InvalidTimestampFormat(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Severity assigned when no rule matches.
    pub default_severity: Severity,
    /// Rules in priority order; the first matching rule wins.
    pub rules: Vec<SeverityRule>,
    pub monitor: MonitorSettings,
    pub export: ExportSettings,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            default_severity: Severity::Info,
            rules: default_rules(),
            monitor: MonitorSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub poll_interval_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub timestamp_format: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            file_prefix: "matches".to_string(),
            timestamp_format: "%Y-%m-%d_%H-%M-%S".to_string(),
        }
    }
}

impl TriageConfig {
    /// Validated, immutable rule table built from this configuration
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        Ok(RuleTable::new(self.rules.clone(), self.default_severity)?)
    }

    pub fn monitor_options(&self) -> Result<MonitorOptions, ConfigError> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(MonitorOptions::default()
            .poll_interval(Duration::from_millis(self.monitor.poll_interval_ms)))
    }

    pub fn check_export_settings(&self) -> Result<(), ConfigError> {
        let format = &self.export.timestamp_format;
        if !is_valid_timestamp_format(format) {
            return Err(ConfigError::InvalidTimestampFormat(format.clone()));
        }
        Ok(())
    }

    pub fn export_options(&self, format: ExportFormat) -> ExportOptions {
        ExportOptions::new(format, self.export.output_dir.clone())
            .file_prefix(self.export.file_prefix.clone())
            .timestamp_format(self.export.timestamp_format.clone())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TriageConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<TriageConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<TriageConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;

    // Reject bad tables at load time rather than on first use
    config.rule_table()?;
    config.monitor_options()?;
    config.check_export_settings()?;

    tracing::debug!(
        file = %path.display(),
        rules = config.rules.len(),
        "Loaded configuration"
    );

    Ok(config)
}

pub fn default_config() -> &'static TriageConfig {
    static DEFAULT_CONFIG: LazyLock<TriageConfig> = LazyLock::new(TriageConfig::default);
    &DEFAULT_CONFIG
}
