//! Application configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QrmarkError, QrmarkResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for per-request upload staging.
    pub staging_dir: PathBuf,

    /// Compositing parameters.
    pub compositor: CompositeOptions,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// What to do when the margin pushes the overlay past the host's top or left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementPolicy {
    /// Clamp negative offsets to zero, giving up part of the margin.
    #[default]
    Clamp,
    /// Fail with an out-of-bounds placement error.
    Reject,
}

impl PlacementPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for PlacementPolicy {
    type Err = QrmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(QrmarkError::config(format!(
                "Unknown placement policy: {other}. Use: clamp, reject"
            ))),
        }
    }
}

/// Caller-selectable parameters of the QR compositing transform.
///
/// Threshold, opacity, margin and scale are fixed by the transform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeOptions {
    /// Handling of offsets that would fall outside the host.
    pub placement: PlacementPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "qrmark=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            compositor: CompositeOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location and return where it went.
    pub fn save(&self) -> QrmarkResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("qrmark").join("config.json")
}

/// Default staging directory.
fn default_staging_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("qrmark").join("staging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_placement_clamps() {
        assert_eq!(
            CompositeOptions::default().placement,
            PlacementPolicy::Clamp
        );
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "compositor": { "placement": "reject" } }"#).unwrap();
        assert_eq!(config.compositor.placement, PlacementPolicy::Reject);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn transform_constants_are_not_configurable() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "compositor": { "scale_divisor": 2, "margin": 0, "threshold": 10, "alpha": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.compositor, CompositeOptions::default());
    }

    #[test]
    fn placement_policy_parses_case_insensitively() {
        assert_eq!(
            "Reject".parse::<PlacementPolicy>().unwrap(),
            PlacementPolicy::Reject
        );
        assert!("center".parse::<PlacementPolicy>().is_err());
    }
}
