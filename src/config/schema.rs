/// Configuration schema and defaults for launchdash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[data]`, `[server]`, `[slider]`, and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level launchdash configuration.
///
/// Maps directly to the `~/.launchdash/config.toml` and `.launchdash.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchdashConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
    pub slider: SliderConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Where the launch dataset lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the launch CSV, relative to the working directory.
    pub path: String,
    /// URL `launchdash fetch` downloads the dataset from.
    pub source_url: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "spacex_launch_dash.csv".to_string(),
            source_url: "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv".to_string(),
        }
    }
}

impl DataConfig {
    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Web dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Print one line per handled request.
    pub access_log: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            open_browser: true,
            access_log: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// [slider]
// ---------------------------------------------------------------------------

/// Extent and granularity of the payload range slider (kg).
///
/// The initial selection is always the dataset's observed min/max payload;
/// these values only bound the control itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10000.0,
            step: 1000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Interaction log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Record every chart callback to the interaction log.
    pub enabled: bool,
    /// Override for the log file location. Defaults to
    /// `~/.launchdash/interactions.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl LaunchdashConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `launchdash config init`.
    pub fn default_toml() -> String {
        r#"# launchdash Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (LAUNCHDASH_*)
#   2. Project config (.launchdash.toml in current directory)
#   3. User global config (~/.launchdash/config.toml)
#   4. Built-in defaults

[data]
path = "spacex_launch_dash.csv"       # Launch records CSV, loaded once at startup
source_url = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv"

[server]
host = "127.0.0.1"
port = 8050
open_browser = true
access_log = true

[slider]
min = 0.0                             # Payload slider extent (kg)
max = 10000.0
step = 1000.0

[logging]
enabled = true                        # Append chart callbacks to ~/.launchdash/interactions.jsonl
# path = "/tmp/interactions.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let toml_str = LaunchdashConfig::default_toml();
        let config: LaunchdashConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, LaunchdashConfig::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: LaunchdashConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.path, "spacex_launch_dash.csv");
        assert_eq!(config.slider.max, 10000.0);
    }

    #[test]
    fn server_addr_joins_host_and_port() {
        assert_eq!(ServerConfig::default().addr(), "127.0.0.1:8050");
    }
}
