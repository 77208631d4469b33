use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Output shape of log records.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One OpenTelemetry-shaped JSON object per line.
    Json,
    /// Human-readable multi-line output.
    #[default]
    Console,
}

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct LoggingConfig {
    pub level: String,  // e.g. "info", "debug", "warn"
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Console,
            service_name: default_service_name(),
            service_version: default_service_version(),
        }
    }
}
