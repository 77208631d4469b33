use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::error::ConfigError;
use crate::router::{default_routes, RouteConfig, RouteTable};
use crate::session::ProviderConfig;

/// Prefix for environment overrides, e.g. `LETTERBOX_BIND_ADDRESS` or
/// `LETTERBOX_ROUTER__LOGIN_ROUTE`.
pub const ENV_PREFIX: &str = "LETTERBOX_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub session_provider: ProviderConfig,
    #[serde(default)]
    pub router: RouterConfig,
}

fn default_login_route() -> String {
    "Login".to_string()
}

fn default_session_check_timeout_ms() -> u64 {
    5_000
}

fn default_history_limit() -> usize {
    50
}

/// Route table and navigation guard settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RouterConfig {
    /// Name of the route protected navigations are redirected to.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default = "default_session_check_timeout_ms")]
    pub session_check_timeout_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            login_route: default_login_route(),
            session_check_timeout_ms: default_session_check_timeout_ms(),
            history_limit: default_history_limit(),
            routes: default_routes(),
        }
    }
}

impl ConfigV1 {
    /// Checks that cannot be expressed in the schema.
    pub fn validate(&self) -> Result<(), ConfigError> {
        RouteTable::new(&self.router.routes, &self.router.login_route)
            .map_err(|e| ConfigError::Invalid(format!("router: {}", e)))?;
        if self.router.session_check_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "router.session_check_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn extract(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = match figment.extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };
    config.validate()?;
    Ok(config)
}

/// Load config from a YAML file, with `LETTERBOX_*` environment overrides.
pub fn load_config(path: &Path) -> Result<ConfigV1, ConfigError> {
    extract(
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__")),
    )
}

/// Parse config from a YAML string (no environment overrides).
pub fn parse_config(yaml: &str) -> Result<ConfigV1, ConfigError> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

/// The JSON schema for the configuration, pretty printed.
pub fn config_schema() -> String {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    println!("{}", config_schema());
}
