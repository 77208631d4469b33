//! Error types shared across the crate.

/// Failures reported by a session provider or its storage.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("request to auth service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth service returned unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("session rejected by auth service: {0}")]
    Unauthorized(String),

    #[error("could not parse auth service response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("session storage failed: {0}")]
    Storage(String),
}

/// Route table construction and resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route matches path '{0}'")]
    NoMatch(String),

    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route name '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    #[error("route '{0}' needs path params and cannot be resolved by name alone")]
    MissingParams(String),

    #[error("login route '{0}' must not require authentication")]
    LoginRouteRequiresAuth(String),
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

/// Top-level error for application startup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
