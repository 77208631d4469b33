//! Library exports for letterbox, shared between the binary and tests.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod router;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;

pub use app::App;
pub use error::{ConfigError, Error, RouteError, SessionError};
