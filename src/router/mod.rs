//! Client-side routing with an authentication guard.
//!
//! A [`RouteTable`] maps paths to views. [`Router::navigate`] resolves a path,
//! runs every [`NavigationGuard`] before anything is rendered, and either
//! renders the destination or the view the guard redirected to.

pub mod guard;
pub mod navigation;
pub mod pattern;
pub mod table;
pub mod views;

pub use guard::{AuthGuard, GuardDecision, NavigationGuard};
pub use navigation::{NavigationOutcome, NavigationState, Router};
pub use pattern::PathPattern;
pub use table::{default_routes, ResolvedRoute, RouteConfig, RouteRecord, RouteTable};
pub use views::{RenderedView, ViewId};
