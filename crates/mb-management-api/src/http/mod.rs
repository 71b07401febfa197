//! Dispatch layer.
//!
//! Maps HTTP routes to manager operations. Handlers parse path, query and
//! body, apply defaults, call exactly one manager operation and let
//! [`ManagementError`](crate::domain::error::ManagementError) render the
//! failure envelope.

pub mod handlers;
pub mod params;
pub mod routes;
pub mod state;

pub use routes::{build_router, ENDPOINTS};
pub use state::AppState;
