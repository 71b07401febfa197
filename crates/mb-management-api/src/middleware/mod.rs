//! Middleware stack for the Management API.
//!
//! Layer order: Request → CORS → ApiRequestSpan → TraceLayer → Handler

pub mod cors;
pub mod tracing;

pub use cors::create_cors_layer;
pub use tracing::TracingLayer;
