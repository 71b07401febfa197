//! Domain types for the Management API.
//!
//! This module contains the resource types, configuration, error taxonomy,
//! identity resolution and the shared query filter engine.
//! Note: kernel access goes through `crate::ports::outbound`.

pub mod config;
pub mod error;
pub mod identity;
pub mod query;
pub mod types;

// Re-exports for convenience
pub use config::{ManagementConfig, PaginationConfig};
pub use error::{ErrorResponse, ManagementError, ManagementResult};
pub use identity::{DestinationIdentity, IdentityResolver, SubscriptionIdentity};
pub use query::{ActiveFilter, DestinationFilter, MessageAnchor, NameFilter, Page, SubscriptionQuery};
pub use types::*;
