//! Message Broker Management API - REST surface over the broker kernel.
//!
//! Operators use this crate to enumerate and mutate broker state: destinations
//! (queues, topics, durable topics), role permissions, subscriptions, in-flight
//! messages and node/store/cluster information, across every protocol the
//! kernel hosts (AMQP, MQTT, ...).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MANAGEMENT API (mb-api)                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │   HTTP request                                                          │
//! │        │                                                                │
//! │  ┌─────┴──────────────────────────────────────────┐                     │
//! │  │  Dispatch Layer (http/)                        │ parse + defaults    │
//! │  └─────┬──────────────────────────────────────────┘                     │
//! │        │                                                                │
//! │  ┌─────┴──────────────┐   ┌──────────────────────┐                      │
//! │  │ Identity Resolver  │   │ Query Filter Engine  │  domain/             │
//! │  └─────┬──────────────┘   └──────────┬───────────┘                      │
//! │        │                             │                                  │
//! │  ┌─────┴─────────────────────────────┴──────────┐                       │
//! │  │ Destination / Subscription / Message / Broker│  service/             │
//! │  │ managers                                     │                       │
//! │  └─────┬────────────────────────────────────────┘                       │
//! │        │ ManagementError ──→ Error Normalizer ──→ 400 / 404 / 500       │
//! └────────┼────────────────────────────────────────────────────────────────┘
//!          │
//!     BrokerKernel (ports::outbound)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use mb_management_api::{InMemoryBrokerKernel, ManagementConfig, ManagementServer};
//!
//! let kernel = Arc::new(InMemoryBrokerKernel::with_protocols(["amqp", "mqtt"]));
//! let mut server = ManagementServer::new(ManagementConfig::default(), kernel)?;
//! server.start().await?;
//! // ...
//! server.shutdown().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod http;
pub mod middleware;
pub mod ports;
pub mod server;
pub mod service;

// Re-exports for public API
pub use adapters::InMemoryBrokerKernel;
pub use domain::config::ManagementConfig;
pub use domain::error::{ErrorResponse, ManagementError, ManagementResult};
pub use domain::identity::{DestinationIdentity, IdentityResolver, SubscriptionIdentity};
pub use domain::query::{ActiveFilter, NameFilter, Page};
pub use domain::types::*;
pub use http::{build_router, AppState};
pub use ports::inbound::{
    BrokerManagerApi, DestinationManagerApi, MessageManagerApi, SubscriptionManagerApi,
};
pub use ports::outbound::{BrokerKernel, KernelError};
pub use server::{ManagementServer, ServerError};
pub use service::{BrokerManager, DestinationManager, MessageManager, SubscriptionManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by `GET /info`
pub const SERVICE_NAME: &str = "mb-management-api";
