//! Adapters for the Management API.
//!
//! Infrastructure implementations: the in-memory broker kernel and the
//! error-to-HTTP conversions.

pub mod error_conversions;
pub mod memory;

pub use memory::InMemoryBrokerKernel;
