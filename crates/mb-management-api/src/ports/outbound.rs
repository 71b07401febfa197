//! # Outbound Ports (Driven Ports)
//!
//! The Broker Kernel collaborator consumed by the resource managers.
//!
//! The kernel owns storage, delivery and protocol handling. This crate never
//! persists state of its own; every read and mutation goes through
//! [`BrokerKernel`]. Calls are synchronous request/response: a call either
//! returns a result or fails.

use crate::domain::identity::{DestinationIdentity, SubscriptionIdentity};
use crate::domain::query::MessageAnchor;
use crate::domain::types::{
    BrokerInformation, ClusterInformation, Destination, DestinationRolePermission,
    DestinationType, Message, Protocol, StoreInformation, Subscription,
};

/// Failures reported by the kernel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("kernel unavailable: {0}")]
    Unavailable(String),
}

/// Broker kernel interface.
///
/// Implementations must be safe to call from many requests concurrently;
/// cross-request consistency is the kernel's responsibility.
pub trait BrokerKernel: Send + Sync {
    // ═══════════════════════════════════════════════════════════════════════
    // PROTOCOL REGISTRY
    // ═══════════════════════════════════════════════════════════════════════

    /// Protocols currently hosted. Queried live on every request.
    fn supported_protocols(&self) -> Result<Vec<Protocol>, KernelError>;

    /// Subscription types declared for a protocol.
    fn subscription_types(&self, protocol: &Protocol) -> Result<Vec<DestinationType>, KernelError>;

    // ═══════════════════════════════════════════════════════════════════════
    // DESTINATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// All destinations for the identity, in a stable order.
    fn destinations(&self, identity: &DestinationIdentity) -> Result<Vec<Destination>, KernelError>;

    /// A single destination by exact name.
    fn destination(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Option<Destination>, KernelError>;

    /// Create a destination; returns the existing one if already present.
    fn create_destination(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Destination, KernelError>;

    /// Delete a destination.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no destination with this name
    fn delete_destination(&self, identity: &DestinationIdentity, name: &str) -> Result<(), KernelError>;

    /// Delete every destination of the identity. Returns how many were removed.
    fn delete_destinations(&self, identity: &DestinationIdentity) -> Result<usize, KernelError>;

    /// Permissions of a destination, keyed by role.
    fn permissions(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Vec<DestinationRolePermission>, KernelError>;

    /// Persist a permission, replacing any entry for the same role.
    fn store_permission(
        &self,
        identity: &DestinationIdentity,
        name: &str,
        permission: DestinationRolePermission,
    ) -> Result<DestinationRolePermission, KernelError>;

    // ═══════════════════════════════════════════════════════════════════════
    // SUBSCRIPTIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// All subscriptions for the identity, in a stable order.
    fn subscriptions(&self, identity: &SubscriptionIdentity) -> Result<Vec<Subscription>, KernelError>;

    /// Close one subscription.
    ///
    /// With `unsubscribe_only` the live channel is detached and a durable
    /// registration survives as inactive; otherwise the record is removed.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: unknown subscription ID
    fn close_subscription(
        &self,
        identity: &SubscriptionIdentity,
        subscription_id: &str,
        unsubscribe_only: bool,
    ) -> Result<(), KernelError>;

    // ═══════════════════════════════════════════════════════════════════════
    // MESSAGES
    // ═══════════════════════════════════════════════════════════════════════

    /// Browse at most `limit` messages from the anchor, ascending by ID.
    fn browse_messages(
        &self,
        identity: &DestinationIdentity,
        destination: &str,
        anchor: MessageAnchor,
        limit: usize,
        with_content: bool,
    ) -> Result<Vec<Message>, KernelError>;

    /// A single message by ID.
    fn message(
        &self,
        identity: &DestinationIdentity,
        destination: &str,
        message_id: u64,
        with_content: bool,
    ) -> Result<Option<Message>, KernelError>;

    /// Remove every message of a destination. Returns how many were purged.
    fn purge_messages(&self, identity: &DestinationIdentity, destination: &str) -> Result<u64, KernelError>;

    // ═══════════════════════════════════════════════════════════════════════
    // NODE SNAPSHOTS
    // ═══════════════════════════════════════════════════════════════════════

    fn broker_information(&self) -> Result<BrokerInformation, KernelError>;

    fn store_information(&self) -> Result<StoreInformation, KernelError>;

    fn cluster_information(&self) -> Result<ClusterInformation, KernelError>;
}
