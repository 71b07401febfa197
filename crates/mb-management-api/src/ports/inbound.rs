//! # Inbound Ports (Driving Ports)
//!
//! The manager APIs the dispatch layer drives. Protocol and type arguments
//! are the raw path tokens; every implementation resolves them through
//! [`IdentityResolver`](crate::domain::identity::IdentityResolver) before
//! touching the kernel.

use crate::domain::error::ManagementResult;
use crate::domain::query::{ActiveFilter, DestinationFilter, MessageAnchor, NameFilter, Page, SubscriptionQuery};
use crate::domain::types::{
    BrokerInformation, ClusterInformation, Destination, DestinationRolePermission, Message,
    Protocol, StoreInformation, Subscription,
};
use async_trait::async_trait;

/// Destinations and their role permissions.
#[async_trait]
pub trait DestinationManagerApi: Send + Sync {
    /// Destinations whose name matches `name`, windowed by `page`.
    async fn list_destinations(
        &self,
        protocol: &str,
        destination_type: &str,
        name: NameFilter,
        page: Page,
    ) -> ManagementResult<Vec<Destination>>;

    /// ## Errors
    ///
    /// - `ResourceNotFound`: no destination with this exact name
    async fn get_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Destination>;

    /// Idempotent if the destination already exists.
    async fn create_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Destination>;

    /// Succeeds when the destination is already absent.
    async fn delete_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<()>;

    /// Delete every destination of the type. Returns the number deleted.
    async fn delete_destinations(&self, protocol: &str, destination_type: &str) -> ManagementResult<usize>;

    async fn list_permissions(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Vec<DestinationRolePermission>>;

    /// Upsert by role.
    async fn create_permission(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
        permission: DestinationRolePermission,
    ) -> ManagementResult<DestinationRolePermission>;

    /// ## Errors
    ///
    /// - `ResourceNotFound`: the role has no prior permission record
    async fn update_permission(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
        permission: DestinationRolePermission,
    ) -> ManagementResult<DestinationRolePermission>;
}

/// Subscription discovery and closing.
#[async_trait]
pub trait SubscriptionManagerApi: Send + Sync {
    async fn list_subscriptions(
        &self,
        protocol: &str,
        subscription_type: &str,
        query: SubscriptionQuery,
        page: Page,
    ) -> ManagementResult<Vec<Subscription>>;

    /// ## Errors
    ///
    /// - `ResourceNotFound`: unknown subscription ID
    async fn close_subscription(
        &self,
        protocol: &str,
        subscription_type: &str,
        subscription_id: &str,
        unsubscribe_only: bool,
    ) -> ManagementResult<()>;

    /// Close every matching subscription. Returns the number closed; zero
    /// matches is a success.
    async fn close_subscriptions(
        &self,
        protocol: &str,
        subscription_type: &str,
        destination: DestinationFilter,
        active: ActiveFilter,
        unsubscribe_only: bool,
    ) -> ManagementResult<usize>;
}

/// Message browsing and purging.
#[async_trait]
pub trait MessageManagerApi: Send + Sync {
    async fn list_messages(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
        anchor: MessageAnchorRequest,
        limit: i64,
        content: bool,
    ) -> ManagementResult<Vec<Message>>;

    async fn get_message(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
        message_id: u64,
        content: bool,
    ) -> ManagementResult<Message>;

    /// Purge every message. Returns the number purged.
    async fn purge_messages(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
    ) -> ManagementResult<u64>;
}

/// Read-only node information.
#[async_trait]
pub trait BrokerManagerApi: Send + Sync {
    async fn supported_protocols(&self) -> ManagementResult<Vec<Protocol>>;

    async fn broker_information(&self) -> ManagementResult<BrokerInformation>;

    async fn store_information(&self) -> ManagementResult<StoreInformation>;

    async fn cluster_information(&self) -> ManagementResult<ClusterInformation>;
}

/// Anchor as requested by the caller, before window validation.
///
/// Offsets stay signed so negative input yields an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAnchorRequest {
    MessageId(u64),
    Offset(i64),
}

impl MessageAnchorRequest {
    /// Window and kernel anchor for this request.
    pub fn resolve(self, limit: i64) -> (Page, MessageAnchor) {
        match self {
            Self::MessageId(id) => (Page::first(limit), MessageAnchor::MessageId(id)),
            Self::Offset(offset) => {
                let page = Page::new(offset, limit);
                (page, MessageAnchor::Offset(page.start()))
            }
        }
    }
}
