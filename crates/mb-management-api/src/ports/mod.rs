//! Port traits for the Management API.
//!
//! - `inbound` - manager APIs driven by the dispatch layer
//! - `outbound` - the Broker Kernel collaborator

pub mod inbound;
pub mod outbound;

pub use inbound::{
    BrokerManagerApi, DestinationManagerApi, MessageAnchorRequest, MessageManagerApi,
    SubscriptionManagerApi,
};
pub use outbound::{BrokerKernel, KernelError};
