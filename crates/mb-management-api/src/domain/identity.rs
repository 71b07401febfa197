//! Resource identity resolution.
//!
//! Validates a (protocol, type) pair against what the kernel currently
//! supports. Resolution runs before any kernel mutation so a malformed
//! identity never leaves partial side effects. Supported protocols are read
//! from the kernel on every call; modules may load and unload at runtime.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::types::{DestinationType, Protocol};
use crate::ports::outbound::BrokerKernel;

/// Validated (protocol, destination type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationIdentity {
    pub protocol: Protocol,
    pub destination_type: DestinationType,
}

impl DestinationIdentity {
    pub fn new(protocol: Protocol, destination_type: DestinationType) -> Self {
        Self {
            protocol,
            destination_type,
        }
    }

    /// Identity under which the kernel stores the entity
    /// (`durable_topic` becomes `topic`).
    pub fn storage(&self) -> Self {
        Self::new(self.protocol.clone(), self.destination_type.storage_type())
    }
}

/// Validated (protocol, subscription type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionIdentity {
    pub protocol: Protocol,
    pub subscription_type: DestinationType,
}

/// Stateless resolver; every call consults the kernel.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Confirm a protocol token is currently hosted by the kernel.
    pub fn resolve_protocol(kernel: &dyn BrokerKernel, token: &str) -> ManagementResult<Protocol> {
        let protocol = Protocol::new(token);
        let supported = kernel.supported_protocols()?;
        if supported.contains(&protocol) {
            Ok(protocol)
        } else {
            Err(ManagementError::invalid_identity(format!(
                "unsupported protocol '{}'",
                token
            )))
        }
    }

    pub fn resolve_destination(
        kernel: &dyn BrokerKernel,
        protocol: &str,
        destination_type: &str,
    ) -> ManagementResult<DestinationIdentity> {
        let destination_type = Self::parse_type(destination_type, "destination")?;
        let protocol = Self::resolve_protocol(kernel, protocol)?;
        Ok(DestinationIdentity::new(protocol, destination_type))
    }

    /// Subscription types are declared per protocol by the kernel.
    pub fn resolve_subscription(
        kernel: &dyn BrokerKernel,
        protocol: &str,
        subscription_type: &str,
    ) -> ManagementResult<SubscriptionIdentity> {
        let subscription_type = Self::parse_type(subscription_type, "subscription")?;
        let protocol = Self::resolve_protocol(kernel, protocol)?;
        let declared = kernel.subscription_types(&protocol)?;
        if !declared.contains(&subscription_type) {
            return Err(ManagementError::invalid_identity(format!(
                "protocol '{}' does not support subscription type '{}'",
                protocol, subscription_type
            )));
        }
        Ok(SubscriptionIdentity {
            protocol,
            subscription_type,
        })
    }

    fn parse_type(token: &str, what: &str) -> ManagementResult<DestinationType> {
        DestinationType::from_token(token).ok_or_else(|| {
            ManagementError::invalid_identity(format!("unknown {} type '{}'", what, token))
        })
    }
}
