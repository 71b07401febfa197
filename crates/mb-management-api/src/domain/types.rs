//! Resource representations exchanged with operators.
//!
//! Field names are serialized in camelCase to stay wire-compatible with the
//! broker console and existing tooling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════
// IDENTITY TOKENS
// ═══════════════════════════════════════════════════════════════════════════

/// Protocol token hosted by the kernel (`amqp`, `mqtt`, ...).
///
/// Always stored lowercase so comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Protocol(String);

impl Protocol {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of destination types.
///
/// `DurableTopic` is a display/filtering tag: for storage identity it aliases
/// `Topic` (see [`DestinationType::storage_type`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    Queue,
    Topic,
    DurableTopic,
}

impl DestinationType {
    /// Every destination type, in declaration order.
    pub const ALL: [DestinationType; 3] = [Self::Queue, Self::Topic, Self::DurableTopic];

    /// Parse a case-insensitive token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "queue" => Some(Self::Queue),
            "topic" => Some(Self::Topic),
            "durable_topic" => Some(Self::DurableTopic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Topic => "topic",
            Self::DurableTopic => "durable_topic",
        }
    }

    /// Type under which the kernel stores the entity.
    pub fn storage_type(self) -> Self {
        match self {
            Self::DurableTopic => Self::Topic,
            other => other,
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════════

/// A queue or topic-like addressable unit within a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    pub destination_type: DestinationType,
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub durable: bool,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub subscription_count: u64,
}

/// Role permission on a destination. The role is unique per destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRolePermission {
    pub role: String,
    #[serde(default)]
    pub consume: bool,
    #[serde(default)]
    pub publish: bool,
}

/// Registered interest in a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Subscriber identifier; the display name searched by the name filter.
    pub name: String,
    pub destination_name: String,
    pub protocol: Protocol,
    pub subscription_type: DestinationType,
    pub durable: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_node_id: Option<String>,
    #[serde(default)]
    pub pending_message_count: u64,
}

/// In-flight message held by a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: u64,
    pub destination_name: String,
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub redelivered: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Payload; only present when explicitly requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    /// Drop the payload.
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// NODE SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════

/// Local broker configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerInformation {
    pub node_id: String,
    pub version: String,
    pub protocols: Vec<Protocol>,
    #[serde(default)]
    pub configurations: BTreeMap<String, String>,
}

/// Message store health and configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInformation {
    pub store_type: String,
    pub healthy: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Cluster membership snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInformation {
    pub clustering_enabled: bool,
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_node_id: Option<String>,
    #[serde(default)]
    pub members: Vec<ClusterMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMember {
    pub node_id: String,
    pub address: String,
    pub coordinator: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_type_tokens_are_case_insensitive() {
        assert_eq!(DestinationType::from_token("QUEUE"), Some(DestinationType::Queue));
        assert_eq!(
            DestinationType::from_token("Durable_Topic"),
            Some(DestinationType::DurableTopic)
        );
        assert_eq!(DestinationType::from_token("exchange"), None);
    }

    #[test]
    fn test_durable_topic_aliases_topic_for_storage() {
        assert_eq!(DestinationType::DurableTopic.storage_type(), DestinationType::Topic);
        assert_eq!(DestinationType::Queue.storage_type(), DestinationType::Queue);
    }

    #[test]
    fn test_protocol_normalized() {
        assert_eq!(Protocol::new(" AMQP ").as_str(), "amqp");
    }

    #[test]
    fn test_destination_serializes_camel_case() {
        let destination = Destination {
            name: "orders".into(),
            destination_type: DestinationType::DurableTopic,
            protocol: Protocol::new("amqp"),
            owner: None,
            durable: true,
            message_count: 3,
            subscription_count: 1,
        };
        let json = serde_json::to_value(&destination).unwrap();
        assert_eq!(json["destinationType"], "durable_topic");
        assert_eq!(json["protocol"], "amqp");
        assert_eq!(json["messageCount"], 3);
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_message_content_omitted_when_absent() {
        let message = Message {
            message_id: 7,
            destination_name: "orders".into(),
            protocol: Protocol::new("amqp"),
            content_type: None,
            redelivered: false,
            properties: BTreeMap::new(),
            content: Some("payload".into()),
        };
        let json = serde_json::to_value(message.without_content()).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["messageId"], 7);
    }
}
