use crate::domain::identity::{DestinationIdentity, SubscriptionIdentity};
use crate::domain::query::MessageAnchor;
use crate::domain::types::{
    BrokerInformation, ClusterInformation, ClusterMember, Destination, DestinationRolePermission,
    DestinationType, Message, Protocol, StoreInformation, Subscription,
};
use crate::ports::outbound::{BrokerKernel, KernelError};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-process broker kernel.
///
/// Backs the binary and the test suites. State lives behind a single
/// `RwLock`; destinations are ordered by (protocol, storage type, name) and
/// subscriptions by registration order, which gives list endpoints a stable
/// order.
pub struct InMemoryBrokerKernel {
    node_id: String,
    state: RwLock<KernelState>,
}

#[derive(Default)]
struct KernelState {
    protocols: Vec<ProtocolEntry>,
    destinations: BTreeMap<DestinationKey, DestinationEntry>,
    // Kept apart from destinations: permissions outlive a deleted destination.
    permissions: BTreeMap<DestinationKey, BTreeMap<String, DestinationRolePermission>>,
    subscriptions: Vec<Subscription>,
    next_message_id: u64,
}

struct ProtocolEntry {
    protocol: Protocol,
    subscription_types: Vec<DestinationType>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DestinationKey {
    protocol: Protocol,
    destination_type: DestinationType,
    name: String,
}

impl DestinationKey {
    fn new(identity: &DestinationIdentity, name: &str) -> Self {
        Self {
            protocol: identity.protocol.clone(),
            destination_type: identity.destination_type.storage_type(),
            name: name.to_string(),
        }
    }
}

#[derive(Default)]
struct DestinationEntry {
    owner: Option<String>,
    messages: BTreeMap<u64, StoredMessage>,
}

struct StoredMessage {
    content_type: Option<String>,
    redelivered: bool,
    properties: BTreeMap<String, String>,
    content: String,
}

impl KernelState {
    fn is_bound(subscription: &Subscription, key: &DestinationKey) -> bool {
        subscription.protocol == key.protocol
            && subscription.destination_name == key.name
            && subscription.subscription_type.storage_type() == key.destination_type
    }

    fn describe(&self, key: &DestinationKey, entry: &DestinationEntry, tag: DestinationType) -> Destination {
        let bound: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| Self::is_bound(s, key))
            .collect();
        Destination {
            name: key.name.clone(),
            destination_type: tag,
            protocol: key.protocol.clone(),
            owner: entry.owner.clone(),
            durable: key.destination_type == DestinationType::Queue || bound.iter().any(|s| s.durable),
            message_count: entry.messages.len() as u64,
            subscription_count: bound.len() as u64,
        }
    }

    fn entry(&self, key: &DestinationKey) -> Result<&DestinationEntry, KernelError> {
        self.destinations.get(key).ok_or_else(|| Self::missing(key))
    }

    fn missing(key: &DestinationKey) -> KernelError {
        KernelError::NotFound(format!(
            "{} {} '{}'",
            key.protocol, key.destination_type, key.name
        ))
    }

    fn pending_for(&self, subscription: &Subscription) -> u64 {
        let key = DestinationKey {
            protocol: subscription.protocol.clone(),
            destination_type: subscription.subscription_type.storage_type(),
            name: subscription.destination_name.clone(),
        };
        self.destinations
            .get(&key)
            .map(|e| e.messages.len() as u64)
            .unwrap_or(0)
    }
}

impl StoredMessage {
    fn to_message(&self, id: u64, key: &DestinationKey, with_content: bool) -> Message {
        Message {
            message_id: id,
            destination_name: key.name.clone(),
            protocol: key.protocol.clone(),
            content_type: self.content_type.clone(),
            redelivered: self.redelivered,
            properties: self.properties.clone(),
            content: with_content.then(|| self.content.clone()),
        }
    }
}

impl InMemoryBrokerKernel {
    /// Kernel with no protocols registered.
    pub fn new() -> Self {
        Self {
            node_id: uuid::Uuid::new_v4().to_string(),
            state: RwLock::new(KernelState {
                next_message_id: 1,
                ..KernelState::default()
            }),
        }
    }

    /// Kernel hosting the given protocols with every subscription type.
    pub fn with_protocols<I, S>(protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kernel = Self::new();
        for protocol in protocols {
            kernel.register_protocol(protocol.as_ref(), &DestinationType::ALL);
        }
        kernel
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Load (or reload) a protocol module.
    pub fn register_protocol(&self, token: &str, subscription_types: &[DestinationType]) {
        let protocol = Protocol::new(token);
        let mut state = self.state.write();
        state.protocols.retain(|p| p.protocol != protocol);
        state.protocols.push(ProtocolEntry {
            protocol,
            subscription_types: subscription_types.to_vec(),
        });
    }

    /// Unload a protocol module. Returns whether it was registered.
    pub fn unregister_protocol(&self, token: &str) -> bool {
        let protocol = Protocol::new(token);
        let mut state = self.state.write();
        let before = state.protocols.len();
        state.protocols.retain(|p| p.protocol != protocol);
        state.protocols.len() != before
    }

    /// Register a live subscription on an existing destination.
    pub fn subscribe(
        &self,
        protocol: &str,
        subscription_type: DestinationType,
        destination: &str,
        subscriber: &str,
    ) -> Result<String, KernelError> {
        let identity = DestinationIdentity::new(Protocol::new(protocol), subscription_type);
        let key = DestinationKey::new(&identity, destination);
        let mut state = self.state.write();
        state.entry(&key)?;

        let id = uuid::Uuid::new_v4().to_string();
        state.subscriptions.push(Subscription {
            id: id.clone(),
            name: subscriber.to_string(),
            destination_name: destination.to_string(),
            protocol: identity.protocol,
            subscription_type,
            durable: subscription_type != DestinationType::Topic,
            active: true,
            connected_node_id: Some(self.node_id.clone()),
            pending_message_count: 0,
        });
        Ok(id)
    }

    /// Enqueue a text message. Returns the assigned message ID.
    pub fn publish(
        &self,
        protocol: &str,
        destination_type: DestinationType,
        destination: &str,
        content: impl Into<String>,
    ) -> Result<u64, KernelError> {
        let identity = DestinationIdentity::new(Protocol::new(protocol), destination_type);
        let key = DestinationKey::new(&identity, destination);
        let mut state = self.state.write();
        let id = state.next_message_id;
        let entry = state
            .destinations
            .get_mut(&key)
            .ok_or_else(|| KernelState::missing(&key))?;
        entry.messages.insert(
            id,
            StoredMessage {
                content_type: Some("text/plain".into()),
                redelivered: false,
                properties: BTreeMap::new(),
                content: content.into(),
            },
        );
        state.next_message_id += 1;
        Ok(id)
    }
}

impl Default for InMemoryBrokerKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerKernel for InMemoryBrokerKernel {
    fn supported_protocols(&self) -> Result<Vec<Protocol>, KernelError> {
        Ok(self
            .state
            .read()
            .protocols
            .iter()
            .map(|p| p.protocol.clone())
            .collect())
    }

    fn subscription_types(&self, protocol: &Protocol) -> Result<Vec<DestinationType>, KernelError> {
        self.state
            .read()
            .protocols
            .iter()
            .find(|p| &p.protocol == protocol)
            .map(|p| p.subscription_types.clone())
            .ok_or_else(|| KernelError::NotFound(format!("protocol '{}'", protocol)))
    }

    fn destinations(&self, identity: &DestinationIdentity) -> Result<Vec<Destination>, KernelError> {
        let storage = identity.storage();
        let state = self.state.read();
        Ok(state
            .destinations
            .iter()
            .filter(|(k, _)| k.protocol == storage.protocol && k.destination_type == storage.destination_type)
            .map(|(k, e)| state.describe(k, e, identity.destination_type))
            .collect())
    }

    fn destination(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Option<Destination>, KernelError> {
        let key = DestinationKey::new(identity, name);
        let state = self.state.read();
        Ok(state
            .destinations
            .get(&key)
            .map(|e| state.describe(&key, e, identity.destination_type)))
    }

    fn create_destination(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Destination, KernelError> {
        if name.trim().is_empty() {
            return Err(KernelError::InvalidArgument("destination name is empty".into()));
        }
        let key = DestinationKey::new(identity, name);
        let mut state = self.state.write();
        state.destinations.entry(key.clone()).or_default();
        let entry = state.entry(&key)?;
        Ok(state.describe(&key, entry, identity.destination_type))
    }

    fn delete_destination(&self, identity: &DestinationIdentity, name: &str) -> Result<(), KernelError> {
        let key = DestinationKey::new(identity, name);
        let mut state = self.state.write();
        state
            .destinations
            .remove(&key)
            .ok_or_else(|| KernelState::missing(&key))?;
        state.subscriptions.retain(|s| !KernelState::is_bound(s, &key));
        Ok(())
    }

    fn delete_destinations(&self, identity: &DestinationIdentity) -> Result<usize, KernelError> {
        let storage = identity.storage();
        let mut state = self.state.write();
        let doomed: Vec<DestinationKey> = state
            .destinations
            .keys()
            .filter(|k| k.protocol == storage.protocol && k.destination_type == storage.destination_type)
            .cloned()
            .collect();
        for key in &doomed {
            state.destinations.remove(key);
            state.subscriptions.retain(|s| !KernelState::is_bound(s, key));
        }
        Ok(doomed.len())
    }

    fn permissions(
        &self,
        identity: &DestinationIdentity,
        name: &str,
    ) -> Result<Vec<DestinationRolePermission>, KernelError> {
        let key = DestinationKey::new(identity, name);
        let state = self.state.read();
        state.entry(&key)?;
        Ok(state
            .permissions
            .get(&key)
            .map(|roles| roles.values().cloned().collect())
            .unwrap_or_default())
    }

    fn store_permission(
        &self,
        identity: &DestinationIdentity,
        name: &str,
        permission: DestinationRolePermission,
    ) -> Result<DestinationRolePermission, KernelError> {
        let key = DestinationKey::new(identity, name);
        let mut state = self.state.write();
        state.entry(&key)?;
        state
            .permissions
            .entry(key)
            .or_default()
            .insert(permission.role.clone(), permission.clone());
        Ok(permission)
    }

    fn subscriptions(&self, identity: &SubscriptionIdentity) -> Result<Vec<Subscription>, KernelError> {
        let state = self.state.read();
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.protocol == identity.protocol && s.subscription_type == identity.subscription_type)
            .map(|s| Subscription {
                pending_message_count: state.pending_for(s),
                ..s.clone()
            })
            .collect())
    }

    fn close_subscription(
        &self,
        identity: &SubscriptionIdentity,
        subscription_id: &str,
        unsubscribe_only: bool,
    ) -> Result<(), KernelError> {
        let mut state = self.state.write();
        let position = state
            .subscriptions
            .iter()
            .position(|s| {
                s.id == subscription_id
                    && s.protocol == identity.protocol
                    && s.subscription_type == identity.subscription_type
            })
            .ok_or_else(|| KernelError::NotFound(format!("subscription '{}'", subscription_id)))?;

        let subscription = &mut state.subscriptions[position];
        if unsubscribe_only && subscription.durable {
            subscription.active = false;
            subscription.connected_node_id = None;
        } else {
            state.subscriptions.remove(position);
        }
        Ok(())
    }

    fn browse_messages(
        &self,
        identity: &DestinationIdentity,
        destination: &str,
        anchor: MessageAnchor,
        limit: usize,
        with_content: bool,
    ) -> Result<Vec<Message>, KernelError> {
        let key = DestinationKey::new(identity, destination);
        let state = self.state.read();
        let entry = state.entry(&key)?;
        let messages = match anchor {
            MessageAnchor::MessageId(from) => entry
                .messages
                .range(from..)
                .take(limit)
                .map(|(id, m)| m.to_message(*id, &key, with_content))
                .collect(),
            MessageAnchor::Offset(offset) => entry
                .messages
                .iter()
                .skip(offset)
                .take(limit)
                .map(|(id, m)| m.to_message(*id, &key, with_content))
                .collect(),
        };
        Ok(messages)
    }

    fn message(
        &self,
        identity: &DestinationIdentity,
        destination: &str,
        message_id: u64,
        with_content: bool,
    ) -> Result<Option<Message>, KernelError> {
        let key = DestinationKey::new(identity, destination);
        let state = self.state.read();
        let entry = state.entry(&key)?;
        Ok(entry
            .messages
            .get(&message_id)
            .map(|m| m.to_message(message_id, &key, with_content)))
    }

    fn purge_messages(&self, identity: &DestinationIdentity, destination: &str) -> Result<u64, KernelError> {
        let key = DestinationKey::new(identity, destination);
        let mut state = self.state.write();
        let entry = state
            .destinations
            .get_mut(&key)
            .ok_or_else(|| KernelState::missing(&key))?;
        let purged = entry.messages.len() as u64;
        entry.messages.clear();
        Ok(purged)
    }

    fn broker_information(&self) -> Result<BrokerInformation, KernelError> {
        let state = self.state.read();
        let mut configurations = BTreeMap::new();
        configurations.insert("kernel".to_string(), "in-memory".to_string());
        configurations.insert("destinations".to_string(), state.destinations.len().to_string());
        Ok(BrokerInformation {
            node_id: self.node_id.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocols: state.protocols.iter().map(|p| p.protocol.clone()).collect(),
            configurations,
        })
    }

    fn store_information(&self) -> Result<StoreInformation, KernelError> {
        let state = self.state.read();
        let messages: usize = state.destinations.values().map(|e| e.messages.len()).sum();
        let mut properties = BTreeMap::new();
        properties.insert("destinations".to_string(), state.destinations.len().to_string());
        properties.insert("messages".to_string(), messages.to_string());
        Ok(StoreInformation {
            store_type: "in-memory".into(),
            healthy: true,
            properties,
        })
    }

    fn cluster_information(&self) -> Result<ClusterInformation, KernelError> {
        Ok(ClusterInformation {
            clustering_enabled: false,
            node_id: self.node_id.clone(),
            coordinator_node_id: Some(self.node_id.clone()),
            members: vec![ClusterMember {
                node_id: self.node_id.clone(),
                address: "local".into(),
                coordinator: true,
            }],
        })
    }
}
