//! Shared handler state.

use crate::domain::config::{ManagementConfig, PaginationConfig};
use crate::ports::inbound::{
    BrokerManagerApi, DestinationManagerApi, MessageManagerApi, SubscriptionManagerApi,
};
use crate::ports::outbound::BrokerKernel;
use crate::service::managers;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

/// Everything except RFC 3986 unreserved characters is escaped in a segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Clone)]
pub struct AppState {
    pub destinations: Arc<dyn DestinationManagerApi>,
    pub subscriptions: Arc<dyn SubscriptionManagerApi>,
    pub messages: Arc<dyn MessageManagerApi>,
    pub broker: Arc<dyn BrokerManagerApi>,
    /// Route prefix, used to build `Location` headers.
    pub api_prefix: String,
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Wire the four managers over `kernel`.
    pub fn new(kernel: Arc<dyn BrokerKernel>, config: &ManagementConfig) -> Self {
        let (destinations, subscriptions, messages, broker) = managers(kernel);
        Self {
            destinations: Arc::new(destinations),
            subscriptions: Arc::new(subscriptions),
            messages: Arc::new(messages),
            broker: Arc::new(broker),
            api_prefix: config.api.prefix.clone(),
            pagination: config.pagination,
        }
    }

    /// Absolute path of a destination under the configured prefix. Segments
    /// are percent-encoded, so the result is always a valid header value.
    pub fn destination_uri(&self, protocol: &str, destination_type: &str, name: &str) -> String {
        let base = self.api_prefix.trim_end_matches('/');
        format!(
            "{}/{}/destination-type/{}/name/{}",
            base,
            utf8_percent_encode(protocol, SEGMENT),
            utf8_percent_encode(destination_type, SEGMENT),
            utf8_percent_encode(name, SEGMENT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBrokerKernel;
    use axum::http::HeaderValue;

    fn state(prefix: &str) -> AppState {
        let mut config = ManagementConfig::default();
        config.api.prefix = prefix.into();
        AppState::new(Arc::new(InMemoryBrokerKernel::new()), &config)
    }

    #[test]
    fn test_destination_uri_escapes_segments() {
        let state = state("/mb/api");
        assert_eq!(
            state.destination_uri("amqp", "durable_topic", "a b?c/d"),
            "/mb/api/amqp/destination-type/durable_topic/name/a%20b%3Fc%2Fd"
        );
        assert_eq!(
            state.destination_uri("amqp", "queue", "orders.eu-1~x"),
            "/mb/api/amqp/destination-type/queue/name/orders.eu-1~x"
        );
    }

    #[test]
    fn test_destination_uri_is_always_a_header_value() {
        let uri = state("/").destination_uri("amqp", "queue", "bad\nname\u{7f}é");
        assert!(uri.starts_with("/amqp/destination-type/queue/name/"));
        assert!(HeaderValue::from_str(&uri).is_ok());
        assert!(uri.contains("%0A") && uri.contains("%7F") && uri.contains("%C3%A9"));
    }
}
