//! Message manager: browse, fetch and purge.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::identity::{DestinationIdentity, IdentityResolver};
use crate::domain::query::{filter_page, MessageAnchor, Page};
use crate::domain::types::Message;
use crate::ports::inbound::{MessageAnchorRequest, MessageManagerApi};
use crate::ports::outbound::BrokerKernel;
use crate::service::KernelHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct MessageManager {
    kernel: KernelHandle,
}

impl MessageManager {
    pub fn new(kernel: Arc<dyn BrokerKernel>) -> Self {
        Self {
            kernel: KernelHandle::new(kernel),
        }
    }
}

fn require_destination(
    kernel: &dyn BrokerKernel,
    identity: &DestinationIdentity,
    name: &str,
) -> ManagementResult<()> {
    match kernel.destination(identity, name)? {
        Some(_) => Ok(()),
        None => Err(ManagementError::not_found(format!(
            "{} {} '{}'",
            identity.protocol, identity.destination_type, name
        ))),
    }
}

fn shaped(message: Message, content: bool) -> Message {
    if content {
        message
    } else {
        message.without_content()
    }
}

#[async_trait]
impl MessageManagerApi for MessageManager {
    #[instrument(skip(self))]
    async fn list_messages(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
        anchor: MessageAnchorRequest,
        limit: i64,
        content: bool,
    ) -> ManagementResult<Vec<Message>> {
        let (protocol, destination_type, destination) =
            (protocol.to_owned(), destination_type.to_owned(), destination.to_owned());
        self.kernel
            .run("list_messages", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                require_destination(kernel, &identity, &destination)?;

                let (page, anchor) = anchor.resolve(limit);
                if page.is_empty() {
                    return Ok(Vec::new());
                }
                let browsed = kernel.browse_messages(&identity, &destination, anchor, page.len(), content)?;

                // Kernels may over-return; the page never exceeds `limit`.
                let from = match anchor {
                    MessageAnchor::MessageId(id) => id,
                    MessageAnchor::Offset(_) => 0,
                };
                Ok(filter_page(browsed, |m| m.message_id >= from, Page::first(limit))
                    .into_iter()
                    .map(|m| shaped(m, content))
                    .collect())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn get_message(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
        message_id: u64,
        content: bool,
    ) -> ManagementResult<Message> {
        let (protocol, destination_type, destination) =
            (protocol.to_owned(), destination_type.to_owned(), destination.to_owned());
        self.kernel
            .run("get_message", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                kernel
                    .message(&identity, &destination, message_id, content)?
                    .map(|m| shaped(m, content))
                    .ok_or_else(|| {
                        ManagementError::not_found(format!("message {} in '{}'", message_id, destination))
                    })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn purge_messages(
        &self,
        protocol: &str,
        destination_type: &str,
        destination: &str,
    ) -> ManagementResult<u64> {
        let (protocol, destination_type, destination) =
            (protocol.to_owned(), destination_type.to_owned(), destination.to_owned());
        self.kernel
            .run("purge_messages", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                let purged = kernel.purge_messages(&identity, &destination)?;
                info!(destination = %destination, purged, "messages purged");
                Ok(purged)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBrokerKernel;
    use crate::domain::types::{DestinationType, Protocol};

    fn setup(messages: usize) -> (MessageManager, Vec<u64>) {
        let kernel = Arc::new(InMemoryBrokerKernel::with_protocols(["amqp"]));
        let queue = DestinationIdentity::new(Protocol::new("amqp"), DestinationType::Queue);
        kernel.create_destination(&queue, "orders").unwrap();
        let ids = (0..messages)
            .map(|i| {
                kernel
                    .publish("amqp", DestinationType::Queue, "orders", format!("body-{}", i))
                    .unwrap()
            })
            .collect();
        (MessageManager::new(kernel), ids)
    }

    #[tokio::test]
    async fn test_browse_from_message_id() {
        let (manager, ids) = setup(5);
        let page = manager
            .list_messages("amqp", "queue", "orders", MessageAnchorRequest::MessageId(ids[3]), 100, false)
            .await
            .unwrap();
        let got: Vec<u64> = page.iter().map(|m| m.message_id).collect();
        assert_eq!(got, ids[3..].to_vec());
        assert!(page.iter().all(|m| m.content.is_none()));
    }

    #[tokio::test]
    async fn test_browse_from_offset_with_content() {
        let (manager, ids) = setup(5);
        let page = manager
            .list_messages("amqp", "queue", "orders", MessageAnchorRequest::Offset(2), 2, true)
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].message_id, ids[2]);
        assert_eq!(page[0].content.as_deref(), Some("body-2"));
    }

    #[tokio::test]
    async fn test_invalid_window_is_empty() {
        let (manager, _) = setup(3);
        for (anchor, limit) in [
            (MessageAnchorRequest::Offset(-1), 10),
            (MessageAnchorRequest::Offset(0), 0),
            (MessageAnchorRequest::MessageId(0), -5),
        ] {
            let page = manager
                .list_messages("amqp", "queue", "orders", anchor, limit, false)
                .await
                .unwrap();
            assert!(page.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unknown_destination_is_not_found() {
        let (manager, _) = setup(0);
        let err = manager
            .list_messages("amqp", "queue", "ghost", MessageAnchorRequest::MessageId(0), 10, false)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_get_message_and_missing() {
        let (manager, ids) = setup(2);
        let message = manager
            .get_message("amqp", "queue", "orders", ids[1], true)
            .await
            .unwrap();
        assert_eq!(message.content.as_deref(), Some("body-1"));

        let err = manager
            .get_message("amqp", "queue", "orders", 9_999, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_purge_reports_count() {
        let (manager, _) = setup(4);
        assert_eq!(manager.purge_messages("amqp", "queue", "orders").await.unwrap(), 4);
        let after = manager
            .list_messages("amqp", "queue", "orders", MessageAnchorRequest::MessageId(0), 10, false)
            .await
            .unwrap();
        assert!(after.is_empty());

        let err = manager.purge_messages("amqp", "queue", "ghost").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
