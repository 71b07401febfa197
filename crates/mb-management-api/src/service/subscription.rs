//! Subscription manager.

use crate::domain::error::ManagementResult;
use crate::domain::identity::IdentityResolver;
use crate::domain::query::{filter_page, ActiveFilter, DestinationFilter, Page, SubscriptionQuery};
use crate::domain::types::Subscription;
use crate::ports::inbound::SubscriptionManagerApi;
use crate::ports::outbound::{BrokerKernel, KernelError};
use crate::service::KernelHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct SubscriptionManager {
    kernel: KernelHandle,
}

impl SubscriptionManager {
    pub fn new(kernel: Arc<dyn BrokerKernel>) -> Self {
        Self {
            kernel: KernelHandle::new(kernel),
        }
    }
}

#[async_trait]
impl SubscriptionManagerApi for SubscriptionManager {
    #[instrument(skip(self))]
    async fn list_subscriptions(
        &self,
        protocol: &str,
        subscription_type: &str,
        query: SubscriptionQuery,
        page: Page,
    ) -> ManagementResult<Vec<Subscription>> {
        let (protocol, subscription_type) = (protocol.to_owned(), subscription_type.to_owned());
        self.kernel
            .run("list_subscriptions", move |kernel| {
                let identity = IdentityResolver::resolve_subscription(kernel, &protocol, &subscription_type)?;
                let subscriptions = kernel.subscriptions(&identity)?;
                Ok(filter_page(subscriptions, |s| query.matches(s), page))
            })
            .await
    }

    #[instrument(skip(self))]
    async fn close_subscription(
        &self,
        protocol: &str,
        subscription_type: &str,
        subscription_id: &str,
        unsubscribe_only: bool,
    ) -> ManagementResult<()> {
        let (protocol, subscription_type, subscription_id) = (
            protocol.to_owned(),
            subscription_type.to_owned(),
            subscription_id.to_owned(),
        );
        self.kernel
            .run("close_subscription", move |kernel| {
                let identity = IdentityResolver::resolve_subscription(kernel, &protocol, &subscription_type)?;
                kernel.close_subscription(&identity, &subscription_id, unsubscribe_only)?;
                info!(id = %subscription_id, unsubscribe_only, "subscription closed");
                Ok(())
            })
            .await
    }

    /// Closes matches one at a time and stops at the first kernel failure.
    /// A subscription that vanishes between listing and closing is skipped,
    /// as is an already inactive one when only unsubscribing.
    #[instrument(skip(self))]
    async fn close_subscriptions(
        &self,
        protocol: &str,
        subscription_type: &str,
        destination: DestinationFilter,
        active: ActiveFilter,
        unsubscribe_only: bool,
    ) -> ManagementResult<usize> {
        let (protocol, subscription_type) = (protocol.to_owned(), subscription_type.to_owned());
        self.kernel
            .run("close_subscriptions", move |kernel| {
                let identity = IdentityResolver::resolve_subscription(kernel, &protocol, &subscription_type)?;
                let matching: Vec<Subscription> = kernel
                    .subscriptions(&identity)?
                    .into_iter()
                    .filter(|s| destination.matches(&s.destination_name) && active.matches(s.active))
                    .filter(|s| !(unsubscribe_only && !s.active))
                    .collect();

                let mut closed = 0;
                for subscription in &matching {
                    match kernel.close_subscription(&identity, &subscription.id, unsubscribe_only) {
                        Ok(()) => closed += 1,
                        Err(KernelError::NotFound(_)) => {
                            debug!(id = %subscription.id, "subscription already gone");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                info!(matched = matching.len(), closed, unsubscribe_only, "subscriptions closed");
                Ok(closed)
            })
            .await
    }
}
