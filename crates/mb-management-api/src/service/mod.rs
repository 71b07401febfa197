//! Resource managers.
//!
//! Each manager implements one inbound port against the [`BrokerKernel`].
//! Kernel calls are synchronous, so every operation runs on the blocking
//! pool through [`KernelHandle::run`]; identity resolution happens inside the
//! same closure, ahead of any mutation.

pub mod broker;
pub mod destination;
pub mod message;
pub mod subscription;

pub use broker::BrokerManager;
pub use destination::DestinationManager;
pub use message::MessageManager;
pub use subscription::SubscriptionManager;

use crate::domain::error::{ManagementError, ManagementResult};
use crate::ports::outbound::BrokerKernel;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared reference to the kernel, injected at construction.
#[derive(Clone)]
pub struct KernelHandle {
    kernel: Arc<dyn BrokerKernel>,
}

impl KernelHandle {
    pub fn new(kernel: Arc<dyn BrokerKernel>) -> Self {
        Self { kernel }
    }

    /// Run `f` against the kernel on the blocking pool.
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> ManagementResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn BrokerKernel) -> ManagementResult<T> + Send + 'static,
    {
        let kernel = Arc::clone(&self.kernel);
        let result = tokio::task::spawn_blocking(move || f(kernel.as_ref()))
            .await
            .map_err(|e| {
                ManagementError::operation_failed(format!("{}: kernel task failed: {}", operation, e))
            })
            .and_then(|inner| inner);

        match &result {
            Err(e @ ManagementError::ManagerOperationFailed(_)) => {
                error!(operation, error = %e, "kernel operation failed");
            }
            Err(e) => debug!(operation, error = %e, "request rejected"),
            Ok(_) => {}
        }
        result
    }
}

/// Build all four managers over one kernel.
pub fn managers(
    kernel: Arc<dyn BrokerKernel>,
) -> (DestinationManager, SubscriptionManager, MessageManager, BrokerManager) {
    (
        DestinationManager::new(Arc::clone(&kernel)),
        SubscriptionManager::new(Arc::clone(&kernel)),
        MessageManager::new(Arc::clone(&kernel)),
        BrokerManager::new(kernel),
    )
}
