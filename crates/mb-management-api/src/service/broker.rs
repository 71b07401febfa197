//! Broker manager: read-only node, store and cluster information.
//!
//! Every failure here is an internal error; there is no caller input to
//! reject.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::types::{BrokerInformation, ClusterInformation, Protocol, StoreInformation};
use crate::ports::inbound::BrokerManagerApi;
use crate::ports::outbound::BrokerKernel;
use crate::service::KernelHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

pub struct BrokerManager {
    kernel: KernelHandle,
}

impl BrokerManager {
    pub fn new(kernel: Arc<dyn BrokerKernel>) -> Self {
        Self {
            kernel: KernelHandle::new(kernel),
        }
    }
}

#[async_trait]
impl BrokerManagerApi for BrokerManager {
    #[instrument(skip(self))]
    async fn supported_protocols(&self) -> ManagementResult<Vec<Protocol>> {
        self.kernel
            .run("supported_protocols", |kernel| Ok(kernel.supported_protocols()?))
            .await
            .map_err(ManagementError::into_internal)
    }

    #[instrument(skip(self))]
    async fn broker_information(&self) -> ManagementResult<BrokerInformation> {
        self.kernel
            .run("broker_information", |kernel| Ok(kernel.broker_information()?))
            .await
            .map_err(ManagementError::into_internal)
    }

    #[instrument(skip(self))]
    async fn store_information(&self) -> ManagementResult<StoreInformation> {
        self.kernel
            .run("store_information", |kernel| Ok(kernel.store_information()?))
            .await
            .map_err(ManagementError::into_internal)
    }

    #[instrument(skip(self))]
    async fn cluster_information(&self) -> ManagementResult<ClusterInformation> {
        self.kernel
            .run("cluster_information", |kernel| Ok(kernel.cluster_information()?))
            .await
            .map_err(ManagementError::into_internal)
    }
}
