//! Destination manager: destinations and their role permissions.
//!
//! Create and delete use the storage identity, so a `durable_topic` request
//! lands on the plain topic. Returned representations carry the requested
//! type tag.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::identity::IdentityResolver;
use crate::domain::query::{filter_page, NameFilter, Page};
use crate::domain::types::{Destination, DestinationRolePermission, DestinationType};
use crate::ports::inbound::DestinationManagerApi;
use crate::ports::outbound::{BrokerKernel, KernelError};
use crate::service::KernelHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct DestinationManager {
    kernel: KernelHandle,
}

impl DestinationManager {
    pub fn new(kernel: Arc<dyn BrokerKernel>) -> Self {
        Self {
            kernel: KernelHandle::new(kernel),
        }
    }
}

fn tagged(mut destination: Destination, tag: DestinationType) -> Destination {
    destination.destination_type = tag;
    destination
}

fn require_name(name: &str) -> ManagementResult<()> {
    if name.trim().is_empty() {
        return Err(ManagementError::invalid_identity("destination name is empty"));
    }
    Ok(())
}

fn require_role(permission: &DestinationRolePermission) -> ManagementResult<()> {
    if permission.role.trim().is_empty() {
        return Err(ManagementError::invalid_identity("permission role is empty"));
    }
    Ok(())
}

#[async_trait]
impl DestinationManagerApi for DestinationManager {
    #[instrument(skip(self))]
    async fn list_destinations(
        &self,
        protocol: &str,
        destination_type: &str,
        name: NameFilter,
        page: Page,
    ) -> ManagementResult<Vec<Destination>> {
        let (protocol, destination_type) = (protocol.to_owned(), destination_type.to_owned());
        self.kernel
            .run("list_destinations", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                let destinations = kernel
                    .destinations(&identity)?
                    .into_iter()
                    .map(|d| tagged(d, identity.destination_type))
                    .collect();
                Ok(filter_page(destinations, |d| name.matches(&d.name), page))
            })
            .await
    }

    #[instrument(skip(self))]
    async fn get_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Destination> {
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("get_destination", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                kernel
                    .destination(&identity, &name)?
                    .map(|d| tagged(d, identity.destination_type))
                    .ok_or_else(|| {
                        ManagementError::not_found(format!(
                            "{} {} '{}'",
                            identity.protocol, identity.destination_type, name
                        ))
                    })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn create_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Destination> {
        require_name(name)?;
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("create_destination", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                let created = kernel.create_destination(&identity.storage(), &name)?;
                info!(
                    protocol = %identity.protocol,
                    destination_type = %identity.destination_type,
                    name = %name,
                    "destination created"
                );
                Ok(tagged(created, identity.destination_type))
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_destination(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<()> {
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("delete_destination", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                match kernel.delete_destination(&identity.storage(), &name) {
                    Ok(()) => {
                        info!(protocol = %identity.protocol, name = %name, "destination deleted");
                        Ok(())
                    }
                    Err(KernelError::NotFound(_)) => {
                        debug!(name = %name, "destination already absent");
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_destinations(&self, protocol: &str, destination_type: &str) -> ManagementResult<usize> {
        let (protocol, destination_type) = (protocol.to_owned(), destination_type.to_owned());
        self.kernel
            .run("delete_destinations", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                let deleted = kernel.delete_destinations(&identity.storage())?;
                info!(
                    protocol = %identity.protocol,
                    destination_type = %identity.destination_type,
                    deleted,
                    "destinations deleted"
                );
                Ok(deleted)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn list_permissions(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
    ) -> ManagementResult<Vec<DestinationRolePermission>> {
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("list_permissions", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                Ok(kernel.permissions(&identity, &name)?)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn create_permission(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
        permission: DestinationRolePermission,
    ) -> ManagementResult<DestinationRolePermission> {
        require_role(&permission)?;
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("create_permission", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                Ok(kernel.store_permission(&identity, &name, permission)?)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn update_permission(
        &self,
        protocol: &str,
        destination_type: &str,
        name: &str,
        permission: DestinationRolePermission,
    ) -> ManagementResult<DestinationRolePermission> {
        require_role(&permission)?;
        let (protocol, destination_type, name) =
            (protocol.to_owned(), destination_type.to_owned(), name.to_owned());
        self.kernel
            .run("update_permission", move |kernel| {
                let identity = IdentityResolver::resolve_destination(kernel, &protocol, &destination_type)?;
                let existing = kernel.permissions(&identity, &name)?;
                if !existing.iter().any(|p| p.role == permission.role) {
                    return Err(ManagementError::not_found(format!(
                        "permission for role '{}' on '{}'",
                        permission.role, name
                    )));
                }
                Ok(kernel.store_permission(&identity, &name, permission)?)
            })
            .await
    }
}
