//! Destination role permission endpoints.

use crate::domain::error::ManagementResult;
use crate::domain::types::DestinationRolePermission;
use crate::http::params::{self, DestinationPath};
use crate::http::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

/// `GET /{protocol}/permissions/destination-type/{type}/name/{name}`
pub async fn list_permissions(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
) -> ManagementResult<Json<Vec<DestinationRolePermission>>> {
    let permissions = state
        .destinations
        .list_permissions(&path.protocol, &path.destination_type, &path.name)
        .await?;
    Ok(Json(permissions))
}

/// `POST /{protocol}/permissions/destination-type/{type}/name/{name}`
pub async fn create_permission(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
    body: Result<Json<DestinationRolePermission>, JsonRejection>,
) -> ManagementResult<Json<DestinationRolePermission>> {
    let permission = params::body(body)?;
    let stored = state
        .destinations
        .create_permission(&path.protocol, &path.destination_type, &path.name, permission)
        .await?;
    Ok(Json(stored))
}

/// `PUT /{protocol}/permissions/destination-type/{type}/name/{name}`
pub async fn update_permission(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
    body: Result<Json<DestinationRolePermission>, JsonRejection>,
) -> ManagementResult<Json<DestinationRolePermission>> {
    let permission = params::body(body)?;
    let stored = state
        .destinations
        .update_permission(&path.protocol, &path.destination_type, &path.name, permission)
        .await?;
    Ok(Json(stored))
}
