//! Destination endpoints.

use crate::domain::error::ManagementResult;
use crate::domain::query::{NameFilter, Page};
use crate::domain::types::Destination;
use crate::http::params::{self, DestinationListParams, DestinationPath, DestinationTypePath, NewDestination};
use crate::http::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// `GET /{protocol}/destination-type/{type}`
pub async fn list_destinations(
    State(state): State<AppState>,
    Path(path): Path<DestinationTypePath>,
    params: Result<Query<DestinationListParams>, QueryRejection>,
) -> ManagementResult<Json<Vec<Destination>>> {
    let params = params::query(params)?;
    let page = Page::new(
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(state.pagination.default_limit),
    );
    let destinations = state
        .destinations
        .list_destinations(
            &path.protocol,
            &path.destination_type,
            NameFilter::parse(&params.name),
            page,
        )
        .await?;
    Ok(Json(destinations))
}

/// `DELETE /{protocol}/destination-type/{type}`
pub async fn delete_destinations(
    State(state): State<AppState>,
    Path(path): Path<DestinationTypePath>,
) -> ManagementResult<impl IntoResponse> {
    let deleted = state
        .destinations
        .delete_destinations(&path.protocol, &path.destination_type)
        .await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// `POST /{protocol}/destination-type/{type}` with `{"destinationName": ...}`
pub async fn create_destination_from_body(
    State(state): State<AppState>,
    Path(path): Path<DestinationTypePath>,
    body: Result<Json<NewDestination>, JsonRejection>,
) -> ManagementResult<impl IntoResponse> {
    let body = params::body(body)?;
    create(&state, &path.protocol, &path.destination_type, &body.destination_name).await
}

/// `POST /{protocol}/destination-type/{type}/name/{name}`
pub async fn create_destination(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
) -> ManagementResult<impl IntoResponse> {
    create(&state, &path.protocol, &path.destination_type, &path.name).await
}

async fn create(
    state: &AppState,
    protocol: &str,
    destination_type: &str,
    name: &str,
) -> ManagementResult<impl IntoResponse> {
    let destination = state
        .destinations
        .create_destination(protocol, destination_type, name)
        .await?;
    let location = state.destination_uri(
        destination.protocol.as_str(),
        destination.destination_type.as_str(),
        &destination.name,
    );
    Ok(([(header::LOCATION, location)], Json(destination)))
}

/// `GET /{protocol}/destination-type/{type}/name/{name}`
pub async fn get_destination(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
) -> ManagementResult<Json<Destination>> {
    let destination = state
        .destinations
        .get_destination(&path.protocol, &path.destination_type, &path.name)
        .await?;
    Ok(Json(destination))
}

/// `DELETE /{protocol}/destination-type/{type}/name/{name}`
pub async fn delete_destination(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
) -> ManagementResult<StatusCode> {
    state
        .destinations
        .delete_destination(&path.protocol, &path.destination_type, &path.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
