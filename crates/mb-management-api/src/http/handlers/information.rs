//! Protocol/type discovery and read-only node information.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::types::{
    BrokerInformation, ClusterInformation, DestinationType, Protocol, StoreInformation,
};
use crate::http::routes::ENDPOINTS;
use crate::http::state::AppState;
use crate::{SERVICE_NAME, VERSION};
use axum::{extract::State, http::Uri, response::IntoResponse, Json};
use serde_json::json;

/// `GET /protocol-types`
pub async fn protocol_types(State(state): State<AppState>) -> ManagementResult<Json<Vec<Protocol>>> {
    Ok(Json(state.broker.supported_protocols().await?))
}

/// `GET /destination-types`
pub async fn destination_types() -> Json<Vec<&'static str>> {
    Json(DestinationType::ALL.iter().map(|t| t.as_str()).collect())
}

/// `GET /information/broker`
pub async fn broker_information(
    State(state): State<AppState>,
) -> ManagementResult<Json<BrokerInformation>> {
    Ok(Json(state.broker.broker_information().await?))
}

/// `GET /information/store`
pub async fn store_information(
    State(state): State<AppState>,
) -> ManagementResult<Json<StoreInformation>> {
    Ok(Json(state.broker.store_information().await?))
}

/// `GET /information/cluster`
pub async fn cluster_information(
    State(state): State<AppState>,
) -> ManagementResult<Json<ClusterInformation>> {
    Ok(Json(state.broker.cluster_information().await?))
}

/// `GET /info`
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    let endpoints: Vec<String> = ENDPOINTS
        .iter()
        .map(|(method, path)| format!("{} {}", method, path))
        .collect();
    Json(json!({
        "service": SERVICE_NAME,
        "version": VERSION,
        "prefix": state.api_prefix,
        "endpoints": endpoints,
    }))
}

/// Unmatched routes get the standard envelope.
pub async fn fallback(uri: Uri) -> ManagementError {
    ManagementError::not_found(format!("route '{}'", uri.path()))
}
