//! Message endpoints.

use crate::domain::error::ManagementResult;
use crate::domain::types::Message;
use crate::http::params::{self, DestinationPath, MessageListParams, MessageParams, MessagePath};
use crate::http::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

/// `GET /{protocol}/destination-type/{type}/name/{name}/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
    params: Result<Query<MessageListParams>, QueryRejection>,
) -> ManagementResult<Json<Vec<Message>>> {
    let params = params::query(params)?;
    let anchor = params.anchor()?;
    let limit = params.limit.unwrap_or(state.pagination.default_message_limit);
    let messages = state
        .messages
        .list_messages(
            &path.protocol,
            &path.destination_type,
            &path.name,
            anchor,
            limit,
            params.content,
        )
        .await?;
    Ok(Json(messages))
}

/// `GET /{protocol}/destination-type/{type}/name/{name}/messages/{message-id}`
pub async fn get_message(
    State(state): State<AppState>,
    Path(path): Path<MessagePath>,
    params: Result<Query<MessageParams>, QueryRejection>,
) -> ManagementResult<Json<Message>> {
    let params = params::query(params)?;
    let message_id = params::message_id(&path.message_id)?;
    let message = state
        .messages
        .get_message(
            &path.protocol,
            &path.destination_type,
            &path.name,
            message_id,
            params.content,
        )
        .await?;
    Ok(Json(message))
}

/// `DELETE /{protocol}/destination-type/{type}/name/{name}/messages`
pub async fn purge_messages(
    State(state): State<AppState>,
    Path(path): Path<DestinationPath>,
) -> ManagementResult<StatusCode> {
    state
        .messages
        .purge_messages(&path.protocol, &path.destination_type, &path.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
