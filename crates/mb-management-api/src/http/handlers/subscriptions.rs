//! Subscription endpoints.

use crate::domain::error::ManagementResult;
use crate::domain::query::{ActiveFilter, DestinationFilter, Page};
use crate::domain::types::Subscription;
use crate::http::params::{
    self, CloseSubscriptionParams, CloseSubscriptionsParams, SubscriptionListParams, SubscriptionPath,
    SubscriptionTypePath,
};
use crate::http::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// `GET /{protocol}/subscription-type/{type}`
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(path): Path<SubscriptionTypePath>,
    params: Result<Query<SubscriptionListParams>, QueryRejection>,
) -> ManagementResult<Json<Vec<Subscription>>> {
    let params = params::query(params)?;
    let query = params.query()?;
    let page = Page::new(
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(state.pagination.default_limit),
    );
    let subscriptions = state
        .subscriptions
        .list_subscriptions(&path.protocol, &path.subscription_type, query, page)
        .await?;
    Ok(Json(subscriptions))
}

/// `DELETE /{protocol}/subscription-type/{type}`
pub async fn close_subscriptions(
    State(state): State<AppState>,
    Path(path): Path<SubscriptionTypePath>,
    params: Result<Query<CloseSubscriptionsParams>, QueryRejection>,
) -> ManagementResult<impl IntoResponse> {
    let params = params::query(params)?;
    let active = ActiveFilter::parse(&params.active)?;
    let closed = state
        .subscriptions
        .close_subscriptions(
            &path.protocol,
            &path.subscription_type,
            DestinationFilter::parse(&params.destination),
            active,
            params.unsubscribe_only,
        )
        .await?;
    Ok(Json(json!({ "closed": closed })))
}

/// `DELETE /{protocol}/subscription-type/{type}/subscription-id/{id}`
pub async fn close_subscription(
    State(state): State<AppState>,
    Path(path): Path<SubscriptionPath>,
    params: Result<Query<CloseSubscriptionParams>, QueryRejection>,
) -> ManagementResult<StatusCode> {
    let params = params::query(params)?;
    state
        .subscriptions
        .close_subscription(
            &path.protocol,
            &path.subscription_type,
            &path.subscription_id,
            params.unsubscribe_only,
        )
        .await?;
    Ok(StatusCode::OK)
}
