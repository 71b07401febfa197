//! Route table.
//!
//! Every route is nested under the configured prefix. Static segments
//! (`/info`, `/information/...`, `/*-types`) take precedence over the
//! `/:protocol` segment.

use crate::domain::config::CorsConfig;
use crate::http::handlers::{destinations, information, messages, permissions, subscriptions};
use crate::http::state::AppState;
use crate::middleware::{create_cors_layer, TracingLayer};
use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

/// Endpoint list reported by `GET /info`.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/info"),
    ("GET", "/protocol-types"),
    ("GET", "/destination-types"),
    ("GET", "/information/broker"),
    ("GET", "/information/store"),
    ("GET", "/information/cluster"),
    ("GET", "/{protocol}/destination-type/{type}"),
    ("POST", "/{protocol}/destination-type/{type}"),
    ("DELETE", "/{protocol}/destination-type/{type}"),
    ("GET", "/{protocol}/destination-type/{type}/name/{name}"),
    ("POST", "/{protocol}/destination-type/{type}/name/{name}"),
    ("DELETE", "/{protocol}/destination-type/{type}/name/{name}"),
    ("GET", "/{protocol}/destination-type/{type}/name/{name}/messages"),
    ("DELETE", "/{protocol}/destination-type/{type}/name/{name}/messages"),
    ("GET", "/{protocol}/destination-type/{type}/name/{name}/messages/{message-id}"),
    ("GET", "/{protocol}/permissions/destination-type/{type}/name/{name}"),
    ("POST", "/{protocol}/permissions/destination-type/{type}/name/{name}"),
    ("PUT", "/{protocol}/permissions/destination-type/{type}/name/{name}"),
    ("GET", "/{protocol}/subscription-type/{type}"),
    ("DELETE", "/{protocol}/subscription-type/{type}"),
    ("DELETE", "/{protocol}/subscription-type/{type}/subscription-id/{id}"),
];

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(information::service_info))
        .route("/protocol-types", get(information::protocol_types))
        .route("/destination-types", get(information::destination_types))
        .route("/information/broker", get(information::broker_information))
        .route("/information/store", get(information::store_information))
        .route("/information/cluster", get(information::cluster_information))
        .route(
            "/:protocol/destination-type/:destination_type",
            get(destinations::list_destinations)
                .post(destinations::create_destination_from_body)
                .delete(destinations::delete_destinations),
        )
        .route(
            "/:protocol/destination-type/:destination_type/name/:name",
            get(destinations::get_destination)
                .post(destinations::create_destination)
                .delete(destinations::delete_destination),
        )
        .route(
            "/:protocol/destination-type/:destination_type/name/:name/messages",
            get(messages::list_messages).delete(messages::purge_messages),
        )
        .route(
            "/:protocol/destination-type/:destination_type/name/:name/messages/:message_id",
            get(messages::get_message),
        )
        .route(
            "/:protocol/permissions/destination-type/:destination_type/name/:name",
            get(permissions::list_permissions)
                .post(permissions::create_permission)
                .put(permissions::update_permission),
        )
        .route(
            "/:protocol/subscription-type/:subscription_type",
            get(subscriptions::list_subscriptions).delete(subscriptions::close_subscriptions),
        )
        .route(
            "/:protocol/subscription-type/:subscription_type/subscription-id/:subscription_id",
            delete(subscriptions::close_subscription),
        )
}

/// Build the full router: routes under `state.api_prefix`, the standard
/// fallback, and the middleware stack.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let prefix = state.api_prefix.clone();
    let router = if prefix == "/" {
        api_routes()
    } else {
        Router::new().nest(&prefix, api_routes())
    };

    router
        .fallback(information::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(TracingLayer::new())
        .layer(create_cors_layer(cors))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBrokerKernel;
    use crate::domain::config::ManagementConfig;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(prefix: &str) -> Router {
        let mut config = ManagementConfig::default();
        config.api.prefix = prefix.into();
        let kernel = Arc::new(InMemoryBrokerKernel::with_protocols(["amqp"]));
        build_router(AppState::new(kernel, &config), &config.cors)
    }

    async fn status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_routes_nested_under_prefix() {
        let app = router("/mb/api");
        assert_eq!(status(app.clone(), "/mb/api/protocol-types").await, StatusCode::OK);
        assert_eq!(status(app, "/protocol-types").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_prefix() {
        let app = router("/");
        assert_eq!(status(app.clone(), "/protocol-types").await, StatusCode::OK);
        assert_eq!(status(app, "/amqp/destination-type/queue").await, StatusCode::OK);
    }
}
