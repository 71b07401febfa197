//! Path, query and body shapes accepted by the dispatch layer.
//!
//! Omitted parameters take their documented defaults here; framework
//! rejections are folded into the 400 envelope.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::query::{ActiveFilter, DestinationFilter, NameFilter, SubscriptionQuery, WILDCARD};
use crate::ports::inbound::MessageAnchorRequest;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use serde::Deserialize;

fn wildcard() -> String {
    WILDCARD.to_string()
}

// ═══════════════════════════════════════════════════════════════════════════
// PATHS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct DestinationTypePath {
    pub protocol: String,
    pub destination_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DestinationPath {
    pub protocol: String,
    pub destination_type: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagePath {
    pub protocol: String,
    pub destination_type: String,
    pub name: String,
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionTypePath {
    pub protocol: String,
    pub subscription_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionPath {
    pub protocol: String,
    pub subscription_type: String,
    pub subscription_id: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// QUERIES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct DestinationListParams {
    #[serde(default = "wildcard")]
    pub name: String,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionListParams {
    #[serde(default = "wildcard")]
    pub name: String,
    #[serde(default = "wildcard")]
    pub destination: String,
    #[serde(default = "wildcard")]
    pub active: String,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl SubscriptionListParams {
    pub fn query(&self) -> ManagementResult<SubscriptionQuery> {
        Ok(SubscriptionQuery {
            name: NameFilter::parse(&self.name),
            destination: DestinationFilter::parse(&self.destination),
            active: ActiveFilter::parse(&self.active)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CloseSubscriptionsParams {
    #[serde(default = "wildcard")]
    pub destination: String,
    #[serde(default = "wildcard")]
    pub active: String,
    #[serde(rename = "unsubscribe-only", default)]
    pub unsubscribe_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CloseSubscriptionParams {
    #[serde(rename = "unsubscribe-only", default)]
    pub unsubscribe_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageListParams {
    #[serde(default)]
    pub content: bool,
    #[serde(rename = "next-message-id")]
    pub next_message_id: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl MessageListParams {
    /// `offset` selects offset anchoring; otherwise `next-message-id`
    /// (default 0, negative clamps to 0) anchors the page. Both together are
    /// rejected.
    pub fn anchor(&self) -> ManagementResult<MessageAnchorRequest> {
        match (self.offset, self.next_message_id) {
            (Some(_), Some(_)) => Err(ManagementError::invalid_identity(
                "'offset' and 'next-message-id' are mutually exclusive",
            )),
            (Some(offset), None) => Ok(MessageAnchorRequest::Offset(offset)),
            (None, id) => Ok(MessageAnchorRequest::MessageId(
                u64::try_from(id.unwrap_or(0)).unwrap_or(0),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    #[serde(default)]
    pub content: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// BODIES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDestination {
    pub destination_name: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// REJECTIONS
// ═══════════════════════════════════════════════════════════════════════════

pub fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> ManagementResult<T> {
    extracted
        .map(|Query(params)| params)
        .map_err(|e| ManagementError::invalid_identity(e.body_text()))
}

pub fn body<T>(extracted: Result<Json<T>, JsonRejection>) -> ManagementResult<T> {
    extracted
        .map(|Json(body)| body)
        .map_err(|e| ManagementError::invalid_identity(e.body_text()))
}

/// Message IDs are numeric; any other token names no message.
pub fn message_id(raw: &str) -> ManagementResult<u64> {
    raw.parse()
        .map_err(|_| ManagementError::not_found(format!("message '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_params(next: Option<i64>, offset: Option<i64>) -> MessageListParams {
        MessageListParams {
            content: false,
            next_message_id: next,
            offset,
            limit: None,
        }
    }

    #[test]
    fn test_anchor_selection() {
        assert_eq!(
            message_params(None, None).anchor().unwrap(),
            MessageAnchorRequest::MessageId(0)
        );
        assert_eq!(
            message_params(Some(7), None).anchor().unwrap(),
            MessageAnchorRequest::MessageId(7)
        );
        assert_eq!(
            message_params(None, Some(3)).anchor().unwrap(),
            MessageAnchorRequest::Offset(3)
        );
        assert_eq!(
            message_params(Some(7), Some(3)).anchor().unwrap_err().status_code(),
            400
        );
        assert_eq!(
            message_params(Some(-9), None).anchor().unwrap(),
            MessageAnchorRequest::MessageId(0)
        );
    }

    #[test]
    fn test_message_id_parsing() {
        assert_eq!(message_id("42").unwrap(), 42);
        assert_eq!(message_id("abc").unwrap_err().status_code(), 404);
        assert_eq!(message_id("-1").unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_subscription_query_rejects_bad_active() {
        let params = SubscriptionListParams {
            name: wildcard(),
            destination: wildcard(),
            active: "maybe".into(),
            offset: None,
            limit: None,
        };
        assert_eq!(params.query().unwrap_err().status_code(), 400);
    }
}
