//! Management error taxonomy and the uniform error envelope.
//!
//! Every manager outcome collapses into one of three kinds, each bound to a
//! single HTTP status. The dispatch layer performs no recovery: it maps the
//! kind to a status and serializes [`ErrorResponse`].

use serde::{Deserialize, Serialize};

/// HTTP status codes produced by the error normalizer
pub mod status {
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Error raised by the resource managers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManagementError {
    /// Unknown protocol/type, malformed filter or parameter.
    #[error("invalid resource identity: {0}")]
    InvalidResourceIdentity(String),

    /// Destination, subscription or message is absent.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Kernel-layer failure (storage, protocol, unavailable).
    #[error("manager operation failed: {0}")]
    ManagerOperationFailed(String),
}

impl ManagementError {
    /// Invalid protocol, type or parameter value
    pub fn invalid_identity(details: impl Into<String>) -> Self {
        Self::InvalidResourceIdentity(details.into())
    }

    /// Resource absent
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::ResourceNotFound(resource.into())
    }

    /// Kernel or internal failure
    pub fn operation_failed(details: impl Into<String>) -> Self {
        Self::ManagerOperationFailed(details.into())
    }

    /// Collapse any kind into an internal failure.
    ///
    /// Used by read-only snapshot operations which report a single kind.
    pub fn into_internal(self) -> Self {
        match self {
            Self::ManagerOperationFailed(_) => self,
            other => Self::ManagerOperationFailed(other.detail().to_string()),
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidResourceIdentity(_) => "invalid_resource_identity",
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::ManagerOperationFailed(_) => "manager_operation_failed",
        }
    }

    /// HTTP status for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidResourceIdentity(_) => status::BAD_REQUEST,
            Self::ResourceNotFound(_) => status::NOT_FOUND,
            Self::ManagerOperationFailed(_) => status::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message without the kind prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidResourceIdentity(d)
            | Self::ResourceNotFound(d)
            | Self::ManagerOperationFailed(d) => d,
        }
    }

    /// Build the serialized envelope
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.status_code(),
            kind: self.kind().to_string(),
            message: self.detail().to_string(),
        }
    }
}

/// JSON body returned for every non-2xx outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub kind: String,
    pub message: String,
}

/// Result type for manager operations
pub type ManagementResult<T> = Result<T, ManagementError>;
