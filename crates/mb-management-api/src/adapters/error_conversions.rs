//! Error normalizer.
//!
//! Kernel failures become one of the three management kinds, and every
//! management error renders as the same JSON envelope with its status.

use crate::domain::error::ManagementError;
use crate::ports::outbound::KernelError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

impl From<KernelError> for ManagementError {
    fn from(e: KernelError) -> Self {
        match e {
            KernelError::NotFound(what) => ManagementError::not_found(what),
            KernelError::InvalidArgument(details) => ManagementError::invalid_identity(details),
            other => ManagementError::operation_failed(other.to_string()),
        }
    }
}

impl IntoResponse for ManagementError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_mapping() {
        let cases = [
            (KernelError::NotFound("queue 'a'".into()), 404),
            (KernelError::InvalidArgument("bad".into()), 400),
            (KernelError::Storage("disk".into()), 500),
            (KernelError::Protocol("codec".into()), 500),
            (KernelError::Unavailable("restarting".into()), 500),
        ];
        for (kernel_error, status) in cases {
            let err: ManagementError = kernel_error.into();
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ManagementError::not_found("message 9").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
