//! Mapping of codec failures onto HTTP responses.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::codec::CodecError;
use crate::http::response::ReplyError;

/// Errors surfaced by the request layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded.
    #[error("failed to decode request body: {0}")]
    Decode(CodecError),

    /// Request body could not be read.
    #[error(transparent)]
    Body(#[from] BytesRejection),

    /// Reply could not be rendered.
    #[error(transparent)]
    Reply(#[from] ReplyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // A read-only target is a handler bug, not a client error.
            ApiError::Decode(CodecError::ReadOnly { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Reply(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ScalarKind;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::Decode(CodecError::Conversion {
            field: "Age",
            text: "x".into(),
            kind: ScalarKind::I64,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Age"));

        let err = ApiError::Decode(CodecError::ReadOnly { type_name: "&Foo" });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Reply(ReplyError::Write(std::io::Error::other("closed")));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
