//! Handler results: a status code paired with a body.

use axum::http::StatusCode;

/// The intended response of a handler, consumed by the encode path.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    status: StatusCode,
    body: T,
}

impl<T> Reply<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    /// `200 OK` with `body`.
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &T {
        &self.body
    }

    pub fn into_parts(self) -> (StatusCode, T) {
        (self.status, self.body)
    }
}
