//! Request body decoding.
//!
//! # Responsibilities
//! - Normalize the declared `Content-Type`
//! - Select the codec from the registry and decode the body into a model
//!
//! # Design Decisions
//! - Missing or unknown content types use the registry default
//! - The body is decoded into a fresh `T::default()` and only returned on success

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRef, FromRequest, Request},
    http::header,
};

use crate::codec::{Model, Registry};
use crate::http::error::ApiError;

/// Media type of a `Content-Type`/`Accept` entry: parameters stripped,
/// trimmed and lowercased.
pub fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Extractor decoding the request body with the codec selected by `Content-Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T>(pub T);

impl<S, T> FromRequest<S> for Decoded<T>
where
    T: Model + Send,
    Arc<Registry>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(media_type)
            .unwrap_or_default();
        let body = Bytes::from_request(req, state).await?;

        let registry = Arc::<Registry>::from_ref(state);
        let codec = registry.lookup(&content_type);
        tracing::debug!(
            content_type = %content_type,
            codec = codec.content_type(),
            bytes = body.len(),
            "Decoding request body"
        );

        let mut value = T::default();
        codec
            .unmarshal(&body, &mut &mut value)
            .map_err(ApiError::Decode)?;
        Ok(Decoded(value))
    }
}
