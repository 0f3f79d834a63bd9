//! Response content negotiation.
//!
//! # Design Decisions
//! - `Accept` entries are tried in descending `q` order, ties keep header order
//! - Only exact media types match; `*/*`, wildcards and misses fall back to
//!   the registry default
//! - `q=0` entries are never selected

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::Response,
};
use serde::Serialize;

use crate::codec::{Codec, Registry};
use crate::http::error::ApiError;
use crate::http::media_type;
use crate::http::reply::Reply;
use crate::http::response::{write_reply, BufferedResponse, ResponseWriter};

/// Pick the response codec for an `Accept` header value.
pub fn negotiate<'r>(registry: &'r Registry, accept: Option<&str>) -> &'r Arc<dyn Codec> {
    let Some(accept) = accept else {
        return registry.default_codec();
    };

    let mut ranges: Vec<(String, f32)> = accept
        .split(',')
        .filter_map(|entry| {
            let mut params = entry.split(';');
            let media = media_type(params.next()?);
            let quality = params
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (!media.is_empty() && quality > 0.0).then_some((media, quality))
        })
        .collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranges
        .iter()
        .find_map(|(media, _)| registry.get(media))
        .unwrap_or_else(|| registry.default_codec())
}

/// Extractor carrying the codec negotiated from the `Accept` header.
#[derive(Debug, Clone)]
pub struct Negotiated {
    codec: Arc<dyn Codec>,
}

impl Negotiated {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Render `reply` in the negotiated content type.
    pub fn respond<T: Serialize>(&self, reply: Reply<T>) -> Result<Response, ApiError> {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        write_reply(&mut writer, self.codec(), &reply)?;
        tracing::debug!(
            content_type = self.codec.content_type(),
            status = writer.status().code(),
            "Reply encoded"
        );
        Ok(axum::response::IntoResponse::into_response(writer.into_inner()))
    }
}

impl<S> FromRequestParts<S> for Negotiated
where
    Arc<Registry>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let registry = Arc::<Registry>::from_ref(state);
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok());
        Ok(Self::new(negotiate(&registry, accept).clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{APPLICATION_FORM, APPLICATION_JSON, APPLICATION_XML};

    fn pick(accept: Option<&str>) -> &'static str {
        negotiate(&Registry::default(), accept).content_type()
    }

    #[test]
    fn test_missing_accept_uses_default() {
        assert_eq!(pick(None), APPLICATION_JSON);
        assert_eq!(pick(Some("*/*")), APPLICATION_JSON);
        assert_eq!(pick(Some("text/html")), APPLICATION_JSON);
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(pick(Some("application/xml")), APPLICATION_XML);
        assert_eq!(pick(Some("text/html, Application/XML;charset=utf-8")), APPLICATION_XML);
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            pick(Some("application/xml;q=0.5, application/x-www-form-urlencoded")),
            APPLICATION_FORM
        );
        assert_eq!(
            pick(Some("application/xml;q=0, application/json;q=0.1")),
            APPLICATION_JSON
        );
        assert_eq!(pick(Some("application/xml;q=0")), APPLICATION_JSON);
    }
}
