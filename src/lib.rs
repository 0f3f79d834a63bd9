//! Content-type driven body codecs for HTTP APIs.
//!
//! A [`codec::Registry`] maps MIME types to [`codec::Codec`]s (JSON, XML and
//! `application/x-www-form-urlencoded`). The [`http`] layer decodes request
//! bodies with the codec selected by `Content-Type`, and renders
//! [`http::Reply`] values through a status-tracking [`http::ResponseWriter`].

pub mod codec;
pub mod config;
pub mod http;
pub mod observability;

pub use codec::{Codec, CodecError, Registry};
pub use config::ServiceConfig;
pub use http::{HttpServer, Reply};
