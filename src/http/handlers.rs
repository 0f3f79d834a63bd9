//! Demo endpoints exercising every registered codec.

use axum::{extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::negotiate::Negotiated;
use crate::http::reply::Reply;
use crate::http::request::Decoded;
use crate::http::server::AppState;

/// A flat record accepted in every registered content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Profile {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub active: bool,
    pub score: f64,
    pub tags: Vec<String>,
}

crate::form_schema!(Profile {
    "Name" => String,
    "Age" => I64,
    "Email" => String,
    "Active" => Bool,
    "Score" => F64,
    "Tags" => [String],
});

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CodecList {
    pub default: &'static str,
    pub content_types: Vec<String>,
    pub max_body_bytes: usize,
}

pub async fn get_health(negotiated: Negotiated) -> Result<Response, ApiError> {
    negotiated.respond(Reply::ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn get_codecs(
    State(state): State<AppState>,
    negotiated: Negotiated,
) -> Result<Response, ApiError> {
    let registry = &state.registry;
    negotiated.respond(Reply::ok(CodecList {
        default: registry.default_codec().content_type(),
        content_types: registry
            .content_types()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        max_body_bytes: state.config.limits.max_body_bytes,
    }))
}

pub async fn create_profile(
    negotiated: Negotiated,
    Decoded(profile): Decoded<Profile>,
) -> Result<Response, ApiError> {
    tracing::info!(name = %profile.name, "Profile received");
    negotiated.respond(Reply::new(StatusCode::CREATED, profile))
}
