//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; codecs themselves never log, callers
//!   report the errors they propagate
//! - HTTP spans come from `tower_http::trace::TraceLayer`

pub mod logging;
