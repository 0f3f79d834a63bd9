//! HTTP layer around the codecs.
//!
//! # Data Flow
//! ```text
//! request
//!     → request.rs (Content-Type → codec → Decoded<T>)
//!     → handlers.rs (domain logic, returns Reply<T>)
//!     → negotiate.rs (Accept → codec)
//!     → response.rs (marshal, status tracking, body write)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod negotiate;
pub mod reply;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use negotiate::{negotiate, Negotiated};
pub use reply::Reply;
pub use request::{media_type, Decoded};
pub use response::{write_reply, BufferedResponse, RawResponse, ResponseWriter, StatusSlot};
pub use server::{AppState, HttpServer};
