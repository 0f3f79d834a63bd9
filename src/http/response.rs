//! Response writing with write-once status tracking.
//!
//! # Responsibilities
//! - Wrap a raw response (header map + body sink)
//! - Record the first status that accompanies the response, explicit or implicit
//! - Render a [`Reply`] through a codec
//!
//! # Design Decisions
//! - Status is a two-state machine: `Unset → Set(code)`, never `Set → Set`
//! - The first body write without a status declares `200 OK`
//! - A second `set_status` is ignored with a warning, mirroring how HTTP
//!   servers treat superfluous status writes
//! - All mutation goes through `&mut self`; one writer per response

use std::io;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::codec::{Codec, CodecError};
use crate::http::reply::Reply;

/// Write-once status of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSlot {
    #[default]
    Unset,
    Set(StatusCode),
}

impl StatusSlot {
    pub fn get(self) -> Option<StatusCode> {
        match self {
            StatusSlot::Unset => None,
            StatusSlot::Set(code) => Some(code),
        }
    }

    /// Numeric code, `0` while unset.
    pub fn code(self) -> u16 {
        self.get().map_or(0, |code| code.as_u16())
    }

    pub fn is_set(self) -> bool {
        matches!(self, StatusSlot::Set(_))
    }
}

/// The transport-level response a [`ResponseWriter`] forwards to.
pub trait RawResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn write_status(&mut self, status: StatusCode);

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<usize>;
}

/// In-memory raw response, converted into an axum [`Response`] at the end.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl RawResponse for BufferedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

/// Raw response wrapper that tracks the response status exactly once.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    inner: W,
    status: StatusSlot,
}

impl<W: RawResponse> ResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            status: StatusSlot::Unset,
        }
    }

    /// Header map of the raw response; no status side effect.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// Declare the response status.
    ///
    /// Returns `false` and leaves the recorded status unchanged when a status
    /// was already set, explicitly or by a body write.
    pub fn set_status(&mut self, status: StatusCode) -> bool {
        if let StatusSlot::Set(current) = self.status {
            tracing::warn!(
                current = current.as_u16(),
                ignored = status.as_u16(),
                "superfluous set_status call"
            );
            return false;
        }
        self.status = StatusSlot::Set(status);
        self.inner.write_status(status);
        true
    }

    /// Write body bytes, declaring `200 OK` first if no status is set yet.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if !self.status.is_set() {
            self.status = StatusSlot::Set(StatusCode::OK);
            self.inner.write_status(StatusCode::OK);
        }
        self.inner.write_body(bytes)
    }

    pub fn status(&self) -> StatusSlot {
        self.status
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: RawResponse> io::Write for ResponseWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ResponseWriter::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encode `reply` with `codec` and write it through `writer`.
///
/// The body is marshaled before anything is written, so an encode failure
/// leaves the writer untouched. `writer` must not have a status yet; a writer
/// that already carries one is rejected before any header or body is written.
pub fn write_reply<W, T>(
    writer: &mut ResponseWriter<W>,
    codec: &dyn Codec,
    reply: &Reply<T>,
) -> Result<(), ReplyError>
where
    W: RawResponse,
    T: Serialize,
{
    if let StatusSlot::Set(current) = writer.status() {
        return Err(ReplyError::StatusAlreadySet {
            current,
            requested: reply.status(),
        });
    }
    let bytes = codec.marshal(reply.body())?;
    writer.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(codec.content_type()),
    );
    writer.set_status(reply.status());
    io::Write::write_all(writer, &bytes)?;
    Ok(())
}

/// Failure while rendering a reply.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("failed to encode response body: {0}")]
    Encode(#[from] CodecError),

    #[error("failed to write response body: {0}")]
    Write(#[from] io::Error),

    /// The writer's status was fixed before the reply was rendered.
    #[error("response status already set to {current}, cannot send {requested}")]
    StatusAlreadySet {
        current: StatusCode,
        requested: StatusCode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FormCodec, JsonCodec};
    use std::io::Write;

    /// Counts status declarations reaching the raw response.
    #[derive(Default)]
    struct Recording {
        buffered: BufferedResponse,
        status_writes: usize,
    }

    impl RawResponse for Recording {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            self.buffered.headers_mut()
        }

        fn write_status(&mut self, status: StatusCode) {
            self.status_writes += 1;
            self.buffered.write_status(status);
        }

        fn write_body(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buffered.write_body(bytes)
        }
    }

    #[test]
    fn test_implicit_ok_on_first_write() {
        let mut writer = ResponseWriter::new(Recording::default());
        assert_eq!(writer.status(), StatusSlot::Unset);
        assert_eq!(writer.status().code(), 0);

        writer.write(b"hello").unwrap();
        writer.write(b" world").unwrap();
        assert_eq!(writer.status(), StatusSlot::Set(StatusCode::OK));

        let raw = writer.into_inner();
        assert_eq!(raw.status_writes, 1);
        assert_eq!(raw.buffered.body(), b"hello world");
    }

    #[test]
    fn test_explicit_status_survives_writes() {
        let mut writer = ResponseWriter::new(Recording::default());
        assert!(writer.set_status(StatusCode::NOT_FOUND));
        writer.write(b"missing").unwrap();
        assert_eq!(writer.status().code(), 404);

        let raw = writer.into_inner();
        assert_eq!(raw.status_writes, 1);
        assert_eq!(raw.buffered.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_second_status_ignored() {
        let mut writer = ResponseWriter::new(Recording::default());
        writer.write(b"x").unwrap();
        assert!(!writer.set_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(writer.status().get(), Some(StatusCode::OK));

        assert!(!writer.set_status(StatusCode::CREATED));
        assert_eq!(writer.into_inner().status_writes, 1);
    }

    #[test]
    fn test_headers_do_not_set_status() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        writer
            .headers_mut()
            .insert("x-trace", HeaderValue::from_static("1"));
        assert!(!writer.status().is_set());
        assert_eq!(writer.into_inner().headers()["x-trace"], "1");
    }

    #[test]
    fn test_io_write_marks_status() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        write!(writer, "{}", 42).unwrap();
        assert_eq!(writer.status().get(), Some(StatusCode::OK));
    }

    #[derive(Serialize)]
    struct Greeting {
        text: &'static str,
    }

    #[test]
    fn test_write_reply() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        let reply = Reply::new(StatusCode::CREATED, Greeting { text: "hi there" });
        write_reply(&mut writer, &FormCodec, &reply).unwrap();

        assert_eq!(writer.status().code(), 201);
        let raw = writer.into_inner();
        assert_eq!(
            raw.headers()[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(raw.body(), b"text=hi+there");
    }

    #[test]
    fn test_encode_failure_writes_nothing() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        let reply = Reply::ok(vec!["not", "a", "record"]);
        let err = write_reply(&mut writer, &FormCodec, &reply).unwrap_err();
        assert!(matches!(err, ReplyError::Encode(_)));
        assert!(!writer.status().is_set());
        assert!(writer.into_inner().body().is_empty());
    }

    #[test]
    fn test_reply_rejected_after_status_set() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        writer.write(b"early").unwrap();

        let reply = Reply::new(StatusCode::CREATED, Greeting { text: "late" });
        let err = write_reply(&mut writer, &JsonCodec, &reply).unwrap_err();
        assert!(matches!(
            err,
            ReplyError::StatusAlreadySet {
                current: StatusCode::OK,
                requested: StatusCode::CREATED
            }
        ));

        let raw = writer.into_inner();
        assert_eq!(raw.status(), Some(StatusCode::OK));
        assert_eq!(raw.body(), b"early");
        assert!(raw.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_buffered_into_response() {
        let mut writer = ResponseWriter::new(BufferedResponse::new());
        write_reply(&mut writer, &JsonCodec, &Reply::ok(Greeting { text: "a" })).unwrap();
        let response = writer.into_inner().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
