use crate::event::{BoxError, ResponseSink, send_response};
use crate::headers::Headers;
use bytes::Bytes;
use std::any::Any;
use thiserror::Error;

/// Response synthesized for a preflight request; the downstream pipeline never sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl PreflightResponse {
    pub async fn emit(self, send: &mut dyn ResponseSink) -> Result<(), BoxError> {
        send_response(send, self.status, self.headers, self.body).await
    }
}

/// Ways a downstream pipeline can break the Start-then-body event contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("response start was emitted more than once")]
    DuplicateStart,
    #[error("response body chunk was emitted before the response start")]
    BodyBeforeStart,
    #[error("response body chunk was emitted after the final chunk")]
    BodyAfterCompletion,
    #[error("pipeline completed without emitting a response start")]
    MissingStart,
}

/// Errors the middleware returns to its own caller.
#[derive(Debug, Error)]
pub enum CorsError {
    #[error("downstream pipeline violated the response protocol: {0}")]
    Protocol(#[from] ProtocolViolation),
    #[error("request handler failed after the response was committed to the transport")]
    HandlerFailedAfterCommit {
        #[source]
        source: BoxError,
    },
    #[error("failed to emit response")]
    Transport(#[source] BoxError),
}

/// A panic caught inside the downstream pipeline, carried as an ordinary error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("request handler panicked: {message}")]
pub struct HandlerPanic {
    message: String,
}

impl HandlerPanic {
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
