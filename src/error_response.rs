use crate::constants::{content_type, header, status};
use crate::event::{BoxError, ResponseSink, send_response};
use crate::headers::Headers;
use bytes::Bytes;
use serde_json::json;

/// The 500 response emitted in place of a failed handler's output.
///
/// Built fresh for every failure and consumed by [`ErrorResponse::emit`].
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    status: u16,
    headers: Headers,
    body: Bytes,
}

impl ErrorResponse {
    /// `cors_headers` must be the exact set the success path would have merged.
    pub fn new(message: &str, cors_headers: &Headers) -> Self {
        let body = Bytes::from(json!({ "message": message }).to_string());

        let mut headers = Headers::with_capacity(cors_headers.len() + 2);
        headers.insert(header::CONTENT_TYPE, content_type::JSON);
        headers.insert(header::CONTENT_LENGTH, body.len().to_string());
        headers.merge(cors_headers);

        Self {
            status: status::INTERNAL_SERVER_ERROR,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub async fn emit(self, send: &mut dyn ResponseSink) -> Result<(), BoxError> {
        send_response(send, self.status, self.headers, self.body).await
    }
}

#[cfg(test)]
#[path = "error_response_test.rs"]
mod error_response_test;
