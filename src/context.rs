use crate::constants::{header, method};
use crate::headers::Headers;

/// Per-request view the middleware inspects before delegating downstream.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: String,
    path: String,
    headers: Headers,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
        }
    }

    pub fn with_headers(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: Headers,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The `Origin` header, treating a blank value as absent.
    pub fn origin(&self) -> Option<&str> {
        self.non_blank(header::ORIGIN)
    }

    pub fn access_control_request_method(&self) -> Option<&str> {
        self.non_blank(header::ACCESS_CONTROL_REQUEST_METHOD)
    }

    pub fn access_control_request_headers(&self) -> Option<&str> {
        self.non_blank(header::ACCESS_CONTROL_REQUEST_HEADERS)
    }

    /// Only presence matters; the cookie value is never read.
    pub fn has_cookie(&self) -> bool {
        self.headers.contains(header::COOKIE)
    }

    pub fn is_preflight(&self) -> bool {
        self.method == method::OPTIONS
            && self.headers.contains(header::ACCESS_CONTROL_REQUEST_METHOD)
    }

    fn non_blank(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;
