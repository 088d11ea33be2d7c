use crate::config::CorsConfig;
use crate::constants::{content_type, header, status};
use crate::context::RequestContext;
use crate::headers::Headers;
use crate::interceptor::ResponseBuffering;
use crate::options::{CorsOptions, ValidationError};
use crate::result::PreflightResponse;
use bytes::Bytes;

/// Origin policy evaluator built from validated [`CorsOptions`].
///
/// Pure and total: every method is a function of the options and its
/// arguments, so one instance can be shared across requests and threads.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    options: CorsOptions,
}

impl CorsPolicy {
    pub fn new(options: CorsOptions) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn from_config(config: CorsConfig) -> Result<Self, ValidationError> {
        Self::new(CorsOptions::try_from(config)?)
    }

    pub fn options(&self) -> &CorsOptions {
        &self.options
    }

    pub fn buffering(&self) -> ResponseBuffering {
        self.options.buffering
    }

    pub fn error_message(&self) -> &str {
        &self.options.error_message
    }

    /// Wildcard accepts everything; otherwise an exact, case-sensitive member
    /// of the list or a full match of the configured pattern.
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if self.options.allow_origins.contains(origin) {
            return true;
        }

        self.options
            .allow_origin_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.matches(origin))
    }

    /// Headers merged into the start event of a non-preflight response.
    ///
    /// With wildcard origins the literal `*` is sent unless credentials are
    /// enabled and the request carries a cookie; then the origin is echoed.
    pub fn headers_for_simple_request(&self, origin: &str, request_has_cookie: bool) -> Headers {
        let mut headers = Headers::with_capacity(4);
        let allow_any = self.options.allow_origins.is_any();

        if allow_any {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
        }
        if self.options.allow_credentials {
            headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
        }
        if let Some(value) = self.options.expose_headers.header_value() {
            headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
        }

        let echo = if allow_any {
            self.options.allow_credentials && request_has_cookie
        } else {
            self.is_allowed_origin(origin)
        };
        if echo {
            Self::allow_explicit_origin(&mut headers, origin);
        }

        headers
    }

    /// Answers a preflight without consulting the downstream pipeline.
    pub fn preflight_response(&self, request: &RequestContext) -> PreflightResponse {
        let origin = request.origin().unwrap_or_default();
        let requested_method = request.access_control_request_method();
        let requested_headers = request.access_control_request_headers();

        let mut headers = Headers::with_capacity(8);
        let mut failures: Vec<&str> = Vec::new();

        if self.options.allow_origins.is_any() && !self.options.allow_credentials {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
        } else if !origin.is_empty() && self.is_allowed_origin(origin) {
            Self::allow_explicit_origin(&mut headers, origin);
        } else {
            failures.push("origin");
        }

        if let Some(value) = self.options.allow_methods.header_value() {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
        }
        if !requested_method.is_some_and(|method| self.options.allow_methods.allows_method(method)) {
            failures.push("method");
        }

        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.options.allow_headers.header_value(requested_headers),
        );
        if let Some(requested) = requested_headers
            && !self.options.allow_headers.allows_headers(requested)
        {
            failures.push("headers");
        }

        if self.options.allow_credentials {
            headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
        }
        if let Some(max_age) = self.options.max_age {
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, max_age.to_string());
        }

        if self.options.reject_disallowed_preflight && !failures.is_empty() {
            let body = Bytes::from(format!("Disallowed CORS {}", failures.join(", ")));
            headers.insert(header::CONTENT_TYPE, content_type::TEXT_PLAIN);
            headers.insert(header::CONTENT_LENGTH, body.len().to_string());
            return PreflightResponse {
                status: status::BAD_REQUEST,
                headers,
                body,
            };
        }

        headers.insert(header::CONTENT_LENGTH, "0");
        PreflightResponse {
            status: self.options.preflight_status,
            headers,
            body: Bytes::new(),
        }
    }

    fn allow_explicit_origin(headers: &mut Headers, origin: &str) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.add_vary(header::ORIGIN);
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;
