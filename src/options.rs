use crate::allowed_headers::AllowedHeaders;
use crate::allowed_methods::AllowedMethods;
use crate::exposed_headers::ExposedHeaders;
use crate::interceptor::ResponseBuffering;
use crate::origin::{AllowOrigins, OriginPattern};
use crate::util::is_http_token;
use thiserror::Error;

pub const DEFAULT_MAX_AGE: u64 = 600;
pub const DEFAULT_ERROR_MESSAGE: &str = "error";

/// Policy configuration. Validated once by [`crate::CorsPolicy::new`] and
/// immutable afterwards.
#[derive(Clone, Debug)]
pub struct CorsOptions {
    pub allow_origins: AllowOrigins,
    pub allow_origin_pattern: Option<OriginPattern>,
    pub allow_credentials: bool,
    pub allow_methods: AllowedMethods,
    pub allow_headers: AllowedHeaders,
    pub expose_headers: ExposedHeaders,
    pub max_age: Option<u64>,
    pub preflight_status: u16,
    pub reject_disallowed_preflight: bool,
    pub error_message: String,
    pub buffering: ResponseBuffering,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            allow_origins: AllowOrigins::default(),
            allow_origin_pattern: None,
            allow_credentials: false,
            allow_methods: AllowedMethods::default(),
            allow_headers: AllowedHeaders::default(),
            expose_headers: ExposedHeaders::default(),
            max_age: Some(DEFAULT_MAX_AGE),
            preflight_status: 200,
            reject_disallowed_preflight: false,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            buffering: ResponseBuffering::default(),
        }
    }
}

impl CorsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_origins(mut self, origins: AllowOrigins) -> Self {
        self.allow_origins = origins;
        self
    }

    pub fn allow_origin_pattern(mut self, pattern: OriginPattern) -> Self {
        self.allow_origin_pattern = Some(pattern);
        self
    }

    pub fn allow_credentials(mut self, enabled: bool) -> Self {
        self.allow_credentials = enabled;
        self
    }

    pub fn allow_methods(mut self, methods: AllowedMethods) -> Self {
        self.allow_methods = methods;
        self
    }

    pub fn allow_headers(mut self, headers: AllowedHeaders) -> Self {
        self.allow_headers = headers;
        self
    }

    pub fn expose_headers(mut self, headers: ExposedHeaders) -> Self {
        self.expose_headers = headers;
        self
    }

    pub fn max_age(mut self, seconds: Option<u64>) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn preflight_status(mut self, status: u16) -> Self {
        self.preflight_status = status;
        self
    }

    pub fn reject_disallowed_preflight(mut self, enabled: bool) -> Self {
        self.reject_disallowed_preflight = enabled;
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn buffering(mut self, buffering: ResponseBuffering) -> Self {
        self.buffering = buffering;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(invalid) = self.allow_methods.iter().find(|value| !is_http_token(value)) {
            return Err(ValidationError::InvalidMethod(invalid.to_string()));
        }

        if let AllowedHeaders::List(values) = &self.allow_headers
            && let Some(invalid) = values.iter().find(|value| !is_http_token(value))
        {
            return Err(ValidationError::InvalidHeaderName(invalid.clone()));
        }

        if let Some(invalid) = self.expose_headers.iter().find(|value| !is_http_token(value)) {
            return Err(ValidationError::InvalidHeaderName(invalid.clone()));
        }

        if !(200..=299).contains(&self.preflight_status) {
            return Err(ValidationError::InvalidPreflightStatus(
                self.preflight_status,
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid HTTP method name")]
    InvalidMethod(String),
    #[error("'{0}' is not a valid HTTP header name")]
    InvalidHeaderName(String),
    #[error("preflight status {0} is outside the 2xx range")]
    InvalidPreflightStatus(u16),
    #[error("origin pattern '{pattern}' is invalid: {reason}")]
    InvalidOriginPattern { pattern: String, reason: String },
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;
