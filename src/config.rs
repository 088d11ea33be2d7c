//! Deserializable configuration surface for the CORS policy.
//!
//! Every field is optional; omitted fields take the same defaults as
//! [`CorsOptions::default`]. The value is parsed once at startup and turned
//! into validated [`CorsOptions`] with `TryFrom`.
//!
//! # Example JSON
//! ```json
//! {
//!   "allow_origins": "*",
//!   "allow_credentials": true,
//!   "allow_methods": ["*"],
//!   "allow_headers": ["*"],
//!   "max_age": 600
//! }
//! ```
use crate::allowed_headers::AllowedHeaders;
use crate::allowed_methods::AllowedMethods;
use crate::exposed_headers::ExposedHeaders;
use crate::interceptor::ResponseBuffering;
use crate::options::{CorsOptions, DEFAULT_ERROR_MESSAGE, DEFAULT_MAX_AGE, ValidationError};
use crate::origin::{AllowOrigins, OriginPattern};
use serde::Deserialize;

/// `"*"`, a single origin, or a list of origins.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OriginsConfig {
    One(String),
    Many(Vec<String>),
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<OriginsConfig> for AllowOrigins {
    fn from(value: OriginsConfig) -> Self {
        match value {
            OriginsConfig::One(origin) => AllowOrigins::list([origin]),
            OriginsConfig::Many(origins) => AllowOrigins::list(origins),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allow_origins: OriginsConfig,
    /// Regular expression an origin must fully match; checked in addition to `allow_origins`.
    pub allow_origin_regex: Option<String>,
    pub allow_credentials: bool,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    /// Preflight cache lifetime in seconds; `null` disables the header.
    pub max_age: Option<u64>,
    pub preflight_status: u16,
    pub reject_disallowed_preflight: bool,
    pub error_message: String,
    pub buffering: ResponseBuffering,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: OriginsConfig::default(),
            allow_origin_regex: None,
            allow_credentials: false,
            allow_methods: vec!["GET".to_string()],
            allow_headers: Vec::new(),
            expose_headers: Vec::new(),
            max_age: Some(DEFAULT_MAX_AGE),
            preflight_status: 200,
            reject_disallowed_preflight: false,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            buffering: ResponseBuffering::default(),
        }
    }
}

impl CorsConfig {
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

impl TryFrom<CorsConfig> for CorsOptions {
    type Error = ValidationError;

    fn try_from(config: CorsConfig) -> Result<Self, Self::Error> {
        let allow_origin_pattern = config
            .allow_origin_regex
            .map(|pattern| {
                OriginPattern::new(&pattern).map_err(|err| ValidationError::InvalidOriginPattern {
                    reason: err.to_string(),
                    pattern,
                })
            })
            .transpose()?;

        let options = CorsOptions {
            allow_origins: config.allow_origins.into(),
            allow_origin_pattern,
            allow_credentials: config.allow_credentials,
            allow_methods: AllowedMethods::list(config.allow_methods),
            allow_headers: AllowedHeaders::list(config.allow_headers),
            expose_headers: ExposedHeaders::list(config.expose_headers),
            max_age: config.max_age,
            preflight_status: config.preflight_status,
            reject_disallowed_preflight: config.reject_disallowed_preflight,
            error_message: config.error_message,
            buffering: config.buffering,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
