//! Exception-aware CORS middleware.
//!
//! [`CorsPolicy`] decides which CORS headers a request earns. [`CorsMiddleware`]
//! wraps any [`Pipeline`] and makes sure those headers reach the client on every
//! outcome: a successful response, an error response produced further down the
//! stack, or a failure (error or panic) that escapes the pipeline entirely.
//!
//! ```no_run
//! use std::sync::Arc;
//! use bunner_cors_guard::{AllowOrigins, CorsMiddleware, CorsOptions, CorsPolicy, Pipeline};
//!
//! fn wrap<P: Pipeline>(app: P) -> CorsMiddleware<P> {
//!     let options = CorsOptions::new()
//!         .allow_origins(AllowOrigins::any())
//!         .allow_credentials(true);
//!     let policy = CorsPolicy::new(options).expect("valid CORS configuration");
//!     CorsMiddleware::new(Arc::new(policy), app)
//! }
//! ```

pub mod constants;

mod allowed_headers;
mod allowed_methods;
mod config;
mod context;
mod error_response;
mod event;
mod exposed_headers;
mod headers;
mod interceptor;
mod middleware;
mod options;
mod origin;
mod policy;
mod result;
mod util;

pub use allowed_headers::AllowedHeaders;
pub use allowed_methods::AllowedMethods;
pub use config::{CorsConfig, OriginsConfig};
pub use context::RequestContext;
pub use error_response::ErrorResponse;
pub use event::{
    BodyChunk, BoxError, Pipeline, Receive, RequestEvent, ResponseEvent, ResponseSink,
    ResponseStart, send_response,
};
pub use exposed_headers::ExposedHeaders;
pub use headers::Headers;
pub use interceptor::{
    CorsHeaderInterceptor, InterceptingSink, ResponseBuffering, ResponseInterceptor, StreamPhase,
};
pub use middleware::{CorsMiddleware, SharedPolicy};
pub use options::{CorsOptions, DEFAULT_ERROR_MESSAGE, DEFAULT_MAX_AGE, ValidationError};
pub use origin::{AllowOrigins, OriginPattern, PatternError};
pub use policy::CorsPolicy;
pub use result::{CorsError, HandlerPanic, PreflightResponse, ProtocolViolation};
