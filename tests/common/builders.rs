use bunner_cors_guard::constants::{header, method};
use bunner_cors_guard::{
    AllowOrigins, AllowedHeaders, AllowedMethods, CorsOptions, CorsPolicy, ExposedHeaders,
    RequestContext, ResponseBuffering, SharedPolicy,
};
use std::sync::Arc;

#[derive(Default)]
pub struct PolicyBuilder {
    options: CorsOptions,
}

impl PolicyBuilder {
    pub fn origins(mut self, origins: AllowOrigins) -> Self {
        self.options = self.options.allow_origins(origins);
        self
    }

    pub fn any_origin(self) -> Self {
        self.origins(AllowOrigins::any())
    }

    pub fn credentials(mut self, enabled: bool) -> Self {
        self.options = self.options.allow_credentials(enabled);
        self
    }

    pub fn methods(mut self, methods: AllowedMethods) -> Self {
        self.options = self.options.allow_methods(methods);
        self
    }

    pub fn headers(mut self, headers: AllowedHeaders) -> Self {
        self.options = self.options.allow_headers(headers);
        self
    }

    pub fn expose<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.expose_headers(ExposedHeaders::list(values));
        self
    }

    pub fn buffering(mut self, buffering: ResponseBuffering) -> Self {
        self.options = self.options.buffering(buffering);
        self
    }

    pub fn build(self) -> SharedPolicy {
        Arc::new(CorsPolicy::new(self.options).expect("valid CORS options"))
    }
}

pub fn policy() -> PolicyBuilder {
    PolicyBuilder::default()
}

/// The configuration the demo application ships with: every origin, method and
/// header, with credentials.
pub fn permissive_policy() -> SharedPolicy {
    policy()
        .any_origin()
        .credentials(true)
        .methods(AllowedMethods::any())
        .headers(AllowedHeaders::any())
        .build()
}

pub struct RequestBuilder {
    context: RequestContext,
}

impl RequestBuilder {
    pub fn origin(self, origin: &str) -> Self {
        self.header(header::ORIGIN, origin)
    }

    pub fn cookie(self, value: &str) -> Self {
        self.header(header::COOKIE, value)
    }

    pub fn request_method(self, value: &str) -> Self {
        self.header(header::ACCESS_CONTROL_REQUEST_METHOD, value)
    }

    pub fn request_headers(self, value: &str) -> Self {
        self.header(header::ACCESS_CONTROL_REQUEST_HEADERS, value)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.context = self.context.header(name, value);
        self
    }

    pub fn build(self) -> RequestContext {
        self.context
    }
}

pub fn get(path: &str) -> RequestBuilder {
    RequestBuilder {
        context: RequestContext::new(method::GET, path),
    }
}

pub fn preflight(path: &str) -> RequestBuilder {
    RequestBuilder {
        context: RequestContext::new(method::OPTIONS, path),
    }
}
