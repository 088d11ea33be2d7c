//! A small demo application shaped like a typical web stack:
//!
//! `ServerErrorGuard` (outermost catch-all) → optional `CorsMiddleware`
//! → `HttpExceptionTranslator` → `DemoRouter`.

use bunner_cors_guard::constants::{content_type, header, status};
use bunner_cors_guard::{
    BoxError, CorsMiddleware, Headers, Pipeline, Receive, RequestContext, ResponseSink,
    SharedPolicy, send_response,
};
use bytes::Bytes;
use futures::future::BoxFuture;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Error a handler raises when it wants a specific status and detail message.
#[derive(Debug)]
pub struct HttpException {
    pub status: u16,
    pub detail: String,
}

impl fmt::Display for HttpException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.detail)
    }
}

impl std::error::Error for HttpException {}

/// Arbitrary failure that nothing below the outer catch-all understands.
#[derive(Debug)]
pub struct UnhandledFailure(pub &'static str);

impl fmt::Display for UnhandledFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for UnhandledFailure {}

fn json_response(body: serde_json::Value) -> (Headers, Bytes) {
    let body = Bytes::from(body.to_string());
    let mut headers = Headers::new();
    headers.insert(header::CONTENT_TYPE, content_type::JSON);
    headers.insert(header::CONTENT_LENGTH, body.len().to_string());
    (headers, body)
}

async fn failing_dependency() -> Result<String, BoxError> {
    Err(Box::new(UnhandledFailure("Exception raised in dependency!")))
}

async fn failing_http_dependency() -> Result<String, BoxError> {
    Err(Box::new(HttpException {
        status: status::INTERNAL_SERVER_ERROR,
        detail: "HTTPException in dependency!".into(),
    }))
}

/// Route table of the demo application. Counts every invocation.
#[derive(Default)]
pub struct DemoRouter {
    calls: AtomicUsize,
}

impl DemoRouter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn route(
        &self,
        request: &RequestContext,
        send: &mut dyn ResponseSink,
    ) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match request.path() {
            "/health" => {
                let (headers, body) = json_response(json!({ "message": "I'm healthy!" }));
                send_response(send, status::OK, headers, body).await
            }
            "/exception" => Err(Box::new(UnhandledFailure("General exception occurred!"))),
            "/exception/http" => Err(Box::new(HttpException {
                status: status::INTERNAL_SERVER_ERROR,
                detail: "HTTPException occurred!".into(),
            })),
            "/exception/depend" => {
                let thing = failing_dependency().await?;
                let (headers, body) = json_response(json!({ "message": thing }));
                send_response(send, status::OK, headers, body).await
            }
            "/exception/http/depend" => {
                let thing = failing_http_dependency().await?;
                let (headers, body) = json_response(json!({ "message": thing }));
                send_response(send, status::OK, headers, body).await
            }
            "/panic" => panic!("handler blew up"),
            _ => {
                let (headers, body) = json_response(json!({ "detail": "Not Found" }));
                send_response(send, 404, headers, body).await
            }
        }
    }
}

impl Pipeline for DemoRouter {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        _receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.route(request, send))
    }
}

/// Turns [`HttpException`] into a JSON response; every other error propagates.
pub struct HttpExceptionTranslator<P> {
    inner: P,
}

impl<P: Pipeline> Pipeline for HttpExceptionTranslator<P> {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            match self.inner.call(request, receive, send).await {
                Err(err) => match err.downcast::<HttpException>() {
                    Ok(exception) => {
                        let (headers, body) = json_response(json!({ "detail": exception.detail }));
                        send_response(send, exception.status, headers, body).await
                    }
                    Err(other) => Err(other),
                },
                ok => ok,
            }
        })
    }
}

/// Outermost catch-all: any error that reaches it becomes a plain 500 without
/// CORS headers.
pub struct ServerErrorGuard<P> {
    inner: P,
}

impl<P: Pipeline> Pipeline for ServerErrorGuard<P> {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            match self.inner.call(request, receive, send).await {
                Err(_) => {
                    let (headers, body) = json_response(json!({ "message": "error" }));
                    send_response(send, status::INTERNAL_SERVER_ERROR, headers, body).await
                }
                ok => ok,
            }
        })
    }
}

pub type GuardedApp = ServerErrorGuard<CorsMiddleware<HttpExceptionTranslator<Arc<DemoRouter>>>>;

/// The demo stack with the CORS middleware installed.
pub fn app(policy: SharedPolicy) -> (GuardedApp, Arc<DemoRouter>) {
    let router = Arc::new(DemoRouter::default());
    let translator = HttpExceptionTranslator {
        inner: Arc::clone(&router),
    };
    let app = ServerErrorGuard {
        inner: CorsMiddleware::new(policy, translator),
    };
    (app, router)
}

/// The same stack with no CORS layer, for comparison.
pub fn app_without_cors() -> ServerErrorGuard<HttpExceptionTranslator<Arc<DemoRouter>>> {
    ServerErrorGuard {
        inner: HttpExceptionTranslator {
            inner: Arc::new(DemoRouter::default()),
        },
    }
}
