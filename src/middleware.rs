//! Response stream interceptor.
//!
//! [`CorsMiddleware`] sits in front of a [`Pipeline`] and guarantees that every
//! response to a cross-origin request carries the CORS headers its policy
//! grants, including the response produced when the pipeline fails.
//!
//! Per request the middleware takes exactly one path:
//!
//! - no `Origin` header: the pipeline runs with the caller's channels untouched,
//!   and its errors propagate unchanged to the outer error handler;
//! - preflight: a synthesized response is emitted and the pipeline is never called;
//! - otherwise: the pipeline runs against an [`InterceptingSink`] that merges the
//!   CORS headers into the start event. If the pipeline returns an error or
//!   panics before the response is committed, the buffered output is dropped
//!   and an [`ErrorResponse`] carrying the same CORS headers is emitted on the
//!   original channel.
use crate::context::RequestContext;
use crate::error_response::ErrorResponse;
use crate::event::{BoxError, Pipeline, Receive, ResponseSink};
use crate::interceptor::{CorsHeaderInterceptor, InterceptingSink};
use crate::policy::CorsPolicy;
use crate::result::{CorsError, HandlerPanic};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, debug_span, error, trace};

pub type SharedPolicy = Arc<CorsPolicy>;

/// CORS-enforcing middleware around an inner pipeline.
///
/// Register it outermost relative to any error-to-response translator, so
/// that no error response can leave the stack without passing through it.
#[derive(Clone)]
pub struct CorsMiddleware<P> {
    policy: SharedPolicy,
    inner: P,
}

impl<P> CorsMiddleware<P> {
    pub fn new(policy: SharedPolicy, inner: P) -> Self {
        Self { policy, inner }
    }

    pub fn policy(&self) -> &CorsPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Pipeline> CorsMiddleware<P> {
    async fn handle(
        &self,
        request: &RequestContext,
        receive: &mut dyn Receive,
        send: &mut dyn ResponseSink,
    ) -> Result<(), BoxError> {
        let Some(origin) = request.origin() else {
            trace!("no Origin header, passing request through");
            return self.inner.call(request, receive, send).await;
        };

        if request.is_preflight() {
            let response = self.policy.preflight_response(request);
            debug!(origin, status = response.status, "answering preflight");
            return response
                .emit(send)
                .await
                .map_err(|err| CorsError::Transport(err).into());
        }

        self.intercept(request, origin, receive, send)
            .await
            .map_err(BoxError::from)
    }

    async fn intercept(
        &self,
        request: &RequestContext,
        origin: &str,
        receive: &mut dyn Receive,
        send: &mut dyn ResponseSink,
    ) -> Result<(), CorsError> {
        let cors_headers = self
            .policy
            .headers_for_simple_request(origin, request.has_cookie());

        let mut sink = InterceptingSink::new(
            send,
            CorsHeaderInterceptor::new(cors_headers.clone()),
            self.policy.buffering(),
        );

        let outcome = AssertUnwindSafe(self.inner.call(request, receive, &mut sink))
            .catch_unwind()
            .await;

        let failure: BoxError = match outcome {
            Ok(Ok(())) => {
                let completed = sink.complete().await;
                if let Err(CorsError::Protocol(violation)) = &completed {
                    error!(%violation, "downstream pipeline broke the response protocol");
                }
                return completed;
            }
            Ok(Err(err)) => err,
            Err(payload) => Box::new(HandlerPanic::from_payload(payload)),
        };

        if let Some(violation) = sink.violation() {
            error!(%violation, error = %failure, "downstream pipeline broke the response protocol");
            return Err(CorsError::Protocol(violation.clone()));
        }

        if sink.transport_failed() {
            return Err(CorsError::Transport(failure));
        }

        if sink.is_committed() {
            error!(
                error = %failure,
                "request handler failed after the response was committed; cannot replace it"
            );
            return Err(CorsError::HandlerFailedAfterCommit { source: failure });
        }

        error!(error = %failure, "request handler failed, emitting CORS-annotated error response");

        let response = ErrorResponse::new(self.policy.error_message(), &cors_headers);
        debug!(status = response.status(), "emitting synthesized error response");
        response
            .emit(sink.discard())
            .await
            .map_err(CorsError::Transport)
    }
}

impl<P: Pipeline> Pipeline for CorsMiddleware<P> {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        let span = debug_span!("cors", method = %request.method(), path = %request.path());
        Box::pin(self.handle(request, receive, send).instrument(span))
    }
}

#[cfg(test)]
#[path = "middleware_test.rs"]
mod middleware_test;
