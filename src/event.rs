//! The three-part message interface shared by the transport, the middleware
//! and the handler pipeline.
//!
//! A pipeline reads request events from a [`Receive`] channel and answers with
//! exactly one [`ResponseEvent::Start`] followed by body chunks on a
//! [`ResponseSink`], the last one with `more_follows == false`. Because
//! [`crate::CorsMiddleware`] implements [`Pipeline`] as well, middlewares stack.

use crate::context::RequestContext;
use crate::headers::Headers;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::sync::Arc;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStart {
    pub status: u16,
    pub headers: Headers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyChunk {
    pub bytes: Bytes,
    pub more_follows: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    Start(ResponseStart),
    BodyChunk(BodyChunk),
}

impl ResponseEvent {
    pub fn start(status: u16, headers: Headers) -> Self {
        Self::Start(ResponseStart { status, headers })
    }

    pub fn body(bytes: impl Into<Bytes>, more_follows: bool) -> Self {
        Self::BodyChunk(BodyChunk {
            bytes: bytes.into(),
            more_follows,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    Body(BodyChunk),
    Disconnect,
}

pub trait Receive: Send {
    fn receive(&mut self) -> BoxFuture<'_, Result<RequestEvent, BoxError>>;
}

pub trait ResponseSink: Send {
    fn send(&mut self, event: ResponseEvent) -> BoxFuture<'_, Result<(), BoxError>>;
}

/// "The rest of the pipeline": anything that can answer a request.
pub trait Pipeline: Send + Sync {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

impl<P: Pipeline + ?Sized> Pipeline for Arc<P> {
    fn call<'a>(
        &'a self,
        request: &'a RequestContext,
        receive: &'a mut dyn Receive,
        send: &'a mut dyn ResponseSink,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        (**self).call(request, receive, send)
    }
}

/// Emits a complete response: one start event and a single final body chunk.
pub async fn send_response(
    send: &mut dyn ResponseSink,
    status: u16,
    headers: Headers,
    body: Bytes,
) -> Result<(), BoxError> {
    send.send(ResponseEvent::start(status, headers)).await?;
    send.send(ResponseEvent::body(body, false)).await
}
