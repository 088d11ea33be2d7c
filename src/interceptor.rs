use crate::event::{BodyChunk, BoxError, ResponseEvent, ResponseSink, ResponseStart};
use crate::headers::Headers;
use crate::result::{CorsError, ProtocolViolation};
use futures::future::BoxFuture;
use serde::Deserialize;

/// When intercepted events are released to the real response channel.
///
/// Until the first event is released the response is not committed and a
/// handler failure can still be answered with a fresh error response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseBuffering {
    /// Hold the start event until the first body chunk arrives.
    #[default]
    Start,
    /// Hold every event until the final body chunk arrives.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    AwaitingStart,
    Streaming,
    Complete,
}

/// Per-request hook over the outbound response events.
pub trait ResponseInterceptor: Send {
    fn on_start(&mut self, start: ResponseStart) -> Result<ResponseStart, ProtocolViolation>;

    fn on_body_chunk(&mut self, chunk: BodyChunk) -> Result<BodyChunk, ProtocolViolation>;

    fn phase(&self) -> StreamPhase;
}

/// Merges a fixed CORS header set into the start event and checks event order.
#[derive(Debug, Clone)]
pub struct CorsHeaderInterceptor {
    cors_headers: Headers,
    phase: StreamPhase,
}

impl CorsHeaderInterceptor {
    pub fn new(cors_headers: Headers) -> Self {
        Self {
            cors_headers,
            phase: StreamPhase::AwaitingStart,
        }
    }
}

impl ResponseInterceptor for CorsHeaderInterceptor {
    fn on_start(&mut self, mut start: ResponseStart) -> Result<ResponseStart, ProtocolViolation> {
        if self.phase != StreamPhase::AwaitingStart {
            return Err(ProtocolViolation::DuplicateStart);
        }
        start.headers.merge(&self.cors_headers);
        self.phase = StreamPhase::Streaming;
        Ok(start)
    }

    fn on_body_chunk(&mut self, chunk: BodyChunk) -> Result<BodyChunk, ProtocolViolation> {
        match self.phase {
            StreamPhase::AwaitingStart => Err(ProtocolViolation::BodyBeforeStart),
            StreamPhase::Complete => Err(ProtocolViolation::BodyAfterCompletion),
            StreamPhase::Streaming => {
                if !chunk.more_follows {
                    self.phase = StreamPhase::Complete;
                }
                Ok(chunk)
            }
        }
    }

    fn phase(&self) -> StreamPhase {
        self.phase
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SinkFault {
    Protocol(ProtocolViolation),
    Transport,
}

impl SinkFault {
    fn to_error(&self) -> BoxError {
        match self {
            SinkFault::Protocol(violation) => Box::new(CorsError::Protocol(violation.clone())),
            SinkFault::Transport => Box::new(CorsError::Transport(
                "response channel already failed".into(),
            )),
        }
    }
}

/// Response channel handed to the downstream pipeline in place of the real one.
///
/// Every event passes through the interceptor, then waits in a buffer until
/// the [`ResponseBuffering`] policy releases it to the wrapped channel.
pub struct InterceptingSink<'a, I> {
    inner: &'a mut dyn ResponseSink,
    interceptor: I,
    buffering: ResponseBuffering,
    pending: Vec<ResponseEvent>,
    committed: bool,
    fault: Option<SinkFault>,
}

impl<'a, I: ResponseInterceptor> InterceptingSink<'a, I> {
    pub fn new(inner: &'a mut dyn ResponseSink, interceptor: I, buffering: ResponseBuffering) -> Self {
        Self {
            inner,
            interceptor,
            buffering,
            pending: Vec::with_capacity(2),
            committed: false,
            fault: None,
        }
    }

    /// True once any event reached the wrapped channel.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn violation(&self) -> Option<&ProtocolViolation> {
        match &self.fault {
            Some(SinkFault::Protocol(violation)) => Some(violation),
            _ => None,
        }
    }

    pub fn transport_failed(&self) -> bool {
        matches!(self.fault, Some(SinkFault::Transport))
    }

    /// Finishes a pipeline run that returned normally: releases whatever is
    /// still buffered, or reports the protocol violation or channel failure
    /// that was observed.
    pub async fn complete(mut self) -> Result<(), CorsError> {
        match self.fault.take() {
            Some(SinkFault::Protocol(violation)) => return Err(CorsError::Protocol(violation)),
            Some(SinkFault::Transport) => {
                return Err(CorsError::Transport(
                    "response channel already failed".into(),
                ));
            }
            None => {}
        }

        if self.interceptor.phase() == StreamPhase::AwaitingStart {
            return Err(CorsError::Protocol(ProtocolViolation::MissingStart));
        }

        self.flush().await.map_err(CorsError::Transport)
    }

    /// Drops anything buffered and hands back the wrapped channel.
    pub fn discard(self) -> &'a mut dyn ResponseSink {
        self.inner
    }

    async fn flush(&mut self) -> Result<(), BoxError> {
        for event in self.pending.drain(..) {
            self.committed = true;
            if let Err(err) = self.inner.send(event).await {
                self.fault = Some(SinkFault::Transport);
                return Err(err);
            }
        }
        Ok(())
    }

    fn releases(&self, event: &ResponseEvent) -> bool {
        match (event, self.buffering) {
            (ResponseEvent::Start(_), _) => false,
            (ResponseEvent::BodyChunk(_), ResponseBuffering::Start) => true,
            (ResponseEvent::BodyChunk(chunk), ResponseBuffering::Full) => !chunk.more_follows,
        }
    }
}

impl<I: ResponseInterceptor> ResponseSink for InterceptingSink<'_, I> {
    fn send(&mut self, event: ResponseEvent) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(async move {
            if let Some(fault) = &self.fault {
                return Err(fault.to_error());
            }

            let intercepted = match event {
                ResponseEvent::Start(start) => {
                    self.interceptor.on_start(start).map(ResponseEvent::Start)
                }
                ResponseEvent::BodyChunk(chunk) => self
                    .interceptor
                    .on_body_chunk(chunk)
                    .map(ResponseEvent::BodyChunk),
            };

            let event = match intercepted {
                Ok(event) => event,
                Err(violation) => {
                    let err = SinkFault::Protocol(violation);
                    let boxed = err.to_error();
                    self.fault = Some(err);
                    return Err(boxed);
                }
            };

            let release = self.releases(&event);
            self.pending.push(event);
            if release {
                self.flush().await?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;
