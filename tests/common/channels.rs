use bunner_cors_guard::{
    BodyChunk, BoxError, Headers, Pipeline, Receive, RequestContext, RequestEvent,
    ResponseEvent, ResponseSink,
};
use bytes::Bytes;
use futures::future::BoxFuture;

/// Request channel for body-less requests.
pub struct EmptyReceive;

impl Receive for EmptyReceive {
    fn receive(&mut self) -> BoxFuture<'_, Result<RequestEvent, BoxError>> {
        Box::pin(async {
            Ok(RequestEvent::Body(BodyChunk {
                bytes: Bytes::new(),
                more_follows: false,
            }))
        })
    }
}

/// Transport stand-in that records every event it is handed.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ResponseEvent>,
}

impl ResponseSink for RecordingSink {
    fn send(&mut self, event: ResponseEvent) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(async move {
            self.events.push(event);
            Ok(())
        })
    }
}

/// A response reassembled from recorded events.
#[derive(Debug)]
pub struct RecordedResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl RecordedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    pub fn body_text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("utf-8 body")
    }

    pub fn has_any_cors_header(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.starts_with("access-control-"))
    }
}

impl RecordingSink {
    pub fn response(&self) -> RecordedResponse {
        let mut starts = self.events.iter().filter_map(|event| match event {
            ResponseEvent::Start(start) => Some(start),
            ResponseEvent::BodyChunk(_) => None,
        });
        let start = starts.next().expect("a start event was emitted");
        assert!(starts.next().is_none(), "more than one start event emitted");

        let body = self
            .events
            .iter()
            .filter_map(|event| match event {
                ResponseEvent::BodyChunk(chunk) => Some(chunk.bytes.to_vec()),
                ResponseEvent::Start(_) => None,
            })
            .flatten()
            .collect();

        RecordedResponse {
            status: start.status,
            headers: start.headers.clone(),
            body,
        }
    }
}

/// Runs one request through `pipeline` and returns its outcome with the
/// recorded output.
pub async fn dispatch<P: Pipeline + ?Sized>(
    pipeline: &P,
    request: &RequestContext,
) -> (Result<(), BoxError>, RecordingSink) {
    let mut receive = EmptyReceive;
    let mut sink = RecordingSink::default();
    let outcome = pipeline.call(request, &mut receive, &mut sink).await;
    (outcome, sink)
}
