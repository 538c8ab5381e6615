//! Push transport abstraction plus the real SSE implementation.
//!
//! The stream client never talks to hyper directly; it consumes
//! [`TransportEvent`]s from whatever [`PushTransport`] it was constructed
//! with, so tests can drive it without a network.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header;
use hyper::Request;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shared::types::{StreamError, StreamResult};

use crate::sse::SseDecoder;

// ---------------------------------------------------------------------------
// Transport events and handle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One complete pushed payload (the `data:` field of an SSE frame).
    Message(String),
    /// The transport failed or the server closed the stream.
    Error(String),
}

/// Receiving end of one open push connection.
///
/// Dropping the handle aborts the background read task, so a fresh
/// `connect()` supersedes the old connection simply by replacing its handle.
pub struct PushHandle {
    rx: mpsc::Receiver<TransportEvent>,
    task: Option<JoinHandle<()>>,
}

impl PushHandle {
    pub fn from_parts(rx: mpsc::Receiver<TransportEvent>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    /// Next event, or `None` once the transport side is gone.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.rx.recv().await
    }
}

impl Drop for PushHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open the push connection. Resolving `Ok` *is* the open signal: the
    /// handshake completed and events will arrive on the returned handle.
    async fn open(&self, token: &str) -> StreamResult<PushHandle>;
}

// ---------------------------------------------------------------------------
// Real SSE transport
// ---------------------------------------------------------------------------

/// SSE over a hyper HTTP/1.1 client.
pub struct SseTransport {
    endpoint: String,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl SseTransport {
    /// `endpoint` is the full stream URL without the token query, e.g.
    /// `"http://127.0.0.1:8000/api/notifications/stream"`.
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

#[async_trait]
impl PushTransport for SseTransport {
    async fn open(&self, token: &str) -> StreamResult<PushHandle> {
        // Token travels as a query parameter: the browser EventSource this
        // mirrors cannot set custom headers, and the backend only reads the
        // param on this endpoint.
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token)
            .finish();
        let uri = format!("{}?{}", self.endpoint, query);

        let req = Request::builder()
            .uri(&uri)
            .header(header::ACCEPT, "text/event-stream")
            .body(Empty::<Bytes>::new())
            .map_err(|e| StreamError::Connect(e.to_string()))?;

        let res = self
            .client
            .request(req)
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;

        if !res.status().is_success() {
            return Err(StreamError::BadStatus(res.status().as_u16()));
        }

        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("text/event-stream") {
            return Err(StreamError::BadContentType(content_type.to_string()));
        }

        info!("Notification stream open: {}", self.endpoint);

        let (tx, rx) = mpsc::channel(64);
        let mut body = res.into_body();

        let task = tokio::spawn(async move {
            let mut decoder = SseDecoder::new();
            while let Some(frame) = body.frame().await {
                match frame {
                    Ok(frame) => {
                        if let Some(data) = frame.data_ref() {
                            for payload in decoder.feed(data) {
                                debug!("Stream payload ({} bytes)", payload.len());
                                if tx.send(TransportEvent::Message(payload)).await.is_err() {
                                    // client side went away
                                    return;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Notification stream body error: {}", e);
                        let _ = tx.send(TransportEvent::Error(e.to_string())).await;
                        return;
                    }
                }
            }
            let _ = tx
                .send(TransportEvent::Error("stream ended by server".to_string()))
                .await;
        });

        Ok(PushHandle::from_parts(rx, Some(task)))
    }
}
