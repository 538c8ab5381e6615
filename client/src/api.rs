//! REST client for the notification endpoints.
//!
//! Collaborator contract (JSON bodies, Bearer auth):
//! ```text
//! GET    /notifications/?limit=N   history, newest first
//! PUT    /notifications/{id}/read  mark one read
//! PUT    /notifications/read-all   mark all read
//! DELETE /notifications/           clear history
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper::header;
use hyper::{Method, Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use shared::types::{NotificationRecord, StreamError, StreamResult};

use crate::token::TokenSource;

#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Full history fetch, newest first.
    async fn history(&self, limit: u32) -> StreamResult<Vec<NotificationRecord>>;
    async fn mark_read(&self, id: i64) -> StreamResult<()>;
    async fn mark_all_read(&self) -> StreamResult<()>;
    async fn clear_all(&self) -> StreamResult<()>;
}

/// hyper-backed implementation against the 3F backend.
pub struct HttpNotificationApi {
    rest_root: String,
    tokens: Arc<dyn TokenSource>,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpNotificationApi {
    /// `rest_root` is the API root without a trailing slash, e.g.
    /// `"http://127.0.0.1:8000/api"`.
    pub fn new(rest_root: String, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            rest_root,
            tokens,
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    async fn send(&self, method: Method, url: String) -> StreamResult<Response<Incoming>> {
        let token = self.tokens.load().ok_or(StreamError::MissingToken)?;
        debug!("{} {}", method, url);

        let req = Request::builder()
            .method(method)
            .uri(&url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::ACCEPT, "application/json")
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
        Ok(res)
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn history(&self, limit: u32) -> StreamResult<Vec<NotificationRecord>> {
        let url = format!("{}/notifications/?limit={}", self.rest_root, limit);
        let res = self.send(Method::GET, url).await?;

        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| StreamError::Body(e.to_string()))?
            .to_bytes();

        let records: Vec<NotificationRecord> = serde_json::from_slice(&body)?;
        Ok(records)
    }

    async fn mark_read(&self, id: i64) -> StreamResult<()> {
        let url = format!("{}/notifications/{}/read", self.rest_root, id);
        self.send(Method::PUT, url).await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> StreamResult<()> {
        let url = format!("{}/notifications/read-all", self.rest_root);
        self.send(Method::PUT, url).await?;
        Ok(())
    }

    async fn clear_all(&self) -> StreamResult<()> {
        let url = format!("{}/notifications/", self.rest_root);
        self.send(Method::DELETE, url).await?;
        Ok(())
    }
}
