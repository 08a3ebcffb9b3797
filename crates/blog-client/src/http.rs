//! Reqwest-backed [`PostsApi`] adapter.
//!
//! This adapter owns transport details only: URL construction, timeouts,
//! status mapping and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::api::PostsApi;
use crate::error::ClientError;
use crate::model::{PostView, ReactionDirection, ReactionKind};

/// Error payload returned by the server for non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Blog API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPostsApi {
    client: Client,
    base: Url,
}

impl HttpPostsApi {
    /// Build an adapter for the server at `base`, e.g. `http://localhost:3000`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] when `base` cannot carry a path or
    /// the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::transport(format!("{base} is not a base URL")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::transport(err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::transport(format!("{} is not a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, ClientError> {
        let response = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;
        Err(status_error(status.as_u16(), &body))
    }
}

fn status_error(status: u16, body: &[u8]) -> ClientError {
    let payload = serde_json::from_slice::<ErrorBody>(body).ok();
    let code = payload.as_ref().and_then(|p| p.code.clone());
    let message = payload
        .and_then(|p| p.message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());
    ClientError::Status {
        status,
        code,
        message,
    }
}

fn reaction_count(body: &Value, kind: ReactionKind) -> Result<u64, ClientError> {
    body.get(kind.counter_field())
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            ClientError::decode(format!(
                "reaction response lacks a `{}` count",
                kind.counter_field()
            ))
        })
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list_posts(&self) -> Result<Vec<PostView>, ClientError> {
        let url = self.endpoint(&["api", "posts"])?;
        self.send(Method::GET, url)
            .await?
            .json()
            .await
            .map_err(|err| ClientError::decode(err.to_string()))
    }

    async fn react(
        &self,
        post_id: &str,
        kind: ReactionKind,
        direction: ReactionDirection,
    ) -> Result<u64, ClientError> {
        let url = self.endpoint(&["api", "posts", post_id, kind.path_segment()])?;
        let method = match direction {
            ReactionDirection::Add => Method::POST,
            ReactionDirection::Remove => Method::DELETE,
        };
        let body: Value = self
            .send(method, url)
            .await?
            .json()
            .await
            .map_err(|err| ClientError::decode(err.to_string()))?;
        reaction_count(&body, kind)
    }
}
