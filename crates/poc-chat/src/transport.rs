//! Chat endpoint client: sends one user message, returns the raw event stream.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use poc_common::ConversationId;
use serde::Serialize;
use tracing::debug;

use crate::ChatError;

/// Response body as a stream of network chunks.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Body of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// `null` until the backend has assigned an id.
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<ConversationId>,
}

/// Opens the streaming response for a chat request.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError>;
}

/// Where and how to reach the chat endpoint.
#[derive(Clone)]
pub struct EndpointConfig {
    pub url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// `reqwest`-backed transport. No overall request timeout: a reply may
/// stream for as long as the backend keeps sending.
pub struct HttpTransport {
    config: EndpointConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: EndpointConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ChatError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        debug!(
            url = %self.config.url,
            has_conversation = request.conversation_id.is_some(),
            "chat request"
        );

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        check_status(response).await.map(|response| {
            response
                .bytes_stream()
                .map_err(std::io::Error::other)
                .boxed()
        })
    }
}

/// Turn a non-success response into the matching error.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ChatError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(ChatError::Api(format!("HTTP {status}: {text}")));
    }
    Ok(response)
}
