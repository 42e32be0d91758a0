//! Backend chat endpoint.
//!
//! The endpoint is an opaque collaborator: the widget only knows that a
//! [`ChatRequest`] goes in and a [`ChatResponse`] (or an error) comes out.
//! [`HttpChatEndpoint`] is the production implementation; tests substitute
//! their own.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::EndpointError;
use crate::wire::{ChatRequest, ChatResponse};

/// Default path of the chat endpoint on the backend.
pub const DEFAULT_CHAT_PATH: &str = "/api/chat";

/// Something that can answer a chat request.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send one request and wait for its response.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, EndpointError>;
}

/// Chat endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatEndpoint {
    url: Url,
    http: reqwest::Client,
}

impl HttpChatEndpoint {
    /// Create an endpoint for `path` on `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend origin (e.g., "http://localhost:8080")
    /// * `path` - Endpoint path (e.g., "/api/chat")
    pub fn new(base_url: impl AsRef<str>, path: &str) -> Result<Self, EndpointError> {
        Self::with_client(base_url, path, reqwest::Client::new())
    }

    /// Create an endpoint with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        path: &str,
        http: reqwest::Client,
    ) -> Result<Self, EndpointError> {
        let url = Url::parse(base_url.as_ref())?.join(path)?;
        Ok(Self { url, http })
    }

    /// The fully resolved endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, EndpointError> {
        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        ChatResponse::from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_path() {
        let endpoint = HttpChatEndpoint::new("http://localhost:8080", DEFAULT_CHAT_PATH).unwrap();
        assert_eq!(endpoint.url().as_str(), "http://localhost:8080/api/chat");
    }

    #[test]
    fn test_absolute_path_replaces_base_path() {
        let endpoint = HttpChatEndpoint::new("http://localhost:8080/app/", "/api/chat").unwrap();
        assert_eq!(endpoint.url().as_str(), "http://localhost:8080/api/chat");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpChatEndpoint::new("not a url", DEFAULT_CHAT_PATH);
        assert!(matches!(result, Err(EndpointError::InvalidUrl(_))));
    }
}
