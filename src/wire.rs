//! JSON entities exchanged with the backend chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EndpointError;

/// Role of a message in the outbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// One entry of [`ChatRequest::messages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    /// A request carrying a single user message.
    #[must_use]
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![WireMessage {
                role: Role::User,
                content: content.into(),
            }],
        }
    }
}

/// Body returned by the chat endpoint. Only `result` is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ChatResponse {
    /// A response carrying `result`.
    #[must_use]
    pub fn with_result(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
        }
    }

    /// Interpret a decoded response body.
    ///
    /// Only an object with a truthy `result` carries a reply; every other
    /// shape (`null`, a bare string, an array, a falsy `result`) means the
    /// endpoint had nothing to say. A truthy `result` that is not a string
    /// is rejected.
    pub fn from_body(body: &Value) -> Result<Self, EndpointError> {
        let Some(result) = body.as_object().and_then(|o| o.get("result")) else {
            return Ok(Self::default());
        };

        match result {
            Value::String(text) if !text.is_empty() => Ok(Self::with_result(text.clone())),
            other if !is_truthy(other) => Ok(Self::default()),
            other => Err(EndpointError::UnexpectedResult(other.clone())),
        }
    }

    /// The reply text, if the endpoint had anything to say.
    ///
    /// An empty string counts as no reply.
    #[must_use]
    pub fn into_reply(self) -> Option<String> {
        self.result.filter(|r| !r.is_empty())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
