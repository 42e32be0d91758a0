//! Error types for the chat widget.

use thiserror::Error;

use crate::message::MessageId;

/// Failure talking to the backend chat endpoint.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// Transport failure or undecodable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status. The body is ignored.
    #[error("Server error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// `result` was present and truthy but not a string.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(serde_json::Value),

    /// The configured endpoint URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failure operating on the chat log or the submission pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No message with this id exists in the log.
    #[error("Unknown message: {0}")]
    UnknownMessage(MessageId),

    /// The message is not a placeholder awaiting its reply.
    #[error("Message {0} is not awaiting a reply")]
    NotPending(MessageId),

    /// The log stopped publishing updates.
    #[error("Chat log closed")]
    LogClosed,

    /// The reply task ended without reporting an outcome.
    #[error("Reply abandoned for message {0}")]
    ReplyAbandoned(MessageId),
}
