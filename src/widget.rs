//! The chat widget: submission, placeholder lifecycle and reply rendering.
//!
//! A submission appends the user's message and a "thinking" placeholder to
//! the [`ChatLog`], then sends exactly one request to the [`ChatEndpoint`].
//! When the request settles the placeholder is replaced in place with the
//! rendered reply or one of two fixed failure texts.
//!
//! # Submit policies
//!
//! - [`SubmitPolicy::Concurrent`]: every submission runs as its own task and
//!   replies land in whatever order the endpoint answers.
//! - [`SubmitPolicy::Queued`]: a single worker resolves submissions strictly
//!   in the order they were made, one request in flight at a time.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::chat_log::ChatLog;
use crate::endpoint::ChatEndpoint;
use crate::error::WidgetError;
use crate::markdown::render_markdown_lite;
use crate::message::{Content, MessageHandle, Sender};
use crate::wire::ChatRequest;

/// Placeholder text shown while a reply is outstanding.
pub const THINKING_TEXT: &str = "Gemini is Thinking...";

/// Shown when the endpoint answered but had no result.
pub const NO_RESPONSE_TEXT: &str = "Sorry, no response received.";

/// Shown when the endpoint could not be reached or answered with an error.
pub const FAILED_TEXT: &str = "Failed to get response from server.";

/// How overlapping submissions are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubmitPolicy {
    /// Fire-and-forget; each submission resolves independently.
    #[default]
    Concurrent,
    /// One request in flight; replies resolve in submission order.
    Queued,
}

impl SubmitPolicy {
    /// Name used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concurrent => "concurrent",
            Self::Queued => "queued",
        }
    }
}

/// Terminal state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was rendered as markup.
    Rendered,
    /// The endpoint answered without a result.
    NoResponse,
    /// The request failed.
    Failed,
}

/// An accepted submission.
#[derive(Debug)]
pub struct Submission {
    user: MessageHandle,
    placeholder: MessageHandle,
    outcome: oneshot::Receiver<ReplyOutcome>,
}

impl Submission {
    /// The user's message.
    pub fn user(&self) -> MessageHandle {
        self.user
    }

    /// The bot placeholder that will carry the reply.
    pub fn placeholder(&self) -> MessageHandle {
        self.placeholder
    }

    /// Wait for the placeholder to be resolved.
    pub async fn outcome(self) -> Result<ReplyOutcome, WidgetError> {
        let id = self.placeholder.id();
        self.outcome
            .await
            .map_err(|_dropped| WidgetError::ReplyAbandoned(id))
    }
}

struct Job {
    text: String,
    placeholder: MessageHandle,
    done: oneshot::Sender<ReplyOutcome>,
}

#[derive(Clone)]
enum Dispatcher {
    Concurrent(Arc<dyn ChatEndpoint>),
    Queued(mpsc::UnboundedSender<Job>),
}

/// The chat widget. Clones share the same log and dispatcher.
#[derive(Clone)]
pub struct ChatWidget {
    log: ChatLog,
    policy: SubmitPolicy,
    dispatcher: Dispatcher,
}

impl fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("messages", &self.log.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ChatWidget {
    /// Create a widget with an empty log.
    ///
    /// With [`SubmitPolicy::Queued`] this spawns the queue worker, so it must
    /// be called from within a tokio runtime.
    pub fn new(endpoint: Arc<dyn ChatEndpoint>, policy: SubmitPolicy) -> Self {
        Self::with_log(ChatLog::new(), endpoint, policy)
    }

    /// Create a widget on top of an existing log.
    pub fn with_log(log: ChatLog, endpoint: Arc<dyn ChatEndpoint>, policy: SubmitPolicy) -> Self {
        let dispatcher = match policy {
            SubmitPolicy::Concurrent => Dispatcher::Concurrent(endpoint),
            SubmitPolicy::Queued => {
                let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
                let worker_log = log.clone();
                tokio::spawn(async move {
                    while let Some(job) = rx.recv().await {
                        let outcome =
                            resolve_reply(&worker_log, endpoint.as_ref(), job.placeholder, &job.text)
                                .await;
                        let _ = job.done.send(outcome);
                    }
                    debug!(name: "chat.queue.stopped", "Submission queue worker stopped");
                });
                Dispatcher::Queued(tx)
            }
        };

        Self {
            log,
            policy,
            dispatcher,
        }
    }

    /// The shared chat log.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// Submit the user's input.
    ///
    /// Returns `None` without touching the log when the trimmed input is
    /// empty. Otherwise the user message and the placeholder are both in the
    /// log by the time this returns, and exactly one request has been
    /// dispatched.
    pub fn submit(&self, user_text: &str) -> Option<Submission> {
        let text = user_text.trim();
        if text.is_empty() {
            debug!(name: "chat.submit.ignored", "Ignoring empty submission");
            return None;
        }

        let user = self.log.append(Sender::User, text);
        let placeholder = self.log.append_placeholder(THINKING_TEXT);
        let (done, outcome) = oneshot::channel();

        info!(
            name: "chat.submitted",
            user_message_id = %user.id(),
            placeholder_id = %placeholder.id(),
            policy = ?self.policy,
            "Chat message submitted"
        );

        match &self.dispatcher {
            Dispatcher::Concurrent(endpoint) => {
                let endpoint = Arc::clone(endpoint);
                let log = self.log.clone();
                let text = text.to_string();
                tokio::spawn(async move {
                    let outcome = resolve_reply(&log, endpoint.as_ref(), placeholder, &text).await;
                    let _ = done.send(outcome);
                });
            }
            Dispatcher::Queued(queue) => {
                let job = Job {
                    text: text.to_string(),
                    placeholder,
                    done,
                };
                if let Err(mpsc::error::SendError(job)) = queue.send(job) {
                    // Worker is gone; settle the placeholder rather than leave it pending.
                    warn!(
                        name: "chat.queue.closed",
                        placeholder_id = %placeholder.id(),
                        "Submission queue closed"
                    );
                    let _ = self
                        .log
                        .replace_content(&job.placeholder, Content::Text(FAILED_TEXT.to_string()));
                    let _ = job.done.send(ReplyOutcome::Failed);
                }
            }
        }

        Some(Submission {
            user,
            placeholder,
            outcome,
        })
    }
}

/// Send `text` to the endpoint and settle `placeholder` with the result.
async fn resolve_reply(
    log: &ChatLog,
    endpoint: &dyn ChatEndpoint,
    placeholder: MessageHandle,
    text: &str,
) -> ReplyOutcome {
    let request = ChatRequest::from_user(text);

    let (content, outcome) = match endpoint.send(&request).await {
        Ok(response) => match response.into_reply() {
            Some(reply) => (
                Content::Markup(render_markdown_lite(&reply)),
                ReplyOutcome::Rendered,
            ),
            None => (
                Content::Text(NO_RESPONSE_TEXT.to_string()),
                ReplyOutcome::NoResponse,
            ),
        },
        Err(e) => {
            error!(
                name: "chat.reply.failed",
                placeholder_id = %placeholder.id(),
                error = %e,
                "Failed to fetch chat response"
            );
            (Content::Text(FAILED_TEXT.to_string()), ReplyOutcome::Failed)
        }
    };

    match log.replace_content(&placeholder, content) {
        Ok(_) => info!(
            name: "chat.reply.resolved",
            placeholder_id = %placeholder.id(),
            outcome = ?outcome,
            "Chat reply resolved"
        ),
        Err(e) => warn!(
            name: "chat.reply.unplaced",
            placeholder_id = %placeholder.id(),
            error = %e,
            "Could not place chat reply"
        ),
    }

    outcome
}
