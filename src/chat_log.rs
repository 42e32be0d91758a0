//! Shared, append-only chat log.
//!
//! The log is the widget's equivalent of the message container on the page:
//! messages are only ever appended, and the single exception to immutability
//! is a placeholder whose content is replaced exactly once when its reply
//! arrives.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::chat_log::ChatLog;
//! use chat_widget::message::{Content, Sender};
//!
//! let log = ChatLog::new();
//! log.append(Sender::User, "Hello!");
//! let placeholder = log.append_placeholder("Thinking...");
//! log.replace_content(&placeholder, Content::Text("Hi".into())).unwrap();
//!
//! assert_eq!(log.len(), 2);
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::error::WidgetError;
use crate::message::{Content, Message, MessageHandle, MessageId, Sender};

/// Cloneable handle to the log. All clones share the same messages.
#[derive(Debug, Clone)]
pub struct ChatLog {
    inner: Arc<ChatLogInner>,
}

#[derive(Debug)]
struct ChatLogInner {
    messages: RwLock<Vec<Message>>,
    /// Bumped on every mutation so waiters can re-check their message.
    revision: watch::Sender<u64>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(ChatLogInner {
                messages: RwLock::new(Vec::new()),
                revision,
            }),
        }
    }

    /// Append a plain-text message and scroll to it.
    pub fn append(&self, sender: Sender, text: impl Into<String>) -> MessageHandle {
        self.push(Message::new(sender, text, false))
    }

    /// Append a bot placeholder that will be replaced once its reply lands.
    pub fn append_placeholder(&self, text: impl Into<String>) -> MessageHandle {
        self.push(Message::new(Sender::Bot, text, true))
    }

    fn push(&self, message: Message) -> MessageHandle {
        let handle = message.handle();
        self.inner
            .messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        self.bump();
        handle
    }

    /// Replace a pending placeholder's content in place.
    ///
    /// Succeeds at most once per placeholder; the returned message is the
    /// resolved state.
    pub fn replace_content(
        &self,
        handle: &MessageHandle,
        content: Content,
    ) -> Result<Message, WidgetError> {
        let id = handle.id();
        let updated = {
            let mut messages = self
                .inner
                .messages
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let message = messages
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(WidgetError::UnknownMessage(id))?;
            if !message.pending {
                return Err(WidgetError::NotPending(id));
            }
            message.content = content;
            message.pending = false;
            message.clone()
        };
        self.bump();
        Ok(updated)
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|r| *r += 1);
    }

    /// Look up a message by id.
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Snapshot of every message, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The message the view should be scrolled to (the newest one).
    #[must_use]
    pub fn scroll_anchor(&self) -> Option<MessageId> {
        self.inner
            .messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|m| m.id)
    }

    /// Wait until `id` is no longer pending and return its final state.
    pub async fn wait_resolved(&self, id: MessageId) -> Result<Message, WidgetError> {
        // Subscribe before the first check so a replacement in between is not missed.
        let mut updates = self.inner.revision.subscribe();
        loop {
            let message = self.get(id).ok_or(WidgetError::UnknownMessage(id))?;
            if !message.pending {
                return Ok(message);
            }
            updates
                .changed()
                .await
                .map_err(|_closed| WidgetError::LogClosed)?;
        }
    }
}
