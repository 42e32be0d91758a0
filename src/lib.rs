//! Chat Widget
//!
//! A minimal chat widget: it captures user input, posts it to a backend chat
//! endpoint, and renders the reply with a tiny markdown-to-HTML substitution.
//!
//! # Architecture
//!
//! - **Widget**: submission flow with an optimistic "thinking" placeholder
//!   that is replaced in place once the reply settles
//! - **Endpoint**: `POST /api/chat` over HTTP, behind a trait
//! - **Server**: Axum host serving the page and HTMX fragments
//!
//! # Modules
//!
//! - [`chat_log`]: Shared append-only message log
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`endpoint`]: Backend chat endpoint trait and HTTP client
//! - [`error`]: Endpoint and widget error types
//! - [`markdown`]: Escape-by-default markdown-lite renderer
//! - [`message`]: Message records, ids and handles
//! - [`server`]: Axum router and handlers
//! - [`view`]: HTML rendering
//! - [`widget`]: Submission pipeline and submit policies
//! - [`wire`]: JSON request and response bodies

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::unused_async)]
#![allow(clippy::missing_fields_in_debug)]

pub mod chat_log;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod markdown;
pub mod message;
pub mod server;
pub mod view;
pub mod widget;
pub mod wire;
