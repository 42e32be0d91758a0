use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::endpoint::HttpChatEndpoint;
use crate::error::WidgetError;
use crate::message::{MessageId, Sender};
use crate::view;
use crate::widget::ChatWidget;

/// State shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The chat widget and its log.
    pub widget: ChatWidget,
    /// Script URL for HTMX, rendered into the page.
    pub htmx_src: Arc<str>,
}

impl AppState {
    pub fn new(widget: ChatWidget, htmx_src: &str) -> Self {
        Self {
            widget,
            htmx_src: Arc::from(htmx_src),
        }
    }
}

/// Build the widget router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/widget/submit", post(submit_handler))
        .route("/widget/messages", get(messages_handler))
        .route("/widget/messages/{id}", get(message_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let endpoint = HttpChatEndpoint::new(&config.endpoint.base_url, &config.endpoint.path)?;

    info!(
        name: "endpoint.configured",
        url = %endpoint.url(),
        policy = ?config.widget.submit_policy,
        "Chat endpoint configured"
    );

    let widget = ChatWidget::new(Arc::new(endpoint), config.widget.submit_policy);
    let app = router(AppState::new(widget, &config.widget.htmx_src));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Widget page with the current log.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(view::render_page(
        &state.widget.log().messages(),
        &state.htmx_src,
    ))
}

/// Form body posted by `#chat-form`.
#[derive(Debug, Deserialize)]
struct SubmitForm {
    #[serde(default)]
    message: String,
}

/// POST /widget/submit - Append the user message and placeholder.
///
/// Blank input answers `204`, which HTMX treats as "nothing to swap".
async fn submit_handler(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Response {
    let Some(submission) = state.widget.submit(&form.message) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    // The reply may already have landed; the fragment then shows the final state.
    let log = state.widget.log();
    match (
        log.get(submission.user().id()),
        log.get(submission.placeholder().id()),
    ) {
        (Some(user), Some(placeholder)) => {
            Html(view::render_submission(&user, &placeholder)).into_response()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// GET /widget/messages/:id - Resolved state of one message.
///
/// Waits for a pending placeholder to settle before answering.
async fn message_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<MessageId>() else {
        return (StatusCode::BAD_REQUEST, "Invalid message id").into_response();
    };

    match state.widget.log().wait_resolved(id).await {
        Ok(message) => Html(view::render_message(&message)).into_response(),
        Err(WidgetError::UnknownMessage(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(message_id = %id, error = %e, "Failed to resolve message");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Message DTO for API responses.
#[derive(Debug, Serialize)]
struct MessageDto {
    id: MessageId,
    sender: Sender,
    content: String,
    markup: bool,
    pending: bool,
    created_at: String, // RFC3339
}

/// GET /widget/messages - Snapshot of the log.
async fn messages_handler(State(state): State<AppState>) -> Json<Vec<MessageDto>> {
    let messages = state
        .widget
        .log()
        .messages()
        .into_iter()
        .map(|m| MessageDto {
            id: m.id,
            sender: m.sender,
            markup: m.content.is_markup(),
            content: m.content.as_str().to_string(),
            pending: m.pending,
            created_at: m.created_at.to_rfc3339(),
        })
        .collect();
    Json(messages)
}
