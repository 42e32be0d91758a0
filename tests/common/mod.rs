//! Shared helpers: a stand-in backend chat endpoint on a real socket.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;

/// Requests the fake backend has received: (content-type, body).
pub type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// What the fake backend answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
}

#[derive(Clone)]
struct Backend {
    reply: Reply,
    seen: Seen,
}

async fn chat(State(backend): State<Backend>, headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    backend.seen.lock().unwrap().push((content_type, body));

    match backend.reply {
        Reply::Json(status, value) => (status, Json(value)).into_response(),
        Reply::Raw(status, text) => (status, text).into_response(),
    }
}

/// Serve a fake `/api/chat` on an ephemeral port and return its base URL.
pub async fn spawn_backend(reply: Reply) -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/chat", post(chat))
        .with_state(Backend {
            reply,
            seen: Arc::clone(&seen),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

/// A base URL nothing is listening on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
