//! HTML rendering for the widget page and its HTMX fragments.
//!
//! The page carries the fixed DOM contract: a `#chat-form` form, a
//! `#user-input` text input and a scrolling `#chat-box` container. Message
//! nodes are `<div class="message {sender}">`. A pending placeholder fetches
//! its own final state on load and swaps itself out.

use crate::markdown::escape_html;
use crate::message::{Content, Message};

/// Id of the scrolling message container.
pub const CHAT_BOX_ID: &str = "chat-box";
/// Id of the submit form.
pub const CHAT_FORM_ID: &str = "chat-form";
/// Id of the text input.
pub const USER_INPUT_ID: &str = "user-input";
/// Form field carrying the user's text.
pub const MESSAGE_FIELD: &str = "message";

/// Path a pending placeholder polls for its resolved state.
#[must_use]
pub fn message_path(message: &Message) -> String {
    format!("/widget/messages/{}", message.id)
}

/// Render a single message node.
#[must_use]
pub fn render_message(message: &Message) -> String {
    let body = match &message.content {
        Content::Text(text) => escape_html(text),
        Content::Markup(html) => html.clone(),
    };

    if message.pending {
        format!(
            r##"<div id="msg-{id}" class="message {sender} pending" hx-get="{path}" hx-trigger="load" hx-swap="outerHTML scroll:#{CHAT_BOX_ID}:bottom">{body}</div>"##,
            id = message.id,
            sender = message.sender.as_str(),
            path = message_path(message),
        )
    } else {
        format!(
            r#"<div id="msg-{id}" class="message {sender}">{body}</div>"#,
            id = message.id,
            sender = message.sender.as_str(),
        )
    }
}

/// Render the text input. When `out_of_band` is set the element replaces the
/// existing input wherever it sits on the page, which clears it.
#[must_use]
pub fn render_input(out_of_band: bool) -> String {
    let oob = if out_of_band {
        r#" hx-swap-oob="true""#
    } else {
        ""
    };
    format!(
        r#"<input id="{USER_INPUT_ID}" name="{MESSAGE_FIELD}" type="text" placeholder="Type your message..." autocomplete="off" autofocus{oob}>"#
    )
}

/// Fragment returned for an accepted submission: the user's message, the
/// placeholder, and a cleared input.
#[must_use]
pub fn render_submission(user: &Message, placeholder: &Message) -> String {
    let mut html = render_message(user);
    html.push_str(&render_message(placeholder));
    html.push_str(&render_input(true));
    html
}

/// Full widget page with the current log.
#[must_use]
pub fn render_page(messages: &[Message], htmx_src: &str) -> String {
    let log: String = messages.iter().map(render_message).collect();
    let input = render_input(false);
    let htmx_src = escape_html(htmx_src);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Chat</title>
    <script src="{htmx_src}"></script>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; display: flex; justify-content: center; }}
        .chat {{ width: 100%; max-width: 48rem; height: 100vh; display: flex; flex-direction: column; }}
        #{CHAT_BOX_ID} {{ flex: 1; overflow-y: auto; padding: 1rem; }}
        .message {{ margin: 0.5rem 0; padding: 0.5rem 0.75rem; border-radius: 0.75rem; max-width: 80%; }}
        .message.user {{ margin-left: auto; background: #dbeafe; }}
        .message.bot {{ margin-right: auto; background: #f3f4f6; }}
        .message.pending {{ font-style: italic; opacity: 0.7; }}
        #{CHAT_FORM_ID} {{ display: flex; gap: 0.5rem; padding: 1rem; border-top: 1px solid #e5e7eb; }}
        #{USER_INPUT_ID} {{ flex: 1; padding: 0.5rem; }}
    </style>
</head>
<body>
    <div class="chat">
        <div id="{CHAT_BOX_ID}" aria-live="polite">{log}</div>
        <form id="{CHAT_FORM_ID}" hx-post="/widget/submit" hx-target="#{CHAT_BOX_ID}" hx-swap="beforeend scroll:bottom">
            {input}
            <button type="submit">Send</button>
        </form>
    </div>
</body>
</html>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    #[test]
    fn test_text_is_escaped() {
        let message = Message::new(Sender::User, "<b>hi</b>", false);
        let html = render_message(&message);
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains(r#"class="message user""#));
        assert!(!html.contains("hx-get"));
    }

    #[test]
    fn test_markup_is_inserted_verbatim() {
        let mut message = Message::new(Sender::Bot, "", false);
        message.content = Content::Markup("<strong>hi</strong>".into());
        let html = render_message(&message);
        assert!(html.contains("><strong>hi</strong></div>"));
        assert!(html.contains(r#"class="message bot""#));
    }

    #[test]
    fn test_pending_placeholder_polls_for_reply() {
        let message = Message::new(Sender::Bot, "Thinking...", true);
        let html = render_message(&message);
        assert!(html.contains(&format!(r#"hx-get="/widget/messages/{}""#, message.id)));
        assert!(html.contains(r#"hx-trigger="load""#));
        assert!(html.contains("outerHTML"));
        assert!(html.contains(&format!(r#"id="msg-{}""#, message.id)));
    }

    #[test]
    fn test_submission_clears_input_out_of_band() {
        let user = Message::new(Sender::User, "hello", false);
        let placeholder = Message::new(Sender::Bot, "Thinking...", true);
        let html = render_submission(&user, &placeholder);

        let user_at = html.find("hello").unwrap();
        let placeholder_at = html.find("Thinking...").unwrap();
        assert!(user_at < placeholder_at);
        assert!(html.contains(r#"id="user-input""#));
        assert!(html.contains(r#"hx-swap-oob="true""#));
    }

    #[test]
    fn test_page_has_dom_contract() {
        let messages = vec![Message::new(Sender::User, "earlier", false)];
        let html = render_page(&messages, "/htmx.js");
        assert!(html.contains(r#"id="chat-box""#));
        assert!(html.contains(r#"id="chat-form""#));
        assert!(html.contains(r#"id="user-input""#));
        assert!(html.contains(r#"<script src="/htmx.js"></script>"#));
        assert!(html.contains("earlier"));
        assert!(!html.contains("hx-swap-oob"));
    }
}
