//! Markdown-lite rendering.
//!
//! Only two features are supported: `**bold**` spans and newline-to-`<br>`.
//! Input is escaped before either substitution runs, so the only tags that can
//! appear in the output are the `<strong>` and `<br>` tags inserted here.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::markdown::render_markdown_lite;
//!
//! assert_eq!(render_markdown_lite("hi **there**"), "hi <strong>there</strong>");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Non-greedy bold span. `.` does not match `\n`, so spans never cross lines.
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `text` to HTML: escape, then bold spans, then line breaks.
///
/// Unpaired `**` is left as literal text.
#[must_use]
pub fn render_markdown_lite(text: &str) -> String {
    let escaped = escape_html(text);
    let html = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    html.replace('\n', "<br>")
}
