//! Reply text preview cell.

use askama::Template;
use serde_json::Value;

use super::{ComponentError, Record};

const FIELD: &str = "replyText";

/// Placeholder shown when there is no reply text.
pub const NO_REPLY_TEXT: &str = "No reply text";

/// Characters shown before truncating.
pub const PREVIEW_CHARS: usize = 100;

/// Preview of `params.replyText`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPreview {
    /// Absent, empty or not a string.
    Missing,
    /// Short enough to show verbatim.
    Full(String),
    /// The first [`PREVIEW_CHARS`] characters; the full text is kept for the
    /// tooltip.
    Truncated { preview: String, full: String },
}

impl ReplyPreview {
    /// The text to display.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Missing => NO_REPLY_TEXT.to_string(),
            Self::Full(text) => text.clone(),
            Self::Truncated { preview, .. } => format!("{preview}..."),
        }
    }
}

/// Build the preview for a record.
#[must_use]
pub fn reply_text_preview(record: &Record) -> ReplyPreview {
    let Some(Value::String(text)) = record.get(FIELD) else {
        return ReplyPreview::Missing;
    };
    if text.is_empty() {
        return ReplyPreview::Missing;
    }

    if text.chars().count() <= PREVIEW_CHARS {
        ReplyPreview::Full(text.clone())
    } else {
        ReplyPreview::Truncated {
            preview: text.chars().take(PREVIEW_CHARS).collect(),
            full: text.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "components/reply_text.html")]
struct ReplyTextTemplate<'a> {
    text: &'a str,
    title: Option<&'a str>,
    missing: bool,
}

/// Render the preview as an HTML fragment.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_reply_text(record: &Record) -> Result<String, ComponentError> {
    let preview = reply_text_preview(record);
    let text = preview.text();
    let title = match &preview {
        ReplyPreview::Truncated { full, .. } => Some(full.as_str()),
        _ => None,
    };

    Ok(ReplyTextTemplate {
        text: &text,
        title,
        missing: preview == ReplyPreview::Missing,
    }
    .render()?)
}
