//! Framed console blocks for operator-facing output.
//!
//! ```text
//! ============================================================
//! 📧 EMAIL RECEIVED
//!   from: customer@example.com
//!   subject: Re: Your booking
//! ============================================================
//! ```
//!
//! Rendering is separate from printing so the layout can be tested. None of
//! these functions fail on any input.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use core::fmt::Write as _;
use std::error::Error;

use serde_json::Value;

/// Width of the `=` separator lines.
pub const SEPARATOR_WIDTH: usize = 60;

/// Category of a block, which selects its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Email,
    Webhook,
    Database,
    Socket,
    /// Any unrecognized label.
    Other,
}

impl LogKind {
    /// Map a free-form label to a kind; unknown labels become `Other`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "info" => Self::Info,
            "success" => Self::Success,
            "warning" | "warn" => Self::Warning,
            "error" => Self::Error,
            "email" => Self::Email,
            "webhook" => Self::Webhook,
            "database" | "db" => Self::Database,
            "socket" => Self::Socket,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
            Self::Email => "📧",
            Self::Webhook => "🔗",
            Self::Database => "🗄️",
            Self::Socket => "🔌",
            Self::Other => "📝",
        }
    }
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Text of a field value: strings bare, everything else as JSON
/// (pretty-printed for objects and arrays).
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

/// Render a framed block with one `key: value` line per field, in order.
#[must_use]
pub fn render_block(title: &str, fields: &[(&str, Value)], kind: LogKind) -> String {
    let sep = separator();
    let mut out = String::new();

    let _ = writeln!(out, "{sep}");
    let _ = writeln!(out, "{} {}", kind.icon(), title.to_uppercase());
    for (key, value) in fields {
        let _ = writeln!(out, "  {key}: {}", format_value(value));
    }
    let _ = write!(out, "{sep}");

    out
}

/// Render an error with its `source()` chain.
#[must_use]
pub fn render_error(title: &str, error: &(dyn Error + 'static)) -> String {
    let sep = separator();
    let mut out = String::new();

    let _ = writeln!(out, "{sep}");
    let _ = writeln!(out, "{} {}", LogKind::Error.icon(), title.to_uppercase());
    let _ = writeln!(out, "  Message: {error}");

    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(out, "  Caused by: {cause}");
        source = cause.source();
    }
    let _ = write!(out, "{sep}");

    out
}

/// Print a block to stdout.
pub fn log_formatted(title: &str, fields: &[(&str, Value)], kind: LogKind) {
    println!("{}", render_block(title, fields, kind));
}

/// Print an error block to stderr.
pub fn log_error(title: &str, error: &(dyn Error + 'static)) {
    eprintln!("{}", render_error(title, error));
}

pub fn log_email(title: &str, fields: &[(&str, Value)]) {
    log_formatted(title, fields, LogKind::Email);
}

pub fn log_webhook(title: &str, fields: &[(&str, Value)]) {
    log_formatted(title, fields, LogKind::Webhook);
}

pub fn log_database(title: &str, fields: &[(&str, Value)]) {
    log_formatted(title, fields, LogKind::Database);
}

pub fn log_socket(title: &str, fields: &[(&str, Value)]) {
    log_formatted(title, fields, LogKind::Socket);
}
