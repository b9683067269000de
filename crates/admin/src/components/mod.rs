//! Presentational cell components for the admin panel.
//!
//! Components take a [`Record`] (the admin panel's view of one row) and
//! render a small HTML fragment through askama. Record text is always
//! escaped.

mod communication;
mod reply_text;
mod resources;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use communication::{Badge, BadgeVariant, communication_badges, render_communication_badges};
pub use reply_text::{
    NO_REPLY_TEXT, PREVIEW_CHARS, ReplyPreview, render_reply_text, reply_text_preview,
};
pub use resources::{
    CellRenderer, FilterOption, ResourceColumn, ResourceFilter, ResourceList, render_cell,
};

/// A row as handed to cell components: field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Record {
    #[must_use]
    pub const fn new(params: Map<String, Value>) -> Self {
        Self { params }
    }

    /// Build a record from a JSON object; any other value yields an empty record.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(params) => Self { params },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// Errors from rendering a component.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}
