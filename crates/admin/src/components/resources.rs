//! Admin-panel resource list definitions.
//!
//! A [`ResourceList`] says which record fields appear as columns and which
//! component renders each cell.

use askama::Template;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::communication::render_communication_badges;
use super::reply_text::render_reply_text;
use super::{ComponentError, Record};

/// How a column's cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRenderer {
    /// The field value as escaped text.
    Text,
    /// `Yes` / `No` for booleans.
    YesNo,
    /// Preferred-communication badges.
    CommunicationBadges,
    /// Truncated reply text.
    ReplyText,
}

/// Column definition for a resource list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceColumn {
    /// Record field shown in the column.
    pub key: String,
    /// Column header.
    pub label: String,
    pub sortable: bool,
    pub default_visible: bool,
    pub cell: CellRenderer,
}

impl ResourceColumn {
    /// A non-sortable text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            default_visible: true,
            cell: CellRenderer::Text,
        }
    }

    /// A sortable text column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            sortable: true,
            ..Self::new(key, label)
        }
    }

    #[must_use]
    pub const fn cell(mut self, cell: CellRenderer) -> Self {
        self.cell = cell;
        self
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Option for a select filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Select filter on one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceFilter {
    pub key: String,
    pub label: String,
    pub options: Vec<FilterOption>,
}

impl ResourceFilter {
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }
}

/// List view of one admin resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceList {
    /// Resource identifier (the collection name).
    pub resource_id: String,
    pub columns: Vec<ResourceColumn>,
    pub filters: Vec<ResourceFilter>,
    pub empty_title: String,
}

impl ResourceList {
    #[must_use]
    pub fn new(resource_id: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            columns: vec![],
            filters: vec![],
            empty_title: "No records found".to_string(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: ResourceColumn) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: ResourceFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn empty_title(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Look up a column by field key.
    #[must_use]
    pub fn column_by_key(&self, key: &str) -> Option<&ResourceColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Keys of the columns shown by default.
    #[must_use]
    pub fn default_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.as_str())
            .collect()
    }

    /// Render every column of `record`, in column order.
    ///
    /// # Errors
    ///
    /// Returns an error if any cell fails to render.
    pub fn render_row(&self, record: &Record) -> Result<Vec<String>, ComponentError> {
        self.columns
            .iter()
            .map(|column| render_cell(column, record))
            .collect()
    }

    /// Booking requests submitted through the booking form.
    #[must_use]
    pub fn bookings() -> Self {
        Self::new("bookings")
            .column(ResourceColumn::sortable("customerName", "Customer"))
            .column(ResourceColumn::new("customerEmail", "Email"))
            .column(ResourceColumn::new("customerPhone", "Phone").visible(false))
            .column(ResourceColumn::new("deviceType", "Device"))
            .column(ResourceColumn::new("serviceType", "Service"))
            .column(ResourceColumn::sortable("preferredDate", "Preferred date"))
            .column(
                ResourceColumn::new("preferredCommunication", "Contact via")
                    .cell(CellRenderer::CommunicationBadges),
            )
            .column(ResourceColumn::sortable("status", "Status"))
            .column(ResourceColumn::sortable("createdAt", "Created").visible(false))
            .filter(ResourceFilter::select(
                "status",
                "Status",
                vec![
                    FilterOption::new("pending", "Pending"),
                    FilterOption::new("confirmed", "Confirmed"),
                    FilterOption::new("completed", "Completed"),
                    FilterOption::new("cancelled", "Cancelled"),
                ],
            ))
            .empty_title("No bookings yet")
    }

    /// Inbound email replies recorded by the email hook.
    #[must_use]
    pub fn email_hook_logs() -> Self {
        Self::new("email_hook_logs")
            .column(ResourceColumn::new("from", "From"))
            .column(ResourceColumn::new("subject", "Subject"))
            .column(ResourceColumn::new("replyText", "Reply").cell(CellRenderer::ReplyText))
            .column(ResourceColumn::new("replySent", "Replied").cell(CellRenderer::YesNo))
            .column(ResourceColumn::sortable("timestamp", "Received"))
            .filter(ResourceFilter::select(
                "replySent",
                "Replied",
                vec![
                    FilterOption::new("true", "Yes"),
                    FilterOption::new("false", "No"),
                ],
            ))
            .empty_title("No email events recorded")
    }
}

#[derive(Template)]
#[template(path = "components/text_cell.html")]
struct TextCellTemplate<'a> {
    value: Option<&'a str>,
}

/// Render one cell of `record` for `column`.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_cell(column: &ResourceColumn, record: &Record) -> Result<String, ComponentError> {
    match column.cell {
        CellRenderer::CommunicationBadges => render_communication_badges(record),
        CellRenderer::ReplyText => render_reply_text(record),
        CellRenderer::YesNo => {
            let value = record.get(&column.key).and_then(Value::as_bool).map(|b| {
                if b { "Yes" } else { "No" }
            });
            Ok(TextCellTemplate { value }.render()?)
        }
        CellRenderer::Text => {
            let text = record.get(&column.key).and_then(display_text);
            Ok(TextCellTemplate {
                value: text.as_deref(),
            }
            .render()?)
        }
    }
}

/// Text of a scalar value; `None` for null, missing or empty.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
