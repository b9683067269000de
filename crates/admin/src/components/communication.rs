//! Preferred-communication badges.

use askama::Template;
use serde_json::Value;

use bookingops_core::CommunicationChannel;

use super::{ComponentError, Record};

const FIELD: &str = "preferredCommunication";

/// Visual style of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Success,
    Info,
    Neutral,
}

impl BadgeVariant {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "badge-success",
            Self::Info => "badge-info",
            Self::Neutral => "badge-neutral",
        }
    }
}

/// A labelled badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub variant: BadgeVariant,
}

impl Badge {
    const NONE: Self = Self {
        label: "None",
        variant: BadgeVariant::Neutral,
    };

    const fn for_channel(channel: CommunicationChannel) -> Self {
        let variant = match channel {
            CommunicationChannel::WhatsApp => BadgeVariant::Success,
            CommunicationChannel::Email => BadgeVariant::Info,
        };
        Self {
            label: channel.label(),
            variant,
        }
    }
}

/// Badges for `params.preferredCommunication`.
///
/// A missing, non-array or empty value gives the single `None` badge.
/// Unrecognized entries are skipped, so an array of only unknown values
/// gives no badges at all.
#[must_use]
pub fn communication_badges(record: &Record) -> Vec<Badge> {
    match record.get(FIELD) {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(CommunicationChannel::from_value)
            .map(Badge::for_channel)
            .collect(),
        _ => vec![Badge::NONE],
    }
}

#[derive(Template)]
#[template(path = "components/communication_badges.html")]
struct CommunicationBadgesTemplate<'a> {
    badges: &'a [Badge],
}

/// Render the badges as an HTML fragment.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn render_communication_badges(record: &Record) -> Result<String, ComponentError> {
    let badges = communication_badges(record);
    Ok(CommunicationBadgesTemplate { badges: &badges }.render()?)
}
