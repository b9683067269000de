//! Customer communication preferences.

use serde::{Deserialize, Serialize};

/// A channel a customer accepts booking updates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationChannel {
    WhatsApp,
    Email,
}

impl CommunicationChannel {
    /// All recognized channels, in display order.
    pub const ALL: [Self; 2] = [Self::WhatsApp, Self::Email];

    /// Recognize a stored preference value. Unknown values yield `None`.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "whatsapp" => Some(Self::WhatsApp),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// The value stored on booking records.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Email => "email",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Email => "Email",
        }
    }
}
