//! Booking payload sent to the booking automation webhook.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::communication::CommunicationChannel;

/// A booking record as the booking webhook receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub booking_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub device_type: String,
    pub device_brand: String,
    pub device_model: String,
    pub service_type: String,
    pub issue_description: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub preferred_communication: Vec<CommunicationChannel>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BookingPayload {
    /// A synthetic booking used to smoke-test the webhook.
    ///
    /// Every call produces a fresh `booking_id` and `created_at` so the
    /// receiving automation does not deduplicate repeated runs.
    #[must_use]
    pub fn sample() -> Self {
        let now = Utc::now();
        let preferred_date = (now + chrono::Duration::days(2)).date_naive();

        Self {
            booking_id: Uuid::new_v4(),
            customer_name: "Test Customer".to_owned(),
            customer_email: "test.customer@example.com".to_owned(),
            customer_phone: "+10000000000".to_owned(),
            device_type: "smartphone".to_owned(),
            device_brand: "Apple".to_owned(),
            device_model: "iPhone 13".to_owned(),
            service_type: "screen-repair".to_owned(),
            issue_description: "Cracked screen after a drop; touch still works.".to_owned(),
            preferred_date,
            preferred_time: "10:00".to_owned(),
            preferred_communication: vec![
                CommunicationChannel::WhatsApp,
                CommunicationChannel::Email,
            ],
            status: "pending".to_owned(),
            created_at: now,
        }
    }
}
