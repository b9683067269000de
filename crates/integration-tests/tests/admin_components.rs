//! Resource list rendering with realistic records.

use bookingops_admin::components::{Record, ResourceList, render_cell};
use bookingops_core::{BookingPayload, EmailHookPayload};

#[test]
fn test_bookings_row_from_sample_booking() {
    let booking = serde_json::to_value(BookingPayload::sample()).expect("serializable");
    let record = Record::from_value(booking);
    let list = ResourceList::bookings();

    let row = list.render_row(&record).expect("row renders");
    assert_eq!(row.len(), list.columns.len());

    let contact = list
        .column_by_key("preferredCommunication")
        .expect("column exists");
    let badges = render_cell(contact, &record).expect("badges render");
    assert!(badges.contains("WhatsApp"));
    assert!(badges.contains("Email"));
}

#[test]
fn test_email_hook_row_truncates_long_reply() {
    let payload = EmailHookPayload::new("customer@example.com", "Re: Your booking")
        .with_reply("x".repeat(250));
    let record = Record::from_value(serde_json::to_value(payload).expect("serializable"));
    let list = ResourceList::email_hook_logs();

    let reply = list.column_by_key("replyText").expect("column exists");
    let html = render_cell(reply, &record).expect("reply renders");

    let shown = format!("{}...", "x".repeat(100));
    assert!(html.contains(&format!(">{shown}<")));
    assert!(html.contains(&format!("title=\"{}\"", "x".repeat(250))));
}

#[test]
fn test_empty_record_renders_placeholders() {
    let record = Record::default();
    let list = ResourceList::email_hook_logs();

    let row = list.render_row(&record).expect("row renders");
    assert!(row.iter().any(|cell| cell.contains("No reply text")));
}
