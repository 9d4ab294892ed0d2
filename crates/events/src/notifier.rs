//! Event consumer that turns booking events into emails.
//!
//! Write paths attach a [`BookingNotice`] payload to the events they
//! publish; the notifier task renders it into guest/owner messages and
//! hands them to the SMTP delivery. Failures are logged and dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::bus::{BookingEvent, EventBus};
use crate::delivery::email::{EmailConfig, EmailDelivery};
use crate::messages::{self, EmailMessage};

/// Structured event payload carrying everything the emails need, so the
/// notifier never touches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotice {
    pub cabin_name: String,
    pub guest_name: String,
    pub guest_email: String,
    /// Owner notification address; `None` when the cabin has no owner
    /// email on file.
    pub owner_email: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub order_ref: String,
    pub status: String,
    /// Approve/reject requests may opt out of guest mail.
    pub send_email: bool,
}

impl BookingNotice {
    pub fn into_payload(self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Decide which emails an event produces. Pure so it can be tested
/// without a transport.
pub fn plan(event: &BookingEvent) -> Vec<(String, EmailMessage)> {
    let notice: BookingNotice = match serde_json::from_value(event.payload.clone()) {
        Ok(n) => n,
        Err(err) => {
            tracing::warn!(event_type = %event.event_type, %err, "Event payload is not a booking notice, skipping");
            return Vec::new();
        }
    };
    let range = messages::format_range(notice.start_at, notice.end_at);

    let mut out = Vec::new();
    match event.event_type.as_str() {
        "booking.created" => {
            out.push((
                notice.guest_email.clone(),
                messages::booking_created_guest(&notice.guest_name, &notice.cabin_name, &range),
            ));
            if let Some(owner_email) = &notice.owner_email {
                out.push((
                    owner_email.clone(),
                    messages::booking_created_owner(
                        &notice.cabin_name,
                        &notice.guest_name,
                        &range,
                        &notice.order_ref,
                    ),
                ));
            }
        }
        "booking.approved" | "booking.rejected" => {
            if notice.send_email {
                out.push((
                    notice.guest_email.clone(),
                    messages::booking_status(
                        &notice.guest_name,
                        &notice.cabin_name,
                        &range,
                        &notice.status,
                    ),
                ));
            }
        }
        "booking.cancelled" | "booking.owner_cancelled" => {
            out.push((
                notice.guest_email.clone(),
                messages::booking_status(
                    &notice.guest_name,
                    &notice.cabin_name,
                    &range,
                    "cancelled",
                ),
            ));
        }
        other => {
            tracing::debug!(event_type = other, "No email mapping for event");
        }
    }
    out
}

/// Background consumer task.
pub struct Notifier;

impl Notifier {
    /// Subscribe to the bus and deliver emails until the bus closes.
    pub fn spawn(bus: Arc<EventBus>, config: EmailConfig) -> JoinHandle<()> {
        let delivery = EmailDelivery::new(config);
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                let event = match rx.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Notifier lagged behind the event bus");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                for (to, message) in plan(&event) {
                    if let Err(err) = delivery.deliver(&to, &message).await {
                        tracing::warn!(to, event_type = %event.event_type, %err, "Email delivery failed");
                    }
                }
            }
            tracing::info!("Notifier stopped, event bus closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notice(send_email: bool, owner: Option<&str>) -> BookingNotice {
        BookingNotice {
            cabin_name: "Fjellhytta".into(),
            guest_name: "Kari Nordmann".into(),
            guest_email: "kari@example.com".into(),
            owner_email: owner.map(String::from),
            start_at: Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2025, 8, 5, 23, 59, 59).unwrap(),
            order_ref: "3f0c".into(),
            status: "pending".into(),
            send_email,
        }
    }

    fn event(event_type: &str, n: BookingNotice) -> BookingEvent {
        BookingEvent::new(event_type).with_payload(n.into_payload())
    }

    #[test]
    fn created_event_mails_guest_and_owner() {
        let mails = plan(&event("booking.created", notice(true, Some("owner@example.com"))));
        assert_eq!(mails.len(), 2);
        assert_eq!(mails[0].0, "kari@example.com");
        assert_eq!(mails[1].0, "owner@example.com");
        assert!(mails[1].1.subject.contains("Fjellhytta"));
    }

    #[test]
    fn created_event_without_owner_email_mails_guest_only() {
        let mails = plan(&event("booking.created", notice(true, None)));
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].0, "kari@example.com");
    }

    #[test]
    fn approve_honours_send_email_flag() {
        let mut n = notice(false, None);
        n.status = "approved".into();
        assert!(plan(&event("booking.approved", n.clone())).is_empty());

        n.send_email = true;
        let mails = plan(&event("booking.approved", n));
        assert_eq!(mails.len(), 1);
        assert!(mails[0].1.subject.contains("godkjent"));
    }

    #[test]
    fn cancellations_always_mail_the_guest() {
        let mails = plan(&event("booking.owner_cancelled", notice(false, Some("o@example.com"))));
        assert_eq!(mails.len(), 1);
        assert!(mails[0].1.subject.contains("kansellert"));
    }

    #[test]
    fn malformed_payload_produces_no_mail() {
        let event = BookingEvent::new("booking.created")
            .with_payload(serde_json::json!({"unexpected": true}));
        assert!(plan(&event).is_empty());
    }
}
