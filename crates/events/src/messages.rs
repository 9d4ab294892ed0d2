//! Norwegian email content for booking notifications.

use chrono::{DateTime, Datelike, Utc};

const NB_MONTHS: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni",
    "juli", "august", "september", "oktober", "november", "desember",
];

/// `02. august 2025`, the nb-NO long-date form.
pub fn format_date(d: DateTime<Utc>) -> String {
    format!(
        "{:02}. {} {}",
        d.day(),
        NB_MONTHS[(d.month() - 1) as usize],
        d.year()
    )
}

pub fn format_range(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{} – {}", format_date(start), format_date(end))
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

fn wrap(body: String) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n{body}\n</div>"
    )
}

/// Notify the owner about a new booking request.
pub fn booking_created_owner(
    cabin_name: &str,
    guest_name: &str,
    range: &str,
    order_ref: &str,
) -> EmailMessage {
    let guest = if guest_name.is_empty() { "Ukjent" } else { guest_name };
    EmailMessage {
        subject: format!("Ny bestilling forespørsel for {cabin_name}"),
        html: wrap(format!(
            "<h2>Ny bestilling mottatt</h2>\n\
             <p>Hytta: <strong>{cabin_name}</strong></p>\n\
             <p>Bestiller: <strong>{guest}</strong></p>\n\
             <p>Datoer: <strong>{range}</strong></p>\n\
             <p>Ordrenr: <strong>{order_ref}</strong></p>"
        )),
    }
}

/// Confirm receipt of a booking request to the guest.
pub fn booking_created_guest(guest_name: &str, cabin_name: &str, range: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("Bestillingsforespørsel for {cabin_name}"),
        html: wrap(format!(
            "<h2>Hei {guest_name}</h2>\n\
             <p>Vi har mottatt bestillingsforespørselen din for <strong>{cabin_name}</strong>.</p>\n\
             <p>Datoer: <strong>{range}</strong></p>\n\
             <p>Status: <strong>venter på godkjenning</strong></p>"
        )),
    }
}

fn status_text(status: &str) -> &str {
    match status {
        "approved" => "godkjent",
        "rejected" => "avslått",
        "cancelled" => "kansellert",
        "pending" => "venter på godkjenning",
        other => other,
    }
}

/// Tell the guest their booking's status changed.
pub fn booking_status(
    guest_name: &str,
    cabin_name: &str,
    range: &str,
    status: &str,
) -> EmailMessage {
    let subject = match status {
        "approved" => format!("Bestilling godkjent for {cabin_name}"),
        "rejected" => format!("Bestilling avslått for {cabin_name}"),
        "cancelled" => format!("Bestilling kansellert for {cabin_name}"),
        _ => format!("Oppdatering for bestilling ({cabin_name})"),
    };
    let text = status_text(status);
    EmailMessage {
        subject,
        html: wrap(format!(
            "<h2>Hei {guest_name}</h2>\n\
             <p>Status for bestillingen din for <strong>{cabin_name}</strong> er oppdatert til <strong>{text}</strong>.</p>\n\
             <p>Datoer: <strong>{range}</strong></p>"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn dates_render_in_norwegian() {
        assert_eq!(format_date(ts(2025, 8, 2)), "02. august 2025");
        assert_eq!(format_date(ts(2025, 12, 24)), "24. desember 2025");
        assert_eq!(
            format_range(ts(2025, 8, 2), ts(2025, 8, 5)),
            "02. august 2025 – 05. august 2025"
        );
    }

    #[test]
    fn owner_mail_carries_order_ref_and_fallback_guest() {
        let m = booking_created_owner("Fjellhytta", "", "02. august 2025 – 05. august 2025", "abc-123");
        assert_eq!(m.subject, "Ny bestilling forespørsel for Fjellhytta");
        assert!(m.html.contains("Ukjent"));
        assert!(m.html.contains("abc-123"));
    }

    #[test]
    fn status_mail_uses_norwegian_status_words() {
        let m = booking_status("Kari", "Fjellhytta", "02. august 2025", "approved");
        assert_eq!(m.subject, "Bestilling godkjent for Fjellhytta");
        assert!(m.html.contains("godkjent"));

        let m = booking_status("Kari", "Fjellhytta", "02. august 2025", "rejected");
        assert!(m.subject.contains("avslått"));

        let m = booking_status("Kari", "Fjellhytta", "02. august 2025", "cancelled");
        assert!(m.html.contains("kansellert"));
    }
}
