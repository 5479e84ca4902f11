use chrono::{DateTime, Utc};

use crate::{
    constants::UNKNOWN_CLIENT,
    entities::{contact_me::ContactMessage, notification::NotificationPayload},
    utils::escape::escape_html,
};

const SUBJECT_PREFIX: &str = "New portfolio message";

pub fn render_notification(
    contact: &ContactMessage,
    received_at: DateTime<Utc>,
    client_ip: Option<&str>,
) -> NotificationPayload {
    let received = format_received_at(received_at);
    let client_ip = client_ip.filter(|ip| !ip.is_empty() && *ip != UNKNOWN_CLIENT);

    NotificationPayload {
        subject: subject_line(contact.name.as_deref()),
        html_body: render_html(contact, &received, client_ip),
        text_body: render_text(contact, &received, client_ip),
    }
}

pub fn subject_line(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{SUBJECT_PREFIX} from {name}"),
        None => SUBJECT_PREFIX.to_string(),
    }
}

/// e.g. `Friday, October 16, 2026 at 2:05 PM UTC`
pub fn format_received_at(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y at %-I:%M %p UTC").to_string()
}

fn render_html(contact: &ContactMessage, received: &str, client_ip: Option<&str>) -> String {
    let name = contact.name.as_deref().map(escape_html);
    let email = escape_html(&contact.email);
    let message = escape_html(&contact.message).replace("\r\n", "\n").replace('\n', "<br>");

    let origin_row = client_ip
        .map(|ip| {
            format!(
                r#"<tr><td style="padding:4px 12px 4px 0;color:#6b7280;">IP</td><td style="padding:4px 0;">{}</td></tr>"#,
                escape_html(ip)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body style="margin:0;padding:24px;background:#f3f4f6;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;color:#111827;">
<div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:8px;overflow:hidden;box-shadow:0 1px 3px rgba(0,0,0,0.1);">
<div style="background:#4f46e5;color:#ffffff;padding:20px 24px;">
<h1 style="margin:0;font-size:20px;">New message from your portfolio</h1>
</div>
<div style="padding:24px;">
<table style="border-collapse:collapse;font-size:14px;margin-bottom:20px;">
<tr><td style="padding:4px 12px 4px 0;color:#6b7280;">From</td><td style="padding:4px 0;">{name}</td></tr>
<tr><td style="padding:4px 12px 4px 0;color:#6b7280;">Email</td><td style="padding:4px 0;"><a href="mailto:{email}" style="color:#4f46e5;">{email}</a></td></tr>
<tr><td style="padding:4px 12px 4px 0;color:#6b7280;">Received</td><td style="padding:4px 0;">{received}</td></tr>
{origin_row}
</table>
<div style="padding:16px;background:#f9fafb;border-left:4px solid #4f46e5;border-radius:4px;font-size:15px;line-height:1.6;white-space:normal;">{message}</div>
</div>
<div style="padding:12px 24px;background:#f9fafb;color:#9ca3af;font-size:12px;">Reply to this email to respond directly to the sender.</div>
</div>
</body>
</html>"#,
        title = escape_html(&subject_line(contact.name.as_deref())),
        name = name.as_deref().unwrap_or("Anonymous"),
        email = email,
        received = received,
        origin_row = origin_row,
        message = message,
    )
}

fn render_text(contact: &ContactMessage, received: &str, client_ip: Option<&str>) -> String {
    let mut text = format!(
        "New message from your portfolio\n\nFrom: {}\nEmail: {}\nReceived: {}\n",
        contact.name.as_deref().unwrap_or("Anonymous"),
        contact.email,
        received,
    );
    if let Some(ip) = client_ip {
        text.push_str(&format!("IP: {ip}\n"));
    }
    text.push_str("\nMessage:\n");
    text.push_str(&contact.message);
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn received_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T14:05:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn contact(name: Option<&str>, message: &str) -> ContactMessage {
        ContactMessage {
            name: name.map(str::to_string),
            email: "visitor@example.com".into(),
            message: message.into(),
        }
    }

    #[test]
    fn subject_mentions_sender_when_named() {
        assert_eq!(subject_line(Some("Ada")), "New portfolio message from Ada");
        assert_eq!(subject_line(None), "New portfolio message");
    }

    #[test]
    fn formats_timestamp_for_humans() {
        assert_eq!(format_received_at(received_at()), "Friday, October 16, 2026 at 2:05 PM UTC");
    }

    #[test]
    fn html_body_escapes_script_but_text_body_keeps_it() {
        let payload = render_notification(
            &contact(Some("<b>Eve</b>"), "<script>alert(1)</script>"),
            received_at(),
            None,
        );

        assert!(!payload.html_body.contains("<script>"));
        assert!(payload.html_body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(payload.html_body.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(payload.text_body.contains("<script>alert(1)</script>"));
        assert!(payload.text_body.contains("From: <b>Eve</b>"));
    }

    #[test]
    fn html_body_preserves_line_breaks() {
        let payload = render_notification(&contact(None, "line one\nline two\r\nline three"), received_at(), None);

        assert!(payload.html_body.contains("line one<br>line two<br>line three"));
        assert!(payload.text_body.contains("line one\nline two\r\nline three"));
    }

    #[test]
    fn origin_ip_is_shown_only_when_known() {
        let known = render_notification(&contact(None, "hi"), received_at(), Some("203.0.113.7"));
        assert!(known.html_body.contains("203.0.113.7"));
        assert!(known.text_body.contains("IP: 203.0.113.7"));

        let unknown = render_notification(&contact(None, "hi"), received_at(), Some("unknown"));
        assert!(!unknown.text_body.contains("IP:"));
        assert!(!unknown.html_body.contains(">IP<"));
    }

    #[test]
    fn anonymous_sender_is_labelled() {
        let payload = render_notification(&contact(None, "hi"), received_at(), None);
        assert_eq!(payload.subject, "New portfolio message");
        assert!(payload.text_body.contains("From: Anonymous"));
        assert!(payload.html_body.contains("Anonymous"));
        assert!(payload.html_body.contains("Received</td><td style=\"padding:4px 0;\">Friday, October 16, 2026 at 2:05 PM UTC"));
    }
}
