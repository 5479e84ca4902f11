use serde::{Deserialize, Serialize};

/// Rendered notification, ready to be handed to a mailer.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Request body of the transactional email API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: String,
}

impl OutboundEmail {
    pub fn new(from: &str, to: &str, reply_to: &str, payload: NotificationPayload) -> Self {
        OutboundEmail {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: payload.subject,
            html: payload.html_body,
            text: payload.text_body,
            reply_to: reply_to.to_string(),
        }
    }
}
