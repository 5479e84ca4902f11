use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{constants::MAX_MESSAGE_CHARS, errors::ContactError};

/// Loose `local@domain.tld` shape. Deliberately permissive: it only has to
/// make junk submissions cost something, not prove deliverability.
pub static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape regex is valid")
});

/// Contact form body as posted by the browser.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ContactSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Honeypot. Hidden from people, filled in by form-stuffing bots. Kept
    /// untyped so a bot posting a number or object still lands in the trap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<Value>,

    /// Epoch milliseconds recorded when the form was rendered. Browsers send
    /// it as a string, but a bare number is accepted too.
    #[serde(rename = "_ts", default, skip_serializing_if = "Option::is_none")]
    pub rendered_at: Option<Value>,
}

impl ContactSubmission {
    pub fn is_honeypot_hit(&self) -> bool {
        match &self.website {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(w)) => !w.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Client render timestamp in epoch millis, or `None` when the value
    /// carries no usable information (absent, zero, negative, not numeric).
    pub fn client_timestamp(&self) -> Option<i64> {
        let raw = match self.rendered_at.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;

        (raw.is_finite() && raw > 0.0).then_some(raw as i64)
    }

    /// Structural validation. Checks run in a fixed order and the first
    /// failure is the only one reported. An empty string counts as absent;
    /// anything else is checked exactly as posted.
    pub fn into_message(self) -> Result<ContactMessage, ContactError> {
        let email = self.email.filter(|e| !e.is_empty());
        let message = self.message.filter(|m| !m.is_empty());

        let (Some(email), Some(message)) = (email, message) else {
            return Err(ContactError::MissingFields);
        };

        let contact = ContactMessage {
            name: self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            email,
            message,
        };
        contact.validate()?;

        Ok(contact)
    }
}

/// A submission that passed structural validation.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ContactMessage {
    pub name: Option<String>,

    #[validate(regex(path = *EMAIL_SHAPE))]
    pub email: String,

    #[validate(length(max = MAX_MESSAGE_CHARS))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn accepted() -> Self {
        ContactResponse { ok: true, error: None }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        ContactResponse { ok: false, error: Some(error.into()) }
    }
}
