use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse
};
use derive_more::Display;
use validator::ValidationErrors;

use crate::entities::contact_me::ContactResponse;

/// Every way a contact submission can end without being delivered.
///
/// The `Display` text is what the caller sees. Abuse signals share one
/// message so a client cannot tell which heuristic fired.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[display("Email and message are required.")]
    MissingFields,

    #[display("Please provide a valid email address.")]
    InvalidEmail,

    #[display("Message is too long (max 5000 characters).")]
    MessageTooLong,

    #[display("Too many requests. Please try again later.")]
    TooFast { retry_after_secs: u64 },

    #[display("Too many requests. Please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[display("Email service is not configured.")]
    NotConfigured,

    #[display("Failed to send message. Please try again later.")]
    DispatchFailed,

    #[display("Invalid request body.")]
    MalformedBody,
}

impl ContactError {
    /// Stable machine-readable reason, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ContactError::MissingFields => "missing-fields",
            ContactError::InvalidEmail => "invalid-email",
            ContactError::MessageTooLong => "message-too-long",
            ContactError::TooFast { .. } => "submitted-too-fast",
            ContactError::RateLimited { .. } => "rate-limited",
            ContactError::NotConfigured => "service-unavailable",
            ContactError::DispatchFailed => "dispatch-failed",
            ContactError::MalformedBody => "malformed-body",
        }
    }

    /// Both abuse signals answer with the same header so neither can be told
    /// apart from the other.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ContactError::TooFast { retry_after_secs }
            | ContactError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl std::error::Error for ContactError {}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());
        if let Some(secs) = self.retry_after_secs() {
            builder.insert_header((header::RETRY_AFTER, secs.to_string()));
        }
        builder.json(ContactResponse::rejected(self.to_string()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MissingFields
            | ContactError::InvalidEmail
            | ContactError::MessageTooLong
            | ContactError::MalformedBody => StatusCode::BAD_REQUEST,
            ContactError::TooFast { .. } | ContactError::RateLimited { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            },
            ContactError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::DispatchFailed => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Field-level failures are collapsed into a single reason; the email shape
/// outranks the message length when both fail.
impl From<ValidationErrors> for ContactError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();
        if fields.contains_key("email") {
            ContactError::InvalidEmail
        } else if fields.contains_key("message") {
            ContactError::MessageTooLong
        } else {
            ContactError::MissingFields
        }
    }
}

#[derive(Debug, Display)]
pub enum DispatchError {
    #[display("Email API responded with {status}: {body}")]
    Upstream { status: u16, body: String },

    #[display("Email API request failed: {_0}")]
    Transport(String),

    #[display("Failed to build email client: {_0}")]
    ClientBuild(String),
}

impl std::error::Error for DispatchError {}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Transport(err.to_string())
    }
}
