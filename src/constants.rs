use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const MAX_MESSAGE_CHARS: u64 = 5000;

/// Anything submitted sooner than this after the form rendered is treated as scripted.
pub const MIN_FILL_TIME_MS: i64 = 2000;

pub const RATE_LIMIT_MAX_REQUESTS: u32 = 5;
pub const RATE_LIMIT_WINDOW_SECS: i64 = 60;

pub const UNKNOWN_CLIENT: &str = "unknown";

pub const JSON_BODY_LIMIT: usize = 64 * 1024;
