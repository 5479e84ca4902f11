use once_cell::sync::Lazy;
use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{limiter, mailer, utils};

use errors::DispatchError;
use limiter::rate_limiter::FixedWindowLimiter;
use mailer::resend::ResendMailer;
use use_cases::contact::ContactHandler;

pub type AppContactHandler = ContactHandler<ResendMailer>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
}

impl AppState {
    /// The limiter is created here once and shared by every worker, so its
    /// buckets live exactly as long as the process. Building the state also
    /// pins the start time reported by `/health`.
    pub fn new(config: &settings::AppConfig) -> Result<Self, DispatchError> {
        Lazy::force(&constants::START_TIME);

        let limiter = Arc::new(FixedWindowLimiter::default());
        let contact_handler = ContactHandler::from_config(config, limiter)?;

        Ok(AppState { contact_handler })
    }
}
