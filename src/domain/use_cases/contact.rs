use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    constants::MIN_FILL_TIME_MS,
    entities::{contact_me::ContactSubmission, notification::OutboundEmail},
    errors::{ContactError, DispatchError},
    limiter::rate_limiter::{FixedWindowLimiter, RateLimitDecision},
    mailer::{
        resend::{MailSettings, ResendMailer},
        template::render_notification,
    },
    repositories::mailer::EmailDispatcher,
    settings::AppConfig,
};

/// How an accepted submission ended. Both variants look identical to the
/// caller; `Discarded` means the honeypot caught a bot and nothing was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Delivered,
    Discarded,
}

/// Where notifications go and what sends them.
pub struct Mailer<D> {
    pub dispatcher: D,
    pub from: String,
    pub to: String,
}

pub struct ContactHandler<D>
where
    D: EmailDispatcher,
{
    mailer: Option<Mailer<D>>,
    missing_settings: Vec<&'static str>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl ContactHandler<ResendMailer> {
    /// Builds the production handler. Missing mail settings are not fatal:
    /// the service starts and every submission that gets far enough is
    /// answered with a configuration error.
    pub fn from_config(
        config: &AppConfig,
        limiter: Arc<FixedWindowLimiter>,
    ) -> Result<Self, DispatchError> {
        let Some(settings) = MailSettings::from_config(config) else {
            let missing = config.missing_mail_settings();
            tracing::warn!(missing = ?missing, "Contact mail is not configured; submissions will be refused");
            return Ok(Self::unconfigured(missing, limiter));
        };

        let mailer = Mailer {
            dispatcher: ResendMailer::new(&settings)?,
            from: settings.from.clone(),
            to: settings.to.clone(),
        };
        Ok(Self::new(mailer, limiter))
    }
}

impl<D> ContactHandler<D>
where
    D: EmailDispatcher,
{
    pub fn new(mailer: Mailer<D>, limiter: Arc<FixedWindowLimiter>) -> Self {
        ContactHandler {
            mailer: Some(mailer),
            missing_settings: Vec::new(),
            limiter,
        }
    }

    pub fn unconfigured(missing_settings: Vec<&'static str>, limiter: Arc<FixedWindowLimiter>) -> Self {
        ContactHandler {
            mailer: None,
            missing_settings,
            limiter,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Runs a submission through every guard and, if it survives, sends it.
    pub async fn submit(
        &self,
        submission: ContactSubmission,
        client_key: &str,
    ) -> Result<ContactOutcome, ContactError> {
        self.submit_at(submission, client_key, Utc::now()).await
    }

    #[tracing::instrument(
        name = "contact_submission",
        skip_all,
        fields(submission_id = %Uuid::new_v4(), client = %client_key)
    )]
    pub async fn submit_at(
        &self,
        submission: ContactSubmission,
        client_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ContactOutcome, ContactError> {
        let honeypot_hit = submission.is_honeypot_hit();
        let rendered_at = submission.client_timestamp();

        let contact = submission.into_message().inspect_err(log_rejection)?;

        if honeypot_hit {
            tracing::info!("Honeypot field filled; discarding submission");
            return Ok(ContactOutcome::Discarded);
        }

        if let Some(rendered_at) = rendered_at {
            let elapsed_ms = now.timestamp_millis() - rendered_at;
            if elapsed_ms < MIN_FILL_TIME_MS {
                tracing::warn!(elapsed_ms, "Submission arrived faster than a person can type");
                let remaining_ms = MIN_FILL_TIME_MS - elapsed_ms;
                let retry_after_secs =
                    ((remaining_ms + 999) / 1000).clamp(1, MIN_FILL_TIME_MS / 1000) as u64;
                return Err(ContactError::TooFast { retry_after_secs });
            }
        }

        if let RateLimitDecision::Limited { retry_after_secs } = self.limiter.check(client_key, now) {
            let err = ContactError::RateLimited { retry_after_secs };
            log_rejection(&err);
            return Err(err);
        }

        let Some(mailer) = &self.mailer else {
            tracing::error!(missing = ?self.missing_settings, "Contact mail is not configured");
            return Err(ContactError::NotConfigured);
        };

        let payload = render_notification(&contact, now, Some(client_key));
        let email = OutboundEmail::new(&mailer.from, &mailer.to, &contact.email, payload);

        if let Err(e) = mailer.dispatcher.send(&email).await {
            tracing::error!(error = %e, "Failed to dispatch contact notification");
            return Err(ContactError::DispatchFailed);
        }

        tracing::info!("Contact notification sent");
        Ok(ContactOutcome::Delivered)
    }
}

fn log_rejection(err: &ContactError) {
    tracing::warn!(reason = err.kind(), "Contact submission rejected");
}
