use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use zeroize::Zeroizing;

use crate::{
    entities::notification::OutboundEmail,
    errors::DispatchError,
    repositories::mailer::EmailDispatcher,
    settings::AppConfig,
};

/// Mail settings that must all be present before anything is sent.
#[derive(Clone)]
pub struct MailSettings {
    pub api_key: Zeroizing<String>,
    pub api_url: String,
    pub to: String,
    pub from: String,
    pub timeout: Duration,
}

impl MailSettings {
    /// `None` when the API key or destination address is unset.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if !config.mail_configured() {
            return None;
        }

        Some(MailSettings {
            api_key: Zeroizing::new(config.resend_api_key.clone()?.trim().to_string()),
            api_url: config.resend_api_url.clone(),
            to: config.contact_to_email.clone()?.trim().to_string(),
            from: config.contact_from_email.clone(),
            timeout: Duration::from_secs(config.mail_timeout_secs),
        })
    }
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("to", &self.to)
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sends notifications through Resend's HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: Zeroizing<String>,
    api_url: String,
}

impl ResendMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DispatchError::ClientBuild(e.to_string()))?;

        Ok(ResendMailer {
            client,
            api_key: settings.api_key.clone(),
            api_url: settings.api_url.clone(),
        })
    }
}

#[async_trait]
impl EmailDispatcher for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.as_str())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Email API accepted notification");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));

        Err(DispatchError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}
