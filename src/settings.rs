use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};
use url::Url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,

    #[serde(default)]
    pub contact_to_email: Option<String>,

    #[serde(default = "default_contact_from_email")]
    pub contact_from_email: String,

    #[serde(default = "default_mail_timeout")]
    pub mail_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_resend_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}
fn default_contact_from_email() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}
fn default_mail_timeout() -> u64 {
    10
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Hosting platforms commonly inject these without the APP_ prefix
        config.resend_api_key = fill_or_env(config.resend_api_key, "RESEND_API_KEY");
        config.contact_to_email = fill_or_env(config.contact_to_email, "CONTACT_TO_EMAIL");
        if let Ok(from) = env::var("CONTACT_FROM_EMAIL") {
            if !from.trim().is_empty() && env::var("APP_CONTACT_FROM_EMAIL").is_err() {
                config.contact_from_email = from;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if Url::parse(&self.resend_api_url).is_err() {
            errors.push("RESEND_API_URL must be a valid URL");
        }
        if self.contact_from_email.trim().is_empty() {
            errors.push("CONTACT_FROM_EMAIL cannot be empty");
        }
        if self.mail_timeout_secs == 0 {
            errors.push("MAIL_TIMEOUT_SECS must be greater than zero");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Names of the mail settings that are required for dispatch but unset.
    pub fn missing_mail_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.resend_api_key) {
            missing.push("RESEND_API_KEY");
        }
        if is_blank(&self.contact_to_email) {
            missing.push("CONTACT_TO_EMAIL");
        }
        missing
    }

    pub fn mail_configured(&self) -> bool {
        self.missing_mail_settings().is_empty()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn fill_or_env(current: Option<String>, env_key: &str) -> Option<String> {
    match current {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => env::var(env_key).ok().filter(|v| !v.trim().is_empty()),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            resend_api_key: None,
            resend_api_url: default_resend_api_url(),
            contact_to_email: None,
            contact_from_email: default_contact_from_email(),
            mail_timeout_secs: default_mail_timeout(),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self.as_deref() {
            None | Some("") => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("resend_api_url", &self.resend_api_url)
            .field("contact_to_email", &self.contact_to_email)
            .field("contact_from_email", &self.contact_from_email)
            .field("mail_timeout_secs", &self.mail_timeout_secs)
            .finish()
    }
}
