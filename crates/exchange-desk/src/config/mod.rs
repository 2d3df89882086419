use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";
pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub leads: LeadRelayConfig,
}

impl AppConfig {
    /// Load configuration from `.env` (when present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let environment =
            AppEnvironment::from_str(&value("APP_ENV").unwrap_or_else(|| "development".into()));

        let host = value("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = value("APP_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = value("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let format = match value("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            None => LogFormat::Compact,
        };

        let secret = value("TURNSTILE_SECRET_KEY");
        let enabled = match value("TURNSTILE_VERIFICATION_ENABLED") {
            Some(raw) => parse_flag("TURNSTILE_VERIFICATION_ENABLED", &raw)?,
            None => secret.is_some(),
        };
        if enabled && secret.is_none() {
            return Err(ConfigError::MissingVerificationSecret);
        }

        let verification = VerificationConfig {
            enabled,
            secret,
            endpoint: value("TURNSTILE_VERIFY_URL")
                .unwrap_or_else(|| DEFAULT_TURNSTILE_VERIFY_URL.to_string()),
            site_key: value("TURNSTILE_SITE_KEY"),
        };

        let email = match (
            value("SENDGRID_API_KEY"),
            value("LEAD_EMAIL_TO"),
            value("LEAD_EMAIL_FROM"),
        ) {
            (Some(api_key), Some(to), Some(from)) => Some(EmailConfig {
                api_key,
                to,
                from,
                endpoint: value("SENDGRID_API_URL")
                    .unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
            }),
            _ => None,
        };

        let webhook = value("LEAD_WEBHOOK_URL").map(|url| WebhookConfig { url });

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            leads: LeadRelayConfig {
                verification,
                email,
                webhook,
            },
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Collaborator settings for the contact-form lead relay.
#[derive(Debug, Clone)]
pub struct LeadRelayConfig {
    pub verification: VerificationConfig,
    /// `None` when any of the provider key, recipient or sender is absent.
    pub email: Option<EmailConfig>,
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone)]
pub struct VerificationConfig {
    pub enabled: bool,
    pub secret: Option<String>,
    pub endpoint: String,
    /// Public key rendered by the client-side widget.
    pub site_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub to: String,
    pub from: String,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidFlag { name: &'static str, value: String },
    MissingVerificationSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false (found '{value}')")
            }
            ConfigError::MissingVerificationSecret => write!(
                f,
                "TURNSTILE_VERIFICATION_ENABLED is set but TURNSTILE_SECRET_KEY is missing"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
