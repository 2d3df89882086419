use exchange_desk::config::LeadRelayConfig;
use exchange_desk::error::AppError;
use exchange_desk::leads::{
    EmailRoute, HttpWebhook, LeadRelayService, SendGridMailer, TurnstileVerifier,
    VerificationPolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) public: PublicConfig,
}

/// Settings the browser needs to render the contact form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublicConfig {
    pub(crate) turnstile_site_key: Option<String>,
}

impl PublicConfig {
    pub(crate) fn from_leads(config: &LeadRelayConfig) -> Self {
        Self {
            turnstile_site_key: config.verification.site_key.clone(),
        }
    }
}

pub(crate) fn build_relay_service(config: &LeadRelayConfig) -> Result<LeadRelayService, AppError> {
    let client = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()?;

    let verification = match (&config.verification.secret, config.verification.enabled) {
        (Some(secret), true) => VerificationPolicy::Required(Arc::new(TurnstileVerifier::new(
            client.clone(),
            config.verification.endpoint.clone(),
            secret.clone(),
        ))),
        _ => VerificationPolicy::Disabled,
    };
    let mut service = LeadRelayService::new(verification);

    match &config.email {
        Some(email) => {
            let mailer = SendGridMailer::new(
                client.clone(),
                email.endpoint.clone(),
                email.api_key.clone(),
            );
            service = service.with_email(
                Arc::new(mailer),
                EmailRoute {
                    to: email.to.clone(),
                    from: email.from.clone(),
                },
            );
        }
        None => info!("SENDGRID_API_KEY, LEAD_EMAIL_TO or LEAD_EMAIL_FROM unset; lead email disabled"),
    }

    match &config.webhook {
        Some(webhook) => {
            service = service.with_webhook(Arc::new(HttpWebhook::new(client, webhook.url.clone())));
        }
        None => info!("LEAD_WEBHOOK_URL unset; lead webhook disabled"),
    }

    info!(
        verification = config.verification.enabled,
        email = config.email.is_some(),
        webhook = config.webhook.is_some(),
        "lead relay configured"
    );
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_desk::config::{VerificationConfig, WebhookConfig, DEFAULT_TURNSTILE_VERIFY_URL};

    fn leads_config() -> LeadRelayConfig {
        LeadRelayConfig {
            verification: VerificationConfig {
                enabled: false,
                secret: None,
                endpoint: DEFAULT_TURNSTILE_VERIFY_URL.to_string(),
                site_key: Some("0x4AAA-site".to_string()),
            },
            email: None,
            webhook: Some(WebhookConfig {
                url: "http://127.0.0.1:9/hook".to_string(),
            }),
        }
    }

    #[test]
    fn public_config_exposes_only_the_site_key() {
        let public = PublicConfig::from_leads(&leads_config());
        let json = serde_json::to_value(&public).expect("serializes");
        assert_eq!(json, serde_json::json!({ "turnstileSiteKey": "0x4AAA-site" }));
    }

    #[test]
    fn relay_service_builds_from_partial_config() {
        build_relay_service(&leads_config()).expect("service builds");
    }
}
