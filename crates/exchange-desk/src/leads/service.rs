use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::LeadSubmission;
use super::email::{compose_lead_email, EmailRoute, LeadMailer};
use super::verification::{TokenVerifier, VerificationError};
use super::webhook::WebhookSink;

/// Whether submissions must carry a verified anti-bot token.
#[derive(Clone)]
pub enum VerificationPolicy {
    Disabled,
    Required(Arc<dyn TokenVerifier>),
}

#[derive(Clone)]
pub struct EmailChannel {
    pub mailer: Arc<dyn LeadMailer>,
    pub route: EmailRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    Disabled,
    TokenAbsent,
    Verified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    /// Channel not configured.
    Skipped,
    Failed { reason: String },
}

/// What happened to one submission on its way through the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayReport {
    pub verification: VerificationOutcome,
    pub email: DeliveryOutcome,
    pub webhook: DeliveryOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum LeadRelayError {
    #[error("security verification rejected the submission")]
    VerificationRejected,
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error("lead payload could not be read: {0}")]
    Payload(#[from] serde_json::Error),
}

impl LeadRelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::VerificationRejected => StatusCode::BAD_REQUEST,
            Self::Verification(_) | Self::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the browser.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::VerificationRejected => "Invalid security verification",
            Self::Verification(_) | Self::Payload(_) => "Failed to process request",
        }
    }
}

/// Verifies a contact-form submission, then fans it out to the configured
/// notification channels. Delivery failures are logged and never reach the
/// submitter.
#[derive(Clone)]
pub struct LeadRelayService {
    verification: VerificationPolicy,
    email: Option<EmailChannel>,
    webhook: Option<Arc<dyn WebhookSink>>,
}

impl LeadRelayService {
    pub fn new(verification: VerificationPolicy) -> Self {
        Self {
            verification,
            email: None,
            webhook: None,
        }
    }

    pub fn with_email(mut self, mailer: Arc<dyn LeadMailer>, route: EmailRoute) -> Self {
        self.email = Some(EmailChannel { mailer, route });
        self
    }

    pub fn with_webhook(mut self, webhook: Arc<dyn WebhookSink>) -> Self {
        self.webhook = Some(webhook);
        self
    }

    pub async fn relay(&self, payload: Value) -> Result<RelayReport, LeadRelayError> {
        let lead = LeadSubmission::deserialize(&payload)?;
        let verification = self.verify(&lead).await?;
        let email = self.send_email(&lead).await;
        let webhook = self.post_webhook(&payload).await;

        info!(
            ?verification,
            email = ?email,
            webhook = ?webhook,
            "lead relayed"
        );

        Ok(RelayReport {
            verification,
            email,
            webhook,
        })
    }

    async fn verify(&self, lead: &LeadSubmission) -> Result<VerificationOutcome, LeadRelayError> {
        let verifier = match &self.verification {
            VerificationPolicy::Disabled => return Ok(VerificationOutcome::Disabled),
            VerificationPolicy::Required(verifier) => verifier,
        };

        let Some(token) = lead.token() else {
            warn!("lead submitted without a verification token; skipping check");
            return Ok(VerificationOutcome::TokenAbsent);
        };

        if verifier.verify(token).await? {
            Ok(VerificationOutcome::Verified)
        } else {
            Err(LeadRelayError::VerificationRejected)
        }
    }

    async fn send_email(&self, lead: &LeadSubmission) -> DeliveryOutcome {
        let Some(channel) = &self.email else {
            info!("lead email not configured; skipping");
            return DeliveryOutcome::Skipped;
        };

        let email = compose_lead_email(lead, &channel.route, Utc::now());
        match channel.mailer.send(&email).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) => {
                warn!(error = %err, "lead email delivery failed");
                DeliveryOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn post_webhook(&self, payload: &Value) -> DeliveryOutcome {
        let Some(webhook) = &self.webhook else {
            info!("lead webhook not configured; skipping");
            return DeliveryOutcome::Skipped;
        };

        match webhook.deliver(payload).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) => {
                warn!(error = %err, "lead webhook delivery failed");
                DeliveryOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
