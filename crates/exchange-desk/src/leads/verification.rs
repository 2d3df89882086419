use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Challenge-token check performed before a submission is trusted.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `Ok(false)` means the verifier answered and rejected the token.
    async fn verify(&self, token: &str) -> Result<bool, VerificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("verification endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("verification endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct SiteVerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile `siteverify` client.
#[derive(Debug, Clone)]
pub struct TurnstileVerifier {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
}

impl TurnstileVerifier {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<bool, VerificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SiteVerifyRequest {
                secret: &self.secret,
                response: token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerificationError::Status(status.as_u16()));
        }

        let outcome: SiteVerifyResponse = response.json().await?;
        if outcome.success {
            debug!("turnstile token accepted");
        } else {
            warn!(error_codes = ?outcome.error_codes, "turnstile token rejected");
        }
        Ok(outcome.success)
    }
}
