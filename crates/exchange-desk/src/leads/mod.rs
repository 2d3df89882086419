//! Contact-form lead relay: token verification followed by best-effort email
//! and webhook notification.

pub mod domain;
pub mod email;
pub mod router;
pub mod service;
pub mod verification;
pub mod webhook;

#[cfg(test)]
mod tests;

pub use domain::LeadSubmission;
pub use email::{
    compose_lead_email, DeliveryError, EmailRoute, LeadEmail, LeadMailer, SendGridMailer,
};
pub use router::lead_router;
pub use service::{
    DeliveryOutcome, EmailChannel, LeadRelayError, LeadRelayService, RelayReport,
    VerificationOutcome, VerificationPolicy,
};
pub use verification::{TokenVerifier, TurnstileVerifier, VerificationError};
pub use webhook::{HttpWebhook, WebhookSink};
