use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::leads::email::{DeliveryError, EmailRoute, LeadEmail, LeadMailer};
use crate::leads::service::{LeadRelayService, VerificationPolicy};
use crate::leads::verification::{TokenVerifier, VerificationError};
use crate::leads::webhook::WebhookSink;

pub(super) fn payload(token: Option<&str>) -> Value {
    let mut payload = json!({
        "name": "Dana Ortiz",
        "email": "dana@example.com",
        "phone": "555-0100",
        "projectType": "Multifamily",
        "city": "Austin",
        "utmCampaign": "spring"
    });
    if let Some(token) = token {
        payload["turnstileToken"] = json!(token);
    }
    payload
}

pub(super) fn route() -> EmailRoute {
    EmailRoute {
        to: "desk@example.com".to_string(),
        from: "leads@example.com".to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Verdict {
    Accept,
    Reject,
    Unreachable,
}

pub(super) struct StubVerifier {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl StubVerifier {
    pub(super) fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, _token: &str) -> Result<bool, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Verdict::Accept => Ok(true),
            Verdict::Reject => Ok(false),
            Verdict::Unreachable => Err(VerificationError::Status(503)),
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryMailer {
    sent: Mutex<Vec<LeadEmail>>,
    fail: bool,
}

impl MemoryMailer {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn sent(&self) -> Vec<LeadEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl LeadMailer for MemoryMailer {
    async fn send(&self, email: &LeadEmail) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(email.clone());
        if self.fail {
            Err(DeliveryError::Status { status: 500 })
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryWebhook {
    received: Mutex<Vec<Value>>,
    fail: bool,
}

impl MemoryWebhook {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn received(&self) -> Vec<Value> {
        self.received
            .lock()
            .expect("webhook mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl WebhookSink for MemoryWebhook {
    async fn deliver(&self, payload: &Value) -> Result<(), DeliveryError> {
        self.received
            .lock()
            .expect("webhook mutex poisoned")
            .push(payload.clone());
        if self.fail {
            Err(DeliveryError::Status { status: 502 })
        } else {
            Ok(())
        }
    }
}

pub(super) struct Harness {
    pub(super) service: LeadRelayService,
    pub(super) mailer: Arc<MemoryMailer>,
    pub(super) webhook: Arc<MemoryWebhook>,
}

pub(super) fn harness(
    verification: VerificationPolicy,
    mailer: MemoryMailer,
    webhook: MemoryWebhook,
) -> Harness {
    let mailer = Arc::new(mailer);
    let webhook = Arc::new(webhook);
    let service = LeadRelayService::new(verification)
        .with_email(mailer.clone(), route())
        .with_webhook(webhook.clone());
    Harness {
        service,
        mailer,
        webhook,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}
