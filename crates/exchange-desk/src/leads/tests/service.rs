use super::common::*;
use serde_json::json;

use crate::leads::service::{
    DeliveryOutcome, LeadRelayError, LeadRelayService, VerificationOutcome, VerificationPolicy,
};

#[tokio::test]
async fn disabled_verification_relays_to_both_channels() {
    let harness = harness(
        VerificationPolicy::Disabled,
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    let report = harness
        .service
        .relay(payload(None))
        .await
        .expect("lead relayed");

    assert_eq!(report.verification, VerificationOutcome::Disabled);
    assert_eq!(report.email, DeliveryOutcome::Delivered);
    assert_eq!(report.webhook, DeliveryOutcome::Delivered);

    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New 1031 Exchange Lead: Dana Ortiz");
    assert_eq!(sent[0].to, "desk@example.com");
}

#[tokio::test]
async fn webhook_receives_the_payload_as_submitted() {
    let harness = harness(
        VerificationPolicy::Disabled,
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    harness
        .service
        .relay(payload(Some("tok")))
        .await
        .expect("lead relayed");

    let received = harness.webhook.received();
    assert_eq!(received, vec![payload(Some("tok"))]);
    assert_eq!(received[0]["utmCampaign"], "spring");
}

#[tokio::test]
async fn accepted_token_is_recorded_as_verified() {
    let verifier = StubVerifier::new(Verdict::Accept);
    let harness = harness(
        VerificationPolicy::Required(verifier.clone()),
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    let report = harness
        .service
        .relay(payload(Some("tok")))
        .await
        .expect("lead relayed");

    assert_eq!(report.verification, VerificationOutcome::Verified);
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn rejected_token_stops_before_any_delivery() {
    let verifier = StubVerifier::new(Verdict::Reject);
    let harness = harness(
        VerificationPolicy::Required(verifier.clone()),
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    let err = harness
        .service
        .relay(payload(Some("forged")))
        .await
        .expect_err("token rejected");

    assert!(matches!(err, LeadRelayError::VerificationRejected));
    assert_eq!(err.status_code().as_u16(), 400);
    assert!(harness.mailer.sent().is_empty());
    assert!(harness.webhook.received().is_empty());
}

#[tokio::test]
async fn unreachable_verifier_is_an_internal_error() {
    let harness = harness(
        VerificationPolicy::Required(StubVerifier::new(Verdict::Unreachable)),
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    let err = harness
        .service
        .relay(payload(Some("tok")))
        .await
        .expect_err("verifier down");

    assert!(matches!(err, LeadRelayError::Verification(_)));
    assert_eq!(err.status_code().as_u16(), 500);
    assert_eq!(err.public_message(), "Failed to process request");
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn missing_token_skips_the_verifier() {
    let verifier = StubVerifier::new(Verdict::Reject);
    let harness = harness(
        VerificationPolicy::Required(verifier.clone()),
        MemoryMailer::default(),
        MemoryWebhook::default(),
    );

    let mut blank = payload(None);
    blank["turnstileToken"] = json!("   ");

    let report = harness.service.relay(blank).await.expect("lead relayed");

    assert_eq!(report.verification, VerificationOutcome::TokenAbsent);
    assert_eq!(verifier.calls(), 0);
    assert_eq!(report.email, DeliveryOutcome::Delivered);
}

#[tokio::test]
async fn delivery_failures_do_not_fail_the_relay() {
    let harness = harness(
        VerificationPolicy::Disabled,
        MemoryMailer::failing(),
        MemoryWebhook::failing(),
    );

    let report = harness
        .service
        .relay(payload(None))
        .await
        .expect("failures are swallowed");

    assert!(matches!(report.email, DeliveryOutcome::Failed { .. }));
    assert_eq!(
        report.webhook,
        DeliveryOutcome::Failed {
            reason: "delivery endpoint returned status 502".to_string()
        }
    );
    assert_eq!(harness.webhook.received().len(), 1);
}

#[tokio::test]
async fn unconfigured_channels_are_skipped() {
    let service = LeadRelayService::new(VerificationPolicy::Disabled);

    let report = service.relay(payload(None)).await.expect("lead relayed");

    assert_eq!(report.email, DeliveryOutcome::Skipped);
    assert_eq!(report.webhook, DeliveryOutcome::Skipped);
}

#[tokio::test]
async fn non_object_payload_is_rejected() {
    let service = LeadRelayService::new(VerificationPolicy::Disabled);

    let err = service
        .relay(json!(["not", "a", "lead"]))
        .await
        .expect_err("array is not a lead");

    assert!(matches!(err, LeadRelayError::Payload(_)));
    assert_eq!(err.status_code().as_u16(), 500);
}
