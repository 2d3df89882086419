use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::service::{LeadRelayError, LeadRelayService};

pub fn lead_router(service: Arc<LeadRelayService>) -> Router {
    Router::new()
        .route("/api/lead", post(submit_handler))
        .with_state(service)
}

/// Reads the raw body so malformed JSON is answered with the relay's own
/// error shape instead of the extractor's rejection.
pub(crate) async fn submit_handler(
    State(service): State<Arc<LeadRelayService>>,
    body: Bytes,
) -> Response {
    let outcome = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => service.relay(payload).await,
        Err(err) => Err(LeadRelayError::Payload(err)),
    };

    match outcome {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(error = %err, "lead submission failed");
            }
            (
                status,
                Json(json!({ "error": err.public_message() })),
            )
                .into_response()
        }
    }
}
