use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use exchange_desk::leads::{lead_router, LeadRelayService};
use exchange_desk::tools::tools_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_api_routes(relay: Arc<LeadRelayService>) -> axum::Router {
    tools_router()
        .merge(lead_router(relay))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/config/public",
            axum::routing::get(public_config_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn public_config_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    Json(state.public)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::PublicConfig;
    use axum::body::Body;
    use axum::http::Request;
    use exchange_desk::leads::VerificationPolicy;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            public: PublicConfig {
                turnstile_site_key: Some("0x4AAA-site".to_string()),
            },
        };
        let relay = Arc::new(LeadRelayService::new(VerificationPolicy::Disabled));
        with_api_routes(relay).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn public_config_returns_site_key() {
        let (status, body) = get(app(true), "/api/config/public").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "turnstileSiteKey": "0x4AAA-site" }));
    }

    #[tokio::test]
    async fn calculators_and_lead_relay_share_the_router() {
        let response = app(true)
            .oneshot(
                Request::post("/api/tools/boot?mode=preview")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(true)
            .oneshot(
                Request::post("/api/lead")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Dana Ortiz"}"#))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
