use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::boot::{BootCalculationResult, BootForm, BootResultDisplay};
use super::costs::{CostEstimateDisplay, CostEstimateForm, CostEstimateResult};
use super::form::{CalculatorForm, EvaluationMode};
use super::identification::{IdentificationForm, IdentificationReport};

/// Router builder exposing the three calculators.
pub fn tools_router() -> Router {
    Router::new()
        .route("/api/tools/boot", post(evaluate_handler::<BootForm>))
        .route("/api/tools/costs", post(evaluate_handler::<CostEstimateForm>))
        .route(
            "/api/tools/identification",
            post(evaluate_handler::<IdentificationForm>),
        )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluateParams {
    #[serde(default)]
    pub(crate) mode: EvaluationMode,
}

/// Calculator output as the result panel renders it.
pub trait ResultView {
    type Body: Serialize;

    fn view(&self) -> Self::Body;
}

#[derive(Debug, Serialize)]
pub struct DisplayedResult<T, D> {
    pub values: T,
    pub display: D,
}

impl ResultView for BootCalculationResult {
    type Body = DisplayedResult<BootCalculationResult, BootResultDisplay>;

    fn view(&self) -> Self::Body {
        DisplayedResult {
            values: *self,
            display: self.display(),
        }
    }
}

impl ResultView for CostEstimateResult {
    type Body = DisplayedResult<CostEstimateResult, CostEstimateDisplay>;

    fn view(&self) -> Self::Body {
        DisplayedResult {
            values: *self,
            display: self.display(),
        }
    }
}

impl ResultView for IdentificationReport {
    type Body = IdentificationReport;

    fn view(&self) -> Self::Body {
        self.clone()
    }
}

pub(crate) async fn evaluate_handler<F>(
    Query(params): Query<EvaluateParams>,
    Json(form): Json<F>,
) -> Response
where
    F: CalculatorForm + for<'de> Deserialize<'de> + Send + 'static,
    F::Output: ResultView,
{
    match params.mode {
        EvaluationMode::Preview => {
            let result = form.evaluate_silent().map(|output| output.view());
            (StatusCode::OK, Json(json!({ "result": result }))).into_response()
        }
        EvaluationMode::Explicit => match form.evaluate_explicit() {
            Ok(output) => {
                (StatusCode::OK, Json(json!({ "result": output.view() }))).into_response()
            }
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "calculator input rejected");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": errors })),
                )
                    .into_response()
            }
        },
    }
}
