//! Exchange calculators: boot, closing costs, and identification rules.

pub mod boot;
pub mod costs;
pub mod form;
pub mod identification;
pub mod money;
pub mod router;

pub use boot::{calculate_boot, BootCalculationInput, BootCalculationResult, BootForm};
pub use costs::{estimate_costs, CostEstimateForm, CostEstimateInput, CostEstimateResult};
pub use form::{CalculatorForm, EvaluationMode, FieldError, FieldErrors};
pub use identification::{
    check_identification, IdentificationCheckInput, IdentificationForm, IdentificationReport,
    IdentificationRule, RuleResult,
};
pub use money::format_usd;
pub use router::tools_router;
