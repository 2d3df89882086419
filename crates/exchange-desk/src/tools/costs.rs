use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::form::{raw_field, CalculatorForm, FieldErrors};
use super::money::format_usd;

pub const DEFAULT_QI_FEE_PERCENTAGE: Decimal = dec!(1.0);
pub const DEFAULT_ESCROW_FEE: Decimal = dec!(500);
pub const DEFAULT_TITLE_INSURANCE_RATE: Decimal = dec!(0.5);
pub const DEFAULT_RECORDING_FEES: Decimal = dec!(100);

const MAX_QI_FEE_PERCENTAGE: Decimal = dec!(10);
const MAX_TITLE_INSURANCE_RATE: Decimal = dec!(5);
const HUNDRED: Decimal = dec!(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateInput {
    pub property_value: Decimal,
    /// Percent of property value, `1.0` meaning 1%.
    pub qi_fee_percentage: Decimal,
    pub escrow_fee: Decimal,
    /// Percent of property value.
    pub title_insurance_rate: Decimal,
    pub recording_fees: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateResult {
    pub qi_fee: Decimal,
    pub escrow_fee: Decimal,
    pub title_insurance: Decimal,
    pub recording_fees: Decimal,
    pub total_costs: Decimal,
}

impl CostEstimateResult {
    pub fn display(&self) -> CostEstimateDisplay {
        CostEstimateDisplay {
            qi_fee: format_usd(self.qi_fee),
            escrow_fee: format_usd(self.escrow_fee),
            title_insurance: format_usd(self.title_insurance),
            recording_fees: format_usd(self.recording_fees),
            total_costs: format_usd(self.total_costs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateDisplay {
    pub qi_fee: String,
    pub escrow_fee: String,
    pub title_insurance: String,
    pub recording_fees: String,
    pub total_costs: String,
}

pub fn estimate_costs(input: &CostEstimateInput) -> CostEstimateResult {
    let qi_fee = input.property_value * (input.qi_fee_percentage / HUNDRED);
    let title_insurance = input.property_value * (input.title_insurance_rate / HUNDRED);
    let total_costs = qi_fee + input.escrow_fee + title_insurance + input.recording_fees;

    CostEstimateResult {
        qi_fee,
        escrow_fee: input.escrow_fee,
        title_insurance,
        recording_fees: input.recording_fees,
        total_costs,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostEstimateForm {
    #[serde(deserialize_with = "raw_field")]
    pub property_value: Option<String>,
    #[serde(deserialize_with = "raw_field")]
    pub qi_fee_percentage: Option<String>,
    #[serde(deserialize_with = "raw_field")]
    pub escrow_fee: Option<String>,
    #[serde(deserialize_with = "raw_field")]
    pub title_insurance_rate: Option<String>,
    #[serde(deserialize_with = "raw_field")]
    pub recording_fees: Option<String>,
}

/// Pre-filled the way the estimator first renders: fees populated, property
/// value left for the visitor.
impl Default for CostEstimateForm {
    fn default() -> Self {
        Self {
            property_value: None,
            qi_fee_percentage: Some(DEFAULT_QI_FEE_PERCENTAGE.to_string()),
            escrow_fee: Some(DEFAULT_ESCROW_FEE.to_string()),
            title_insurance_rate: Some(DEFAULT_TITLE_INSURANCE_RATE.to_string()),
            recording_fees: Some(DEFAULT_RECORDING_FEES.to_string()),
        }
    }
}

impl CalculatorForm for CostEstimateForm {
    type Input = CostEstimateInput;
    type Output = CostEstimateResult;

    fn parse(&self) -> Result<CostEstimateInput, FieldErrors> {
        let non_negative = |value: Decimal| value >= Decimal::ZERO;

        let mut errors = FieldErrors::default();
        let property_value = errors.check(
            "propertyValue",
            self.property_value.as_deref(),
            |value| value > Decimal::ZERO,
            "Property value must be greater than 0",
        );
        let qi_fee_percentage = errors.check(
            "qiFeePercentage",
            self.qi_fee_percentage.as_deref(),
            |value| (Decimal::ZERO..=MAX_QI_FEE_PERCENTAGE).contains(&value),
            "QI fee percentage must be between 0 and 10",
        );
        let escrow_fee = errors.check(
            "escrowFee",
            self.escrow_fee.as_deref(),
            non_negative,
            "Escrow fee cannot be negative",
        );
        let title_insurance_rate = errors.check(
            "titleInsuranceRate",
            self.title_insurance_rate.as_deref(),
            |value| (Decimal::ZERO..=MAX_TITLE_INSURANCE_RATE).contains(&value),
            "Title insurance rate must be between 0 and 5",
        );
        let recording_fees = errors.check(
            "recordingFees",
            self.recording_fees.as_deref(),
            non_negative,
            "Recording fees cannot be negative",
        );

        match (
            property_value,
            qi_fee_percentage,
            escrow_fee,
            title_insurance_rate,
            recording_fees,
        ) {
            (
                Some(property_value),
                Some(qi_fee_percentage),
                Some(escrow_fee),
                Some(title_insurance_rate),
                Some(recording_fees),
            ) => Ok(CostEstimateInput {
                property_value,
                qi_fee_percentage,
                escrow_fee,
                title_insurance_rate,
                recording_fees,
            }),
            _ => Err(errors),
        }
    }

    fn calculate(input: &CostEstimateInput) -> CostEstimateResult {
        estimate_costs(input)
    }
}
