use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::form::{raw_field, CalculatorForm, FieldErrors};
use super::money::format_usd;

/// Illustrative flat rate applied to total boot; not a tax computation.
pub const ILLUSTRATIVE_TAX_RATE: Decimal = dec!(0.20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootCalculationInput {
    pub relinquished_value: Decimal,
    pub replacement_value: Decimal,
    pub cash_received: Decimal,
    pub old_mortgage: Decimal,
    pub new_mortgage: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootCalculationResult {
    pub cash_boot: Decimal,
    pub mortgage_boot: Decimal,
    pub total_boot: Decimal,
    pub estimated_tax: Decimal,
}

impl BootCalculationResult {
    pub fn display(&self) -> BootResultDisplay {
        BootResultDisplay {
            cash_boot: format_usd(self.cash_boot),
            mortgage_boot: format_usd(self.mortgage_boot),
            total_boot: format_usd(self.total_boot),
            estimated_tax: format_usd(self.estimated_tax),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootResultDisplay {
    pub cash_boot: String,
    pub mortgage_boot: String,
    pub total_boot: String,
    pub estimated_tax: String,
}

/// Debt relief counts as boot only when the new mortgage is smaller.
pub fn calculate_boot(input: &BootCalculationInput) -> BootCalculationResult {
    let cash_boot = input.cash_received;
    let mortgage_boot = (input.old_mortgage - input.new_mortgage).max(Decimal::ZERO);
    let total_boot = cash_boot + mortgage_boot;

    BootCalculationResult {
        cash_boot,
        mortgage_boot,
        total_boot,
        estimated_tax: total_boot * ILLUSTRATIVE_TAX_RATE,
    }
}

/// Boot calculator fields as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootForm {
    #[serde(default, deserialize_with = "raw_field")]
    pub relinquished_value: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub replacement_value: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub cash_received: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub old_mortgage: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub new_mortgage: Option<String>,
}

impl CalculatorForm for BootForm {
    type Input = BootCalculationInput;
    type Output = BootCalculationResult;

    fn parse(&self) -> Result<BootCalculationInput, FieldErrors> {
        let positive = |value: Decimal| value > Decimal::ZERO;
        let non_negative = |value: Decimal| value >= Decimal::ZERO;

        let mut errors = FieldErrors::default();
        let relinquished_value = errors.check(
            "relinquishedValue",
            self.relinquished_value.as_deref(),
            positive,
            "Relinquished property value must be greater than 0",
        );
        let replacement_value = errors.check(
            "replacementValue",
            self.replacement_value.as_deref(),
            positive,
            "Replacement property value must be greater than 0",
        );
        let cash_received = errors.check(
            "cashReceived",
            self.cash_received.as_deref(),
            non_negative,
            "Cash received cannot be negative",
        );
        let old_mortgage = errors.check(
            "oldMortgage",
            self.old_mortgage.as_deref(),
            non_negative,
            "Old mortgage cannot be negative",
        );
        let new_mortgage = errors.check(
            "newMortgage",
            self.new_mortgage.as_deref(),
            non_negative,
            "New mortgage cannot be negative",
        );

        match (
            relinquished_value,
            replacement_value,
            cash_received,
            old_mortgage,
            new_mortgage,
        ) {
            (
                Some(relinquished_value),
                Some(replacement_value),
                Some(cash_received),
                Some(old_mortgage),
                Some(new_mortgage),
            ) => Ok(BootCalculationInput {
                relinquished_value,
                replacement_value,
                cash_received,
                old_mortgage,
                new_mortgage,
            }),
            _ => Err(errors),
        }
    }

    fn calculate(input: &BootCalculationInput) -> BootCalculationResult {
        calculate_boot(input)
    }
}
