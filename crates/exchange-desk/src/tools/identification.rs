//! The three IRS identification rules for replacement property.
//!
//! Each rule is evaluated on its own and reported in a fixed order. The
//! aggregate banner requires every rule to pass, even though a real exchange
//! only has to satisfy one of them.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::form::{raw_field, CalculatorForm, FieldErrors};
use super::money::format_usd;

pub const MAX_IDENTIFIED_PROPERTIES: u32 = 3;
const CEILING_MULTIPLIER: Decimal = dec!(2);
const FLOOR_MULTIPLIER: Decimal = dec!(0.95);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationCheckInput {
    pub num_properties: u32,
    pub total_identified_value: Decimal,
    pub relinquished_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IdentificationRule {
    #[serde(rename = "3-Property Rule")]
    ThreeProperty,
    #[serde(rename = "200% Rule")]
    TwoHundredPercent,
    #[serde(rename = "95% Rule")]
    NinetyFivePercent,
}

impl IdentificationRule {
    pub const ALL: [IdentificationRule; 3] = [
        IdentificationRule::ThreeProperty,
        IdentificationRule::TwoHundredPercent,
        IdentificationRule::NinetyFivePercent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IdentificationRule::ThreeProperty => "3-Property Rule",
            IdentificationRule::TwoHundredPercent => "200% Rule",
            IdentificationRule::NinetyFivePercent => "95% Rule",
        }
    }

    pub fn evaluate(&self, input: &IdentificationCheckInput) -> RuleResult {
        match self {
            IdentificationRule::ThreeProperty => three_property_rule(input),
            IdentificationRule::TwoHundredPercent => two_hundred_percent_rule(input),
            IdentificationRule::NinetyFivePercent => ninety_five_percent_rule(input),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub name: IdentificationRule,
    pub satisfied: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationReport {
    pub rules: Vec<RuleResult>,
    pub all_rules_satisfied: bool,
    pub banner: &'static str,
}

pub fn check_identification(input: &IdentificationCheckInput) -> IdentificationReport {
    let rules: Vec<RuleResult> = IdentificationRule::ALL
        .iter()
        .map(|rule| rule.evaluate(input))
        .collect();
    let all_rules_satisfied = rules.iter().all(|rule| rule.satisfied);

    IdentificationReport {
        rules,
        all_rules_satisfied,
        banner: if all_rules_satisfied {
            "All Rules Satisfied"
        } else {
            "Some Rules Not Satisfied"
        },
    }
}

fn properties(count: u32) -> &'static str {
    if count == 1 {
        "property"
    } else {
        "properties"
    }
}

fn three_property_rule(input: &IdentificationCheckInput) -> RuleResult {
    let count = input.num_properties;
    let satisfied = count <= MAX_IDENTIFIED_PROPERTIES;
    let warning = (!satisfied).then(|| {
        let excess = count - MAX_IDENTIFIED_PROPERTIES;
        format!(
            "{excess} {} over the limit; the 200% or 95% rule must be met instead",
            properties(excess)
        )
    });

    RuleResult {
        name: IdentificationRule::ThreeProperty,
        satisfied,
        description: format!(
            "{count} {} identified (up to {MAX_IDENTIFIED_PROPERTIES} allowed regardless of value)",
            properties(count)
        ),
        warning,
    }
}

fn two_hundred_percent_rule(input: &IdentificationCheckInput) -> RuleResult {
    let ceiling = input.relinquished_value * CEILING_MULTIPLIER;
    let satisfied = input.total_identified_value <= ceiling;
    let warning = (!satisfied).then(|| {
        format!(
            "Identified value exceeds the 200% limit by {}",
            format_usd(input.total_identified_value - ceiling)
        )
    });

    RuleResult {
        name: IdentificationRule::TwoHundredPercent,
        satisfied,
        description: format!(
            "{} identified vs. {} maximum (200% of relinquished value)",
            format_usd(input.total_identified_value),
            format_usd(ceiling)
        ),
        warning,
    }
}

fn ninety_five_percent_rule(input: &IdentificationCheckInput) -> RuleResult {
    let floor = input.relinquished_value * FLOOR_MULTIPLIER;
    let satisfied = input.total_identified_value >= floor;
    let warning = (!satisfied).then(|| {
        format!(
            "Identified value is {} short of the 95% threshold",
            format_usd(floor - input.total_identified_value)
        )
    });

    RuleResult {
        name: IdentificationRule::NinetyFivePercent,
        satisfied,
        description: format!(
            "{} identified vs. {} minimum (95% of relinquished value)",
            format_usd(input.total_identified_value),
            format_usd(floor)
        ),
        warning,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationForm {
    #[serde(default, deserialize_with = "raw_field")]
    pub num_properties: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub total_identified_value: Option<String>,
    #[serde(default, deserialize_with = "raw_field")]
    pub relinquished_value: Option<String>,
}

impl CalculatorForm for IdentificationForm {
    type Input = IdentificationCheckInput;
    type Output = IdentificationReport;

    fn parse(&self) -> Result<IdentificationCheckInput, FieldErrors> {
        let mut errors = FieldErrors::default();
        let num_properties = errors
            .check(
                "numProperties",
                self.num_properties.as_deref(),
                |value| value >= Decimal::ONE && value.fract().is_zero() && value.to_u32().is_some(),
                "Number of properties must be a whole number of at least 1",
            )
            .and_then(|value| value.to_u32());
        let total_identified_value = errors.check(
            "totalIdentifiedValue",
            self.total_identified_value.as_deref(),
            |value| value > Decimal::ZERO,
            "Total identified value must be greater than 0",
        );
        let relinquished_value = errors.check(
            "relinquishedValue",
            self.relinquished_value.as_deref(),
            |value| value > Decimal::ZERO,
            "Relinquished property value must be greater than 0",
        );

        match (num_properties, total_identified_value, relinquished_value) {
            (Some(num_properties), Some(total_identified_value), Some(relinquished_value)) => {
                Ok(IdentificationCheckInput {
                    num_properties,
                    total_identified_value,
                    relinquished_value,
                })
            }
            _ => Err(errors),
        }
    }

    fn calculate(input: &IdentificationCheckInput) -> IdentificationReport {
        check_identification(input)
    }
}
