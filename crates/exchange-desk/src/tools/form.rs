use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest magnitude any form field accepts. Sums and percentage products of
/// five such values stay far inside `Decimal`'s range.
pub const MAX_FORM_AMOUNT: Decimal = dec!(1000000000000000);
const AMOUNT_TOO_LARGE: &str = "Amount is too large (maximum $1,000,000,000,000,000)";

/// Inline validation message attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every violated constraint of one form submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", render_errors(.0))]
pub struct FieldErrors(Vec<FieldError>);

fn render_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Parse `raw` and keep it when `accept` holds, otherwise record `message`.
    /// Values beyond [`MAX_FORM_AMOUNT`] are recorded as too large.
    ///
    /// Empty and unparseable input is recorded the same way as an out-of-range
    /// value: a blank field is never treated as zero.
    pub(crate) fn check(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        accept: impl Fn(Decimal) -> bool,
        message: &'static str,
    ) -> Option<Decimal> {
        match parse_amount(raw) {
            Some(value) if value.abs() > MAX_FORM_AMOUNT => {
                self.0.push(FieldError {
                    field,
                    message: AMOUNT_TOO_LARGE,
                });
                None
            }
            Some(value) if accept(value) => Some(value),
            _ => {
                self.0.push(FieldError { field, message });
                None
            }
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parse a number as typed into a form field. Thousands separators, a leading
/// dollar sign and surrounding whitespace are tolerated.
pub fn parse_amount(raw: Option<&str>) -> Option<Decimal> {
    let cleaned: String = raw?
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && *ch != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Accepts a JSON string, number, or null for a form field.
pub(crate) fn raw_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(number)) => Some(number.to_string()),
        None => None,
    })
}

/// Which evaluation path triggered a calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Explicit "Calculate" action: field errors are reported.
    #[default]
    Explicit,
    /// Input-completeness trigger: errors are suppressed, a result appears only
    /// once every field is present and valid.
    Preview,
}

/// A calculator form: raw field values, their validation, and the pure
/// calculation both evaluation paths share.
pub trait CalculatorForm {
    type Input;
    type Output;

    fn parse(&self) -> Result<Self::Input, FieldErrors>;

    fn calculate(input: &Self::Input) -> Self::Output;

    fn evaluate_silent(&self) -> Option<Self::Output> {
        self.parse().ok().map(|input| Self::calculate(&input))
    }

    fn evaluate_explicit(&self) -> Result<Self::Output, FieldErrors> {
        self.parse().map(|input| Self::calculate(&input))
    }
}
