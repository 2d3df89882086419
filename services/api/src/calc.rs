use clap::Args;
use exchange_desk::error::AppError;
use exchange_desk::tools::{
    BootCalculationResult, BootForm, CalculatorForm, CostEstimateForm, CostEstimateResult,
    FieldErrors, IdentificationForm, IdentificationReport,
};

#[derive(Args, Debug, Default)]
pub(crate) struct BootArgs {
    /// Sale price of the relinquished property
    #[arg(long)]
    pub(crate) relinquished_value: Option<String>,
    /// Purchase price of the replacement property
    #[arg(long)]
    pub(crate) replacement_value: Option<String>,
    /// Cash taken out of the exchange
    #[arg(long)]
    pub(crate) cash_received: Option<String>,
    /// Debt paid off on the relinquished property
    #[arg(long)]
    pub(crate) old_mortgage: Option<String>,
    /// Debt taken on for the replacement property
    #[arg(long)]
    pub(crate) new_mortgage: Option<String>,
}

impl From<BootArgs> for BootForm {
    fn from(args: BootArgs) -> Self {
        BootForm {
            relinquished_value: args.relinquished_value,
            replacement_value: args.replacement_value,
            cash_received: args.cash_received,
            old_mortgage: args.old_mortgage,
            new_mortgage: args.new_mortgage,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct CostsArgs {
    /// Replacement property value
    #[arg(long)]
    pub(crate) property_value: Option<String>,
    /// Qualified intermediary fee as a percentage of value (default 1.0)
    #[arg(long)]
    pub(crate) qi_fee_percentage: Option<String>,
    /// Flat escrow fee (default 500)
    #[arg(long)]
    pub(crate) escrow_fee: Option<String>,
    /// Title insurance as a percentage of value (default 0.5)
    #[arg(long)]
    pub(crate) title_insurance_rate: Option<String>,
    /// Flat recording fees (default 100)
    #[arg(long)]
    pub(crate) recording_fees: Option<String>,
}

impl From<CostsArgs> for CostEstimateForm {
    fn from(args: CostsArgs) -> Self {
        let defaults = CostEstimateForm::default();
        CostEstimateForm {
            property_value: args.property_value,
            qi_fee_percentage: args.qi_fee_percentage.or(defaults.qi_fee_percentage),
            escrow_fee: args.escrow_fee.or(defaults.escrow_fee),
            title_insurance_rate: args.title_insurance_rate.or(defaults.title_insurance_rate),
            recording_fees: args.recording_fees.or(defaults.recording_fees),
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct IdentifyArgs {
    /// Number of replacement properties identified
    #[arg(long)]
    pub(crate) num_properties: Option<String>,
    /// Combined value of every identified property
    #[arg(long)]
    pub(crate) total_identified_value: Option<String>,
    /// Sale price of the relinquished property
    #[arg(long)]
    pub(crate) relinquished_value: Option<String>,
}

impl From<IdentifyArgs> for IdentificationForm {
    fn from(args: IdentifyArgs) -> Self {
        IdentificationForm {
            num_properties: args.num_properties,
            total_identified_value: args.total_identified_value,
            relinquished_value: args.relinquished_value,
        }
    }
}

pub(crate) fn run_boot(args: BootArgs) -> Result<(), AppError> {
    let result = evaluate(BootForm::from(args))?;
    print!("{}", render_boot(&result));
    Ok(())
}

pub(crate) fn run_costs(args: CostsArgs) -> Result<(), AppError> {
    let result = evaluate(CostEstimateForm::from(args))?;
    print!("{}", render_costs(&result));
    Ok(())
}

pub(crate) fn run_identification(args: IdentifyArgs) -> Result<(), AppError> {
    let report = evaluate(IdentificationForm::from(args))?;
    print!("{}", render_identification(&report));
    Ok(())
}

fn evaluate<F: CalculatorForm>(form: F) -> Result<F::Output, AppError> {
    form.evaluate_explicit().map_err(|errors| {
        eprint!("{}", render_field_errors(&errors));
        AppError::from(errors)
    })
}

pub(crate) fn render_field_errors(errors: &FieldErrors) -> String {
    let mut out = String::from("Please correct the following fields:\n");
    for error in errors.iter() {
        out.push_str(&format!("- {}: {}\n", error.field, error.message));
    }
    out
}

pub(crate) fn render_boot(result: &BootCalculationResult) -> String {
    let display = result.display();
    let mut out = String::from("Boot calculation\n");
    out.push_str(&format!("- Cash boot: {}\n", display.cash_boot));
    out.push_str(&format!("- Mortgage boot: {}\n", display.mortgage_boot));
    out.push_str(&format!("- Total boot: {}\n", display.total_boot));
    out.push_str(&format!(
        "- Estimated tax (illustrative 20% rate): {}\n",
        display.estimated_tax
    ));
    out
}

pub(crate) fn render_costs(result: &CostEstimateResult) -> String {
    let display = result.display();
    let mut out = String::from("Exchange cost estimate\n");
    out.push_str(&format!("- QI fee: {}\n", display.qi_fee));
    out.push_str(&format!("- Escrow fee: {}\n", display.escrow_fee));
    out.push_str(&format!("- Title insurance: {}\n", display.title_insurance));
    out.push_str(&format!("- Recording fees: {}\n", display.recording_fees));
    out.push_str(&format!("- Total: {}\n", display.total_costs));
    out
}

pub(crate) fn render_identification(report: &IdentificationReport) -> String {
    let mut out = format!("Identification check: {}\n", report.banner);
    for rule in &report.rules {
        let mark = if rule.satisfied { "pass" } else { "fail" };
        out.push_str(&format!(
            "- {} [{}]: {}\n",
            rule.name.label(),
            mark,
            rule.description
        ));
        if let Some(warning) = &rule.warning {
            out.push_str(&format!("  warning: {warning}\n"));
        }
    }
    out
}
