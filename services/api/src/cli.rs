use crate::calc::{run_boot, run_costs, run_identification, BootArgs, CostsArgs, IdentifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exchange_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Exchange Desk",
    about = "Serve the 1031 exchange calculators and lead relay, or run a calculator locally",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one of the exchange calculators and print the result
    Calc {
        #[command(subcommand)]
        command: CalcCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CalcCommand {
    /// Taxable boot from cash received and mortgage relief
    Boot(BootArgs),
    /// Closing-cost estimate for a replacement property
    Costs(CostsArgs),
    /// Check an identification list against the 3-property, 200% and 95% rules
    Identify(IdentifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Calc { command } => match command {
            CalcCommand::Boot(args) => run_boot(args),
            CalcCommand::Costs(args) => run_costs(args),
            CalcCommand::Identify(args) => run_identification(args),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["exchange-desk"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn calc_identify_accepts_raw_amounts() {
        let cli = Cli::try_parse_from([
            "exchange-desk",
            "calc",
            "identify",
            "--num-properties",
            "2",
            "--total-identified-value",
            "900,000",
            "--relinquished-value",
            "$1,000,000",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Calc {
                command: CalcCommand::Identify(args),
            }) => {
                assert_eq!(args.total_identified_value.as_deref(), Some("900,000"));
                assert_eq!(args.relinquished_value.as_deref(), Some("$1,000,000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
