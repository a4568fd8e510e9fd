use crate::demo::{run_agreements, run_demo, run_evaluate, AgreementsArgs, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use origin_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Origin Engine",
    about = "Determine preferential origin of products from the command line or over HTTP",
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
    /// Evaluate origin requests and inspect the rule catalog
    Origin {
        #[command(subcommand)]
        command: OriginCommand,
    },
    /// Walk through sample qualifying, failing and unmatched products
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OriginCommand {
    /// Evaluate a single origin request read from a JSON file
    Evaluate(EvaluateArgs),
    /// List the agreements and territory sets in the loaded catalog
    Agreements(AgreementsArgs),
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
        Command::Origin {
            command: OriginCommand::Evaluate(args),
        } => run_evaluate(args),
        Command::Origin {
            command: OriginCommand::Agreements(args),
        } => run_agreements(args),
        Command::Demo(args) => run_demo(args),
    }
}
