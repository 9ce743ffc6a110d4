use clap::Parser;

use fillwatch::adapter::inbound::cli::command::{CheckCommand, Cli, Commands};
use fillwatch::adapter::inbound::cli::output::{self, OutputConfig};
use fillwatch::adapter::inbound::cli::{check, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    output::configure(OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
    });

    let result = match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::config::execute(&arg.config),
        Commands::Check(CheckCommand::Notify(arg)) => check::notify::execute(&arg.config).await,
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
