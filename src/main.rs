use clap::Parser;
use std::process::ExitCode;

use steward::cli::Cli;
use steward::config::Config;
use steward::logging::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // An unreadable config still gets reported by the command itself.
    let logging = Config::load().map(|c| c.logging).unwrap_or_default();
    init_tracing(&logging);

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
