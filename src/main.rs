mod application;
mod domain;
mod infrastructure;
mod presentation;

use crate::infrastructure::http_client::HyperHttpClient;
use crate::presentation::cli::Cli;
use clap::Parser;
use colored::Colorize;

/// Requester: replay a saved curl command
///
/// Reads one curl command from a file (`req.curl` by default), sends the
/// request it describes and prints a summary of the response.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = cli.config();

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    let replay_service = HyperHttpClient::new().create_replay_service();

    if let Err(err) = cli.run(&config, &replay_service).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
