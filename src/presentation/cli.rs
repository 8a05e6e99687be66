use crate::application::services::ReplayService;
use crate::infrastructure::config::{Config, DEFAULT_COMMAND_FILE};
use crate::infrastructure::output::{Theme, print_summary};
use anyhow::{Result, anyhow};
use clap::Parser;
use log::warn;
use std::future::Future;
use std::io;
use std::path::PathBuf;

const NO_SUMMARY: &str = "no response to summarize";

/// CLI configuration for Requester
#[derive(Parser, Debug)]
#[command(name = "requester", version)]
#[command(about = "Replay a saved curl command and summarize the response", long_about = None)]
pub struct Cli {
    /// File holding a single curl command
    #[arg(default_value = DEFAULT_COMMAND_FILE)]
    pub file: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    /// Render the report without colours
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(&self.file, !self.no_color, self.verbose)
    }

    pub async fn run(&self, config: &Config, replay_service: &ReplayService) -> Result<()> {
        let command = config.load_command()?;

        let outcome =
            until_cancelled(replay_service.replay(&command), tokio::signal::ctrl_c()).await?;

        let theme = if config.color { Theme::colored() } else { Theme::plain() };
        match outcome {
            Some(summary) => print_summary(&summary, theme),
            None => warn!("{NO_SUMMARY}"),
        }

        Ok(())
    }
}

/// Runs `work` unless `cancel` fires first.
///
/// A `cancel` that fails (no signal handler) never cancels; `work` runs on.
async fn until_cancelled<T, W, C>(work: W, cancel: C) -> Result<T>
where
    W: Future<Output = Result<T>>,
    C: Future<Output = io::Result<()>>,
{
    let cancel = async {
        let signal = cancel.await;
        if let Err(err) = &signal {
            warn!("cannot listen for Ctrl-C: {err}");
        }
        signal
    };

    tokio::select! {
        outcome = work => outcome,
        Ok(()) = cancel => Err(anyhow!("request cancelled")),
    }
}
