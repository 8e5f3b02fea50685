//! Command-line client for Trello.
//!
//! Usage:
//! ```bash
//! trellolo config                          # Save API key and token
//! trellolo board show -a                   # List all boards
//! trellolo board add -n "Roadmap"          # Create a board
//! trellolo list show -i <list-id>          # Show one list and its cards
//! trellolo card add -l <list-id> -t Title -c blue -c green
//! trellolo card add_comment -i <card-id> -c "Looks good"
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trellolo_core::TRELLO_API_BASE;

mod commands;

use commands::Globals;

#[derive(Debug, Parser)]
#[command(name = "trellolo", author, version)]
#[command(about = "CLI for interacting with the Trello API")]
struct Cli {
    /// Your Trello API key
    #[arg(short = 'k', long, env = "TRELLO_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Your Trello token
    #[arg(short = 't', long, env = "TRELLO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print results as JSON instead of a text tree
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Trello API base URL
    #[arg(long, env = "TRELLOLO_BASE_URL", default_value = TRELLO_API_BASE, hide = true)]
    base_url: String,

    /// Credentials file to use instead of the default location
    #[arg(long, env = "TRELLOLO_CREDENTIALS_PATH", hide = true)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save the Trello API key and token to the trellolo config file
    ///
    /// Prompts for any value not given as an option. Credentials can also be
    /// read from the `TRELLO_KEY` and `TRELLO_TOKEN` environment variables.
    Config(commands::config::ConfigArgs),

    /// Interact with boards
    #[command(subcommand)]
    Board(commands::board::BoardCommand),

    /// Interact with lists
    #[command(subcommand)]
    List(commands::list::ListCommand),

    /// Interact with cards
    #[command(subcommand)]
    Card(commands::card::CardCommand),
}

impl Cli {
    fn globals(&self) -> Globals {
        Globals {
            api_key: self.api_key.clone(),
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            credentials_path: self.credentials.clone(),
            json: self.json,
        }
    }
}

/// Help text of a nested subcommand, e.g. `["board", "show"]`.
pub(crate) fn subcommand_help(path: &[&str]) -> String {
    let mut cmd = Cli::command();
    cmd.build();
    let mut current = &cmd;
    for name in path {
        match current.find_subcommand(name) {
            Some(sub) => current = sub,
            None => break,
        }
    }
    current.clone().render_help().to_string()
}

async fn dispatch(command: Command, globals: &Globals) -> Result<String> {
    match command {
        Command::Config(args) => commands::config::run(&args, globals),
        Command::Board(cmd) => commands::board::run(cmd, globals).await,
        Command::List(cmd) => commands::list::run(cmd, globals).await,
        Command::Card(cmd) => commands::card::run(cmd, globals).await,
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(level.parse().context("failed to parse log directive")?),
        )
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    let globals = cli.globals();
    match dispatch(cli.command, &globals).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
