//! `trellolo config`: store the API key and token.

use anyhow::{Context, Result, bail};
use clap::Args;
use console::Term;
use tracing::debug;

use super::Globals;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Your Trello API key
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Your Trello token
    #[arg(short = 't', long)]
    pub token: Option<String>,
}

/// Saves the credentials, prompting for whichever value was not supplied.
pub fn run(args: &ConfigArgs, globals: &Globals) -> Result<String> {
    let store = globals.credential_store()?;

    let key = value_or_prompt(
        args.api_key.as_deref().or(globals.api_key.as_deref()),
        "API key",
    )?;
    let token = value_or_prompt(
        args.token.as_deref().or(globals.token.as_deref()),
        "Token",
    )?;

    store.save(&key, &token)?;
    debug!(path = %store.path().display(), "credentials saved");
    Ok(format!("Saved API key to {}", store.path().display()))
}

fn value_or_prompt(given: Option<&str>, label: &str) -> Result<String> {
    let value = match given {
        Some(value) => value.to_string(),
        None => prompt_hidden(label)?,
    };
    let value = value.trim();
    if value.is_empty() {
        bail!("{label} must not be empty");
    }
    Ok(value.to_string())
}

fn prompt_hidden(label: &str) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{label}: "))
        .context("failed to write prompt")?;
    term.read_secure_line()
        .with_context(|| format!("failed to read {label}"))
}
