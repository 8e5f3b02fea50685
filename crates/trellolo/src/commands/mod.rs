pub mod board;
pub mod card;
pub mod config;
pub mod list;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;
use trellolo_core::{BoardService, CredentialStore, Credentials, TrelloClient};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Globals {
    pub api_key: Option<String>,
    pub token: Option<String>,
    pub base_url: String,
    pub credentials_path: Option<PathBuf>,
    pub json: bool,
}

impl Globals {
    pub fn credential_store(&self) -> Result<CredentialStore> {
        match &self.credentials_path {
            Some(path) => Ok(CredentialStore::at(path)),
            None => Ok(CredentialStore::resolve()?),
        }
    }

    /// Command-line credentials when both are given, else the stored pair.
    fn credentials(&self) -> Result<Credentials> {
        if let (Some(key), Some(token)) = (&self.api_key, &self.token) {
            debug!("using credentials from the command line");
            return Ok(Credentials::new(key, token));
        }
        Ok(self.credential_store()?.try_load()?)
    }

    /// Builds a service whose credentials have been validated.
    pub async fn connect(&self) -> Result<BoardService> {
        let credentials = self.credentials()?;
        let client = TrelloClient::new(&self.base_url).context("failed to create HTTP client")?;
        let mut service = BoardService::new(client);
        service.auth(credentials).await?;
        Ok(service)
    }

    /// `value` as pretty JSON in `--json` mode, otherwise `text()`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text())
        }
    }
}

/// Arguments of every `show` subcommand.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Show everything of this kind on all boards
    #[arg(short, long)]
    pub all: bool,

    /// Show one entity by id
    #[arg(short, long)]
    pub id: Option<String>,
}

/// Arguments of commands that address one entity by id.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Entity id
    #[arg(short, long)]
    pub id: String,
}
