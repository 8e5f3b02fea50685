//! `trellolo list ...` subcommands.

use anyhow::Result;
use clap::Subcommand;
use trellolo_core::ShowTarget;

use super::{Globals, ShowArgs};
use crate::subcommand_help;

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    /// Show one list with its cards, or every list on every board
    Show(ShowArgs),
}

pub async fn run(command: ListCommand, globals: &Globals) -> Result<String> {
    let ListCommand::Show(args) = command;
    if args.id.is_none() && !args.all {
        return Ok(subcommand_help(&["list", "show"]));
    }

    let service = globals.connect().await?;
    let view = match &args.id {
        Some(id) => service.show_by_id(id, ShowTarget::List).await?,
        None => service.show_all_by_type(true, false).await?,
    };
    globals.emit(&view.boards, || view.to_string())
}
