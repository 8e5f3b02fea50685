//! `trellolo board ...` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use trellolo_core::{BoardView, ShowTarget};

use super::{Globals, IdArgs, ShowArgs};
use crate::subcommand_help;

#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    /// Show one board in full, or every board by name
    Show(ShowArgs),

    /// Create a new board
    Add(AddArgs),

    /// Delete a board
    Delete(IdArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name of the new board
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn run(command: BoardCommand, globals: &Globals) -> Result<String> {
    match command {
        BoardCommand::Show(args) => show(&args, globals).await,
        BoardCommand::Add(AddArgs { name: Some(name) }) => {
            let service = globals.connect().await?;
            let board = service.add_board(&name).await?;
            let view = BoardView::single(board);
            globals.emit(&view.boards[0], || format!("Board Added:\n{view}"))
        }
        BoardCommand::Add(AddArgs { name: None }) => Ok(subcommand_help(&["board", "add"])),
        BoardCommand::Delete(IdArgs { id }) => {
            let service = globals.connect().await?;
            service.delete_board(&id).await?;
            globals.emit(&json!({ "board": id, "deleted": true }), || {
                format!("Board {id} deleted")
            })
        }
    }
}

async fn show(args: &ShowArgs, globals: &Globals) -> Result<String> {
    if args.id.is_none() && !args.all {
        return Ok(subcommand_help(&["board", "show"]));
    }

    let service = globals.connect().await?;
    let view = match &args.id {
        Some(id) => service.show_by_id(id, ShowTarget::Board).await?,
        None => service.show_all_by_type(false, false).await?,
    };
    globals.emit(&view.boards, || view.to_string())
}
