//! `trellolo card ...` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;
use trellolo_core::{LabelColour, ShowTarget, render::render_card};

use super::{Globals, IdArgs, ShowArgs};
use crate::subcommand_help;

#[derive(Debug, Subcommand)]
pub enum CardCommand {
    /// Show one card with its comments, or every card on every board
    Show(ShowArgs),

    /// Add a card at the bottom of a list
    Add(AddArgs),

    /// Comment on a card
    #[command(name = "add_comment", alias = "add-comment")]
    AddComment(AddCommentArgs),

    /// Delete a comment from a card
    #[command(name = "delete_comment", alias = "delete-comment")]
    DeleteComment(DeleteCommentArgs),

    /// Delete a card
    Delete(IdArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Card title
    #[arg(short, long)]
    pub title: String,

    /// Card description
    #[arg(short, long, alias = "desc")]
    pub description: Option<String>,

    /// Id of the list to add the card to
    #[arg(short = 'l', long = "list_id", alias = "list-id")]
    pub list_id: String,

    /// Label colour to attach; repeat for several labels
    #[arg(short = 'c', long = "labels", value_enum, default_value = "null")]
    pub labels: Vec<ColourArg>,
}

#[derive(Debug, Args)]
pub struct AddCommentArgs {
    /// Card id
    #[arg(short, long)]
    pub id: String,

    /// Comment text
    #[arg(short, long)]
    pub comment: String,
}

#[derive(Debug, Args)]
pub struct DeleteCommentArgs {
    /// Card id
    #[arg(short, long)]
    pub id: String,

    /// Id of the comment to delete
    #[arg(short = 'c', long = "comment_id", alias = "comment-id")]
    pub comment_id: String,
}

/// Label colours accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColourArg {
    Yellow,
    Purple,
    Blue,
    Red,
    Green,
    Orange,
    Black,
    Sky,
    Pink,
    Lime,
    Null,
}

impl From<ColourArg> for LabelColour {
    fn from(arg: ColourArg) -> Self {
        match arg {
            ColourArg::Yellow => LabelColour::Yellow,
            ColourArg::Purple => LabelColour::Purple,
            ColourArg::Blue => LabelColour::Blue,
            ColourArg::Red => LabelColour::Red,
            ColourArg::Green => LabelColour::Green,
            ColourArg::Orange => LabelColour::Orange,
            ColourArg::Black => LabelColour::Black,
            ColourArg::Sky => LabelColour::Sky,
            ColourArg::Pink => LabelColour::Pink,
            ColourArg::Lime => LabelColour::Lime,
            ColourArg::Null => LabelColour::Null,
        }
    }
}

pub async fn run(command: CardCommand, globals: &Globals) -> Result<String> {
    match command {
        CardCommand::Show(args) => show(&args, globals).await,
        CardCommand::Add(args) => {
            let colours: Vec<LabelColour> = args.labels.iter().copied().map(Into::into).collect();
            let service = globals.connect().await?;
            let card = service
                .add_card(
                    &args.list_id,
                    &args.title,
                    args.description.as_deref(),
                    &colours,
                )
                .await?;
            globals.emit(&card, || format!("Card Added: {}", render_card(&card)))
        }
        CardCommand::AddComment(args) => {
            let service = globals.connect().await?;
            let card = service.add_card_comment(&args.id, &args.comment).await?;
            globals.emit(&card, || format!("Comment Added: {}", render_card(&card)))
        }
        CardCommand::DeleteComment(args) => {
            let service = globals.connect().await?;
            service
                .delete_card_comment(&args.id, &args.comment_id)
                .await?;
            globals.emit(
                &json!({ "card": args.id, "comment": args.comment_id, "deleted": true }),
                || "Comment Deleted".to_string(),
            )
        }
        CardCommand::Delete(IdArgs { id }) => {
            let service = globals.connect().await?;
            service.delete_card_by_id(&id).await?;
            globals.emit(&json!({ "card": id, "deleted": true }), || {
                format!("Card {id} deleted")
            })
        }
    }
}

async fn show(args: &ShowArgs, globals: &Globals) -> Result<String> {
    if args.id.is_none() && !args.all {
        return Ok(subcommand_help(&["card", "show"]));
    }

    let service = globals.connect().await?;
    let view = match &args.id {
        Some(id) => service.show_by_id(id, ShowTarget::Card).await?,
        None => service.show_all_by_type(false, true).await?,
    };
    globals.emit(&view.boards, || view.to_string())
}
