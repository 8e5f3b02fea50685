//! Text rendering of board trees.
//!
//! Rendering is stateless: how deep a tree expands is decided by the
//! [`RenderOptions`] passed in, not by flags stored on the entities.

use std::fmt;

use serde::Serialize;

use crate::model::{Board, Card, Comment, LabelColour, List};

/// How far down a tree children are expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Depth {
    /// Board headers only.
    #[default]
    Boards,
    /// Boards with their list headers.
    Lists,
    /// Boards, lists and the cards in each list.
    Cards,
}

/// Rendering context for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub depth: Depth,
}

impl RenderOptions {
    pub fn new(depth: Depth) -> Self {
        Self { depth }
    }

    fn expands_board(self) -> bool {
        self.depth >= Depth::Lists
    }

    fn expands_list(self) -> bool {
        self.depth >= Depth::Cards
    }
}

/// A set of board trees ready to print.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub boards: Vec<Board>,
    #[serde(skip)]
    pub options: RenderOptions,
    #[serde(skip)]
    listing: bool,
}

impl BoardView {
    /// Result of an "all boards" query; renders a notice when empty.
    pub fn all(boards: Vec<Board>, depth: Depth) -> Self {
        Self {
            boards,
            options: RenderOptions::new(depth),
            listing: true,
        }
    }

    /// One fully expanded board.
    pub fn single(board: Board) -> Self {
        Self {
            boards: vec![board],
            options: RenderOptions::new(Depth::Cards),
            listing: false,
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.listing && self.boards.is_empty() {
            return f.write_str("No boards available!");
        }
        let rendered: Vec<String> = self
            .boards
            .iter()
            .map(|b| render_board(b, self.options))
            .collect();
        f.write_str(&rendered.join("\n"))
    }
}

fn header(kind: &str, id: &str, name: &str) -> String {
    format!("{kind} ID: {id} | Name: {name}")
}

pub fn render_board(board: &Board, options: RenderOptions) -> String {
    let mut lines = vec![header("Board", &board.id, &board.name)];
    if options.expands_board() {
        if board.lists.is_empty() {
            lines.push("  🗋 No lists are on this board.\n".to_string());
        } else {
            lines.extend(board.lists.iter().map(|l| render_list(l, options)));
        }
    }
    lines.join("\n")
}

pub fn render_list(list: &List, options: RenderOptions) -> String {
    let mut lines = vec![format!("  📄 {}", header("List", &list.id, &list.name))];
    if options.expands_list() {
        if list.cards.is_empty() {
            lines.push("    🃠 No cards are on this list.".to_string());
        } else {
            lines.extend(list.cards.iter().map(render_card));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// A card with its label summary and any loaded comments.
pub fn render_card(card: &Card) -> String {
    let mut lines = vec![format!("    🃪 {}", header("Card", &card.id, &card.name))];
    if !card.labels.is_empty() {
        let colours: Vec<String> = card
            .labels
            .iter()
            .map(|l| match l.colour {
                LabelColour::Null => "None".to_string(),
                ref colour => format!("'{colour}'"),
            })
            .collect();
        lines.push(format!("      🏷  Label(s): [{}]", colours.join(", ")));
    }
    lines.extend(card.comments.iter().map(render_comment));
    lines.join("\n")
}

pub fn render_comment(comment: &Comment) -> String {
    format!(
        "        💭  {} | Date: {} | Text: {}",
        header("Comment", &comment.id, &comment.author),
        comment.date,
        comment.text.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    const BOARD_ID: &str = "5f00000000000000000000b1";
    const LIST_ID: &str = "5f00000000000000000000a1";
    const CARD_ID: &str = "5f00000000000000000000c1";

    fn label(colour: LabelColour) -> Label {
        Label::new("5f00000000000000000000e1", "", colour, BOARD_ID).unwrap()
    }

    fn card() -> Card {
        let mut card = Card::new(CARD_ID, "X", BOARD_ID, LIST_ID).unwrap();
        card.labels = vec![label(LabelColour::Blue), label(LabelColour::Green)];
        card
    }

    fn board_with_list(cards: Vec<Card>) -> Board {
        let mut list = List::new(LIST_ID, "Todo", BOARD_ID).unwrap();
        list.cards = cards;
        let mut board = Board::new(BOARD_ID, "zTest Board").unwrap();
        board.lists = vec![list];
        board
    }

    #[test]
    fn test_card_renders_label_colours_inline() {
        let rendered = render_card(&card());

        assert!(rendered.contains(&format!("Card ID: {CARD_ID} | Name: X")));
        assert!(rendered.contains("Label(s): ['blue', 'green']"));
    }

    #[test]
    fn test_colourless_label_renders_as_none() {
        let mut card = card();
        card.labels.insert(0, label(LabelColour::Null));

        let rendered = render_card(&card);

        assert!(rendered.contains("Label(s): [None, 'blue', 'green']"));
    }

    #[test]
    fn test_card_renders_comments_on_their_own_lines() {
        let mut card = card();
        card.comments = vec![
            Comment::new(
                "5f00000000000000000000d1",
                "Ada",
                "2024-01-15T10:30:00.000Z",
                "Hello\n",
            )
            .unwrap(),
        ];

        let rendered = render_card(&card);

        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.ends_with("| Name: Ada | Date: 2024-01-15T10:30:00.000Z | Text: Hello"));
    }

    #[test]
    fn test_board_headers_only_hide_lists() {
        let board = board_with_list(vec![card()]);

        let rendered = render_board(&board, RenderOptions::new(Depth::Boards));

        assert_eq!(rendered, format!("Board ID: {BOARD_ID} | Name: zTest Board"));
    }

    #[test]
    fn test_list_depth_shows_list_headers_without_cards() {
        let board = board_with_list(vec![card()]);

        let rendered = render_board(&board, RenderOptions::new(Depth::Lists));

        assert!(rendered.contains("📄 List ID:"));
        assert!(!rendered.contains("Card ID:"));
    }

    #[test]
    fn test_expanded_empty_containers_render_placeholders() {
        let empty_list = board_with_list(Vec::new());
        let rendered = render_board(&empty_list, RenderOptions::new(Depth::Cards));
        assert!(rendered.contains("No cards are on this list."));

        let empty_board = Board::new(BOARD_ID, "Empty").unwrap();
        let rendered = render_board(&empty_board, RenderOptions::new(Depth::Cards));
        assert!(rendered.contains("No lists are on this board."));
    }

    #[test]
    fn test_empty_listing_view_renders_notice() {
        let view = BoardView::all(Vec::new(), Depth::Boards);
        assert_eq!(view.to_string(), "No boards available!");
    }

    #[test]
    fn test_single_view_expands_to_cards() {
        let view = BoardView::single(board_with_list(vec![card()]));

        let rendered = view.to_string();

        assert!(rendered.starts_with(&format!("Board ID: {BOARD_ID}")));
        assert!(rendered.contains("Label(s): ['blue', 'green']"));
    }

    #[test]
    fn test_view_serializes_boards_only() {
        let view = BoardView::single(board_with_list(Vec::new()));

        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["boards"][0]["name"], "zTest Board");
        assert!(json.get("options").is_none());
    }
}
