//! Domain records for boards, lists, cards, labels and comments.
//!
//! Every record is a plain value built fresh from an API response. Parent
//! links are id strings looked up on demand. An entity whose `id` is empty
//! stands for "not found" and is produced by `Default`.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{
    error::{Result, TrelloError},
    types::{ActionResponse, BoardResponse, CardResponse, LabelResponse, ListResponse},
};

/// Length of a Trello object id.
pub const ID_LEN: usize = 24;

/// Returns `true` for a 24 character hexadecimal Trello id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn check_id(kind: &str, id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(TrelloError::InvalidEntity(format!(
            "{kind} id {id:?} is not a {ID_LEN} character hex id"
        )))
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(TrelloError::InvalidEntity(format!(
            "{kind} name must not be empty"
        )))
    } else {
        Ok(())
    }
}

/// A Trello board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    /// Empty unless explicitly fetched.
    pub lists: Vec<List>,
}

impl Board {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let (id, name) = (id.into(), name.into());
        check_id("board", &id)?;
        check_name("board", &name)?;
        Ok(Self {
            id,
            name,
            lists: Vec::new(),
        })
    }

    /// `false` for the empty "not found" board.
    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}

impl TryFrom<BoardResponse> for Board {
    type Error = TrelloError;

    fn try_from(resp: BoardResponse) -> Result<Self> {
        let mut board = Board::new(resp.id, resp.name)?;
        board.lists = resp
            .lists
            .into_iter()
            .map(List::try_from)
            .collect::<Result<_>>()?;
        Ok(board)
    }
}

/// A list on a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub board_id: String,
    /// Empty unless explicitly fetched.
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Result<Self> {
        let (id, name, board_id) = (id.into(), name.into(), board_id.into());
        check_id("list", &id)?;
        check_name("list", &name)?;
        Ok(Self {
            id,
            name,
            board_id,
            cards: Vec::new(),
        })
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}

impl TryFrom<ListResponse> for List {
    type Error = TrelloError;

    fn try_from(resp: ListResponse) -> Result<Self> {
        let mut list = List::new(resp.id, resp.name, resp.id_board)?;
        list.cards = resp
            .cards
            .into_iter()
            .map(Card::try_from)
            .collect::<Result<_>>()?;
        Ok(list)
    }
}

/// A card inside a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub board_id: String,
    pub list_id: String,
    pub labels: Vec<Label>,
    /// Populated only when `has_comments` is set and details were requested.
    pub comments: Vec<Comment>,
    /// Server hint: the card carries at least one comment.
    pub has_comments: bool,
}

impl Card {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        board_id: impl Into<String>,
        list_id: impl Into<String>,
    ) -> Result<Self> {
        let (id, name) = (id.into(), name.into());
        check_id("card", &id)?;
        check_name("card", &name)?;
        Ok(Self {
            id,
            name,
            board_id: board_id.into(),
            list_id: list_id.into(),
            ..Self::default()
        })
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    /// Label colours in the order the labels are stored.
    pub fn label_colours(&self) -> Vec<LabelColour> {
        self.labels.iter().map(|l| l.colour.clone()).collect()
    }
}

impl TryFrom<CardResponse> for Card {
    type Error = TrelloError;

    fn try_from(resp: CardResponse) -> Result<Self> {
        let mut card = Card::new(resp.id, resp.name, resp.id_board, resp.id_list)?;
        card.labels = resp
            .labels
            .into_iter()
            .map(Label::try_from)
            .collect::<Result<_>>()?;
        card.has_comments = resp.badges.is_some_and(|b| b.comments > 0);
        Ok(card)
    }
}

/// Colour of a label. `Null` is a label without colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum LabelColour {
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
    #[default]
    Null,
    /// A colour Trello knows about but this client does not enumerate.
    Other(String),
}

impl LabelColour {
    /// Colours that can be requested when adding a card.
    pub const SELECTABLE: [LabelColour; 11] = [
        LabelColour::Yellow,
        LabelColour::Purple,
        LabelColour::Blue,
        LabelColour::Red,
        LabelColour::Green,
        LabelColour::Orange,
        LabelColour::Black,
        LabelColour::Sky,
        LabelColour::Pink,
        LabelColour::Lime,
        LabelColour::Null,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LabelColour::Yellow => "yellow",
            LabelColour::Purple => "purple",
            LabelColour::Blue => "blue",
            LabelColour::Red => "red",
            LabelColour::Green => "green",
            LabelColour::Orange => "orange",
            LabelColour::Black => "black",
            LabelColour::Sky => "sky",
            LabelColour::Pink => "pink",
            LabelColour::Lime => "lime",
            LabelColour::Null => "null",
            LabelColour::Other(name) => name,
        }
    }

    fn from_api(color: Option<String>) -> Self {
        match color {
            None => LabelColour::Null,
            Some(name) => name.parse().unwrap_or(LabelColour::Other(name)),
        }
    }
}

impl FromStr for LabelColour {
    type Err = TrelloError;

    fn from_str(s: &str) -> Result<Self> {
        LabelColour::SELECTABLE
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrelloError::InvalidEntity(format!("unknown label colour {s:?}")))
    }
}

impl fmt::Display for LabelColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LabelColour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LabelColour::Null => serializer.serialize_none(),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

/// A coloured tag defined on a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub colour: LabelColour,
    pub board_id: String,
}

impl Label {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        colour: LabelColour,
        board_id: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        check_id("label", &id)?;
        Ok(Self {
            id,
            name: name.into(),
            colour,
            board_id: board_id.into(),
        })
    }
}

impl TryFrom<LabelResponse> for Label {
    type Error = TrelloError;

    fn try_from(resp: LabelResponse) -> Result<Self> {
        Label::new(
            resp.id,
            resp.name.unwrap_or_default(),
            LabelColour::from_api(resp.color),
            resp.id_board.unwrap_or_default(),
        )
    }
}

/// A comment left on a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    /// Timestamp exactly as Trello sent it.
    pub date: String,
    pub text: String,
}

impl Comment {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        check_id("comment", &id)?;
        Ok(Self {
            id,
            author: author.into(),
            date: date.into(),
            text: text.into(),
        })
    }
}

impl TryFrom<ActionResponse> for Comment {
    type Error = TrelloError;

    fn try_from(resp: ActionResponse) -> Result<Self> {
        Comment::new(
            resp.id,
            resp.member_creator.map(|m| m.full_name).unwrap_or_default(),
            resp.date,
            resp.data.text,
        )
    }
}
