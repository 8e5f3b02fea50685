//! Error type shared by every layer of the client.

use std::fmt;

use crate::config::ConfigError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = TrelloError> = std::result::Result<T, E>;

/// Kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Board,
    List,
    Card,
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Board => "board",
            EntityKind::List => "list",
            EntityKind::Card => "card",
            EntityKind::Comment => "comment",
        })
    }
}

/// Errors produced while talking to Trello or assembling its resources.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TrelloError {
    /// The API answered with a non-200 status.
    #[error("{status}: {body}")]
    Remote { status: u16, body: String },

    /// An existence pre-check resolved the entity to an empty id.
    #[error("Unable to find {kind} with ID: {id}")]
    NotFoundLocally { kind: EntityKind, id: String },

    /// None of the requested label colours exist on the board.
    #[error("Unable to find label: {colours:?}")]
    AmbiguousLabelSelection { colours: Vec<String> },

    /// A business call was attempted before credentials were validated.
    #[error("client is not initialized: validate the API key and token first")]
    NotInitialized,

    /// The API accepted a mutation but returned nothing to confirm it.
    #[error("{0}")]
    Rejected(String),

    /// A payload could not be mapped onto the domain model.
    #[error("unexpected response from Trello: {0}")]
    InvalidResponse(String),

    /// A domain constructor rejected its input.
    #[error("invalid entity: {0}")]
    InvalidEntity(String),

    /// Credential store failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl TrelloError {
    /// HTTP status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrelloError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
