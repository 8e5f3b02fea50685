//! Core of the `trellolo` Trello client.
//!
//! Shallow API resources (boards, lists, cards, labels, comments) are fetched
//! independently and assembled into board trees that can be filtered and
//! rendered as text.
//!
//! # Key Components
//!
//! - **Transport**: [`TrelloClient`] signs every request with the key and
//!   token and maps non-200 responses to [`TrelloError::Remote`]
//! - **Model**: plain [`Board`], [`List`], [`Card`], [`Label`] and
//!   [`Comment`] values
//! - **Aggregation**: [`BoardService`] runs the multi-call sequences behind
//!   each command
//! - **Presentation**: [`BoardView`] and the `render_*` functions
//! - **Credentials**: [`CredentialStore`] keeps the key and token on disk
//!
//! # Example
//!
//! ```no_run
//! use trellolo_core::{BoardService, CredentialStore, TRELLO_API_BASE, TrelloClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = CredentialStore::resolve()?.try_load()?;
//! let mut service = BoardService::new(TrelloClient::new(TRELLO_API_BASE)?);
//! service.auth(credentials).await?;
//!
//! println!("{}", service.show_all_by_type(true, false).await?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod service;
mod types;

pub use client::{QueryValue, TRELLO_API_BASE, TrelloClient};
pub use config::{ConfigError, CredentialStore, Credentials};
pub use error::{EntityKind, Result, TrelloError};
pub use model::{Board, Card, Comment, Label, LabelColour, List};
pub use render::{BoardView, Depth, RenderOptions};
pub use service::{BoardService, Narrow, ShowTarget, TreeFilter};
