//! Aggregation of independently fetched Trello resources into board trees.
//!
//! Every operation is a fixed sequence of awaited transport calls issued one
//! after another, so boards, lists and cards keep the order the API returned
//! them in. A sequence aborts at the first failing call.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    client::TrelloClient,
    config::Credentials,
    error::{EntityKind, Result, TrelloError},
    model::{Board, Card, Comment, Label, LabelColour, List},
    query,
    render::{BoardView, Depth},
    types::{ActionResponse, BoardResponse, CardResponse, IdResponse, LabelResponse, ListResponse},
};

/// Entity type addressed by [`BoardService::show_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTarget {
    Board,
    List,
    Card,
}

/// Optional narrowing applied when filling a board tree with cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFilter {
    /// Keep only the list with this id.
    pub list_id: Option<String>,
    /// Keep only the card with this id.
    pub card_id: Option<String>,
}

impl TreeFilter {
    fn keeps_list(&self, list: &List) -> bool {
        self.list_id.as_deref().is_none_or(|id| list.id == id)
    }

    fn keeps_card(&self, card: &Card) -> bool {
        self.card_id.as_deref().is_none_or(|id| card.id == id)
    }
}

/// Which part of a board [`BoardService::get_all_board_details`] expands.
#[derive(Debug, Clone)]
pub enum Narrow {
    /// Every list of the board.
    Whole,
    /// Only this, already resolved, list.
    List(List),
    /// Only the list holding this card, reduced to the card.
    Card(Card),
}

/// Board, list, card and comment operations on top of a [`TrelloClient`].
#[derive(Debug, Clone)]
pub struct BoardService {
    client: TrelloClient,
}

impl BoardService {
    /// Wraps a client. Operations fail with
    /// [`TrelloError::NotInitialized`] until the client is authenticated.
    pub fn new(client: TrelloClient) -> Self {
        Self { client }
    }

    /// Validates `credentials` and keeps them for all later calls.
    pub async fn auth(&mut self, credentials: Credentials) -> Result<()> {
        self.client.authenticate(credentials).await
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_initialized()
    }

    // ------------------------------------------------------------------
    // Boards
    // ------------------------------------------------------------------

    /// Creates a board, then reads it back by id.
    pub async fn add_board(&self, name: &str) -> Result<Board> {
        if name.trim().is_empty() {
            return Err(TrelloError::InvalidEntity(
                "board name must not be empty".to_string(),
            ));
        }

        let created: Value = self
            .client
            .send(Method::POST, "/1/boards/", &query! { "name" => name })
            .await?;
        let id = created_id(created).ok_or_else(|| {
            TrelloError::Rejected("Unable to create board".to_string())
        })?;

        info!(board_id = %id, "board created");
        self.get_board_by_id(&id).await
    }

    /// Deletes a board after checking that it resolves to a real board.
    ///
    /// A 404 on the lookup means the board is gone and is reported as
    /// [`TrelloError::NotFoundLocally`]; a 400 (malformed id) stays remote.
    pub async fn delete_board(&self, id: &str) -> Result<()> {
        let board = match self.get_board_by_id(id).await {
            Ok(board) => board,
            Err(TrelloError::Remote { status: 404, .. }) => {
                debug!(board_id = id, "board lookup returned 404");
                return Err(not_found(EntityKind::Board, id));
            }
            Err(err) => return Err(err),
        };
        if !board.exists() {
            return Err(not_found(EntityKind::Board, id));
        }

        let resp = self
            .client
            .send(Method::DELETE, &format!("/1/boards/{id}"), &[])
            .await?;
        if resp.is_null() {
            return Err(TrelloError::Rejected("Unable to delete board".to_string()));
        }
        info!(board_id = id, "board deleted");
        Ok(())
    }

    /// Ids of every board visible to the authenticated member.
    pub async fn get_board_ids(&self) -> Result<Vec<String>> {
        let value = self
            .client
            .send(
                Method::GET,
                "/1/members/me/boards",
                &query! { "filter" => "all", "fields" => "" },
            )
            .await?;
        if is_empty_payload(&value) {
            return Ok(Vec::new());
        }
        let boards: Vec<IdResponse> = decode(value)?;
        Ok(boards
            .into_iter()
            .filter_map(|b| b.id.filter(|id| !id.is_empty()))
            .collect())
    }

    /// One board with its lists; list cards are not expanded.
    pub async fn get_board_by_id(&self, id: &str) -> Result<Board> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/boards/{id}"),
                &query! { "actions" => "all", "cards" => "all", "lists" => "all" },
            )
            .await?;
        decode_one::<BoardResponse, Board>(value)
    }

    pub async fn get_board_labels(&self, board_id: &str) -> Result<Vec<Label>> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/boards/{board_id}/labels"),
                &query! { "fields" => "all" },
            )
            .await?;
        decode_many::<LabelResponse, Label>(value)
    }

    /// Every list of a board, each with its cards.
    pub async fn get_lists_by_board_id(&self, board_id: &str) -> Result<Vec<List>> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/boards/{board_id}/lists"),
                &query! { "cards" => "all", "card_fields" => "all" },
            )
            .await?;
        decode_many::<ListResponse, List>(value)
    }

    /// All boards, each fetched individually.
    pub async fn get_all_boards(&self) -> Result<Vec<Board>> {
        let ids = self.get_board_ids().await?;
        debug!(count = ids.len(), "fetching boards");
        let mut boards = Vec::with_capacity(ids.len());
        for id in ids {
            boards.push(self.get_board_by_id(&id).await?);
        }
        Ok(boards)
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    /// One list with its cards.
    pub async fn get_list_by_id(&self, id: &str) -> Result<List> {
        let mut list = self.fetch_list(id).await?;
        if list.exists() {
            list.cards = self.get_cards_by_list_id(id).await?;
        }
        Ok(list)
    }

    pub async fn get_cards_by_list_id(&self, list_id: &str) -> Result<Vec<Card>> {
        let value = self
            .client
            .send(Method::GET, &format!("/1/lists/{list_id}/cards"), &[])
            .await?;
        decode_many::<CardResponse, Card>(value)
    }

    async fn fetch_list(&self, id: &str) -> Result<List> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/lists/{id}"),
                &query! { "fields" => "all" },
            )
            .await?;
        decode_one::<ListResponse, List>(value)
    }

    // ------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------

    /// One card; its comments are fetched only when the card has any.
    pub async fn get_card_by_id(&self, id: &str) -> Result<Card> {
        let mut card = self.fetch_card(id).await?;
        if card.has_comments {
            card.comments = self.get_card_comments_by_id(id).await?;
        }
        Ok(card)
    }

    pub async fn get_card_comments_by_id(&self, card_id: &str) -> Result<Vec<Comment>> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/cards/{card_id}/actions"),
                &query! { "filter" => "commentCard" },
            )
            .await?;
        decode_many::<ActionResponse, Comment>(value)
    }

    /// Adds a card at the bottom of a list, tagged with the board labels whose
    /// colour is in `colours`.
    ///
    /// Fails with [`TrelloError::AmbiguousLabelSelection`] when no board label
    /// matches, including when the list cannot be resolved to a board.
    pub async fn add_card(
        &self,
        list_id: &str,
        name: &str,
        description: Option<&str>,
        colours: &[LabelColour],
    ) -> Result<Card> {
        if name.trim().is_empty() {
            return Err(TrelloError::InvalidEntity(
                "card name must not be empty".to_string(),
            ));
        }

        let label_ids = self.matching_label_ids(list_id, colours).await?;
        if label_ids.is_empty() {
            return Err(TrelloError::AmbiguousLabelSelection {
                colours: colours.iter().map(ToString::to_string).collect(),
            });
        }

        let mut params = query! {
            "idList" => list_id,
            "name" => name,
            "pos" => "bottom",
            "idLabels" => label_ids.join(","),
        };
        if let Some(desc) = description {
            params.push(("desc", desc.into()));
        }

        let created = self.client.send(Method::POST, "/1/cards", &params).await?;
        let id = created_id(created)
            .ok_or_else(|| TrelloError::Rejected("Unable to add card".to_string()))?;

        info!(card_id = %id, list_id, "card created");
        self.get_card_by_id(&id).await
    }

    /// Ids of the list's board labels whose colour was requested, in board
    /// order.
    async fn matching_label_ids(&self, list_id: &str, colours: &[LabelColour]) -> Result<Vec<String>> {
        if colours.is_empty() {
            return Ok(Vec::new());
        }

        let list = match self.fetch_list(list_id).await {
            Ok(list) => list,
            Err(TrelloError::Remote { status, .. }) if matches!(status, 400 | 404) => {
                debug!(list_id, status, "list not resolvable, no labels to match");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        if !list.exists() {
            return Ok(Vec::new());
        }

        Ok(self
            .get_board_labels(&list.board_id)
            .await?
            .into_iter()
            .filter(|l| colours.contains(&l.colour))
            .map(|l| l.id)
            .collect())
    }

    /// Comments on a card and returns the card with all of its comments.
    pub async fn add_card_comment(&self, card_id: &str, text: &str) -> Result<Card> {
        self.ensure_card(card_id).await?;

        let resp = self
            .client
            .send(
                Method::POST,
                &format!("/1/cards/{card_id}/actions/comments"),
                &query! { "text" => text },
            )
            .await?;
        if is_empty_payload(&resp) {
            return Err(TrelloError::Rejected("Unable to add comment".to_string()));
        }

        let mut card = self.fetch_card(card_id).await?;
        card.comments = self.get_card_comments_by_id(card_id).await?;
        Ok(card)
    }

    /// Deletes a comment after checking that its card exists.
    pub async fn delete_card_comment(&self, card_id: &str, comment_id: &str) -> Result<()> {
        self.ensure_card(card_id).await?;

        let resp = self
            .client
            .send(
                Method::DELETE,
                &format!("/1/cards/{card_id}/actions/{comment_id}/comments"),
                &[],
            )
            .await?;
        if resp.is_null() {
            return Err(TrelloError::Rejected(
                "Unable to delete comment".to_string(),
            ));
        }
        info!(card_id, comment_id, "comment deleted");
        Ok(())
    }

    /// Deletes a card directly; unlike boards and comments there is no
    /// existence pre-check.
    pub async fn delete_card_by_id(&self, id: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &format!("/1/cards/{id}"), &[])
            .await?;
        info!(card_id = id, "card deleted");
        Ok(())
    }

    async fn fetch_card(&self, id: &str) -> Result<Card> {
        let value = self
            .client
            .send(
                Method::GET,
                &format!("/1/cards/{id}"),
                &query! { "fields" => "all", "card_fields" => "all" },
            )
            .await?;
        decode_one::<CardResponse, Card>(value)
    }

    async fn ensure_card(&self, id: &str) -> Result<Card> {
        let card = self.fetch_card(id).await?;
        if card.exists() {
            Ok(card)
        } else {
            Err(not_found(EntityKind::Card, id))
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Every board, expanded down to lists or cards on request.
    ///
    /// The all-boards listing does not expand lists reliably, so lists (and
    /// card comments) are re-fetched per board when asked for.
    pub async fn show_all_by_type(&self, lists: bool, cards: bool) -> Result<BoardView> {
        let mut boards = self.get_all_boards().await?;

        if lists || cards {
            for board in &mut boards {
                board.lists = self.get_lists_by_board_id(&board.id).await?;
                if cards {
                    self.update_boardlist_with_card_info(board, &TreeFilter::default())
                        .await?;
                }
            }
        }

        let depth = if cards {
            Depth::Cards
        } else if lists {
            Depth::Lists
        } else {
            Depth::Boards
        };
        Ok(BoardView::all(boards, depth))
    }

    /// The board tree around one board, list or card.
    ///
    /// Detail endpoints are keyed by board, so a list or card id is first
    /// resolved to its board, the board is fetched in full and the tree is
    /// then narrowed back down to the requested entity.
    pub async fn show_by_id(&self, id: &str, target: ShowTarget) -> Result<BoardView> {
        let board = match target {
            ShowTarget::Board => self.get_all_board_details(id, Narrow::Whole).await?,
            ShowTarget::List => {
                let list = self.get_list_by_id(id).await?;
                if !list.exists() {
                    return Err(not_found(EntityKind::List, id));
                }
                let board_id = list.board_id.clone();
                self.get_all_board_details(&board_id, Narrow::List(list))
                    .await?
            }
            ShowTarget::Card => {
                let card = self.fetch_card(id).await?;
                if !card.exists() {
                    return Err(not_found(EntityKind::Card, id));
                }
                let board_id = card.board_id.clone();
                self.get_all_board_details(&board_id, Narrow::Card(card))
                    .await?
            }
        };
        Ok(BoardView::single(board))
    }

    /// Fetches a board and fills the requested part of it with cards and
    /// comments.
    pub async fn get_all_board_details(&self, board_id: &str, narrow: Narrow) -> Result<Board> {
        let mut board = self.get_board_by_id(board_id).await?;
        if !board.exists() {
            return Err(not_found(EntityKind::Board, board_id));
        }

        let filter = match &narrow {
            Narrow::Whole => TreeFilter::default(),
            Narrow::List(list) => TreeFilter {
                list_id: Some(list.id.clone()),
                card_id: None,
            },
            Narrow::Card(card) => TreeFilter {
                list_id: Some(card.list_id.clone()),
                card_id: Some(card.id.clone()),
            },
        };

        board.lists = match narrow {
            Narrow::Whole => self.get_lists_by_board_id(&board.id).await?,
            Narrow::List(list) => vec![list],
            Narrow::Card(card) => vec![self.get_list_by_id(&card.list_id).await?],
        };

        self.update_boardlist_with_card_info(&mut board, &filter)
            .await?;
        Ok(board)
    }

    /// Narrows a board's lists and cards to `filter` and loads comments for
    /// the cards that have any.
    pub async fn update_boardlist_with_card_info(
        &self,
        board: &mut Board,
        filter: &TreeFilter,
    ) -> Result<()> {
        board.lists.retain(|l| filter.keeps_list(l));

        for list in &mut board.lists {
            list.cards.retain(|c| filter.keeps_card(c));
            for card in &mut list.cards {
                if card.has_comments {
                    card.comments = self.get_card_comments_by_id(&card.id).await?;
                } else {
                    debug!(card_id = %card.id, "card has no comments, skipping fetch");
                }
            }
        }
        Ok(())
    }
}

fn not_found(kind: EntityKind, id: &str) -> TrelloError {
    TrelloError::NotFoundLocally {
        kind,
        id: id.to_string(),
    }
}

/// `true` for payloads Trello uses to say "nothing here".
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn created_id(value: Value) -> Option<String> {
    if is_empty_payload(&value) {
        return None;
    }
    decode::<IdResponse>(value)
        .ok()
        .and_then(|r| r.id)
        .filter(|id| !id.is_empty())
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| TrelloError::InvalidResponse(e.to_string()))
}

/// Decodes one entity; an empty payload becomes the empty "not found" value.
fn decode_one<R, T>(value: Value) -> Result<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = TrelloError> + Default,
{
    if is_empty_payload(&value) {
        return Ok(T::default());
    }
    T::try_from(decode::<R>(value)?)
}

fn decode_many<R, T>(value: Value) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = TrelloError>,
{
    if is_empty_payload(&value) {
        return Ok(Vec::new());
    }
    decode::<Vec<R>>(value)?
        .into_iter()
        .map(T::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    const BOARD_ID: &str = "5f00000000000000000000b1";
    const BOARD2_ID: &str = "5f00000000000000000000b2";
    const LIST_ID: &str = "5f00000000000000000000a1";
    const LIST2_ID: &str = "5f00000000000000000000a2";
    const CARD_ID: &str = "5f00000000000000000000c1";
    const CARD2_ID: &str = "5f00000000000000000000c2";
    const COMMENT_ID: &str = "5f00000000000000000000d1";
    const MISSING_ID: &str = "123456789123456789123456";

    async fn service(server: &MockServer) -> BoardService {
        Mock::given(method("GET"))
            .and(path("/1/tokens/test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "tok" })))
            .mount(server)
            .await;
        let mut service = BoardService::new(TrelloClient::new(&server.uri()).unwrap());
        service
            .auth(Credentials::new("test-key", "test-token"))
            .await
            .unwrap();
        service
    }

    async fn mount_get(server: &MockServer, at: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn board_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "lists": [{ "id": LIST_ID, "name": "Todo", "idBoard": id }],
            "cards": []
        })
    }

    fn card_json(id: &str, list_id: &str, comments: u64) -> Value {
        json!({
            "id": id,
            "name": format!("Card {id}"),
            "idBoard": BOARD_ID,
            "idList": list_id,
            "badges": { "comments": comments },
            "labels": [{ "id": "5f00000000000000000000e3", "name": "", "color": "blue", "idBoard": BOARD_ID }]
        })
    }

    fn comment_json(text: &str) -> Value {
        json!({
            "id": COMMENT_ID,
            "date": "2024-01-15T10:30:00.000Z",
            "memberCreator": { "fullName": "Ada Lovelace" },
            "data": { "text": text }
        })
    }

    fn labels_json() -> Value {
        json!([
            { "id": "5f00000000000000000000e1", "name": "", "color": "green", "idBoard": BOARD_ID },
            { "id": "5f00000000000000000000e2", "name": "", "color": "yellow", "idBoard": BOARD_ID },
            { "id": "5f00000000000000000000e3", "name": "", "color": "blue", "idBoard": BOARD_ID }
        ])
    }

    // --- Initialization ---

    #[tokio::test]
    async fn test_failed_auth_refuses_operations_with_not_initialized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1/tokens/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1/members/me/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let mut service = BoardService::new(TrelloClient::new(&server.uri()).unwrap());
        let err = service
            .auth(Credentials::new("api", "token"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "401: invalid key");
        assert!(!service.is_initialized());
        assert!(matches!(
            service.get_all_boards().await,
            Err(TrelloError::NotInitialized)
        ));
    }

    // --- Boards ---

    #[tokio::test]
    async fn test_add_board_reads_created_board_back() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("POST"))
            .and(path("/1/boards/"))
            .and(query_param("name", "zTest Board"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": BOARD_ID })))
            .expect(1)
            .mount(&server)
            .await;
        mount_get(
            &server,
            &format!("/1/boards/{BOARD_ID}"),
            board_json(BOARD_ID, "zTest Board"),
        )
        .await;

        let board = service.add_board("zTest Board").await.unwrap();

        assert_eq!(board.id, BOARD_ID);
        assert_eq!(board.name, "zTest Board");
        assert_eq!(board.lists.len(), 1);
    }

    #[tokio::test]
    async fn test_add_board_without_id_in_response_fails() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("POST"))
            .and(path("/1/boards/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = service.add_board("Board").await.unwrap_err();

        assert_eq!(err.to_string(), "Unable to create board");
    }

    #[tokio::test]
    async fn test_delete_board_checks_existence_before_delete() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), board_json(BOARD_ID, "Old")).await;
        Mock::given(method("DELETE"))
            .and(path(format!("/1/boards/{BOARD_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_value": null })))
            .expect(1)
            .mount(&server)
            .await;

        service.delete_board(BOARD_ID).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_already_deleted_board_is_not_found_locally() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), json!({})).await;
        Mock::given(method("DELETE"))
            .and(path(format!("/1/boards/{BOARD_ID}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service.delete_board(BOARD_ID).await.unwrap_err();

        assert!(matches!(
            err,
            TrelloError::NotFoundLocally {
                kind: EntityKind::Board,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_board_missing_on_server_is_not_found_locally() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/boards/{BOARD_ID}")))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("The requested resource was not found."),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/1/boards/{BOARD_ID}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service.delete_board(BOARD_ID).await.unwrap_err();

        assert!(matches!(
            err,
            TrelloError::NotFoundLocally {
                kind: EntityKind::Board,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_board_with_malformed_id_stays_remote_error() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/1/boards/bad_board_id"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid id"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/1/boards/bad_board_id"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service.delete_board("bad_board_id").await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "400: invalid id");
    }

    #[tokio::test]
    async fn test_get_all_boards_fetches_each_board_in_listing_order() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/1/members/me/boards"))
            .and(query_param("filter", "all"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": BOARD2_ID }, { "id": BOARD_ID }])),
            )
            .mount(&server)
            .await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), board_json(BOARD_ID, "First")).await;
        mount_get(&server, &format!("/1/boards/{BOARD2_ID}"), board_json(BOARD2_ID, "Second")).await;

        let boards = service.get_all_boards().await.unwrap();

        let names: Vec<&str> = boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    // --- Cards ---

    #[tokio::test]
    async fn test_add_card_posts_matching_label_ids_in_board_order() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(
            &server,
            &format!("/1/lists/{LIST_ID}"),
            json!({ "id": LIST_ID, "name": "Todo", "idBoard": BOARD_ID }),
        )
        .await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}/labels"), labels_json()).await;
        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .and(query_param("idList", LIST_ID))
            .and(query_param("name", "X"))
            .and(query_param("pos", "bottom"))
            .and(query_param(
                "idLabels",
                "5f00000000000000000000e1,5f00000000000000000000e3",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": CARD_ID })))
            .expect(1)
            .mount(&server)
            .await;
        mount_get(
            &server,
            &format!("/1/cards/{CARD_ID}"),
            json!({
                "id": CARD_ID,
                "name": "X",
                "idBoard": BOARD_ID,
                "idList": LIST_ID,
                "badges": { "comments": 0 },
                "labels": [
                    { "id": "5f00000000000000000000e3", "color": "blue" },
                    { "id": "5f00000000000000000000e1", "color": "green" }
                ]
            }),
        )
        .await;

        let card = service
            .add_card(LIST_ID, "X", None, &[LabelColour::Blue, LabelColour::Green])
            .await
            .unwrap();

        assert_eq!(card.name, "X");
        assert_eq!(
            card.label_colours(),
            vec![LabelColour::Blue, LabelColour::Green]
        );
    }

    #[tokio::test]
    async fn test_add_card_with_blank_title_is_rejected_before_any_call() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/lists/{LIST_ID}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": CARD_ID })))
            .expect(0)
            .mount(&server)
            .await;

        for title in ["", "   "] {
            let err = service
                .add_card(LIST_ID, title, None, &[LabelColour::Blue])
                .await
                .unwrap_err();
            assert!(matches!(err, TrelloError::InvalidEntity(_)));
        }
    }

    #[tokio::test]
    async fn test_add_card_with_no_matching_colour_is_ambiguous() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(
            &server,
            &format!("/1/lists/{LIST_ID}"),
            json!({ "id": LIST_ID, "name": "Todo", "idBoard": BOARD_ID }),
        )
        .await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}/labels"), labels_json()).await;
        Mock::given(method("POST"))
            .and(path("/1/cards"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = service
            .add_card(LIST_ID, "X", Some("desc"), &[LabelColour::Pink])
            .await
            .unwrap_err();

        assert!(matches!(err, TrelloError::AmbiguousLabelSelection { .. }));
        assert_eq!(err.to_string(), r#"Unable to find label: ["pink"]"#);
    }

    #[tokio::test]
    async fn test_add_card_on_unknown_list_is_ambiguous() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/lists/{MISSING_ID}")))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("The requested resource was not found."),
            )
            .mount(&server)
            .await;

        let err = service
            .add_card(MISSING_ID, "X", None, &[LabelColour::Blue])
            .await
            .unwrap_err();

        assert!(matches!(err, TrelloError::AmbiguousLabelSelection { .. }));
    }

    #[tokio::test]
    async fn test_get_card_by_id_skips_comments_when_card_has_none() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/cards/{CARD_ID}"), card_json(CARD_ID, LIST_ID, 0)).await;
        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD_ID}/actions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let card = service.get_card_by_id(CARD_ID).await.unwrap();

        assert!(!card.has_comments);
        assert!(card.comments.is_empty());
    }

    #[tokio::test]
    async fn test_add_card_comment_returns_card_with_comments() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/cards/{CARD_ID}"), card_json(CARD_ID, LIST_ID, 0)).await;
        Mock::given(method("POST"))
            .and(path(format!("/1/cards/{CARD_ID}/actions/comments")))
            .and(query_param("text", "Ship it"))
            .respond_with(ResponseTemplate::new(200).set_body_json(comment_json("Ship it")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD_ID}/actions")))
            .and(query_param("filter", "commentCard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([comment_json("Ship it")])))
            .expect(1)
            .mount(&server)
            .await;

        let card = service.add_card_comment(CARD_ID, "Ship it").await.unwrap();

        assert_eq!(card.comments.len(), 1);
        assert_eq!(card.comments[0].text, "Ship it");
        assert_eq!(card.labels.len(), 1);
    }

    #[tokio::test]
    async fn test_add_card_comment_on_missing_card_is_not_found_locally() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/cards/{CARD_ID}"), Value::Null).await;

        let err = service.add_card_comment(CARD_ID, "hi").await.unwrap_err();

        assert_eq!(err.to_string(), format!("Unable to find card with ID: {CARD_ID}"));
    }

    #[tokio::test]
    async fn test_delete_card_comment_checks_card_first() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, &format!("/1/cards/{CARD_ID}"), card_json(CARD_ID, LIST_ID, 1)).await;
        Mock::given(method("DELETE"))
            .and(path(format!(
                "/1/cards/{CARD_ID}/actions/{COMMENT_ID}/comments"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_value": null })))
            .expect(1)
            .mount(&server)
            .await;

        service
            .delete_card_comment(CARD_ID, COMMENT_ID)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_card_by_id_has_no_pre_check() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD_ID}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/1/cards/{CARD_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "limits": {} })))
            .expect(1)
            .mount(&server)
            .await;

        service.delete_card_by_id(CARD_ID).await.unwrap();
    }

    // --- Views ---

    #[tokio::test]
    async fn test_show_all_cards_fetches_comments_only_for_commented_cards() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, "/1/members/me/boards", json!([{ "id": BOARD_ID }])).await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), board_json(BOARD_ID, "Main")).await;
        mount_get(
            &server,
            &format!("/1/boards/{BOARD_ID}/lists"),
            json!([{
                "id": LIST_ID,
                "name": "Todo",
                "idBoard": BOARD_ID,
                "cards": [card_json(CARD_ID, LIST_ID, 0), card_json(CARD2_ID, LIST_ID, 3)]
            }]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD_ID}/actions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD2_ID}/actions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([comment_json("hi")])))
            .expect(1)
            .mount(&server)
            .await;

        let view = service.show_all_by_type(false, true).await.unwrap();

        assert_eq!(view.options.depth, Depth::Cards);
        let cards = &view.boards[0].lists[0].cards;
        assert!(cards[0].comments.is_empty());
        assert_eq!(cards[1].comments[0].text, "hi");
    }

    #[tokio::test]
    async fn test_show_all_boards_only_does_not_fetch_lists() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(&server, "/1/members/me/boards", json!([{ "id": BOARD_ID }])).await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), board_json(BOARD_ID, "Main")).await;
        Mock::given(method("GET"))
            .and(path(format!("/1/boards/{BOARD_ID}/lists")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let view = service.show_all_by_type(false, false).await.unwrap();

        assert_eq!(view.options.depth, Depth::Boards);
        assert_eq!(view.boards.len(), 1);
    }

    #[tokio::test]
    async fn test_show_list_by_id_narrows_board_to_that_list() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        mount_get(
            &server,
            &format!("/1/lists/{LIST2_ID}"),
            json!({ "id": LIST2_ID, "name": "Doing", "idBoard": BOARD_ID }),
        )
        .await;
        mount_get(
            &server,
            &format!("/1/lists/{LIST2_ID}/cards"),
            json!([card_json(CARD_ID, LIST2_ID, 0)]),
        )
        .await;
        mount_get(
            &server,
            &format!("/1/boards/{BOARD_ID}"),
            json!({
                "id": BOARD_ID,
                "name": "B",
                "lists": [
                    { "id": LIST_ID, "name": "Todo", "idBoard": BOARD_ID },
                    { "id": LIST2_ID, "name": "Doing", "idBoard": BOARD_ID }
                ]
            }),
        )
        .await;

        let view = service.show_by_id(LIST2_ID, ShowTarget::List).await.unwrap();

        let board = &view.boards[0];
        assert_eq!(board.id, BOARD_ID);
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists[0].id, LIST2_ID);
        assert_eq!(board.lists[0].cards.len(), 1);
    }

    #[tokio::test]
    async fn test_show_card_by_id_narrows_to_single_card() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD2_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(card_json(CARD2_ID, LIST_ID, 1)))
            .mount(&server)
            .await;
        mount_get(
            &server,
            &format!("/1/lists/{LIST_ID}"),
            json!({ "id": LIST_ID, "name": "Todo", "idBoard": BOARD_ID }),
        )
        .await;
        mount_get(
            &server,
            &format!("/1/lists/{LIST_ID}/cards"),
            json!([card_json(CARD_ID, LIST_ID, 0), card_json(CARD2_ID, LIST_ID, 1)]),
        )
        .await;
        mount_get(&server, &format!("/1/boards/{BOARD_ID}"), board_json(BOARD_ID, "B")).await;
        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{CARD2_ID}/actions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([comment_json("once")])))
            .expect(1)
            .mount(&server)
            .await;

        let view = service.show_by_id(CARD2_ID, ShowTarget::Card).await.unwrap();

        let lists = &view.boards[0].lists;
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].cards.len(), 1);
        assert_eq!(lists[0].cards[0].id, CARD2_ID);
        assert_eq!(lists[0].cards[0].comments.len(), 1);
    }

    #[tokio::test]
    async fn test_show_by_malformed_id_surfaces_invalid_id() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path("/1/boards/bad_board_id"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid id"))
            .mount(&server)
            .await;

        let err = service
            .show_by_id("bad_board_id", ShowTarget::Board)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "400: invalid id");
    }

    #[tokio::test]
    async fn test_show_by_missing_id_surfaces_not_found() {
        let server = MockServer::start().await;
        let service = service(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/1/cards/{MISSING_ID}")))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("The requested resource was not found."),
            )
            .mount(&server)
            .await;

        let err = service
            .show_by_id(MISSING_ID, ShowTarget::Card)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "404: The requested resource was not found."
        );
    }

    #[test]
    fn test_tree_filter_default_keeps_everything() {
        let filter = TreeFilter::default();
        let list = List::new(LIST_ID, "Todo", BOARD_ID).unwrap();
        let card = Card::new(CARD_ID, "Task", BOARD_ID, LIST_ID).unwrap();

        assert!(filter.keeps_list(&list));
        assert!(filter.keeps_card(&card));
    }

    #[test]
    fn test_is_empty_payload_recognizes_empty_shapes() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(!is_empty_payload(&json!({ "_value": null })));
    }
}
