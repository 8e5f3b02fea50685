// Wire records for Trello API responses.
//
// These mirror the JSON Trello returns and are converted into the domain
// types in `model` before leaving the crate.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct BoardResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lists: Vec<ListResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "idBoard", default)]
    pub id_board: String,
    #[serde(default)]
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CardResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "idBoard", default)]
    pub id_board: String,
    #[serde(rename = "idList", default)]
    pub id_list: String,
    #[serde(default)]
    pub labels: Vec<LabelResponse>,
    #[serde(default)]
    pub badges: Option<Badges>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Badges {
    #[serde(default)]
    pub comments: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "idBoard", default)]
    pub id_board: Option<String>,
}

/// A `commentCard` action.
#[derive(Debug, Deserialize)]
pub(crate) struct ActionResponse {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "memberCreator", default)]
    pub member_creator: Option<MemberCreator>,
    pub data: ActionData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberCreator {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionData {
    #[serde(default)]
    pub text: String,
}

/// Body reduced to its id: create calls and id-only listings.
#[derive(Debug, Deserialize)]
pub(crate) struct IdResponse {
    #[serde(default)]
    pub id: Option<String>,
}
