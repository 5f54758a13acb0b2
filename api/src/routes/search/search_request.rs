use chat_core::Passage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEARCH_LIMIT: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Passage>,
}
