//! Jikan API v4 response envelopes.
//!
//! Entry types live in [`shared::models`]; these wrap them the way the API
//! does.

use serde::{Deserialize, Serialize};
use shared::{Anime, CharacterRole, Genre};

/// Listing wrapper (pagination is absent on some endpoints)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Single-item wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub data: T,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

pub type AnimeListResponse = ListResponse<Anime>;
pub type AnimeDetailsResponse = ItemResponse<Anime>;
pub type CharactersResponse = ListResponse<CharacterRole>;
pub type GenresResponse = ListResponse<Genre>;

/// Error body returned by Jikan alongside non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanError {
    pub status: u16,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
