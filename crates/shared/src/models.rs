//! Data models for anime catalog entries.
//!
//! These mirror the Jikan v4 payload shapes loosely: every field except the
//! identifier and title is optional, since listings, detail pages and stored
//! library items carry different subsets.

use serde::{Deserialize, Serialize};

/// Anime entry as returned by listing and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub mal_id: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Option<AnimeImages>,

    // Titles
    pub title: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub airing: Option<bool>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,

    // Scores and rankings
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub scored_by: Option<u32>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub members: Option<u32>,
    #[serde(default)]
    pub favorites: Option<u32>,

    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,

    #[serde(default)]
    pub studios: Vec<Genre>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub themes: Vec<Genre>,
    #[serde(default)]
    pub demographics: Vec<Genre>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

impl Anime {
    /// Minimal entry with just an identifier and a title
    pub fn new(mal_id: u32, title: impl Into<String>) -> Self {
        Self {
            mal_id,
            url: None,
            images: None,
            title: title.into(),
            title_english: None,
            title_japanese: None,
            anime_type: None,
            source: None,
            episodes: None,
            status: None,
            airing: None,
            duration: None,
            rating: None,
            score: None,
            scored_by: None,
            rank: None,
            popularity: None,
            members: None,
            favorites: None,
            synopsis: None,
            background: None,
            season: None,
            year: None,
            studios: Vec::new(),
            genres: Vec::new(),
            themes: Vec::new(),
            demographics: Vec::new(),
            trailer: None,
        }
    }

    /// English title when available, otherwise the default title
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }
}

/// Anime images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// Trailer links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
}

/// Genre, theme, demographic or studio reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub mal_id: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Number of entries, only present in the genre catalog
    #[serde(default)]
    pub count: Option<u32>,
}

/// One entry of an anime's character list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRole {
    pub character: Character,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Option<CharacterImages>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterImages {
    pub jpg: ImageSet,
}
