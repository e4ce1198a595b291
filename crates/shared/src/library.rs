//! Favorites and recently viewed anime.
//!
//! State is loaded once from a [`KeyValueStore`] when the library is created
//! and written back on every mutation.

use crate::models::Anime;
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Store key holding the favorites list
pub const FAVORITES_KEY: &str = "anime_favorites";

/// Store key holding the recents list
pub const RECENTS_KEY: &str = "anime_recents";

/// Default number of recently viewed entries kept
pub const DEFAULT_RECENTS_CAPACITY: usize = 10;

/// Favorites/recents state over an injected store
pub struct AnimeLibrary<S: KeyValueStore> {
    store: S,
    favorites: Vec<Anime>,
    recents: Vec<Anime>,
    recents_capacity: usize,
}

impl<S: KeyValueStore> AnimeLibrary<S> {
    /// Load the library with the default recents capacity
    pub fn load(store: S) -> Self {
        Self::with_capacity(store, DEFAULT_RECENTS_CAPACITY)
    }

    /// Load the library, keeping at most `recents_capacity` recents
    ///
    /// Missing or unreadable slots start out empty.
    pub fn with_capacity(store: S, recents_capacity: usize) -> Self {
        let favorites = load_list(&store, FAVORITES_KEY);
        let mut recents = load_list(&store, RECENTS_KEY);
        recents.truncate(recents_capacity);

        debug!(
            favorites = favorites.len(),
            recents = recents.len(),
            "Library loaded"
        );

        Self {
            store,
            favorites,
            recents,
            recents_capacity,
        }
    }

    pub fn favorites(&self) -> &[Anime] {
        &self.favorites
    }

    /// Recently viewed entries, most recent first
    pub fn recents(&self) -> &[Anime] {
        &self.recents
    }

    pub fn is_favorite(&self, mal_id: u32) -> bool {
        self.favorites.iter().any(|a| a.mal_id == mal_id)
    }

    /// Add `anime` to favorites, or remove it if already present
    ///
    /// Returns whether the entry is a favorite afterwards.
    pub fn toggle_favorite(&mut self, anime: Anime) -> Result<bool> {
        let now_favorite = if self.is_favorite(anime.mal_id) {
            self.favorites.retain(|a| a.mal_id != anime.mal_id);
            false
        } else {
            self.favorites.push(anime);
            true
        };

        persist(&mut self.store, FAVORITES_KEY, &self.favorites)?;
        Ok(now_favorite)
    }

    /// Move `anime` to the front of the recents list
    pub fn add_to_recents(&mut self, anime: Anime) -> Result<()> {
        self.recents.retain(|a| a.mal_id != anime.mal_id);
        self.recents.insert(0, anime);
        self.recents.truncate(self.recents_capacity);

        persist(&mut self.store, RECENTS_KEY, &self.recents)
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }
}

fn load_list<S: KeyValueStore>(store: &S, key: &str) -> Vec<Anime> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = key, error = %e, "Failed to read library slot");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key = key, error = %e, "Discarding unreadable library slot");
        Vec::new()
    })
}

fn persist<S: KeyValueStore>(store: &mut S, key: &str, items: &[Anime]) -> Result<()> {
    let raw = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize {}", key))?;
    store
        .set(key, &raw)
        .with_context(|| format!("Failed to persist {}", key))
}
