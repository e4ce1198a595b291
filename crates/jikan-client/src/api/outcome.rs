//! Terminal result of one query.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Payload of a successful query, or the empty fallback
///
/// The fallback converts to `{"data": []}`, the same shape as an empty
/// listing, so callers can render both the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fetched(Value),
    Fallback,
}

impl Outcome {
    /// JSON shape of [`Outcome::Fallback`]
    pub fn fallback_value() -> Value {
        json!({ "data": [] })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Fetched(value) => value.clone(),
            Outcome::Fallback => Self::fallback_value(),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            Outcome::Fetched(value) => value,
            Outcome::Fallback => Self::fallback_value(),
        }
    }

    /// Decode the whole payload, `None` if it does not fit `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.to_json()).ok()
    }

    /// Decode the entries of the `data` array, skipping ones that do not fit `T`
    pub fn listing<T: DeserializeOwned>(&self) -> Vec<T> {
        let Outcome::Fetched(value) = self else {
            return Vec::new();
        };

        value
            .get("data")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<Outcome> for Value {
    fn from(outcome: Outcome) -> Self {
        outcome.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ItemResponse, ListResponse};
    use shared::Anime;

    #[test]
    fn test_fallback_shape() {
        assert_eq!(Outcome::Fallback.into_json(), json!({"data": []}));
        assert!(Outcome::Fallback.is_fallback());
    }

    #[test]
    fn test_fallback_matches_empty_listing() {
        let empty = Outcome::Fetched(json!({"data": []}));
        assert_eq!(empty.to_json(), Outcome::Fallback.to_json());
        assert!(!empty.is_fallback());
    }

    #[test]
    fn test_listing_skips_malformed_entries() {
        let outcome = Outcome::Fetched(json!({
            "data": [
                {"mal_id": 1, "title": "A"},
                {"title": "missing id"},
                {"mal_id": 2, "title": "B"}
            ]
        }));

        let anime: Vec<Anime> = outcome.listing();
        let ids: Vec<u32> = anime.iter().map(|a| a.mal_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_listing_of_fallback_is_empty() {
        let anime: Vec<Anime> = Outcome::Fallback.listing();
        assert!(anime.is_empty());
    }

    #[test]
    fn test_decode() {
        let outcome = Outcome::Fetched(json!({"data": {"mal_id": 9, "title": "Nine"}}));
        let details: ItemResponse<Anime> = outcome.decode().unwrap();
        assert_eq!(details.data.title, "Nine");

        let list: ListResponse<Anime> = Outcome::Fallback.decode().unwrap();
        assert!(list.data.is_empty());
        assert!(Outcome::Fallback.decode::<ItemResponse<Anime>>().is_none());
    }
}
