//! Integration tests for the Jikan client.
//!
//! Drives the real reqwest transport against a local mock server with
//! millisecond delays.

use std::time::Duration;

use jikan_client::api::{AnimeDetailsResponse, ReqwestTransport};
use jikan_client::{JikanClient, Outcome, RetryPolicy, TopFilter};
use serde_json::json;
use shared::{Anime, AnimeLibrary, SqliteStore};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_retries,
        Duration::from_millis(10),
        Duration::from_millis(20),
        Duration::from_millis(5),
    )
}

fn client_for(server: &MockServer, max_retries: u32) -> JikanClient {
    let transport = ReqwestTransport::new(Duration::from_secs(5), "jikan-client-tests").unwrap();
    JikanClient::with_transport(
        transport,
        format!("{}/v4", server.uri()),
        fast_policy(max_retries),
    )
}

#[tokio::test]
async fn test_seasonal_returns_upstream_body() {
    let server = MockServer::start().await;
    let body = json!({"data": [{"mal_id": 1, "title": "A"}]});

    Mock::given(method("GET"))
        .and(path("/v4/seasons/now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 3).seasonal().await;

    assert_eq!(outcome, Outcome::Fetched(body));
}

#[tokio::test]
async fn test_rate_limited_requests_are_retried() {
    let server = MockServer::start().await;
    let body = json!({"data": [{"mal_id": 21, "title": "One Piece"}]});

    Mock::given(method("GET"))
        .and(path("/v4/top/anime"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": 429,
            "type": "RateLimitException",
            "message": "You are being rate limited"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/top/anime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 3).top(TopFilter::All).await;

    assert_eq!(outcome, Outcome::Fetched(body));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_server_errors_exhaust_to_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/anime/1/full"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 3).details("1").await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.into_json(), json!({"data": []}));
}

#[tokio::test]
async fn test_invalid_json_with_single_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/genres/anime"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>down</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 1).genres().await;

    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn test_search_sends_genre_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/anime"))
        .and(query_param("q", "naruto"))
        .and(query_param("sfw", "true"))
        .and(query_param("limit", "20"))
        .and(query_param("genres", "27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 1).search("naruto", Some(27)).await;

    assert!(!outcome.is_fallback());
}

#[tokio::test]
async fn test_unknown_top_filter_sends_no_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/top/anime"))
        .and(query_param_is_missing("filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server, 1)
        .top(TopFilter::from("xyz"))
        .await;

    assert!(!outcome.is_fallback());
}

#[tokio::test]
async fn test_viewed_details_land_in_recents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/anime/5114/full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "mal_id": 5114,
                "title": "Fullmetal Alchemist: Brotherhood",
                "type": "TV",
                "episodes": 64
            }
        })))
        .mount(&server)
        .await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("library.db");

    let details: AnimeDetailsResponse = client_for(&server, 1)
        .details("5114")
        .await
        .decode()
        .unwrap();

    {
        let mut library = AnimeLibrary::load(SqliteStore::open(&db_path).unwrap());
        library.add_to_recents(details.data).unwrap();
        library
            .toggle_favorite(Anime::new(1, "Cowboy Bebop"))
            .unwrap();
    }

    let library = AnimeLibrary::load(SqliteStore::open(&db_path).unwrap());
    assert_eq!(library.recents()[0].mal_id, 5114);
    assert_eq!(library.recents()[0].episodes, Some(64));
    assert!(library.is_favorite(1));
}
