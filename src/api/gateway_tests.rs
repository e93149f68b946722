//! Tests for the cached HTTP gateway.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::HttpGateway;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::CatalogError;
use crate::models::ResourceRef;
use crate::test_support::{gateway_for, pokemon_json, test_config};

// ── fetch ────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pokemon_json(25, "pikachu", &["electric"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let url = format!("{}/pokemon/25", mock_server.uri());

    let first = gateway.fetch(&url).await.unwrap();
    let second = gateway.fetch(&url).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["name"], "pikachu");
    // expect(1) is verified when the mock server drops
}

#[tokio::test]
async fn expired_entry_triggers_exactly_one_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pokemon_json(1, "bulbasaur", &["grass"])),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = Config {
        cache_duration: Duration::from_millis(100),
        ..test_config(&mock_server.uri())
    };
    let gateway = gateway_for(&config);
    let url = format!("{}/pokemon/1", mock_server.uri());

    gateway.fetch(&url).await.unwrap();
    gateway.fetch(&url).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    gateway.fetch(&url).await.unwrap();
    gateway.fetch(&url).await.unwrap();
}

#[tokio::test]
async fn failed_fetch_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/999999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let url = format!("{}/pokemon/999999", mock_server.uri());

    for _ in 0..2 {
        match gateway.fetch(&url).await {
            Err(CatalogError::HttpStatus { status, url: failed }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(failed, url);
            }
            other => panic!("Expected CatalogError::HttpStatus(404), got: {other:?}"),
        }
    }

    assert!(gateway.stats().keys.is_empty());
}

#[tokio::test]
async fn server_error_is_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let err = gateway
        .fetch(&format!("{}/pokemon/1", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn transport_failure_is_upstream_error() {
    // Nothing listens on port 9 of localhost
    let gateway = gateway_for(&test_config("http://127.0.0.1:9"));
    let err = gateway.fetch("http://127.0.0.1:9/pokemon/1").await.unwrap_err();

    assert!(matches!(err, CatalogError::Network(_)));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let err = gateway.record("1").await.unwrap_err();

    assert!(matches!(err, CatalogError::Parse(_)));
    assert!(!err.is_upstream());
}

#[tokio::test]
async fn cache_is_shared_between_gateways() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pokemon_json(4, "charmander", &["fire"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri());
    let store = Arc::new(CacheStore::new(config.cache_duration));
    let a = HttpGateway::new(&config, Arc::clone(&store));
    let b = HttpGateway::new(&config, Arc::clone(&store));

    a.record("4").await.unwrap();
    let record = b.record("4").await.unwrap();
    assert_eq!(record.name, "charmander");
}

// ── clear / stats ────────────────────────────────────────────────────

#[tokio::test]
async fn stats_and_clear() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pokemon_json(1, "bulbasaur", &["grass"])),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    gateway.record("1").await.unwrap();

    let stats = gateway.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.keys, vec![format!("{}/pokemon/1", mock_server.uri())]);

    gateway.clear();
    assert_eq!(gateway.stats().size, 0);

    // Cleared, so this goes back to the network
    gateway.record("1").await.unwrap();
}

// ── endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn list_page_sends_limit_and_offset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1025,
            "next": "https://api.example/pokemon?offset=60&limit=20",
            "previous": null,
            "results": [ { "name": "mon41", "url": "https://api.example/pokemon/41/" } ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let page = gateway.list_default_page(40).await.unwrap();

    assert_eq!(page.count, 1025);
    assert!(page.next.is_some());
    assert!(page.previous.is_none());
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].trailing_id(), Some(41));
}

#[test]
fn record_url_for_uses_stub_id() {
    let gateway = gateway_for(&test_config("http://localhost:1234/"));
    assert_eq!(gateway.base_url(), "http://localhost:1234");

    let by_id = ResourceRef {
        name: "pikachu".to_string(),
        url: "https://pokeapi.co/api/v2/pokemon/25/".to_string(),
    };
    assert_eq!(gateway.record_url_for(&by_id), "http://localhost:1234/pokemon/25");

    let by_name = ResourceRef {
        name: "missingno".to_string(),
        url: "https://pokeapi.co/api/v2/pokemon/missingno/".to_string(),
    };
    assert_eq!(
        gateway.record_url_for(&by_name),
        "http://localhost:1234/pokemon/missingno"
    );
}

#[test]
fn type_url_is_lowercased() {
    let gateway = gateway_for(&test_config("http://localhost:1234"));
    assert_eq!(gateway.type_url("Fire"), "http://localhost:1234/type/fire");
}

#[tokio::test]
async fn type_members_parses_stubs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/type/fire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "name": "fire",
            "pokemon": [
                { "pokemon": { "name": "charmander", "url": "https://api.example/pokemon/4/" }, "slot": 1 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&test_config(&mock_server.uri()));
    let members = gateway.type_members("FIRE").await.unwrap();
    assert_eq!(members.stubs()[0].name, "charmander");
}
