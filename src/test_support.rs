//! Mock upstream helpers shared by unit tests

use crate::api::HttpGateway;
use crate::cache::CacheStore;
use crate::config::Config;
use serde_json::{json, Value};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Name used by the mock upstream for a given id
pub fn name_for(id: u32) -> String {
    match id {
        1 => "bulbasaur".to_string(),
        4 => "charmander".to_string(),
        6 => "charizard".to_string(),
        25 => "pikachu".to_string(),
        _ => format!("mon{id}"),
    }
}

pub fn types_for(id: u32) -> Vec<&'static str> {
    match id {
        4..=6 => vec!["fire"],
        25 => vec!["electric"],
        _ => vec!["normal"],
    }
}

pub fn pokemon_json(id: u32, name: &str, types: &[&str]) -> Value {
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
        .collect();
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": { "front_default": format!("https://img.example/{id}.png") },
        "types": types,
        "stats": [ { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } } ],
        "abilities": [ { "ability": { "name": "overgrow", "url": "" }, "is_hidden": false, "slot": 1 } ],
        "species": { "name": name, "url": format!("https://api.example/pokemon-species/{id}/") }
    })
}

/// Index page listing the given ids, with stub urls pointing at `base`
pub fn list_json(base: &str, ids: RangeInclusive<u32>) -> Value {
    let results: Vec<Value> = ids
        .map(|id| json!({ "name": name_for(id), "url": format!("{base}/pokemon/{id}/") }))
        .collect();
    json!({ "count": 1025, "next": null, "previous": null, "results": results })
}

/// Mount the index page for `offset`/`limit`
pub async fn mount_index(server: &MockServer, offset: u32, limit: u32, ids: RangeInclusive<u32>) {
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", limit.to_string()))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(&server.uri(), ids)))
        .mount(server)
        .await;
}

/// Mount a detail responder answering every `/pokemon/{id}`
pub async fn mount_records(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/pokemon/\d+$"))
        .respond_with(|req: &Request| {
            let id: u32 = req
                .url
                .path()
                .rsplit('/')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            ResponseTemplate::new(200)
                .set_body_json(pokemon_json(id, &name_for(id), &types_for(id)))
        })
        .mount(server)
        .await;
}

/// Make a single detail url fail; takes priority over `mount_records`
pub async fn mount_failing_record(server: &MockServer, id: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/pokemon/{id}")))
        .respond_with(ResponseTemplate::new(status))
        .with_priority(1)
        .mount(server)
        .await;
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        batch_pacing: Duration::from_millis(1),
        ..Config::default()
    }
}

pub fn gateway_for(config: &Config) -> Arc<HttpGateway> {
    let store = Arc::new(CacheStore::new(config.cache_duration));
    Arc::new(HttpGateway::new(config, store))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
