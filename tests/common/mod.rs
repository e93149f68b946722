//! Mock upstream shared by the integration tests

#![allow(dead_code)]

use dex_catalog::Config;
use serde_json::{json, Value};
use std::ops::RangeInclusive;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub fn name_for(id: u32) -> String {
    match id {
        4 => "charmander".to_string(),
        6 => "charizard".to_string(),
        25 => "pikachu".to_string(),
        _ => format!("mon{id}"),
    }
}

pub fn types_for(id: u32) -> Vec<&'static str> {
    match id {
        4..=6 | 155 => vec!["fire"],
        7..=9 => vec!["water"],
        25 => vec!["electric"],
        _ => vec!["normal"],
    }
}

pub fn pokemon_json(server_uri: &str, id: u32) -> Value {
    let types: Vec<Value> = types_for(id)
        .iter()
        .enumerate()
        .map(|(i, t)| json!({ "slot": i + 1, "type": { "name": t, "url": "" } }))
        .collect();
    json!({
        "id": id,
        "name": name_for(id),
        "sprites": { "front_default": format!("https://img.example/{id}.png") },
        "types": types,
        "stats": [],
        "abilities": [],
        "species": { "name": name_for(id), "url": format!("{server_uri}/pokemon-species/{id}/") }
    })
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        batch_pacing: Duration::from_millis(1),
        ..Config::default()
    }
}

pub async fn mount_index(server: &MockServer, ids: RangeInclusive<u32>) {
    let offset = ids.start() - 1;
    let limit = ids.end() - ids.start() + 1;
    let uri = server.uri();
    let results: Vec<Value> = ids
        .map(|id| json!({ "name": name_for(id), "url": format!("{uri}/pokemon/{id}/") }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", limit.to_string()))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1025, "next": null, "previous": null, "results": results
        })))
        .mount(server)
        .await;
}

pub async fn mount_records(server: &MockServer) {
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path_regex(r"^/pokemon/\d+$"))
        .respond_with(move |req: &Request| {
            let id: u32 = req
                .url
                .path()
                .rsplit('/')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            ResponseTemplate::new(200).set_body_json(pokemon_json(&uri, id))
        })
        .mount(server)
        .await;
}

pub async fn mount_failing_record(server: &MockServer, id: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/pokemon/{id}")))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Type listing built from the given member ids
pub async fn mount_type(server: &MockServer, tag: &str, ids: &[u32]) {
    let uri = server.uri();
    let members: Vec<Value> = ids
        .iter()
        .map(|id| {
            let url = format!("{uri}/pokemon/{id}/");
            json!({ "pokemon": { "name": name_for(*id), "url": url }, "slot": 1 })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/type/{tag}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "name": tag, "pokemon": members
        })))
        .mount(server)
        .await;
}
