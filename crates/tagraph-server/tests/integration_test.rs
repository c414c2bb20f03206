//! End-to-end HTTP tests against a store and graph file in a temp directory.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use tagraph_server::config::ServerConfig;
use tagraph_server::router::build_router;
use tagraph_server::state::AppState;

const PAPER_X_ID: &str = "892b23b93e9765d27abed37ee5aeff5b";
const FIN_ID: &str = "f408850c47cccdcedad816d79e100906";
const FIN_RISK_ID: &str = "42098fd6cf6f02d3ec411b5b002fb4ac";

fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        store_path: dir.path().join("papers_ideas.csv"),
        graph_path: dir.path().join("output_graph.json"),
        ..ServerConfig::default()
    }
}

fn test_app(dir: &TempDir) -> Router {
    let state = AppState::new(test_config(dir)).expect("failed to create AppState");
    build_router(state)
}

async fn request_json(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    request_json(app, Method::POST, path, Some(body)).await
}

async fn post_empty(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request_json(app, Method::POST, path, None).await
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request_json(app, Method::GET, path, None).await
}

async fn append(app: &Router, raw: &str) -> serde_json::Value {
    let (status, body) = post_json(app, "/entries", json!({ "raw": raw })).await;
    assert_eq!(status, StatusCode::OK, "append failed: {body:?}");
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn single_entry_compiles_to_three_nodes_and_two_links() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let added = append(&app, "Paper X, FIN/RISK, http://x, today").await;
    assert_eq!(added["count"], 1);
    assert_eq!(added["added"][0]["title"], "Paper X");
    assert_eq!(added["added"][0]["tag"], "FIN/RISK");

    let (status, doc) = post_empty(&app, "/expose_json_data").await;
    assert_eq!(status, StatusCode::OK, "rebuild failed: {doc:?}");

    let nodes = doc["nodes"].as_array().unwrap();
    let links = doc["links"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(links.len(), 2);

    let entry = nodes.iter().find(|n| n["id"] == PAPER_X_ID).unwrap();
    assert_eq!(entry["type"], "[ENTRY]");
    assert_eq!(entry["user"], "admin");
    assert_eq!(entry["link"], "http://x");

    let tag = nodes.iter().find(|n| n["id"] == FIN_RISK_ID).unwrap();
    assert_eq!(tag["type"], "[TAG]");
    assert_eq!(tag["title"], "FIN/RISK");
    assert!(tag["link"].is_null());

    assert!(links.iter().any(|l| l["source"] == PAPER_X_ID
        && l["target"] == FIN_RISK_ID
        && l["type"] == "[ENTRY]"));
    assert!(links.iter().any(|l| l["source"] == FIN_RISK_ID
        && l["target"] == FIN_ID
        && l["type"] == "[TAG]"));
}

#[tokio::test]
async fn shared_tag_is_counted_twice_but_emitted_once() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    append(
        &app,
        "Paper X, FIN/RISK, http://x, 2024-01-02; Paper Y, FIN/RISK, http://y, 2024-01-03",
    )
    .await;

    let (status, tags) = get_json(&app, "/tags").await;
    assert_eq!(status, StatusCode::OK);
    let fin_risk = tags["tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["tag"] == "FIN/RISK")
        .unwrap();
    assert_eq!(fin_risk["count"], 2);
    assert_eq!(fin_risk["depth"], 2);

    let (_, used) = get_json(&app, "/tags/used").await;
    assert_eq!(used["tags"], json!(["FIN/RISK"]));

    let (_, doc) = post_empty(&app, "/expose_json_data").await;
    let fin_risk_nodes = doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["id"] == FIN_RISK_ID)
        .count();
    assert_eq!(fin_risk_nodes, 1);
}

#[tokio::test]
async fn blank_title_is_rejected_and_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    append(&app, "Paper X, FIN/RISK, http://x, 2024-01-02").await;

    let (status, body) = post_json(
        &app,
        "/entries",
        json!({ "raw": "Good, FIN, http://g, today;  , FIN/RISK, http://blank, today" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["details"][0]["reason"]["kind"], "blank_title");

    // Neither record of the rejected batch was written.
    let (_, doc) = post_empty(&app, "/expose_json_data").await;
    let entries = doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["type"] == "[ENTRY]")
        .count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn empty_store_compiles_to_empty_document() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let (status, doc) = post_empty(&app, "/expose_json_data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc, json!({ "nodes": [], "links": [] }));
}

#[tokio::test]
async fn rebuild_without_store_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = build_router(AppState::without_init(test_config(&dir)));
    let (status, body) = post_empty(&app, "/expose_json_data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn graph_endpoint_reports_missing_and_malformed_documents() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let graph_path = config.graph_path.clone();
    let app = build_router(AppState::without_init(config));

    let (status, _) = get_json(&app, "/graph").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    std::fs::write(&graph_path, r#"{"nodes": []}"#).unwrap();
    let (status, body) = get_json(&app, "/graph").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "MALFORMED_GRAPH");
}

#[tokio::test]
async fn rebuild_is_idempotent_and_served_by_graph_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    append(&app, "Paper X, FIN/RISK, http://x, 2024-01-02; Paper Z, OPS, , 2024-02-01").await;

    let (_, first) = post_empty(&app, "/expose_json_data").await;
    let (_, second) = post_empty(&app, "/expose_json_data").await;
    assert_eq!(first, second);

    let (status, stored) = get_json(&app, "/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, first);
}

#[tokio::test]
async fn empty_raw_batch_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    for raw in ["   ", " ; ;; "] {
        let (status, body) = post_json(&app, "/entries", json!({ "raw": raw })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}
