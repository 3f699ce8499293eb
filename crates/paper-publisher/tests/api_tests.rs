//! HTTP API tests driving the router directly.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{
    CannedGenerator, DownSource, MapEmbedder, MemoryStore, StaticSource, paper, publisher,
};
use paper_publisher::pipeline::Publisher;
use paper_publisher::server::routes::create_router;

fn router(publisher: Publisher) -> axum::Router {
    create_router(Arc::new(publisher))
}

fn happy_publisher(reply: &str, store: Arc<MemoryStore>) -> Publisher {
    publisher(
        StaticSource::new(vec![paper("Paper A", "alpha"), paper("Paper B", "beta")]),
        MapEmbedder::new(&[]),
        CannedGenerator::new(reply),
        store,
    )
}

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    for uri in ["/", "/health"] {
        let app = router(happy_publisher("", MemoryStore::new()));
        let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "paper-publisher");
    }
}

#[tokio::test]
async fn test_research_endpoint() {
    let store = MemoryStore::new();
    let app = router(happy_publisher("Abstract\n\nBody", store.clone()));

    let request = post_json("/research", &json!({ "prompt": "AI in healthcare" }));
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topic"], "AI in healthcare");
    assert_eq!(body["papers_found"], 2);
    assert_eq!(body["ai_text"], "Abstract\n\nBody");
    assert!(body["filename"].as_str().unwrap().starts_with("AI_in_healthcare_"));
    assert!(body["generated_at"].is_string());
    assert_eq!(store.keys().len(), 1);
}

#[tokio::test]
async fn test_research_blank_prompt_is_400() {
    let app = router(happy_publisher("", MemoryStore::new()));

    let (status, body) = send(app, post_json("/research", &json!({ "prompt": "   " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Prompt cannot be empty." }));
}

#[tokio::test]
async fn test_analyze_endpoint_defaults() {
    let reply = json!({
        "summary": "s",
        "limitations": ["l"],
        "innovations": [{ "title": "t", "summary": "u", "validationPlan": "v", "metric": "m" }]
    });
    let app = router(happy_publisher(&reply.to_string(), MemoryStore::new()));

    let (status, body) = send(app, post_json("/analyze", &json!({ "topic": "robotics" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["kind"], "analysis");
    assert_eq!(body["analysis"]["innovations"][0]["validation_plan"], "v");
    assert_eq!(body["papers"].as_array().unwrap().len(), 2);
    assert!(body["s3_url"].is_string());
}

#[tokio::test]
async fn test_analyze_endpoint_parse_failed() {
    let app = router(happy_publisher("not json {{{", MemoryStore::new()));

    let request = post_json("/analyze", &json!({ "topic": "robotics", "rank": false }));
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"], json!({ "kind": "parse_failed", "raw_text": "not json {{{" }));
    assert!(body["s3_url"].is_null());
}

#[tokio::test]
async fn test_analyze_source_outage_is_502() {
    let app = router(publisher(
        Arc::new(DownSource),
        MapEmbedder::new(&[]),
        CannedGenerator::new("{}"),
        MemoryStore::new(),
    ));

    let (status, body) = send(app, post_json("/analyze", &json!({ "topic": "robotics" }))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("down"));
}

#[tokio::test]
async fn test_history_endpoint() {
    let store = MemoryStore::new();
    store.seed("generated/a.pdf", 5);
    store.seed("generated/b.pdf", 10);
    let app = router(happy_publisher("", store));

    let (status, body) = send(app, Request::get("/history").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file_name"], "generated/b.pdf");
    assert!(files[0]["last_modified"].is_string());
}
