//! Mock-based Bedrock client tests using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_publisher::client::{BedrockClient, Embedder, TextGenerator};
use paper_publisher::config::Config;
use paper_publisher::error::ClientError;
use paper_publisher::models::RawModelOutput;
use paper_publisher::prompt::PromptDocument;

const EMBED_PATH: &str = "/bedrock/model/test-embed-model/invoke";
const DRAFT_PATH: &str = "/bedrock/model/test-draft-model/invoke";

fn client(mock_server: &MockServer) -> BedrockClient {
    BedrockClient::new(&Config::for_testing(&mock_server.uri())).unwrap()
}

fn prompt(text: &str) -> PromptDocument {
    paper_publisher::prompt::build_prompt(text, &[], paper_publisher::prompt::PromptMode::Draft)
}

// =============================================================================
// Embeddings
// =============================================================================

#[tokio::test]
async fn test_embed_reads_embedding_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .and(body_json(json!({ "inputText": "graph neural networks" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "embedding": [0.1, 0.2, 0.3], "inputTextTokenCount": 3 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let vector = client(&mock_server).embed("graph neural networks").await.unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_embed_takes_first_row_of_nested_embeddings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[1.0, 2.0], [3.0, 4.0]]
        })))
        .mount(&mock_server)
        .await;

    let vector = client(&mock_server).embed("x").await.unwrap();
    assert_eq!(vector, vec![1.0, 2.0]);
}

#[tokio::test]
async fn test_embed_without_vector_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "nope" })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).embed("x").await.unwrap_err();
    assert!(matches!(err, ClientError::Malformed(_)));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .and(header("authorization", "Bearer bedrock-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vector": [1.0] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.bedrock_api_key = Some("bedrock-key".to_string());

    let client = BedrockClient::new(&config).unwrap();
    assert!(client.has_api_key());
    assert_eq!(client.embed("x").await.unwrap(), vec![1.0]);
}

#[tokio::test]
async fn test_forbidden_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).embed("x").await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
}

// =============================================================================
// Text generation
// =============================================================================

#[tokio::test]
async fn test_generate_joins_mistral_outputs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFT_PATH))
        .and(body_partial_json(json!({ "max_tokens": 900 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": [
                { "text": "Abstract", "stop_reason": "length" },
                { "outputText": "Introduction" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server).generate(&prompt("topic"), 900, 0.2).await.unwrap();
    assert_eq!(reply, RawModelOutput::Text("Abstract\n\nIntroduction".to_string()));
}

#[tokio::test]
async fn test_generate_keeps_other_json_structured() {
    let mock_server = MockServer::start().await;

    let body = json!({ "text": "{\"summary\": \"s\"}" });
    Mock::given(method("POST"))
        .and(path(DRAFT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server).generate(&prompt("topic"), 1200, 0.2).await.unwrap();
    assert_eq!(reply, RawModelOutput::Structured(body));
}

#[tokio::test]
async fn test_generate_plain_body_is_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain words"))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server).generate(&prompt("topic"), 1200, 0.2).await.unwrap();
    assert_eq!(reply.into_text(), "plain words");
}

#[tokio::test]
async fn test_generate_sends_prompt() {
    let mock_server = MockServer::start().await;
    let doc = prompt("quantum error correction");

    Mock::given(method("POST"))
        .and(path(DRAFT_PATH))
        .and(body_partial_json(json!({ "prompt": doc.as_str() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "outputs": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server).generate(&doc, 900, 0.2).await.unwrap();
    assert_eq!(reply.into_text(), "");
}
