use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use couplet_generator::{
    ai::{CoupletService, DeepSeekCoupletClient},
    config::Config,
    models::{KeywordPair, KEYWORD1_FALLBACK, KEYWORD2_FALLBACK},
    prompts,
    server::{
        generate::{handle, InboundBody},
        get_app, AppState, GENERATE_PATH,
    },
    ErrorKind,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
    Config {
        deepseek_api_key: api_key.map(String::from),
        deepseek_base_url: server.uri(),
        ..Config::default()
    }
}

fn app_for(config: Config) -> axum::Router {
    let couplets = DeepSeekCoupletClient::from_config(&config, reqwest::Client::new());
    get_app(Arc::new(AppState {
        config,
        couplets: Arc::new(couplets),
    }))
}

async fn post_generate(app: axum::Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(GENERATE_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_full_pipeline_returns_couplet() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("关键词1：马蹄湖"))
        .and(body_string_contains("\"temperature\":0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"upper":"马蹄湖水映朝阳","lower":"省身楼前绩点旺","horizontal":"南开锦鲤"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(config_for(&server, Some("sk-test")));
    let (status, body) = post_generate(app, r#"{"k1":"马蹄湖","k2":"绩点"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "upper": "马蹄湖水映朝阳",
            "lower": "省身楼前绩点旺",
            "horizontal": "南开锦鲤"
        })
    );
}

#[tokio::test]
async fn test_missing_api_key_returns_500_without_upstream_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(config_for(&server, None));
    let (status, body) = post_generate(app, r#"{"keyword1":"早八"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing DEEPSEEK_API_KEY" }));
}

#[tokio::test]
async fn test_upstream_failures_return_502() {
    let cases = [
        ResponseTemplate::new(401).set_body_string("invalid api key"),
        ResponseTemplate::new(200).set_body_string("not json at all"),
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
        ResponseTemplate::new(200).set_body_json(completion("春风得意")),
        ResponseTemplate::new(200).set_body_json(completion(r#"{"upper":"只有上联"}"#)),
    ];

    for template in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(template)
            .mount(&server)
            .await;

        let app = app_for(config_for(&server, Some("sk-test")));
        let (status, body) = post_generate(app, "{}").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }
}

#[tokio::test]
async fn test_malformed_body_still_calls_upstream_with_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(KEYWORD1_FALLBACK))
        .and(body_string_contains(KEYWORD2_FALLBACK))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"upper":"南开园里春光好","lower":"顺遂年中喜事多","horizontal":"万事顺遂"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(config_for(&server, Some("sk-test")));
    let (status, body) = post_generate(app, "this is not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["horizontal"], "万事顺遂");
}

#[tokio::test]
async fn test_client_can_be_used_without_the_router() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"upper":"一","lower":"","horizontal":"三"}"#,
        )))
        .mount(&server)
        .await;

    let config = config_for(&server, Some("sk-test"));
    let client = DeepSeekCoupletClient::from_config(&config, reqwest::Client::new());
    let prompts = prompts::build(&KeywordPair::default());

    let err = client.generate_couplet(&prompts).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_embedding_host_can_pass_a_decoded_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("关键词1：津南"))
        .and(body_string_contains(KEYWORD2_FALLBACK))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"upper":"津南园里春风暖","lower":"顺遂年中好运来","horizontal":"前程似锦"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, Some("sk-test"));
    let couplets = DeepSeekCoupletClient::from_config(&config, reqwest::Client::new());
    let state = AppState {
        config,
        couplets: Arc::new(couplets),
    };

    let couplet = handle(&state, InboundBody::Parsed(json!({ "keyword1": "津南" })))
        .await
        .unwrap();
    assert_eq!(couplet.horizontal, "前程似锦");
}
