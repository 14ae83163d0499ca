//! End-to-end tests for the HTTP surface: the real router and HTTP clients,
//! with both outbound services replaced by wiremock servers.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookchat::catalog::{Catalog, CatalogItem, CatalogQuery};
use bookchat::chat::{ChatService, FALLBACK_REPLY, RECOMMENDATION_TRAILER};
use bookchat::completion::Completion;
use bookchat::search::BookSearch;
use bookchat::server::router;
use bookchat::{build_chat_service, AppConfig};

struct Services {
    catalog: MockServer,
    completion: MockServer,
}

impl Services {
    async fn start() -> Self {
        Self {
            catalog: MockServer::start().await,
            completion: MockServer::start().await,
        }
    }

    fn app(&self) -> Router {
        let catalog_url = format!("{}/books", self.catalog.uri());
        let completion_url = format!("{}/model", self.completion.uri());
        let config = AppConfig::from_lookup(|key| match key {
            "RAKUTEN_APP_ID" => Some("app-id".to_string()),
            "HUGGINGFACE_API_KEY" => Some("hf-key".to_string()),
            "RAKUTEN_API_URL" => Some(catalog_url.clone()),
            "HUGGINGFACE_API_URL" => Some(completion_url.clone()),
            "EXTERNAL_TIMEOUT_SECS" => Some("5".to_string()),
            "BOOKCHAT_SHUFFLE_SEED" => Some("11".to_string()),
            _ => None,
        })
        .expect("test config");

        router(build_chat_service(&config), &config.static_dir)
    }

    async fn completion_replies(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/model"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": text }])),
            )
            .mount(&self.completion)
            .await;
    }

    async fn completion_is_down(&self) {
        Mock::given(method("POST"))
            .and(path("/model"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "loading"})))
            .mount(&self.completion)
            .await;
    }

    async fn catalog_has(&self, keyword: &str, titles: &[&str]) {
        let items: Vec<Value> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                json!({"Item": {
                    "title": title,
                    "author": "Some Author",
                    "itemPrice": 1000 + i,
                    "largeImageUrl": format!("https://img/{i}.jpg"),
                }})
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/books"))
            .and(query_param("keyword", keyword))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Items": items })))
            .mount(&self.catalog)
            .await;
    }

    async fn catalog_fails_for(&self, keyword: &str) {
        Mock::given(method("GET"))
            .and(path("/books"))
            .and(query_param("keyword", keyword))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.catalog)
            .await;
    }
}

async fn post_chat(app: Router, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn titles(value: &Value) -> Vec<String> {
    value["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn mystery_message_with_completion_down() {
    let services = Services::start().await;
    services.completion_is_down().await;
    services
        .catalog_has(
            "mystery",
            &["Rebecca", "Gone Girl", "In the Woods", "Sharp Objects", "Tana"],
        )
        .await;

    let (status, body) = post_chat(services.app(), r#"{"message": "I love mystery novels"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with(FALLBACK_REPLY));
    assert!(response.ends_with(RECOMMENDATION_TRAILER));
    assert_eq!(body["keywords"], json!(["mystery"]));

    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    for book in books {
        assert_eq!(book["keyword"], "mystery");
        assert_eq!(book["author"], "Some Author");
        assert!(book["price"].as_str().unwrap().starts_with('¥'));
        assert!(book["imageUrl"].as_str().unwrap().starts_with("https://img/"));
    }
}

#[tokio::test]
async fn failing_keyword_keeps_other_books() {
    let services = Services::start().await;
    services
        .completion_replies("Maybe some science or history books")
        .await;
    services.catalog_has("science", &["Cosmos", "The Selfish Gene"]).await;
    services.catalog_fails_for("history").await;

    let (status, body) = post_chat(services.app(), r#"{"message": "recommend something"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keywords"], json!(["science", "history"]));
    let mut got = titles(&body);
    got.sort();
    assert_eq!(got, vec!["Cosmos", "The Selfish Gene"]);
}

#[tokio::test]
async fn malformed_body_is_an_empty_message() {
    let services = Services::start().await;
    services.completion_replies("Do you like fantasy books").await;
    services.catalog_has("fantasy", &["The Hobbit"]).await;

    let (status, body) = post_chat(services.app(), "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keywords"], json!(["fantasy"]));
    assert_eq!(titles(&body), vec!["The Hobbit"]);
}

#[tokio::test]
async fn duplicate_titles_across_keywords_appear_once() {
    let services = Services::start().await;
    services.completion_replies("fiction and mystery it is").await;
    services.catalog_has("fiction", &["A", "B", "A"]).await;
    services.catalog_has("mystery", &["A", "C"]).await;

    let (_, body) = post_chat(services.app(), r#"{"message": ""}"#).await;

    let mut got = titles(&body);
    got.sort();
    // fiction keeps A and B; mystery contributes only C.
    assert_eq!(got, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn health_and_index_pages() {
    let services = Services::start().await;

    let response = services
        .app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = services
        .app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("up to 10 books"));
}

struct ExplodingCatalog;

#[async_trait]
impl Catalog for ExplodingCatalog {
    async fn search(&self, query: &CatalogQuery<'_>) -> Result<Vec<CatalogItem>> {
        panic!("catalog bug while searching {}", query.keyword);
    }
}

struct EchoCompletion;

#[async_trait]
impl Completion for EchoCompletion {
    async fn complete(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

#[tokio::test]
async fn internal_fault_is_a_generic_500() {
    let search = BookSearch::new(Arc::new(ExplodingCatalog), Duration::from_secs(1));
    let chat = ChatService::new(Arc::new(EchoCompletion), search, Duration::from_secs(1));
    let app = router(chat, Path::new("static"));

    let (status, body) = post_chat(app, r#"{"message": "anything"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "An error occurred processing your request"})
    );
}
