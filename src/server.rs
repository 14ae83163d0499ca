use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use askama::Template;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::chat::{ChatError, ChatService};
use crate::config::AppConfig;
use crate::merge::{MAX_PER_KEYWORD, MAX_RECOMMENDATIONS};
use crate::models::{ChatReply, ChatRequest};

const PROCESSING_ERROR_MESSAGE: &str = "An error occurred processing your request";

#[derive(Clone)]
struct AppState {
    chat: ChatService,
}

pub async fn run_server(config: AppConfig, chat_service: ChatService) -> Result<()> {
    let app = router(chat_service, &config.static_dir);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(chat_service: ChatService, static_dir: &Path) -> Router {
    let state = AppState { chat: chat_service };

    Router::new()
        .route("/", get(index_page))
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn index_page() -> Result<Html<String>, ApiError> {
    let template = IndexTemplate {
        max_books: MAX_RECOMMENDATIONS,
        per_topic: MAX_PER_KEYWORD,
    };
    let body = template.render().map_err(ApiError::from)?;

    Ok(Html(body))
}

// The body is taken raw so that bad JSON degrades to an empty message instead of a 4xx.
async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let message = ChatRequest::from_body(&body).into_message();
    let reply = state.chat.handle(&message).await?;
    tracing::info!(books = reply.recommendations.len(), "chat turn answered");
    Ok(Json(reply))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    max_books: usize,
    per_topic: usize,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<ChatError> for ApiError {
    fn from(value: ChatError) -> Self {
        tracing::error!("error in chat endpoint: {value:#}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: PROCESSING_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(value: askama::Error) -> Self {
        tracing::error!("failed to render index page: {value}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
