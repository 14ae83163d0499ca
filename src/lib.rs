pub mod catalog;
pub mod chat;
pub mod completion;
pub mod config;
pub mod keywords;
pub mod merge;
pub mod models;
pub mod search;
pub mod server;

use std::sync::Arc;

pub use config::AppConfig;
pub use server::run_server;

use catalog::RakutenClient;
use chat::ChatService;
use completion::HuggingFaceClient;
use search::BookSearch;

/// Wires the production collaborators from configuration.
pub fn build_chat_service(config: &AppConfig) -> ChatService {
    let catalog = RakutenClient::new(
        config.rakuten_api_url.clone(),
        config.rakuten_app_id.clone(),
    );
    let completion = HuggingFaceClient::new(
        config.huggingface_api_url.clone(),
        config.huggingface_api_key.clone(),
    );
    let search = BookSearch::new(Arc::new(catalog), config.external_timeout);

    ChatService::new(Arc::new(completion), search, config.external_timeout)
        .with_seed(config.shuffle_seed)
}
