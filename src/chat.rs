use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::completion::Completion;
use crate::keywords;
use crate::merge;
use crate::models::ChatReply;
use crate::search::BookSearch;

/// Reply used when the completion service fails or times out.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble understanding right now. Let's talk about books in general.";

pub const RECOMMENDATION_TRAILER: &str =
    "Based on our conversation, I've found some book recommendations for you.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to process chat turn: {0}")]
    Processing(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct ChatService {
    completion: Arc<dyn Completion>,
    search: BookSearch,
    completion_timeout: Duration,
    shuffle_seed: Option<u64>,
}

impl ChatService {
    pub fn new(
        completion: Arc<dyn Completion>,
        search: BookSearch,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            completion,
            search,
            completion_timeout,
            shuffle_seed: None,
        }
    }

    /// Makes every turn shuffle the same way.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    /// Runs one chat turn: model reply, keyword extraction, per-keyword search, merge.
    pub async fn handle(&self, message: &str) -> Result<ChatReply, ChatError> {
        tracing::info!(user_message = message, "received user message");

        let ai_reply = self.reply(message).await;
        tracing::info!(reply = %ai_reply, "ai reply");

        let keywords = keywords::extract(&format!("{message} {ai_reply}"));
        tracing::info!(?keywords, "extracted keywords");

        let results = self
            .search
            .search_all(&keywords)
            .await
            .map_err(|err| ChatError::Processing(err.into()))?;

        let recommendations = match self.shuffle_seed {
            Some(seed) => merge::merge(results, &mut StdRng::seed_from_u64(seed)),
            None => merge::merge(results, &mut rand::rng()),
        };
        tracing::info!(count = recommendations.len(), "final recommendations");

        Ok(ChatReply {
            reply_text: format!("{ai_reply}\n\n{RECOMMENDATION_TRAILER}"),
            keywords,
            recommendations,
        })
    }

    async fn reply(&self, message: &str) -> String {
        let outcome =
            tokio::time::timeout(self.completion_timeout, self.completion.complete(message)).await;

        match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                tracing::error!("completion service failed: {err:#}");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                tracing::error!(timeout = ?self.completion_timeout, "completion service timed out");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
