use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const HUGGINGFACE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/blenderbot-400M-distill";

/// Reply used when the model answered but produced no text.
pub const NO_GENERATION_MESSAGE: &str = "I'm sorry, I couldn't generate a response.";

/// Opaque text-in/text-out conversational model.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, text: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    model_url: String,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(model_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model_url: model_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Completion for HuggingFaceClient {
    async fn complete(&self, text: &str) -> Result<String> {
        #[derive(Serialize)]
        struct InferenceReq<'a> {
            inputs: &'a str,
        }

        #[derive(Deserialize)]
        struct Generation {
            generated_text: Option<String>,
        }

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_key)
            .json(&InferenceReq { inputs: text })
            .send()
            .await
            .context("failed to call hugging face inference endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "hugging face inference returned {status}: {}",
                normalize_err_body(&body)
            );
        }

        let generations = response
            .json::<Vec<Generation>>()
            .await
            .context("failed to decode hugging face inference response")?;

        let first = generations
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("hugging face inference returned no generations"))?;

        Ok(first
            .generated_text
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| NO_GENERATION_MESSAGE.to_string()))
    }
}

fn normalize_err_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(err) = json.get("error").and_then(|v| v.as_str()) {
            return err.to_string();
        }
    }

    trimmed.to_string()
}
