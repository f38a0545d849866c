// In crates/api-client/src/llm.rs

use crate::retry::{read_json, RetryPolicy};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, GeminiResponse};
use crate::{Error, Result};
use app_config::LlmSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const SYSTEM_PROMPT: &str =
    "You are a Solana trading analyst. Answer only with the JSON requested, no prose.";

/// A text-completion backend used to generate insights.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: Client,
    settings: LlmSettings,
    retry: RetryPolicy,
}

impl OpenAiClient {
    pub fn new(http_client: Client, settings: &LlmSettings, retry: RetryPolicy) -> Self {
        Self { http_client, settings: settings.clone(), retry }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.settings.api_key.is_empty() {
            return Err(Error::MissingApiKey(self.name()));
        }
        let url = format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage { role: "system".into(), content: SYSTEM_PROMPT.into() },
                ChatMessage { role: "user".into(), content: prompt.into() },
            ],
            temperature: 0.7,
        };

        let response: ChatResponse = self
            .retry
            .run("openai.chat", || async {
                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(&self.settings.api_key)
                    .json(&request)
                    .send()
                    .await?;
                read_json(self.name(), response).await
            })
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::ApiError { code: -1, msg: "openai returned no choices".into() })
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    settings: LlmSettings,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(http_client: Client, settings: &LlmSettings, retry: RetryPolicy) -> Self {
        Self { http_client, settings: settings.clone(), retry }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.settings.api_key.is_empty() {
            return Err(Error::MissingApiKey(self.name()));
        }
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model,
            self.settings.api_key
        );
        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response: GeminiResponse = self
            .retry
            .run("gemini.generate", || async {
                let response = self.http_client.post(&url).json(&body).send().await?;
                read_json(self.name(), response).await
            })
            .await?;

        first_candidate_text(response)
            .ok_or_else(|| Error::ApiError { code: -1, msg: "gemini returned no candidates".into() })
    }
}

fn first_candidate_text(response: GeminiResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect();
    Some(text)
}
