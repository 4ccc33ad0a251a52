use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::providers::ensure_success,
};

const SYSTEM_INSTRUCTION: &str = "You are a friendly media assistant that helps people discover, \
track, and choose anime, movies, TV shows, and manga. Use the library context you are given \
when it is relevant, keep answers short, and suggest concrete next steps such as searching \
for a title or adding it to the library.";

/// Free-form fallback for messages no rule understands.
///
/// Implementations never fail: problems come back as readable text.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, prompt: &str, context: &str) -> String;
}

/// Joins the library context and the user's message into one prompt
pub fn compose_prompt(prompt: &str, context: &str) -> String {
    if context.trim().is_empty() {
        prompt.to_string()
    } else {
        format!("{}\n\nUser: {}", context, prompt)
    }
}

/// Responder backed by the Gemini `generateContent` REST endpoint
pub struct GeminiResponder {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

impl GeminiResponder {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
        }
    }

    async fn generate(&self, full_prompt: &str) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": full_prompt }] }],
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let generated: GenerateResponse = ensure_success("Gemini", response, AppError::Assistant)
            .await?
            .json()
            .await?;
        generated
            .text()
            .ok_or_else(|| AppError::Assistant("Gemini returned no text".to_string()))
    }
}

#[async_trait::async_trait]
impl Responder for GeminiResponder {
    async fn respond(&self, prompt: &str, context: &str) -> String {
        let full_prompt = compose_prompt(prompt, context);
        tracing::debug!(model = %self.model, prompt_chars = full_prompt.len(), "Delegating to assistant");

        match self.generate(&full_prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "Assistant call failed");
                format!("Error in assistant: {}", e)
            }
        }
    }
}
