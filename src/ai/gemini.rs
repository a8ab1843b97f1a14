//! Gemini text generation over the Generative Language REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{check_status, AiError, TextGenerator};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    api_key: String,
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

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Hiva/0.1 (tour guide)")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, AiError> {
        let url = Url::parse(GEMINI_ENDPOINT)?
            .join(&format!("models/{}:generateContent", self.model))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let data: GenerateResponse = response.json().await?;
        let text = extract_text(data).ok_or(AiError::EmptyResponse)?;
        debug!("Gemini returned {} chars", text.len());
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(data: GenerateResponse) -> Option<String> {
    let content = data.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.generate_content(prompt))
    }
}
