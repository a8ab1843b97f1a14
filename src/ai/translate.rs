//! MyMemory public translation API.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::{check_status, AiError, Translator};

const MYMEMORY_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

pub struct MyMemoryTranslator {
    client: Client,
    max_attempts: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Hiva/0.1 (tour guide)")
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_attempts: 2,
        })
    }

    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, AiError> {
        let langpair = format!("{}|{}", source_lang, target_lang);
        let url = Url::parse_with_params(
            MYMEMORY_ENDPOINT,
            &[("q", text), ("langpair", langpair.as_str())],
        )?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let response = check_status(response).await?;
                    let data: MyMemoryResponse = response.json().await?;
                    return data
                        .response_data
                        .and_then(|d| d.translated_text)
                        .filter(|t| !t.is_empty())
                        .ok_or(AiError::EmptyResponse);
                }
                Err(e) if attempt < self.max_attempts && (e.is_timeout() || e.is_connect()) => {
                    warn!("Translation request failed (attempt {}): {}", attempt, e);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Translator for MyMemoryTranslator {
    fn translate<'a>(
        &'a self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.translate_text(text, source_lang, target_lang))
    }
}
