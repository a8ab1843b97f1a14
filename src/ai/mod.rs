//! External AI capabilities behind injectable traits.
//!
//! Handlers only ever see `GuideService`, which owns one implementation of
//! each capability. Production wiring uses the HTTP providers in this module;
//! tests plug in stubs.

mod fallback;
mod gemini;
mod guide;
mod translate;
mod tts;

use futures::future::BoxFuture;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use guide::{GuideService, MAX_PLAN_DAYS};
pub use translate::MyMemoryTranslator;
pub use tts::{split_text, tts_language, GoogleTts};

#[derive(Debug, Error)]
pub enum AiError {
    #[error("provider rate limit exceeded (429)")]
    RateLimited,

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Free-form text generation (chat answers, welcome speeches).
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>>;
}

/// Text to MP3 audio.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
        lang: &'a str,
    ) -> BoxFuture<'a, Result<Vec<u8>, AiError>>;
}

/// Text translation between two language codes.
pub trait Translator: Send + Sync {
    fn translate<'a>(
        &'a self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>>;
}

/// Map a non-success response to an error, keeping the body for the log.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 429 {
        return Err(AiError::RateLimited);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AiError::Status {
        status: status.as_u16(),
        body,
    })
}
