//! Speech synthesis through the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short inputs, so text is split into chunks of at
//! most [`MAX_CHUNK_CHARS`] characters at word boundaries and the returned MP3
//! frames are concatenated.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{check_status, AiError, SpeechSynthesizer};

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

pub const MAX_CHUNK_CHARS: usize = 100;

/// Languages with a dedicated voice. Anything else is read in English.
const VOICES: &[(&str, &str)] = &[
    ("en", "en"),
    ("tr", "tr"),
    ("ru", "ru"),
    ("de", "de"),
    ("fr", "fr"),
    ("uz", "uz"),
];

pub fn tts_language(lang: &str) -> &'static str {
    let lang = lang.trim().to_ascii_lowercase();
    VOICES
        .iter()
        .find(|(code, _)| *code == lang)
        .map(|(_, voice)| *voice)
        .unwrap_or("en")
}

/// Split text into chunks no longer than `max_chars` characters.
///
/// Words longer than the limit are cut at character boundaries.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub struct GoogleTts {
    client: Client,
}

impl GoogleTts {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64)")
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn synthesize_text(&self, text: &str, lang: &str) -> Result<Vec<u8>, AiError> {
        let tl = tts_language(lang);
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let url = Url::parse_with_params(
                TTS_ENDPOINT,
                &[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", tl),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("q", chunk.as_str()),
                ],
            )?;

            let response = check_status(self.client.get(url).send().await?).await?;
            let bytes = response.bytes().await?;
            audio.extend_from_slice(&bytes);
        }

        debug!("Synthesized {} chunks, {} bytes ({})", chunks.len(), audio.len(), tl);
        if audio.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(audio)
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
        lang: &'a str,
    ) -> BoxFuture<'a, Result<Vec<u8>, AiError>> {
        Box::pin(self.synthesize_text(text, lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_limit() {
        let text = "The Kalta Minor minaret was commissioned by Muhammad Amin Khan \
                    in 1851 and was meant to be the tallest in the Islamic world, \
                    but it was never finished.";
        let chunks = split_text(text, 40);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= 40, "chunk too long: {c:?}");
        }
        assert_eq!(chunks.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_split_long_word() {
        let word = "a".repeat(250);
        let chunks = split_text(&format!("hi {word} bye"), 100);
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], "hi");
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[3].len(), 50);
        assert_eq!(chunks[4], "bye");
    }

    #[test]
    fn test_split_empty() {
        assert!(split_text("   ", 100).is_empty());
    }

    #[test]
    fn test_split_counts_chars_not_bytes() {
        let text = "Хива это город-музей под открытым небом";
        for c in split_text(text, 10) {
            assert!(c.chars().count() <= 10);
        }
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(tts_language("TR"), "tr");
        assert_eq!(tts_language("ja"), "en");
    }
}
