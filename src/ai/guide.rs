//! The tour guide persona built on top of the AI capabilities.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, warn};

use super::fallback::{
    clean_speech, landmark_welcome, BUSY_REPLY, MISSING_KEY_REPLY, OFFLINE_REPLY,
};
use super::{
    AiError, GeminiClient, GoogleTts, MyMemoryTranslator, SpeechSynthesizer, TextGenerator,
    Translator,
};
use crate::models::{PlanRequest, PlanResponse};

/// Longest trip a plan covers
pub const MAX_PLAN_DAYS: u32 = 30;

/// Chat, welcome speeches, narration, translation and trip plans.
///
/// Every text operation degrades to canned content instead of failing;
/// only narration reports errors to the caller.
#[derive(Clone)]
pub struct GuideService {
    generator: Option<Arc<dyn TextGenerator>>,
    speech: Arc<dyn SpeechSynthesizer>,
    translator: Arc<dyn Translator>,
}

impl GuideService {
    /// `generator` is `None` when no language model key is configured.
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        speech: Arc<dyn SpeechSynthesizer>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            generator,
            speech,
            translator,
        }
    }

    /// Production wiring: Gemini (when a key is set), Google TTS and MyMemory.
    pub fn with_default_providers(
        gemini_api_key: Option<&str>,
        gemini_model: &str,
    ) -> anyhow::Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(key, gemini_model)?)),
            None => {
                warn!("GEMINI_API_KEY not set; chat and welcome speeches use built-in text");
                None
            }
        };

        Ok(Self::new(
            generator,
            Arc::new(GoogleTts::new()?),
            Arc::new(MyMemoryTranslator::new()?),
        ))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn chat(&self, query: &str, context: &str, lang: &str) -> String {
        let Some(ref generator) = self.generator else {
            return MISSING_KEY_REPLY.to_string();
        };

        let prompt = format!(
            "You are a knowledgeable and friendly historical tour guide in Ichan Kala, Khiva, \
             going by the name 'Hiva Guide'. The visitor is at or asking about: '{context}'. \
             Answer briefly and naturally in the language '{lang}', in under 3 sentences unless \
             they ask for more detail. If the question has nothing to do with Khiva or its \
             history, gently steer the conversation back.\nUser: {query}"
        );

        match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(AiError::RateLimited) => {
                warn!("Chat generation rate limited");
                BUSY_REPLY.to_string()
            }
            Err(e) => {
                error!("Chat generation failed: {}", e);
                OFFLINE_REPLY.to_string()
            }
        }
    }

    /// Short opening speech for a visitor who just arrived at `place_name`.
    pub async fn welcome(&self, place_name: &str, lang: &str) -> String {
        let Some(ref generator) = self.generator else {
            return format!("Welcome to {}.", place_name);
        };

        let prompt = format!(
            "Act as an enthusiastic tour guide in Khiva named 'Hiva Guide'. The visitor has just \
             arrived at '{place_name}'. Give a warm, engaging opening of at most 2 sentences \
             introducing this building; mention that it is one of the most popular places if that \
             fits. Do not give a full history lesson yet, just a hook. Reply in PLAIN TEXT only, \
             without Markdown, HTML tags or quotes. Language: {lang}."
        );

        match generator.generate(&prompt).await {
            Ok(text) => {
                let cleaned = clean_speech(&text);
                if cleaned.is_empty() {
                    landmark_welcome(place_name)
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!("Welcome generation for '{}' failed: {}", place_name, e);
                landmark_welcome(place_name)
            }
        }
    }

    /// Translate `text`, tagging it with the target language on failure.
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        match self.translator.translate(text, source_lang, target_lang).await {
            Ok(translated) if !translated.is_empty() => translated,
            Ok(_) => format!("[{}] {}", target_lang, text),
            Err(e) => {
                warn!("Translation {}->{} failed: {}", source_lang, target_lang, e);
                format!("[{}] {}", target_lang, text)
            }
        }
    }

    /// MP3 narration of `text`.
    pub async fn narrate(&self, text: &str, lang: &str) -> Result<Vec<u8>, AiError> {
        self.speech.synthesize(text, lang).await.map_err(|e| {
            error!("Audio generation failed: {}", e);
            e
        })
    }

    /// Day-by-day itinerary, capped at [`MAX_PLAN_DAYS`].
    pub fn plan(&self, request: &PlanRequest) -> PlanResponse {
        let day_count = request.days.min(MAX_PLAN_DAYS);
        let days: Vec<_> = (1..=day_count)
            .map(|day| {
                json!({
                    "day": day,
                    "morning": "Visit Ichan Kala basic gates",
                    "lunch": "Lunch at Terrassa Cafe",
                    "afternoon": "Kunta Ark and Museums",
                    "dinner": "Dinner at local Tea House",
                })
            })
            .collect();

        PlanResponse {
            itinerary: json!({
                "title": format!("My {}-Day Khiva Trip", day_count),
                "days": days,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        RateLimited,
        Broken,
    }

    struct StubGenerator {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextGenerator for StubGenerator {
        fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let result = match self.reply {
                Reply::Text(t) => Ok(t.to_string()),
                Reply::RateLimited => Err(AiError::RateLimited),
                Reply::Broken => Err(AiError::EmptyResponse),
            };
            Box::pin(async move { result })
        }
    }

    struct StubSpeech(bool);

    impl SpeechSynthesizer for StubSpeech {
        fn synthesize<'a>(
            &'a self,
            text: &'a str,
            _lang: &'a str,
        ) -> BoxFuture<'a, Result<Vec<u8>, AiError>> {
            let result = if self.0 {
                Ok(text.as_bytes().to_vec())
            } else {
                Err(AiError::EmptyResponse)
            };
            Box::pin(async move { result })
        }
    }

    struct StubTranslator(Option<&'static str>);

    impl Translator for StubTranslator {
        fn translate<'a>(
            &'a self,
            _text: &'a str,
            _source_lang: &'a str,
            _target_lang: &'a str,
        ) -> BoxFuture<'a, Result<String, AiError>> {
            let result = self.0.map(str::to_string).ok_or(AiError::EmptyResponse);
            Box::pin(async move { result })
        }
    }

    fn guide(generator: Option<Arc<dyn TextGenerator>>) -> GuideService {
        GuideService::new(
            generator,
            Arc::new(StubSpeech(true)),
            Arc::new(StubTranslator(Some("Merhaba"))),
        )
    }

    #[tokio::test]
    async fn test_chat_without_key() {
        let g = guide(None);
        assert_eq!(
            g.chat("Who built this?", "Juma Mosque", "en").await,
            "Error: Gemini API Key not configured."
        );
    }

    #[tokio::test]
    async fn test_chat_passes_context_and_query() {
        let stub = StubGenerator::new(Reply::Text("It was built in the 10th century."));
        let g = guide(Some(stub.clone()));
        let answer = g.chat("Who built this?", "Juma Mosque", "tr").await;
        assert_eq!(answer, "It was built in the 10th century.");

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("'Juma Mosque'"));
        assert!(prompts[0].contains("'tr'"));
        assert!(prompts[0].ends_with("User: Who built this?"));
    }

    #[tokio::test]
    async fn test_chat_rate_limited() {
        let g = guide(Some(StubGenerator::new(Reply::RateLimited)));
        assert_eq!(g.chat("q", "c", "en").await, BUSY_REPLY);
    }

    #[tokio::test]
    async fn test_chat_other_failure() {
        let g = guide(Some(StubGenerator::new(Reply::Broken)));
        assert_eq!(g.chat("q", "c", "en").await, OFFLINE_REPLY);
    }

    #[tokio::test]
    async fn test_welcome_without_key() {
        assert_eq!(
            guide(None).welcome("Kunta Ark Citadel", "en").await,
            "Welcome to Kunta Ark Citadel."
        );
    }

    #[tokio::test]
    async fn test_welcome_is_cleaned() {
        let stub = StubGenerator::new(Reply::Text("> **Salaam!** Welcome to Khiva.\n"));
        let g = guide(Some(stub));
        assert_eq!(g.welcome("Kunta Ark Citadel", "en").await, "Salaam! Welcome to Khiva.");
    }

    #[tokio::test]
    async fn test_welcome_falls_back_to_landmark_text() {
        let g = guide(Some(StubGenerator::new(Reply::Broken)));
        let text = g.welcome("Islam Khoja Minaret", "en").await;
        assert!(text.contains("57 meters"));

        let text = g.welcome("Somewhere New", "en").await;
        assert!(text.starts_with("Welcome to Somewhere New. This is one of"));
    }

    #[tokio::test]
    async fn test_translate_fallback_tags_language() {
        let g = GuideService::new(
            None,
            Arc::new(StubSpeech(true)),
            Arc::new(StubTranslator(None)),
        );
        assert_eq!(g.translate("Hello", "en", "tr").await, "[tr] Hello");
        assert_eq!(guide(None).translate("Hello", "en", "tr").await, "Merhaba");
    }

    #[tokio::test]
    async fn test_narrate_propagates_failure() {
        let g = GuideService::new(
            None,
            Arc::new(StubSpeech(false)),
            Arc::new(StubTranslator(None)),
        );
        assert!(g.narrate("text", "en").await.is_err());
        assert_eq!(guide(None).narrate("abc", "en").await.unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_plan_has_one_entry_per_day() {
        let plan = guide(None).plan(&PlanRequest {
            days: 3,
            interests: vec!["architecture".into()],
            walking_ability: "high".into(),
            budget: "medium".into(),
        });
        assert_eq!(plan.itinerary["title"], "My 3-Day Khiva Trip");
        let days = plan.itinerary["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2]["day"], 3);
        assert_eq!(days[0]["lunch"], "Lunch at Terrassa Cafe");
    }

    #[test]
    fn test_plan_is_capped() {
        let plan = guide(None).plan(&PlanRequest {
            days: u32::MAX,
            interests: vec![],
            walking_ability: "low".into(),
            budget: "low".into(),
        });
        assert_eq!(plan.itinerary["title"], "My 30-Day Khiva Trip");
        assert_eq!(plan.itinerary["days"].as_array().unwrap().len(), MAX_PLAN_DAYS as usize);
    }
}
