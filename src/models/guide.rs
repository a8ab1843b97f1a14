//! Request/response shapes for chat, narration, translation and trip plans.

use serde::{Deserialize, Serialize};

fn default_context() -> String {
    "General Ichan Kala".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// Place or topic the visitor is currently looking at
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default = "default_true")]
    pub audio_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    #[serde(default = "default_lang")]
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub original: String,
    pub translated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioResponse {
    pub audio_base64: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    pub walking_ability: String,
    pub budget: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Free-form itinerary document
    pub itinerary: serde_json::Value,
}
