//! Example sentence generation.
//!
//! A few common words have hand-written sentences. Everything else goes to the
//! Gemini `generateContent` API.

use async_trait::async_trait;
use lexicard_core::try_language_code;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Returned whenever a sentence could not be produced.
pub const GENERATION_FAILED: &str =
    "Error generating sentence. Please try again or enter your own example.";

/// (word, language code, sentence)
const PHRASEBOOK: &[(&str, &str, &str)] = &[
    ("spać", "en", "I want to sleep."),
    ("spać", "es", "Quiero dormir."),
    ("spać", "de", "Ich möchte schlafen."),
    ("spać", "fr", "Je veux dormir."),
    ("spać", "it", "Voglio dormire."),
    ("spać", "pl", "Chcę spać."),
    ("jeść", "en", "I want to eat."),
    ("jeść", "es", "Quiero comer."),
    ("jeść", "de", "Ich möchte essen."),
    ("jeść", "fr", "Je veux manger."),
];

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("GEMINI_API_KEY is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("empty response")]
    Empty,
}

/// Produces an example sentence for a word.
#[async_trait]
pub trait SentenceGenerator: Send + Sync {
    /// A sentence ending in `.`, `!` or `?`, or [`GENERATION_FAILED`].
    async fn generate_example(&self, word: &str, language: &str) -> String;
}

/// Hand-written sentence for `word` in `language`, if there is one.
/// Languages without a known code never match.
pub fn phrasebook_sentence(word: &str, language: &str) -> Option<&'static str> {
    let word = word.trim().to_lowercase();
    let code = try_language_code(language)?;
    PHRASEBOOK
        .iter()
        .find(|(w, c, _)| *w == word && *c == code)
        .map(|(_, _, sentence)| *sentence)
}

/// Trim and make sure the sentence ends with terminal punctuation.
pub fn finish_sentence(text: &str) -> String {
    let mut sentence = text.trim().to_string();
    if !sentence.ends_with(['.', '!', '?']) {
        sentence.push('.');
    }
    sentence
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

pub struct GeminiSentenceGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiSentenceGenerator {
    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint: config.gemini_endpoint.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    async fn request(&self, word: &str, language: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerateError::NotConfigured)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let prompt = format!(
            "Create a short, natural sentence in {language} using the meaning of the word '{word}'. \
             The sentence should be easy to understand and suitable for language learners."
        );
        let payload = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::HttpStatus { status, body });
        }

        let body: GenerateResponse = response.json().await?;
        body.first_text()
            .map(str::to_string)
            .ok_or(GenerateError::Empty)
    }
}

#[async_trait]
impl SentenceGenerator for GeminiSentenceGenerator {
    async fn generate_example(&self, word: &str, language: &str) -> String {
        if let Some(sentence) = phrasebook_sentence(word, language) {
            return sentence.to_string();
        }

        match self.request(word, language).await {
            Ok(text) => finish_sentence(&text),
            Err(e) => {
                tracing::warn!(word, language, error = %e, "example sentence generation failed");
                GENERATION_FAILED.to_string()
            }
        }
    }
}
