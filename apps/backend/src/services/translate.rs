//! Word translation through the public Google Translate endpoint.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("unexpected response shape")]
    Malformed,
}

/// Translates text into a target language code.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translated text, or `text` unchanged when translation fails.
    async fn translate(&self, text: &str, target_code: &str) -> String;
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.translate_endpoint.clone())
    }

    async fn request(&self, text: &str, target_code: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::HttpStatus(status));
        }

        let body: Value = response.json().await?;
        parse_translation(&body).ok_or(TranslateError::Malformed)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> String {
        match self.request(text, target_code).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(text, target_code, error = %e, "translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}

/// Join the translated segments of a `gtx` response:
/// `[[["translated", "original", ...], ...], ...]`.
fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        None
    } else {
        Some(translated.to_string())
    }
}
