use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

use crate::language::Language;

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Synthesize `text` spoken in `language`, returning mp3 bytes.
    async fn synthesize(&self, text: &str, language: Language) -> anyhow::Result<Bytes>;
}

/// Text-to-speech via the public Google translate TTS endpoint.
pub struct GoogleSpeech {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleSpeech {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for GoogleSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechClient for GoogleSpeech {
    async fn synthesize(&self, text: &str, language: Language) -> anyhow::Result<Bytes> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.bcp47()),
                ("q", text),
            ])
            .send()
            .await
            .context("tts request")?;

        if !resp.status().is_success() {
            anyhow::bail!("tts endpoint returned {}", resp.status());
        }

        let audio = resp.bytes().await.context("tts response body")?;
        anyhow::ensure!(!audio.is_empty(), "tts endpoint returned no audio");
        Ok(audio)
    }
}
