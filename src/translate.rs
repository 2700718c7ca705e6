use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Context;
use axum::async_trait;
use serde_json::Value;

use crate::language::Language;

/// Source language of all card fronts and dictionary queries.
const SOURCE_LANG: &str = "vi";

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Memoized lookups stop accumulating past this many entries.
const MEMO_CAP: usize = 1000;

#[async_trait]
pub trait TranslationClient: Send + Sync {
    /// Translate `text` from the app's source language into `target`.
    async fn translate(&self, text: &str, target: Language) -> anyhow::Result<String>;

    /// Romanize `text`, which is written in `language`.
    async fn romanize(&self, text: &str, language: Language) -> anyhow::Result<String>;
}

/// Thin wrapper over the public Google translate endpoint.
///
/// Repeated lookups are memoized in-process; the map is keyed by
/// `(text, language pair)` and capped at [`MEMO_CAP`] entries, after which
/// new phrases are fetched without being remembered.
pub struct GoogleTranslate {
    http: reqwest::Client,
    endpoint: String,
    cache: Mutex<HashMap<(String, String), String>>,
}

impl GoogleTranslate {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &(String, String)) -> Option<String> {
        self.cache.lock().ok().and_then(|c| c.get(key).cloned())
    }

    fn remember(&self, key: (String, String), value: String) {
        if let Ok(mut c) = self.cache.lock() {
            if c.len() >= MEMO_CAP && !c.contains_key(&key) {
                return;
            }
            c.insert(key, value);
        }
    }

    async fn fetch(&self, sl: &str, tl: &str, dt: &str, q: &str) -> anyhow::Result<Value> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", sl),
                ("tl", tl),
                ("dt", dt),
                ("q", q),
            ])
            .send()
            .await
            .context("translate request")?;

        if !resp.status().is_success() {
            anyhow::bail!("translate endpoint returned {}", resp.status());
        }

        resp.json::<Value>().await.context("translate response body")
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationClient for GoogleTranslate {
    async fn translate(&self, text: &str, target: Language) -> anyhow::Result<String> {
        let key = (text.to_string(), target.bcp47().to_string());
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let body = self.fetch(SOURCE_LANG, target.bcp47(), "t", text).await?;
        let translated = collect_segments(&body, 0);
        anyhow::ensure!(!translated.is_empty(), "empty translation for {:?}", text);

        self.remember(key, translated.clone());
        Ok(translated)
    }

    async fn romanize(&self, text: &str, language: Language) -> anyhow::Result<String> {
        // English needs no romanization; mirror the input.
        if language == Language::En {
            return Ok(text.to_string());
        }

        let key = (text.to_string(), format!("rm:{}", language.bcp47()));
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let body = self
            .fetch(language.bcp47(), language.bcp47(), "rm", text)
            .await?;
        let mut romanized = collect_segments(&body, 3);
        if romanized.is_empty() {
            romanized = collect_segments(&body, 2);
        }
        // The endpoint occasionally returns no transliteration segment at
        // all; fall back to the input rather than erroring.
        if romanized.is_empty() {
            romanized = text.to_string();
        }

        self.remember(key, romanized.clone());
        Ok(romanized)
    }
}

/// Romanization is best effort; on collaborator failure the caller gets the
/// input text back instead of an error.
pub async fn romanize_or_fallback(
    translator: &dyn TranslationClient,
    text: &str,
    language: Language,
) -> String {
    match translator.romanize(text, language).await {
        Ok(pronunciation) => pronunciation,
        Err(e) => {
            tracing::warn!(error = %e, %text, "romanization failed, falling back to input text");
            text.to_string()
        }
    }
}

/// Concatenate the string at `index` from each segment of `body[0]`.
///
/// The gtx payload is a nested array: `body[0]` holds one segment per chunk
/// of the input, where position 0 is the translated text and positions 2/3
/// carry transliterations when `dt=rm` was requested.
fn collect_segments(body: &Value, index: usize) -> String {
    let Some(segments) = body.get(0).and_then(Value::as_array) else {
        return String::new();
    };
    segments
        .iter()
        .filter_map(|seg| seg.get(index).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_translation_segments() {
        let body = json!([[["Hello ", "Xin chào ", null], ["world", "thế giới", null]], null, "vi"]);
        assert_eq!(collect_segments(&body, 0), "Hello world");
    }

    #[test]
    fn collects_transliteration_segments() {
        let body = json!([[[null, null, "nǐ hǎo", "nǐ hǎo"]], null, "zh-CN"]);
        assert_eq!(collect_segments(&body, 3), "nǐ hǎo");
    }

    #[test]
    fn missing_segments_yield_empty() {
        assert_eq!(collect_segments(&json!({}), 0), "");
        assert_eq!(collect_segments(&json!([null]), 0), "");
    }

    #[test]
    fn memo_stops_growing_at_the_cap() {
        let client = GoogleTranslate::new();
        for i in 0..MEMO_CAP + 10 {
            client.remember((format!("từ {i}"), "en".into()), "word".into());
        }
        assert_eq!(client.cache.lock().unwrap().len(), MEMO_CAP);

        let newcomer = ("chưa thấy".to_string(), "en".to_string());
        client.remember(newcomer.clone(), "unseen".into());
        assert_eq!(client.cached(&newcomer), None);
    }

    #[test]
    fn full_memo_still_refreshes_existing_entries() {
        let client = GoogleTranslate::new();
        for i in 0..MEMO_CAP {
            client.remember((format!("từ {i}"), "en".into()), "word".into());
        }
        let key = ("từ 0".to_string(), "en".to_string());
        client.remember(key.clone(), "updated".into());
        assert_eq!(client.cached(&key).as_deref(), Some("updated"));
    }
}
