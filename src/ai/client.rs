use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One turn of a chat conversation, roles `user` or `assistant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Single-prompt completion, used by the example generator.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;

    /// Multi-turn chat under an app-supplied system prompt.
    async fn chat(&self, system: &str, messages: &[ChatMessage]) -> anyhow::Result<String>;
}

/// Client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("gemini returned {status}: {body}");
        }

        let body: GenerateResponse = resp.json().await.context("gemini response body")?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .context("gemini returned no candidates")?;

        Ok(text)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: prompt.into() }],
            }],
            system_instruction: None,
            generation_config: GenerationConfig::default(),
        };
        self.generate(&request).await
    }

    async fn chat(&self, system: &str, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let contents = messages
            .iter()
            .map(|m| Content {
                // Gemini's name for the assistant role is `model`.
                role: Some(if m.role == "assistant" { "model" } else { "user" }.into()),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system.into(),
                }],
            }),
            generation_config: GenerationConfig::default(),
        };
        self.generate(&request).await
    }
}

/// Stand-in used when no API key is configured; every call fails upstream.
pub struct UnconfiguredModel;

#[async_trait]
impl ChatModel for UnconfiguredModel {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("GEMINI_API_KEY is not configured")
    }

    async fn chat(&self, _system: &str, _messages: &[ChatMessage]) -> anyhow::Result<String> {
        anyhow::bail!("GEMINI_API_KEY is not configured")
    }
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_picks_first_candidate_text() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hello"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text = parsed.candidates[0].content.parts[0].text.clone();
        assert_eq!(text, "hello");
    }

    #[test]
    fn request_serializes_camel_case_fields() {
        let request = GenerateRequest {
            contents: vec![],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: "s".into() }],
            }),
            generation_config: GenerationConfig::default(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("systemInstruction"));
        assert!(json.contains("generationConfig"));
        assert!(json.contains("maxOutputTokens"));
    }

    #[tokio::test]
    async fn unconfigured_model_always_fails() {
        let err = UnconfiguredModel.complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
