use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    /// Days of inactivity after which an account is deleted.
    pub threshold_days: i64,
    /// Hour (UTC) at which the scheduled cleanup runs.
    pub hour_utc: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub audio_cache_dir: PathBuf,
    pub cleanup: CleanupConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let audio_cache_dir = std::env::var("AUDIO_CACHE_DIR")
            .unwrap_or_else(|_| "audio_cache".into())
            .into();
        let cleanup = CleanupConfig {
            threshold_days: std::env::var("CLEANUP_THRESHOLD_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
            hour_utc: std::env::var("CLEANUP_HOUR_UTC")
                .ok()
                .and_then(|v| v.parse::<u8>().ok())
                .filter(|h| *h < 24)
                .unwrap_or(3),
        };
        let llm = LlmConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
        };
        Ok(Self {
            database_url,
            audio_cache_dir,
            cleanup,
            llm,
        })
    }
}
