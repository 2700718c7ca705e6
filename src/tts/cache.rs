use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::language::Language;
use crate::speech::SpeechClient;

/// On-disk cache of synthesized audio, keyed by text hash and language.
///
/// Filenames are `{md5(text)}_{LANG}.mp3` so arbitrary text never has to be
/// escaped into a path. Entries are immutable once written.
pub struct AudioCache {
    dir: PathBuf,
}

impl AudioCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating audio cache dir {}", self.dir.display()))
    }

    pub fn key(text: &str, language: Language) -> String {
        format!("{:x}_{}.mp3", md5::compute(text.as_bytes()), language.code())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Returns the cached audio for `text`, synthesizing and storing it on a
    /// miss. A failed cache write is logged and the audio still returned.
    pub async fn get_or_synthesize(
        &self,
        speech: &dyn SpeechClient,
        text: &str,
        language: Language,
    ) -> anyhow::Result<Bytes> {
        let key = Self::key(text, language);
        let path = self.path_for(&key);

        if let Some(audio) = read_existing(&path).await {
            debug!(%key, "audio cache hit");
            return Ok(audio);
        }

        let audio = speech.synthesize(text, language).await?;
        if let Err(err) = tokio::fs::write(&path, &audio).await {
            warn!(%key, error = %err, "failed to write audio cache entry");
        } else {
            debug!(%key, bytes = audio.len(), "audio cache fill");
        }
        Ok(audio)
    }
}

async fn read_existing(path: &Path) -> Option<Bytes> {
    match tokio::fs::read(path).await {
        Ok(data) if !data.is_empty() => Some(Bytes::from(data)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::async_trait;

    struct CountingSpeech(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl SpeechClient for CountingSpeech {
        async fn synthesize(&self, _text: &str, _language: Language) -> anyhow::Result<Bytes> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Bytes::from_static(b"mp3-bytes"))
        }
    }

    #[test]
    fn key_is_md5_hex_and_language_code() {
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(
            AudioCache::key("hello", Language::En),
            "5d41402abc4b2a76b9719d911017c592_EN.mp3"
        );
    }

    #[test]
    fn key_differs_per_language() {
        let en = AudioCache::key("안녕", Language::En);
        let ko = AudioCache::key("안녕", Language::Ko);
        assert_ne!(en, ko);
        assert!(ko.ends_with("_KO.mp3"));
    }

    #[tokio::test]
    async fn second_lookup_hits_the_cache() {
        let dir = std::env::temp_dir().join(format!("lexideck-tts-{}", uuid::Uuid::new_v4()));
        let cache = AudioCache::new(&dir);
        cache.ensure_dir().await.unwrap();

        let speech = CountingSpeech(std::sync::atomic::AtomicUsize::new(0));
        let first = cache
            .get_or_synthesize(&speech, "xin chào", Language::Ja)
            .await
            .unwrap();
        let second = cache
            .get_or_synthesize(&speech, "xin chào", Language::Ja)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(speech.0.load(std::sync::atomic::Ordering::SeqCst), 1);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
