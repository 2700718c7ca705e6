use serde::{Deserialize, Serialize};

/// Target languages supported by decks and the translation/TTS collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    En,
    Zh,
    Ko,
    Ja,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Zh, Language::Ko, Language::Ja];

    /// Parse the wire/database form (`EN`, `ZH`, `KO`, `JA`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EN" => Some(Language::En),
            "ZH" => Some(Language::Zh),
            "KO" => Some(Language::Ko),
            "JA" => Some(Language::Ja),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Zh => "ZH",
            Language::Ko => "KO",
            Language::Ja => "JA",
        }
    }

    /// BCP-47-ish code understood by the Google translate/TTS endpoints.
    pub fn bcp47(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh-CN",
            Language::Ko => "ko",
            Language::Ja => "ja",
        }
    }

    /// English display name, used when building LLM prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Chinese",
            Language::Ko => "Korean",
            Language::Ja => "Japanese",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase_codes() {
        assert_eq!(Language::from_code("FR"), None);
        assert_eq!(Language::from_code("en"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn serde_wire_form_is_uppercase() {
        assert_eq!(serde_json::to_string(&Language::Zh).unwrap(), "\"ZH\"");
        let parsed: Language = serde_json::from_str("\"JA\"").unwrap();
        assert_eq!(parsed, Language::Ja);
    }
}
