use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::ai::client::ChatModel;
use crate::language::Language;

/// A generated example sentence using a studied word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub target: String,
    pub pronunciation: String,
    pub source: String,
    pub context: String,
}

/// One line of a generated two-person dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub target: String,
    pub pronunciation: String,
    pub source: String,
}

pub async fn generate_sentences(
    llm: &dyn ChatModel,
    word: &str,
    pronunciation: &str,
    meaning: &str,
    language: Language,
) -> anyhow::Result<Vec<ExampleSentence>> {
    let prompt = sentence_prompt(word, pronunciation, meaning, language);
    let raw = llm.complete(&prompt).await?;
    parse_sentences(&raw)
}

pub async fn generate_dialogue(
    llm: &dyn ChatModel,
    word: &str,
    pronunciation: &str,
    meaning: &str,
    language: Language,
) -> anyhow::Result<Vec<DialogueLine>> {
    let prompt = dialogue_prompt(word, pronunciation, meaning, language);
    let raw = llm.complete(&prompt).await?;
    parse_dialogue(&raw)
}

fn sentence_prompt(word: &str, pronunciation: &str, meaning: &str, language: Language) -> String {
    let name = language.display_name();
    format!(
        "You are a {name} teacher for Vietnamese learners.\n\
         Write exactly 3 natural {name} example sentences using the word \"{word}\" \
         (pronunciation: {pronunciation}, meaning: {meaning}).\n\
         The sentences must go from simple to complex: one beginner, one intermediate, \
         one advanced. Each sentence must contain the word itself, be at least 10 \
         characters long, and describe an everyday situation.\n\
         Respond with ONLY a JSON array, no markdown and no commentary. Each element:\n\
         {{\"target\": \"the {name} sentence\", \"pronunciation\": \"its romanization\", \
         \"source\": \"Vietnamese translation\", \"context\": \"one short Vietnamese note on \
         when to use it\"}}"
    )
}

fn dialogue_prompt(word: &str, pronunciation: &str, meaning: &str, language: Language) -> String {
    let name = language.display_name();
    format!(
        "You are a {name} teacher for Vietnamese learners.\n\
         Write a short natural {name} dialogue between two speakers, A and B, that uses \
         the word \"{word}\" (pronunciation: {pronunciation}, meaning: {meaning}) at least \
         twice. The dialogue has 4 to 5 exchanges set in an everyday situation.\n\
         Respond with ONLY a JSON array, no markdown and no commentary. Each element:\n\
         {{\"speaker\": \"A\" or \"B\", \"target\": \"the {name} line\", \
         \"pronunciation\": \"its romanization\", \"source\": \"Vietnamese translation\"}}"
    )
}

/// Models often wrap JSON in ``` fences despite instructions; strip them.
fn strip_markdown_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn parse_sentences(raw: &str) -> anyhow::Result<Vec<ExampleSentence>> {
    let mut sentences: Vec<ExampleSentence> =
        serde_json::from_str(strip_markdown_fences(raw)).context("model output is not a JSON array of sentences")?;

    if sentences.len() < 3 {
        anyhow::bail!("model returned {} sentences, expected 3", sentences.len());
    }
    sentences.truncate(3);

    for s in &sentences {
        if s.target.trim().chars().count() < 10 {
            anyhow::bail!("model returned a degenerate sentence: {:?}", s.target);
        }
    }
    Ok(sentences)
}

fn parse_dialogue(raw: &str) -> anyhow::Result<Vec<DialogueLine>> {
    let mut lines: Vec<DialogueLine> =
        serde_json::from_str(strip_markdown_fences(raw)).context("model output is not a JSON array of dialogue lines")?;

    if lines.len() < 4 {
        anyhow::bail!("model returned {} dialogue lines, expected 4-5", lines.len());
    }
    lines.truncate(5);

    for line in &lines {
        if line.target.trim().is_empty() || line.speaker.trim().is_empty() {
            anyhow::bail!("model returned an empty dialogue line");
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_with_language_tag_are_stripped() {
        let raw = "```json\n[{\"a\":1}]\n```";
        assert_eq!(strip_markdown_fences(raw), "[{\"a\":1}]");
    }

    #[test]
    fn bare_output_passes_through() {
        assert_eq!(strip_markdown_fences("  [1,2,3] "), "[1,2,3]");
    }

    #[test]
    fn parses_three_sentences_and_drops_extras() {
        let raw = r#"[
            {"target":"아침에 커피를 마셔요","pronunciation":"achime keopireul masyeoyo","source":"Tôi uống cà phê buổi sáng","context":"thói quen hằng ngày"},
            {"target":"커피 한 잔 주시겠어요?","pronunciation":"keopi han jan jusigesseoyo","source":"Cho tôi một ly cà phê được không?","context":"gọi món lịch sự"},
            {"target":"커피를 너무 많이 마시면 잠이 안 와요","pronunciation":"keopireul neomu mani masimyeon jami an wayo","source":"Uống nhiều cà phê quá thì mất ngủ","context":"lời khuyên"},
            {"target":"커피숍에서 만나요","pronunciation":"keopisyobeseo mannayo","source":"Gặp nhau ở quán cà phê","context":"hẹn gặp"}
        ]"#;
        let sentences = parse_sentences(raw).unwrap();
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].target.contains("커피"));
    }

    #[test]
    fn too_few_sentences_is_an_error() {
        let raw = r#"[{"target":"커피를 마셔요 지금","pronunciation":"p","source":"v","context":"c"}]"#;
        assert!(parse_sentences(raw).is_err());
    }

    #[test]
    fn short_sentence_is_rejected() {
        let raw = r#"[
            {"target":"커피","pronunciation":"p","source":"v","context":"c"},
            {"target":"커피","pronunciation":"p","source":"v","context":"c"},
            {"target":"커피","pronunciation":"p","source":"v","context":"c"}
        ]"#;
        assert!(parse_sentences(raw).is_err());
    }

    #[test]
    fn parses_dialogue_and_caps_at_five_lines() {
        let line = r#"{"speaker":"A","target":"안녕하세요","pronunciation":"annyeonghaseyo","source":"Xin chào"}"#;
        let raw = format!("[{}]", vec![line; 6].join(","));
        let lines = parse_dialogue(&raw).unwrap();
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn non_json_output_is_an_error() {
        assert!(parse_sentences("Sure! Here are three sentences:").is_err());
        assert!(parse_dialogue("I'm sorry, I can't do that.").is_err());
    }
}
