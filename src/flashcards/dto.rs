use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::flashcards::repo::Flashcard;

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub deck_id: Uuid,
    pub source_text: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    pub target_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub source_text: String,
    pub pronunciation: String,
    pub target_text: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub deck_id: Uuid,
    pub flashcards: Vec<BulkCard>,
}

#[derive(Debug, Deserialize)]
pub struct BulkCard {
    pub source_text: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    pub target_text: String,
}

#[derive(Debug, Serialize)]
pub struct FlashcardResponse {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub source_text: String,
    pub pronunciation: String,
    pub target_text: String,
    pub created_at: OffsetDateTime,
}

impl From<Flashcard> for FlashcardResponse {
    fn from(f: Flashcard) -> Self {
        Self {
            id: f.id,
            deck_id: f.deck_id,
            source_text: f.source_text,
            pronunciation: f.pronunciation,
            target_text: f.target_text,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub message: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExamplesQuery {
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "sentence".into()
}

#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub flashcard_id: Uuid,
    pub kind: String,
    pub examples: Value,
}
