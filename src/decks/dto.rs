use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::decks::repo::DeckWithCount;

#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    pub user_id: Uuid,
    pub name: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeckRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub flashcard_count: i64,
}

impl From<DeckWithCount> for DeckResponse {
    fn from(d: DeckWithCount) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            name: d.name,
            language: d.language,
            created_at: d.created_at,
            updated_at: d.updated_at,
            flashcard_count: d.flashcard_count,
        }
    }
}
