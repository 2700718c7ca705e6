use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub source_text: String,
    pub pronunciation: String,
    pub target_text: String,
    pub created_at: OffsetDateTime,
}

/// Card fields for inserts, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub source_text: String,
    pub pronunciation: String,
    pub target_text: String,
}

pub async fn list_by_deck(db: &PgPool, deck_id: Uuid) -> sqlx::Result<Vec<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(
        r#"
        SELECT id, deck_id, source_text, pronunciation, target_text, created_at
        FROM flashcards
        WHERE deck_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(deck_id)
    .fetch_all(db)
    .await
}

pub async fn get(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(
        r#"
        SELECT id, deck_id, source_text, pronunciation, target_text, created_at
        FROM flashcards
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, deck_id: Uuid, card: &NewCard) -> sqlx::Result<Flashcard> {
    sqlx::query_as::<_, Flashcard>(
        r#"
        INSERT INTO flashcards (deck_id, source_text, pronunciation, target_text)
        VALUES ($1, $2, $3, $4)
        RETURNING id, deck_id, source_text, pronunciation, target_text, created_at
        "#,
    )
    .bind(deck_id)
    .bind(&card.source_text)
    .bind(&card.pronunciation)
    .bind(&card.target_text)
    .fetch_one(db)
    .await
}

/// Inserts all cards in one transaction; either every card lands or none do.
pub async fn create_bulk(db: &PgPool, deck_id: Uuid, cards: &[NewCard]) -> sqlx::Result<u64> {
    let mut tx = db.begin().await?;
    for card in cards {
        sqlx::query(
            r#"
            INSERT INTO flashcards (deck_id, source_text, pronunciation, target_text)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(deck_id)
        .bind(&card.source_text)
        .bind(&card.pronunciation)
        .bind(&card.target_text)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(cards.len() as u64)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    source_text: &str,
    pronunciation: &str,
    target_text: &str,
) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(
        r#"
        UPDATE flashcards
        SET source_text = $2, pronunciation = $3, target_text = $4
        WHERE id = $1
        RETURNING id, deck_id, source_text, pronunciation, target_text, created_at
        "#,
    )
    .bind(id)
    .bind(source_text)
    .bind(pronunciation)
    .bind(target_text)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM flashcards WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
