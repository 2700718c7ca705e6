use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Deck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct DeckWithCount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub language: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub flashcard_count: i64,
}

const DECK_WITH_COUNT: &str = r#"
    SELECT d.id, d.user_id, d.name, d.language, d.created_at, d.updated_at,
           (SELECT COUNT(*) FROM flashcards f WHERE f.deck_id = d.id) AS flashcard_count
    FROM decks d
"#;

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<DeckWithCount>> {
    sqlx::query_as::<_, DeckWithCount>(&format!(
        "{DECK_WITH_COUNT} WHERE d.user_id = $1 ORDER BY d.created_at ASC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn get(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Deck>> {
    sqlx::query_as::<_, Deck>(
        r#"
        SELECT id, user_id, name, language, created_at, updated_at
        FROM decks
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn get_with_count(db: &PgPool, id: Uuid) -> sqlx::Result<Option<DeckWithCount>> {
    sqlx::query_as::<_, DeckWithCount>(&format!("{DECK_WITH_COUNT} WHERE d.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(db: &PgPool, user_id: Uuid, name: &str, language: &str) -> sqlx::Result<Deck> {
    sqlx::query_as::<_, Deck>(
        r#"
        INSERT INTO decks (user_id, name, language)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, name, language, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(language)
    .fetch_one(db)
    .await
}

pub async fn rename(db: &PgPool, id: Uuid, name: &str) -> sqlx::Result<Option<Deck>> {
    sqlx::query_as::<_, Deck>(
        r#"
        UPDATE decks
        SET name = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, user_id, name, language, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM decks WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
