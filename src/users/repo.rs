use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub points: i32,
    pub theme: String,
    pub created_at: OffsetDateTime,
    pub last_activity_at: Option<OffsetDateTime>,
}

/// User row joined with its deck count, for listing endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithDecks {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub points: i32,
    pub theme: String,
    pub created_at: OffsetDateTime,
    pub last_activity_at: Option<OffsetDateTime>,
    pub deck_count: i64,
}

const USER_WITH_DECKS: &str = r#"
    SELECT u.id, u.name, u.avatar, u.points, u.theme, u.created_at, u.last_activity_at,
           (SELECT COUNT(*) FROM decks d WHERE d.user_id = u.id) AS deck_count
    FROM users u
"#;

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<UserWithDecks>> {
    sqlx::query_as::<_, UserWithDecks>(&format!("{USER_WITH_DECKS} ORDER BY u.created_at ASC"))
        .fetch_all(db)
        .await
}

pub async fn get(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, avatar, points, theme, created_at, last_activity_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn get_with_decks(db: &PgPool, id: Uuid) -> sqlx::Result<Option<UserWithDecks>> {
    sqlx::query_as::<_, UserWithDecks>(&format!("{USER_WITH_DECKS} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(db: &PgPool, name: &str, avatar: Option<&str>) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, avatar, last_activity_at)
        VALUES ($1, COALESCE($2, 'default'), now())
        RETURNING id, name, avatar, points, theme, created_at, last_activity_at
        "#,
    )
    .bind(name)
    .bind(avatar)
    .fetch_one(db)
    .await
}

/// Partial update; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    avatar: Option<&str>,
    theme: Option<&str>,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            avatar = COALESCE($3, avatar),
            theme = COALESCE($4, theme)
        WHERE id = $1
        RETURNING id, name, avatar, points, theme, created_at, last_activity_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(avatar)
    .bind(theme)
    .fetch_optional(db)
    .await
}

/// Removes the user; decks and flashcards cascade at the schema level.
pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Stamps `last_activity_at`, restarting the retention countdown.
pub async fn touch_activity(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET last_activity_at = now()
        WHERE id = $1
        RETURNING id, name, avatar, points, theme, created_at, last_activity_at
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}
