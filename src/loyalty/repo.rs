use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo::User;

/// Debits `cost` and sets the avatar in one statement. `None` means the
/// balance check failed (or the user vanished); nothing was written.
pub async fn redeem_avatar(
    db: &PgPool,
    user_id: Uuid,
    avatar: &str,
    cost: i32,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET points = points - $3, avatar = $2
        WHERE id = $1 AND points >= $3
        RETURNING id, name, avatar, points, theme, created_at, last_activity_at
        "#,
    )
    .bind(user_id)
    .bind(avatar)
    .bind(cost)
    .fetch_optional(db)
    .await
}

/// Same contract as [`redeem_avatar`], for the theme column.
pub async fn redeem_theme(
    db: &PgPool,
    user_id: Uuid,
    theme: &str,
    cost: i32,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET points = points - $3, theme = $2
        WHERE id = $1 AND points >= $3
        RETURNING id, name, avatar, points, theme, created_at, last_activity_at
        "#,
    )
    .bind(user_id)
    .bind(theme)
    .bind(cost)
    .fetch_optional(db)
    .await
}
