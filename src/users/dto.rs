use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::UserWithDecks;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub points: i32,
    pub theme: String,
    pub created_at: OffsetDateTime,
    pub last_activity_at: Option<OffsetDateTime>,
    pub days_until_deletion: i64,
    pub deck_count: i64,
}

impl UserResponse {
    pub fn from_row(row: UserWithDecks, days_until_deletion: i64) -> Self {
        Self {
            id: row.id,
            name: row.name,
            avatar: row.avatar,
            points: row.points,
            theme: row.theme,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            days_until_deletion,
            deck_count: row.deck_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityRefreshed {
    pub message: String,
    pub last_activity_at: Option<OffsetDateTime>,
    pub days_until_deletion: i64,
}
