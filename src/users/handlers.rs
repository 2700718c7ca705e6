use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::activity::days_until_deletion;
use super::dto::{ActivityRefreshed, CreateUserRequest, UpdateUserRequest, UserResponse};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/refresh-activity", post(refresh_activity))
}

#[instrument(skip(state))]
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let now = OffsetDateTime::now_utc();
    let threshold = state.config.cleanup.threshold_days;

    let users = repo::list_all(&state.db).await?;
    let items = users
        .into_iter()
        .map(|u| {
            let days = days_until_deletion(u.last_activity_at, now, threshold);
            UserResponse::from_row(u, days)
        })
        .collect();
    Ok(Json(items))
}

/// Reading a profile counts as activity and restarts the countdown.
#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    repo::touch_activity(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;

    let user = repo::get_with_decks(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;

    let days = days_until_deletion(
        user.last_activity_at,
        OffsetDateTime::now_utc(),
        state.config.cleanup.threshold_days,
    );
    Ok(Json(UserResponse::from_row(user, days)))
}

#[instrument(skip(state, body))]
async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }

    let user = repo::create(&state.db, name, body.avatar.as_deref()).await?;
    let days = days_until_deletion(
        user.last_activity_at,
        OffsetDateTime::now_utc(),
        state.config.cleanup.threshold_days,
    );
    let response = UserResponse {
        id: user.id,
        name: user.name,
        avatar: user.avatar,
        points: user.points,
        theme: user.theme,
        created_at: user.created_at,
        last_activity_at: user.last_activity_at,
        days_until_deletion: days,
        deck_count: 0,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, body))]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
    }

    repo::update(
        &state.db,
        id,
        body.name.as_deref().map(str::trim),
        body.avatar.as_deref(),
        body.theme.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound { entity: "User" })?;

    let user = repo::get_with_decks(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;
    let days = days_until_deletion(
        user.last_activity_at,
        OffsetDateTime::now_utc(),
        state.config.cleanup.threshold_days,
    );
    Ok(Json(UserResponse::from_row(user, days)))
}

#[instrument(skip(state))]
async fn delete_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound { entity: "User" });
    }
    Ok(Json(
        json!({ "message": "User and all associated data deleted successfully" }),
    ))
}

#[instrument(skip(state))]
async fn refresh_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ActivityRefreshed>> {
    let user = repo::touch_activity(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;

    let days = days_until_deletion(
        user.last_activity_at,
        OffsetDateTime::now_utc(),
        state.config.cleanup.threshold_days,
    );
    Ok(Json(ActivityRefreshed {
        message: "Activity refreshed".into(),
        last_activity_at: user.last_activity_at,
        days_until_deletion: days,
    }))
}
