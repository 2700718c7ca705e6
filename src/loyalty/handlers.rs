use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::users;

use super::dto::{
    CustomAvatarRequest, CustomThemeRequest, LoyaltyState, RedeemAvatarRequest,
    RedeemThemeRequest,
};
use super::repo;
use super::rules;
use super::theme::encode_custom_theme;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loyalty/users/:user_id", get(get_loyalty))
        .route("/loyalty/redeem/avatar", post(redeem_avatar))
        .route("/loyalty/redeem/theme", post(redeem_theme))
        .route("/loyalty/redeem/custom-theme", post(redeem_custom_theme))
        .route("/loyalty/redeem/custom-avatar", post(redeem_custom_avatar))
}

#[instrument(skip(state))]
async fn get_loyalty(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<LoyaltyState>> {
    let user = users::repo::get(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;
    Ok(Json(LoyaltyState::new(user, &state.catalog)))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id, avatar = %body.avatar))]
async fn redeem_avatar(
    State(state): State<AppState>,
    Json(body): Json<RedeemAvatarRequest>,
) -> ApiResult<Json<LoyaltyState>> {
    let balance = current_balance(&state.db, body.user_id).await?;
    let cost = rules::decide_catalog_redemption(
        state.catalog.avatar_cost(&body.avatar),
        "avatar",
        &body.avatar,
        balance,
    )?;

    let user = match repo::redeem_avatar(&state.db, body.user_id, &body.avatar, cost).await? {
        Some(user) => user,
        None => return Err(balance_error(&state.db, body.user_id, cost).await),
    };
    Ok(Json(LoyaltyState::new(user, &state.catalog)))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id, theme = %body.theme))]
async fn redeem_theme(
    State(state): State<AppState>,
    Json(body): Json<RedeemThemeRequest>,
) -> ApiResult<Json<LoyaltyState>> {
    let balance = current_balance(&state.db, body.user_id).await?;
    let cost = rules::decide_catalog_redemption(
        state.catalog.theme_cost(&body.theme),
        "theme",
        &body.theme,
        balance,
    )?;

    let user = match repo::redeem_theme(&state.db, body.user_id, &body.theme, cost).await? {
        Some(user) => user,
        None => return Err(balance_error(&state.db, body.user_id, cost).await),
    };
    Ok(Json(LoyaltyState::new(user, &state.catalog)))
}

#[instrument(skip(state, body), fields(user_id = %body.user_id))]
async fn redeem_custom_theme(
    State(state): State<AppState>,
    Json(body): Json<CustomThemeRequest>,
) -> ApiResult<Json<LoyaltyState>> {
    let cost = rules::custom_cost(body.cost, state.catalog.custom_theme_cost())?;
    let encoded = encode_custom_theme(&body.from_color, &body.via_color, &body.to_color);

    let balance = current_balance(&state.db, body.user_id).await?;
    rules::check_balance(balance, cost)?;
    let user = match repo::redeem_theme(&state.db, body.user_id, &encoded, cost).await? {
        Some(user) => user,
        None => return Err(balance_error(&state.db, body.user_id, cost).await),
    };
    Ok(Json(LoyaltyState::new(user, &state.catalog)))
}

/// Custom avatars store the submitted glyph directly, bypassing the catalog.
#[instrument(skip(state, body), fields(user_id = %body.user_id))]
async fn redeem_custom_avatar(
    State(state): State<AppState>,
    Json(body): Json<CustomAvatarRequest>,
) -> ApiResult<Json<LoyaltyState>> {
    let glyph = body.glyph.trim();
    if glyph.is_empty() {
        return Err(ApiError::Validation("glyph must not be empty".into()));
    }
    let cost = rules::custom_cost(body.cost, state.catalog.custom_avatar_cost())?;

    let balance = current_balance(&state.db, body.user_id).await?;
    rules::check_balance(balance, cost)?;
    let user = match repo::redeem_avatar(&state.db, body.user_id, glyph, cost).await? {
        Some(user) => user,
        None => return Err(balance_error(&state.db, body.user_id, cost).await),
    };
    Ok(Json(LoyaltyState::new(user, &state.catalog)))
}

/// Loads the balance for the decision checks in [`rules`]; rejecting before
/// the debit lets the common failure carry the real balance. The conditional
/// UPDATE remains the actual guard under concurrency.
async fn current_balance(db: &PgPool, user_id: Uuid) -> Result<i32, ApiError> {
    let user = users::repo::get(db, user_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;
    Ok(user.points)
}

/// Builds the error for a debit that matched no row: the balance was drained
/// between precheck and update, or the user was deleted concurrently.
async fn balance_error(db: &PgPool, user_id: Uuid, cost: i32) -> ApiError {
    match users::repo::get(db, user_id).await {
        Ok(Some(user)) => ApiError::InsufficientPoints {
            balance: user.points,
            cost,
        },
        Ok(None) => ApiError::NotFound { entity: "User" },
        Err(e) => ApiError::Database(e),
    }
}
