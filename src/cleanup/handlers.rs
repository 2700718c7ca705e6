use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::ApiResult;
use crate::state::AppState;

use super::service::{self, CleanupStats};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cleanup/stats", get(cleanup_stats))
        .route("/cleanup/run", post(run_cleanup))
}

#[instrument(skip(state))]
async fn cleanup_stats(State(state): State<AppState>) -> ApiResult<Json<CleanupStats>> {
    let stats = service::stats(&state.db, state.config.cleanup.threshold_days).await?;
    Ok(Json(stats))
}

/// On-demand sweep, same semantics as the scheduled run.
#[instrument(skip(state))]
async fn run_cleanup(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let deleted = service::run_cleanup(&state.db, state.config.cleanup.threshold_days).await?;
    Ok(Json(json!({
        "message": "Cleanup completed",
        "deleted_users": deleted,
    })))
}
