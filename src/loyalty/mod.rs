pub mod catalog;
mod dto;
mod handlers;
mod repo;
mod rules;
pub mod theme;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
