use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::flashcards::repo::Flashcard;
use crate::language::Language;
use crate::state::AppState;
use crate::users;

use super::dto::{CreateDeckRequest, DeckResponse, UpdateDeckRequest};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/decks", post(create_deck))
        .route("/decks/user/:user_id", get(list_user_decks))
        .route(
            "/decks/:id",
            get(get_deck).put(update_deck).delete(delete_deck),
        )
        .route("/decks/:id/export-csv", get(export_deck_csv))
}

#[instrument(skip(state))]
async fn list_user_decks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<DeckResponse>>> {
    let decks = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(decks.into_iter().map(DeckResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_deck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeckResponse>> {
    let deck = repo::get_with_count(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    Ok(Json(deck.into()))
}

#[instrument(skip(state, body))]
async fn create_deck(
    State(state): State<AppState>,
    Json(body): Json<CreateDeckRequest>,
) -> ApiResult<(StatusCode, Json<DeckResponse>)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let language = Language::from_code(&body.language)
        .ok_or_else(|| ApiError::Validation("language must be one of EN, ZH, KO, JA".into()))?;

    users::repo::get(&state.db, body.user_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;

    let deck = repo::create(&state.db, body.user_id, name, language.code()).await?;
    let response = DeckResponse {
        id: deck.id,
        user_id: deck.user_id,
        name: deck.name,
        language: deck.language,
        created_at: deck.created_at,
        updated_at: deck.updated_at,
        flashcard_count: 0,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, body))]
async fn update_deck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDeckRequest>,
) -> ApiResult<Json<DeckResponse>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }

    repo::rename(&state.db, id, name)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let deck = repo::get_with_count(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    Ok(Json(deck.into()))
}

#[instrument(skip(state))]
async fn delete_deck(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound { entity: "Deck" });
    }
    Ok(Json(json!({ "message": "Deck deleted successfully" })))
}

/// Streams the deck's cards as a UTF-8 CSV attachment.
#[instrument(skip(state))]
async fn export_deck_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    let deck = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let cards = crate::flashcards::repo::list_by_deck(&state.db, deck.id).await?;

    let body = write_deck_csv(&cards).map_err(ApiError::Internal)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv; charset=utf-8".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"deck_{}.csv\"", deck.id)
            .parse()
            .unwrap(),
    );
    Ok((headers, body))
}

fn write_deck_csv(cards: &[Flashcard]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["source_text", "pronunciation", "target_text"])?;
    for card in cards {
        writer.write_record([&card.source_text, &card.pronunciation, &card.target_text])?;
    }
    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn card(source: &str, pron: &str, target: &str) -> Flashcard {
        Flashcard {
            id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            source_text: source.into(),
            pronunciation: pron.into(),
            target_text: target.into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_card() {
        let cards = vec![
            card("xin chào", "annyeonghaseyo", "안녕하세요"),
            card("cảm ơn", "gamsahamnida", "감사합니다"),
        ];
        let out = String::from_utf8(write_deck_csv(&cards).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "source_text,pronunciation,target_text");
        assert!(lines[1].starts_with("xin chào,"));
    }

    #[test]
    fn csv_quotes_fields_containing_commas() {
        let cards = vec![card("một, hai", "il, i", "하나, 둘")];
        let out = String::from_utf8(write_deck_csv(&cards).unwrap()).unwrap();
        assert!(out.contains("\"một, hai\""));
    }

    #[test]
    fn empty_deck_exports_header_only() {
        let out = String::from_utf8(write_deck_csv(&[]).unwrap()).unwrap();
        assert_eq!(out.trim_end(), "source_text,pronunciation,target_text");
    }
}
