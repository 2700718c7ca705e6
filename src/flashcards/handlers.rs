use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::ai::examples::{generate_dialogue, generate_sentences};
use crate::decks;
use crate::error::{ApiError, ApiResult};
use crate::language::Language;
use crate::state::AppState;
use crate::translate::romanize_or_fallback;

use super::dto::{
    BulkImportRequest, CreateFlashcardRequest, ExamplesQuery, ExamplesResponse,
    FlashcardResponse, ImportSummary, UpdateFlashcardRequest,
};
use super::import::parse_csv;
use super::repo::{self, NewCard};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", post(create_flashcard))
        .route("/flashcards/deck/:deck_id", get(list_deck_flashcards))
        .route(
            "/flashcards/:id",
            get(get_flashcard)
                .put(update_flashcard)
                .delete(delete_flashcard),
        )
        .route("/flashcards/bulk", post(bulk_import))
        .route(
            "/flashcards/upload-csv/:deck_id",
            post(upload_csv).layer(DefaultBodyLimit::max(5 * 1024 * 1024)),
        )
        .route("/flashcards/:id/examples", post(generate_examples))
}

#[instrument(skip(state))]
async fn list_deck_flashcards(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FlashcardResponse>>> {
    let cards = repo::list_by_deck(&state.db, deck_id).await?;
    Ok(Json(cards.into_iter().map(FlashcardResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_flashcard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FlashcardResponse>> {
    let card = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Flashcard" })?;
    Ok(Json(card.into()))
}

#[instrument(skip(state, body))]
async fn create_flashcard(
    State(state): State<AppState>,
    Json(body): Json<CreateFlashcardRequest>,
) -> ApiResult<(StatusCode, Json<FlashcardResponse>)> {
    let source = body.source_text.trim();
    let target = body.target_text.trim();
    if source.is_empty() || target.is_empty() {
        return Err(ApiError::Validation(
            "source_text and target_text must not be empty".into(),
        ));
    }

    let deck = decks::repo::get(&state.db, body.deck_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let language = Language::from_code(&deck.language).unwrap_or(Language::En);

    let pronunciation = match body.pronunciation.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => romanize_or_fallback(state.translator.as_ref(), target, language).await,
    };

    let card = repo::create(
        &state.db,
        deck.id,
        &NewCard {
            source_text: source.to_string(),
            pronunciation,
            target_text: target.to_string(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

#[instrument(skip(state, body))]
async fn update_flashcard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateFlashcardRequest>,
) -> ApiResult<Json<FlashcardResponse>> {
    let card = repo::update(
        &state.db,
        id,
        body.source_text.trim(),
        body.pronunciation.trim(),
        body.target_text.trim(),
    )
    .await?
    .ok_or(ApiError::NotFound { entity: "Flashcard" })?;
    Ok(Json(card.into()))
}

#[instrument(skip(state))]
async fn delete_flashcard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound { entity: "Flashcard" });
    }
    Ok(Json(json!({ "message": "Flashcard deleted successfully" })))
}

#[instrument(skip(state, body), fields(deck_id = %body.deck_id, cards = body.flashcards.len()))]
async fn bulk_import(
    State(state): State<AppState>,
    Json(body): Json<BulkImportRequest>,
) -> ApiResult<(StatusCode, Json<ImportSummary>)> {
    let deck = decks::repo::get(&state.db, body.deck_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let language = Language::from_code(&deck.language).unwrap_or(Language::En);

    let mut cards = Vec::with_capacity(body.flashcards.len());
    for card in body.flashcards {
        let pronunciation = match card.pronunciation.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => {
                romanize_or_fallback(state.translator.as_ref(), card.target_text.trim(), language)
                    .await
            }
        };
        cards.push(NewCard {
            source_text: card.source_text.trim().to_string(),
            pronunciation,
            target_text: card.target_text.trim().to_string(),
        });
    }

    let count = repo::create_bulk(&state.db, deck.id, &cards).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImportSummary {
            message: format!("Created {count} flashcards"),
            count,
            warnings: Vec::new(),
        }),
    ))
}

/// Imports a CSV file uploaded as the multipart field `file`. Rows that fail
/// validation are reported as warnings; the valid remainder is inserted in a
/// single transaction.
#[instrument(skip(state, multipart))]
async fn upload_csv(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportSummary>> {
    let deck = decks::repo::get(&state.db, deck_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let language = Language::from_code(&deck.language).unwrap_or(Language::En);

    let (filename, data) = read_file_field(multipart).await?;
    if !filename.ends_with(".csv") {
        return Err(ApiError::Validation("file must be CSV".into()));
    }

    let mut parsed = parse_csv(&data).map_err(|e| ApiError::Validation(e.to_string()))?;
    if parsed.cards.is_empty() {
        if parsed.warnings.is_empty() {
            return Err(ApiError::Validation("CSV contains no flashcards".into()));
        }
        return Err(ApiError::Validation(format!(
            "no valid flashcards found: {}",
            parsed.warnings.join("; ")
        )));
    }

    for card in &mut parsed.cards {
        if card.pronunciation.is_empty() {
            card.pronunciation =
                romanize_or_fallback(state.translator.as_ref(), &card.target_text, language).await;
        }
    }

    let count = repo::create_bulk(&state.db, deck.id, &parsed.cards).await?;
    Ok(Json(ImportSummary {
        message: format!("Imported {count} flashcards"),
        count,
        warnings: parsed.warnings,
    }))
}

/// Pulls the `file` field out of the upload. A malformed or truncated body is
/// its own validation error, distinct from the field simply being absent.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, bytes::Bytes), ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?;
        let Some(field) = field else {
            return Err(ApiError::Validation("file is required".into()));
        };
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;
            return Ok((filename, data));
        }
    }
}

#[instrument(skip(state))]
async fn generate_examples(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExamplesQuery>,
) -> ApiResult<Json<ExamplesResponse>> {
    let card = repo::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Flashcard" })?;
    let deck = decks::repo::get(&state.db, card.deck_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let language = Language::from_code(&deck.language).unwrap_or(Language::En);

    let examples = match query.kind.as_str() {
        "sentence" => {
            let sentences = generate_sentences(
                state.llm.as_ref(),
                &card.target_text,
                &card.pronunciation,
                &card.source_text,
                language,
            )
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
            serde_json::to_value(sentences).map_err(anyhow::Error::from)?
        }
        "dialogue" => {
            let lines = generate_dialogue(
                state.llm.as_ref(),
                &card.target_text,
                &card.pronunciation,
                &card.source_text,
                language,
            )
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
            serde_json::to_value(lines).map_err(anyhow::Error::from)?
        }
        other => {
            return Err(ApiError::Validation(format!(
                "kind must be sentence or dialogue, got {other}"
            )))
        }
    };

    Ok(Json(ExamplesResponse {
        flashcard_id: card.id,
        kind: query.kind,
        examples,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequest;

    const BOUNDARY: &str = "upload-test-boundary";

    async fn multipart_from(body: String) -> Multipart {
        let request = axum::http::Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(axum::body::Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn file_field_is_extracted() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cards.csv\"\r\n\r\n\
             source_text,target_text\r\nchào,안녕\r\n\
             --{BOUNDARY}--\r\n"
        );
        let (filename, data) = read_file_field(multipart_from(body).await).await.unwrap();
        assert_eq!(filename, "cards.csv");
        assert!(data.starts_with(b"source_text"));
    }

    #[tokio::test]
    async fn other_fields_are_skipped() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             ignore me\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"a.csv\"\r\n\r\n\
             source_text,target_text\r\n\
             --{BOUNDARY}--\r\n"
        );
        let (filename, _) = read_file_field(multipart_from(body).await).await.unwrap();
        assert_eq!(filename, "a.csv");
    }

    #[tokio::test]
    async fn missing_file_field_is_reported_as_required() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             x\r\n\
             --{BOUNDARY}--\r\n"
        );
        let err = read_file_field(multipart_from(body).await).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "file is required"));
    }

    #[tokio::test]
    async fn truncated_upload_is_not_reported_as_missing() {
        // body ends mid-field, no closing boundary
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cards.csv\"\r\n\r\n\
             source_text"
        );
        let err = read_file_field(multipart_from(body).await).await.unwrap_err();
        let ApiError::Validation(message) = err else {
            panic!("expected a validation error");
        };
        assert_ne!(message, "file is required");
        assert!(message.contains("upload"));
    }
}
