use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Router,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::language::Language;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tts/speak", get(speak))
}

#[derive(Debug, Deserialize)]
struct SpeakQuery {
    text: String,
    language: String,
}

/// Returns the spoken mp3 for `text`. Audio is immutable per (text, language)
/// so the response carries a year-long cache header.
#[instrument(skip(state), fields(language = %params.language))]
async fn speak(
    State(state): State<AppState>,
    Query(params): Query<SpeakQuery>,
) -> ApiResult<(HeaderMap, Bytes)> {
    let text = params.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("text must not be empty".into()));
    }
    let language = Language::from_code(&params.language)
        .ok_or_else(|| ApiError::Validation("language must be one of EN, ZH, KO, JA".into()))?;

    let audio = state
        .audio_cache
        .get_or_synthesize(state.speech.as_ref(), text, language)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "audio/mpeg".parse().unwrap());
    headers.insert(
        header::CACHE_CONTROL,
        "public, max-age=31536000".parse().unwrap(),
    );
    Ok((headers, audio))
}
