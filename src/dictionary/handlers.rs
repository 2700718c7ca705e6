use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::language::Language;
use crate::state::AppState;
use crate::translate::romanize_or_fallback;

use super::variations::variations;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dictionary/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
    language: String,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct DictionaryEntry {
    source_text: String,
    pronunciation: String,
    target_text: String,
    language: String,
}

/// Translates a Vietnamese query into the studied language, then pads the
/// result list with translated phrase variations. Only the primary lookup is
/// load-bearing; a variation that fails to translate is skipped.
#[instrument(skip(state), fields(query = %params.query, language = %params.language))]
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<DictionaryEntry>>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".into()));
    }
    let language = Language::from_code(&params.language)
        .ok_or_else(|| ApiError::Validation("language must be one of EN, ZH, KO, JA".into()))?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let translator = state.translator.as_ref();
    let translated = translator
        .translate(query, language)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();

    seen.insert(translated.clone());
    results.push(DictionaryEntry {
        source_text: query.to_string(),
        pronunciation: romanize_or_fallback(translator, &translated, language).await,
        target_text: translated,
        language: language.code().to_string(),
    });

    for variation in variations(query) {
        if results.len() >= limit {
            break;
        }
        let var_translated = match translator.translate(&variation, language).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, %variation, "variation translation failed, skipping");
                continue;
            }
        };
        if !seen.insert(var_translated.clone()) {
            continue;
        }
        results.push(DictionaryEntry {
            source_text: variation,
            pronunciation: romanize_or_fallback(translator, &var_translated, language).await,
            target_text: var_translated,
            language: language.code().to_string(),
        });
    }

    Ok(Json(results))
}
