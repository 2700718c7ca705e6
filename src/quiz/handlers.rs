use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::decks;
use crate::error::{ApiError, ApiResult};
use crate::flashcards::repo::{self, Flashcard};
use crate::state::AppState;

const DEFAULT_COUNT: usize = 3;
const MAX_COUNT: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new().route("/quiz/options/:deck_id", get(quiz_options))
}

#[derive(Debug, Deserialize)]
struct OptionsQuery {
    /// The card being quizzed; its sibling cards become wrong options.
    word: String,
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct QuizOption {
    target_text: String,
    pronunciation: String,
    source_text: String,
}

#[derive(Debug, Serialize)]
struct OptionsResponse {
    options: Vec<QuizOption>,
}

#[instrument(skip(state), fields(word = %params.word))]
async fn quiz_options(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Query(params): Query<OptionsQuery>,
) -> ApiResult<Json<OptionsResponse>> {
    let count = params.count.unwrap_or(DEFAULT_COUNT);
    if count == 0 || count > MAX_COUNT {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }

    decks::repo::get(&state.db, deck_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Deck" })?;
    let cards = repo::list_by_deck(&state.db, deck_id).await?;

    let mut rng = rand::thread_rng();
    let selected = pick_distractors(&cards, &params.word, count, &mut rng).ok_or_else(|| {
        ApiError::Validation(format!(
            "deck does not have {count} other flashcards to use as wrong options"
        ))
    })?;

    let options = selected
        .into_iter()
        .map(|c| QuizOption {
            target_text: c.target_text.clone(),
            pronunciation: c.pronunciation.clone(),
            source_text: c.source_text.clone(),
        })
        .collect();
    Ok(Json(OptionsResponse { options }))
}

/// Samples `count` cards whose target text differs from the quizzed word, or
/// `None` when the deck cannot supply that many.
fn pick_distractors<'a, R: rand::Rng + ?Sized>(
    cards: &'a [Flashcard],
    word: &str,
    count: usize,
    rng: &mut R,
) -> Option<Vec<&'a Flashcard>> {
    let eligible: Vec<&Flashcard> = cards.iter().filter(|c| c.target_text != word).collect();
    if eligible.len() < count {
        return None;
    }
    Some(eligible.choose_multiple(rng, count).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use time::OffsetDateTime;

    fn card(target: &str) -> Flashcard {
        Flashcard {
            id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            source_text: format!("nghĩa của {target}"),
            pronunciation: format!("pron-{target}"),
            target_text: target.into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn quizzed_word_is_never_an_option() {
        let cards: Vec<Flashcard> = ["사과", "바나나", "포도", "수박"].map(|w| card(w)).into();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = pick_distractors(&cards, "사과", 3, &mut rng).unwrap();
            assert_eq!(picked.len(), 3);
            assert!(picked.iter().all(|c| c.target_text != "사과"));
        }
    }

    #[test]
    fn options_come_from_the_deck() {
        let cards: Vec<Flashcard> = ["하나", "둘", "셋", "넷"].map(|w| card(w)).into();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick_distractors(&cards, "하나", 2, &mut rng).unwrap();
        let deck_words: Vec<&str> = cards.iter().map(|c| c.target_text.as_str()).collect();
        assert!(picked.iter().all(|c| deck_words.contains(&c.target_text.as_str())));
    }

    #[test]
    fn too_small_deck_yields_none() {
        let cards: Vec<Flashcard> = ["하나", "둘"].map(|w| card(w)).into();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_distractors(&cards, "하나", 3, &mut rng).is_none());
    }

    #[test]
    fn exact_fit_uses_every_other_card() {
        let cards: Vec<Flashcard> = ["하나", "둘", "셋"].map(|w| card(w)).into();
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick_distractors(&cards, "하나", 2, &mut rng).unwrap();
        let mut words: Vec<&str> = picked.iter().map(|c| c.target_text.as_str()).collect();
        words.sort_unstable();
        assert_eq!(words, vec!["둘", "셋"]);
    }
}
