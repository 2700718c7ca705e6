const FOOD_CONTEXTS: [&str; 2] = ["cơm", "nước"];
const EATING_VERBS: [&str; 3] = ["ăn", "uống", "dùng"];
const GREETING_WORDS: [&str; 3] = ["chào", "cảm ơn", "xin lỗi"];
const POLITENESS_MARKERS: [&str; 3] = ["xin", "kính", "vui lòng"];

const MAX_VARIATIONS: usize = 5;

/// Derives related Vietnamese phrasings for a dictionary query.
///
/// Single words get everyday context appended (objects for eating verbs, a
/// person for greetings); multi-word queries are toggled between plain and
/// polite forms. The query itself and duplicates are filtered out, keeping
/// at most five variations in generation order.
pub fn variations(query: &str) -> Vec<String> {
    let normalized = query.trim().to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();

    if words.len() == 1 {
        let word = words[0];

        if EATING_VERBS.iter().any(|verb| word.contains(verb)) {
            for food in FOOD_CONTEXTS {
                out.push(format!("{word} {food}"));
            }
        }

        if GREETING_WORDS.iter().any(|greeting| word.contains(greeting)) {
            out.push(format!("{word} bạn"));
            if !word.starts_with("xin") {
                out.push(format!("xin {word}"));
            }
        }
    } else {
        let mut has_marker = false;
        for marker in POLITENESS_MARKERS {
            if words.contains(&marker) {
                has_marker = true;
                let without: String = words
                    .iter()
                    .filter(|w| **w != marker)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !without.is_empty() {
                    out.push(without);
                }
            }
        }
        if !has_marker {
            out.push(format!("xin {normalized}"));
        }
    }

    let mut seen = std::collections::HashSet::new();
    out.retain(|v| !v.is_empty() && *v != normalized && seen.insert(v.clone()));
    out.truncate(MAX_VARIATIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eating_verbs_get_food_context() {
        assert_eq!(variations("ăn"), vec!["ăn cơm", "ăn nước"]);
    }

    #[test]
    fn greetings_get_person_and_politeness() {
        assert_eq!(variations("chào"), vec!["chào bạn", "xin chào"]);
    }

    #[test]
    fn polite_phrases_lose_their_marker() {
        assert_eq!(variations("xin chào"), vec!["chào"]);
    }

    #[test]
    fn plain_phrases_gain_politeness() {
        assert_eq!(variations("cảm ơn"), vec!["xin cảm ơn"]);
    }

    #[test]
    fn nouns_produce_nothing() {
        assert!(variations("mèo").is_empty());
    }

    #[test]
    fn casing_and_whitespace_are_normalized() {
        assert_eq!(variations("  Chào  "), vec!["chào bạn", "xin chào"]);
    }

    #[test]
    fn never_more_than_five() {
        assert!(variations("ăn uống").len() <= 5);
        assert!(variations("uống").len() <= 5);
    }

    #[test]
    fn empty_query_produces_nothing() {
        assert!(variations("   ").is_empty());
    }
}
