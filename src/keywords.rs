use std::collections::HashMap;

use crate::models::Keyword;

/// Genre and subject terms checked first, in this order.
pub const VOCABULARY: [&str; 30] = [
    "fiction",
    "non-fiction",
    "mystery",
    "science",
    "history",
    "romance",
    "fantasy",
    "biography",
    "adventure",
    "thriller",
    "horror",
    "comedy",
    "drama",
    "action",
    "classics",
    "contemporary",
    "young adult",
    "children",
    "self-help",
    "business",
    "cooking",
    "travel",
    "art",
    "music",
    "philosophy",
    "religion",
    "psychology",
    "technology",
    "nature",
    "sports",
];

const STOP_WORDS: [&str; 14] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

pub const FALLBACK_KEYWORD: &str = "popular";
const MAX_FREQUENT_TERMS: usize = 3;

/// Derives search keywords from conversation text. Never returns an empty list.
pub fn extract(text: &str) -> Vec<Keyword> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let matched: Vec<Keyword> = VOCABULARY
        .iter()
        .filter(|term| contains_phrase(&tokens, term))
        .map(Keyword::new)
        .collect();
    if !matched.is_empty() {
        return matched;
    }

    let frequent = most_frequent_terms(&tokens, MAX_FREQUENT_TERMS);
    if !frequent.is_empty() {
        return frequent;
    }

    vec![Keyword::new(FALLBACK_KEYWORD)]
}

fn contains_phrase(tokens: &[&str], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens.windows(words.len()).any(|window| window == words.as_slice())
}

// Ties keep first-seen order: the sort is stable over tokens in arrival order.
fn most_frequent_terms(tokens: &[&str], limit: usize) -> Vec<Keyword> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in tokens.iter().copied() {
        if STOP_WORDS.contains(&token) {
            continue;
        }
        match index.get(token) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(token, _)| Keyword::new(token))
        .collect()
}
