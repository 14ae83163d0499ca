use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Keyword, RawHit};
use crate::search::KeywordHits;

pub const MAX_RECOMMENDATIONS: usize = 10;
pub const MAX_PER_KEYWORD: usize = 2;

/// Turns per-keyword hits into the final recommendation list.
///
/// Titles are deduplicated first-seen-wins in keyword order, the pool is shuffled
/// with `rng`, and the shuffled pool is walked accepting at most
/// [`MAX_PER_KEYWORD`] books per keyword until [`MAX_RECOMMENDATIONS`] are taken.
pub fn merge<R: Rng + ?Sized>(results: Vec<KeywordHits>, rng: &mut R) -> Vec<RawHit> {
    let mut pool = dedupe(results);
    pool.shuffle(rng);
    select_balanced(pool, MAX_PER_KEYWORD, MAX_RECOMMENDATIONS)
}

/// Flattens the hits, dropping any title already seen. Exact, case-sensitive match.
pub fn dedupe(results: Vec<KeywordHits>) -> Vec<RawHit> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pool = Vec::new();

    for (_, hits) in results {
        for hit in hits {
            if seen.insert(hit.title.clone()) {
                pool.push(hit);
            }
        }
    }

    pool
}

/// Walks `pool` in order and stops as soon as `total_cap` books are accepted,
/// even if later books would still fit under their keyword's cap.
pub fn select_balanced(pool: Vec<RawHit>, per_keyword_cap: usize, total_cap: usize) -> Vec<RawHit> {
    let mut selected = Vec::with_capacity(total_cap.min(pool.len()));
    let mut per_keyword: HashMap<Keyword, usize> = HashMap::new();

    for hit in pool {
        if selected.len() >= total_cap {
            break;
        }
        let count = per_keyword.entry(hit.keyword.clone()).or_insert(0);
        if *count < per_keyword_cap {
            *count += 1;
            selected.push(hit);
        }
    }

    selected
}
