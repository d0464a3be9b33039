//! Segment similarity scoring
//!
//! Every function here is total: empty or token-less input scores 0 instead
//! of failing.

use crate::char_diff;
use serde::Serialize;
use std::collections::HashSet;

/// Winner of a best-match scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestMatch {
    /// Index of the winning candidate (as yielded by the candidate source)
    pub index: usize,
    pub similarity: f64,
}

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Jaccard similarity over lower-cased whitespace tokens
pub fn similarity(a: &str, b: &str) -> f64 {
    let words1 = token_set(a);
    let words2 = token_set(b);

    if words1.is_empty() || words2.is_empty() {
        return 0.0;
    }

    let intersection = words1.intersection(&words2).count();
    let union = words1.union(&words2).count();
    intersection as f64 / union as f64
}

/// Share of characters a char-level diff classifies as common
pub fn character_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    char_diff::common_ratio(&char_diff::diff_chars(a, b))
}

/// Convert the user-facing fuzziness dial into a similarity threshold
///
/// `fuzziness` 0 yields `max_match`, 1 yields `min_match`; values outside
/// `[0, 1]` are clamped first.
pub fn threshold_from_fuzziness(fuzziness: f64, min_match: f64, max_match: f64) -> f64 {
    let fuzziness = if fuzziness.is_nan() {
        0.0
    } else {
        fuzziness.clamp(0.0, 1.0)
    };
    max_match - fuzziness * (max_match - min_match)
}

/// Best Jaccard candidate at or above `min_threshold`; the first candidate
/// reaching the maximum wins ties.
pub fn best_match<S: AsRef<str>>(
    text: &str,
    candidates: &[S],
    min_threshold: f64,
) -> Option<BestMatch> {
    best_match_by(
        text,
        candidates.iter().map(AsRef::as_ref).enumerate(),
        min_threshold,
        similarity,
    )
}

/// Generic best-match scan with a pluggable scorer
///
/// Candidates scoring 0 never match, whatever the threshold.
pub fn best_match_by<'a, I, F>(
    text: &str,
    candidates: I,
    min_threshold: f64,
    scorer: F,
) -> Option<BestMatch>
where
    I: IntoIterator<Item = (usize, &'a str)>,
    F: Fn(&str, &str) -> f64,
{
    let mut best: Option<BestMatch> = None;

    for (index, candidate) in candidates {
        let score = scorer(text, candidate);
        if score <= 0.0 || score < min_threshold {
            continue;
        }
        if best.map_or(true, |b| score > b.similarity) {
            best = Some(BestMatch {
                index,
                similarity: score,
            });
        }
    }

    best
}
