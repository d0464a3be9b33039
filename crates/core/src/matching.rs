//! Match bookkeeping and the matching phases shared by the algorithms
//!
//! A `MatchSet` is built fresh for each comparison. Left and right indices
//! refer to positions in the segment sequences handed to the phases.

use crate::segmenter::Segment;
use crate::similarity::best_match_by;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One committed pairing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMatch {
    pub left_index: usize,
    pub right_index: usize,
    pub similarity: f64,
}

/// Exact, fuzzy and unmatched bookkeeping for one comparison
///
/// Left indices are partitioned by `exact_matches`, `fuzzy_matches` and
/// `unmatched_left` (same on the right), and `left_to_right` /
/// `right_to_left` are inverse maps over the matched subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSet {
    pub exact_matches: Vec<SegmentMatch>,
    /// Pairs accepted by a fuzzy pass. Similarity may be exactly 1.0 when a
    /// byte-identical segment was out of reach of the forward exact pass.
    pub fuzzy_matches: Vec<SegmentMatch>,
    pub unmatched_left: BTreeSet<usize>,
    pub unmatched_right: BTreeSet<usize>,
    pub left_to_right: BTreeMap<usize, usize>,
    pub right_to_left: BTreeMap<usize, usize>,
    pub left_count: usize,
    pub right_count: usize,
    #[serde(skip)]
    fuzzy_by_left: BTreeMap<usize, f64>,
}

impl MatchSet {
    /// Everything starts unmatched
    pub fn new(left_count: usize, right_count: usize) -> Self {
        Self {
            exact_matches: Vec::new(),
            fuzzy_matches: Vec::new(),
            unmatched_left: (0..left_count).collect(),
            unmatched_right: (0..right_count).collect(),
            left_to_right: BTreeMap::new(),
            right_to_left: BTreeMap::new(),
            left_count,
            right_count,
            fuzzy_by_left: BTreeMap::new(),
        }
    }

    fn commit(&mut self, left: usize, right: usize) -> bool {
        if !self.unmatched_left.contains(&left) || !self.unmatched_right.contains(&right) {
            return false;
        }
        self.unmatched_left.remove(&left);
        self.unmatched_right.remove(&right);
        self.left_to_right.insert(left, right);
        self.right_to_left.insert(right, left);
        true
    }

    /// Record an exact pair; refused if either side is already taken
    pub fn record_exact(&mut self, left: usize, right: usize) -> bool {
        if !self.commit(left, right) {
            return false;
        }
        self.exact_matches.push(SegmentMatch {
            left_index: left,
            right_index: right,
            similarity: 1.0,
        });
        true
    }

    /// Record a fuzzy pair; refused if either side is already taken
    pub fn record_fuzzy(&mut self, left: usize, right: usize, similarity: f64) -> bool {
        if !self.commit(left, right) {
            return false;
        }
        self.fuzzy_matches.push(SegmentMatch {
            left_index: left,
            right_index: right,
            similarity,
        });
        self.fuzzy_by_left.insert(left, similarity);
        true
    }

    pub fn is_left_matched(&self, left: usize) -> bool {
        self.left_to_right.contains_key(&left)
    }

    pub fn is_right_matched(&self, right: usize) -> bool {
        self.right_to_left.contains_key(&right)
    }

    pub fn right_for(&self, left: usize) -> Option<usize> {
        self.left_to_right.get(&left).copied()
    }

    pub fn left_for(&self, right: usize) -> Option<usize> {
        self.right_to_left.get(&right).copied()
    }

    /// Similarity of the fuzzy pair starting at `left`, if it is one
    pub fn fuzzy_similarity(&self, left: usize) -> Option<f64> {
        self.fuzzy_by_left.get(&left).copied()
    }

    pub fn matched_count(&self) -> usize {
        self.left_to_right.len()
    }

    /// Every index on both sides is an exact match
    pub fn is_identity(&self) -> bool {
        self.fuzzy_matches.is_empty()
            && self.unmatched_left.is_empty()
            && self.unmatched_right.is_empty()
    }

    /// All matched pairs (exact and fuzzy) in left order
    pub fn pairs(&self) -> impl Iterator<Item = SegmentMatch> + '_ {
        self.left_to_right.iter().map(|(&left, &right)| SegmentMatch {
            left_index: left,
            right_index: right,
            similarity: self.fuzzy_similarity(left).unwrap_or(1.0),
        })
    }

    /// Verify partition and bijection
    ///
    /// # Errors
    ///
    /// Describes the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        check_partition(
            "left",
            self.left_count,
            self.exact_matches.iter().map(|m| m.left_index),
            self.fuzzy_matches.iter().map(|m| m.left_index),
            &self.unmatched_left,
        )?;
        check_partition(
            "right",
            self.right_count,
            self.exact_matches.iter().map(|m| m.right_index),
            self.fuzzy_matches.iter().map(|m| m.right_index),
            &self.unmatched_right,
        )?;

        if self.left_to_right.len() != self.right_to_left.len() {
            return Err("match maps differ in size".to_string());
        }
        for (&left, &right) in &self.left_to_right {
            if self.right_to_left.get(&right) != Some(&left) {
                return Err(format!("left {left} -> right {right} has no inverse"));
            }
        }
        for m in self.exact_matches.iter().chain(&self.fuzzy_matches) {
            if self.left_to_right.get(&m.left_index) != Some(&m.right_index) {
                return Err(format!(
                    "pair ({}, {}) missing from match maps",
                    m.left_index, m.right_index
                ));
            }
        }
        Ok(())
    }
}

fn check_partition(
    side: &str,
    count: usize,
    exact: impl Iterator<Item = usize>,
    fuzzy: impl Iterator<Item = usize>,
    unmatched: &BTreeSet<usize>,
) -> Result<(), String> {
    let mut seen = vec![false; count];
    for index in exact.chain(fuzzy).chain(unmatched.iter().copied()) {
        match seen.get_mut(index) {
            None => return Err(format!("{side} index {index} out of range")),
            Some(true) => return Err(format!("{side} index {index} appears twice")),
            Some(slot) => *slot = true,
        }
    }
    match seen.iter().position(|s| !s) {
        Some(gap) => Err(format!("{side} index {gap} is not accounted for")),
        None => Ok(()),
    }
}

// ============================================================================
// Matching phases
// ============================================================================

/// Forward-only exact pass
///
/// Each left segment looks for its first equal, unused right segment at or
/// after the cursor. A hit moves the cursor past it; a miss leaves the cursor
/// alone.
pub fn sequential_exact_pass(left: &[Segment], right: &[Segment], set: &mut MatchSet) {
    let mut right_cursor = 0;

    for (left_index, segment) in left.iter().enumerate() {
        if segment.is_blank() {
            continue;
        }
        let hit = (right_cursor..right.len())
            .find(|&ri| !set.is_right_matched(ri) && right[ri].text == segment.text);

        if let Some(right_index) = hit {
            set.record_exact(left_index, right_index);
            right_cursor = right_index + 1;
        }
    }
}

/// Exact pass over the longest common subsequence of segment texts
pub fn subsequence_exact_pass(left: &[Segment], right: &[Segment], set: &mut MatchSet) {
    let left_texts: Vec<&str> = left.iter().map(|s| s.text.as_str()).collect();
    let right_texts: Vec<&str> = right.iter().map(|s| s.text.as_str()).collect();

    for (left_index, right_index) in longest_common_subsequence(&left_texts, &right_texts) {
        if !left[left_index].is_blank() {
            set.record_exact(left_index, right_index);
        }
    }
}

/// Greedy fuzzy pass over whatever the exact pass left behind
///
/// Left segments are visited in order and each takes its best unused right
/// segment (any position) scoring at least `threshold`. Committed pairs are
/// never revisited. Does nothing when `threshold >= 1.0`. Returns the number
/// of pairs committed.
pub fn greedy_fuzzy_pass<F>(
    left: &[Segment],
    right: &[Segment],
    set: &mut MatchSet,
    threshold: f64,
    scorer: F,
) -> usize
where
    F: Fn(&str, &str) -> f64,
{
    if threshold >= 1.0 {
        return 0;
    }

    let mut committed = 0;
    for (left_index, segment) in left.iter().enumerate() {
        if set.is_left_matched(left_index) || segment.is_blank() {
            continue;
        }

        let candidates = right
            .iter()
            .enumerate()
            .filter(|(ri, r)| !set.is_right_matched(*ri) && !r.is_blank())
            .map(|(ri, r)| (ri, r.text.as_str()));
        let best = best_match_by(&segment.text, candidates, threshold, &scorer);

        if let Some(best) = best {
            if set.record_fuzzy(left_index, best.index, best.similarity) {
                committed += 1;
            }
        }
    }

    committed
}

/// Longest common subsequence as index pairs, in order
pub fn longest_common_subsequence<T: PartialEq>(original: &[T], modified: &[T]) -> Vec<(usize, usize)> {
    let n = original.len();
    let m = modified.len();

    // DP table
    let mut dp = vec![vec![0usize; m + 1]; n + 1];

    for i in 1..=n {
        for j in 1..=m {
            if original[i - 1] == modified[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    // Backtrack
    let mut lcs = Vec::new();
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if original[i - 1] == modified[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}
