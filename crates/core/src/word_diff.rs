//! Word-granularity alignment inside a matched segment pair
//!
//! Walks both token arrays in lockstep. On a mismatch it looks at most
//! `lookahead` tokens ahead on each side for a token present in both, emits
//! the skipped tokens as deleted/added runs and resumes. With no resync point
//! in the window the remainders of both sides are emitted and the walk stops.

use serde::{Deserialize, Serialize};

/// Kind of a word run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordChangeKind {
    Unchanged,
    Deleted,
    Added,
}

/// A run of whitespace-separated tokens sharing one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordChange {
    pub kind: WordChangeKind,
    pub text: String,
}

impl WordChange {
    pub fn is_change(&self) -> bool {
        self.kind != WordChangeKind::Unchanged
    }
}

fn push_run(changes: &mut Vec<WordChange>, kind: WordChangeKind, tokens: &[&str]) {
    if tokens.is_empty() {
        return;
    }
    let text = tokens.join(" ");
    match changes.last_mut() {
        Some(last) if last.kind == kind => {
            last.text.push(' ');
            last.text.push_str(&text);
        }
        _ => changes.push(WordChange { kind, text }),
    }
}

/// Nearest `(i', j')` past `(i, j)` where both sides hold the same token
///
/// Candidates are ordered by total distance, then by fewer left tokens skipped.
/// The window never reaches past the remaining tokens of the longer side.
fn find_resync(left: &[&str], right: &[&str], i: usize, j: usize, lookahead: usize) -> Option<(usize, usize)> {
    let remaining = (left.len() - i).max(right.len() - j);
    let window = lookahead.min(remaining);

    for total in 1..=window.saturating_mul(2) {
        for di in 0..=total.min(window) {
            let dj = total - di;
            if dj > window {
                continue;
            }
            let (li, rj) = (i + di, j + dj);
            if li < left.len() && rj < right.len() && left[li] == right[rj] {
                return Some((li, rj));
            }
        }
    }
    None
}

/// Align two segment texts word by word
pub fn word_diff(left: &str, right: &str, lookahead: usize) -> Vec<WordChange> {
    let left_tokens: Vec<&str> = left.split_whitespace().collect();
    let right_tokens: Vec<&str> = right.split_whitespace().collect();
    let lookahead = lookahead.max(1);

    let mut changes = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < left_tokens.len() && j < right_tokens.len() {
        if left_tokens[i] == right_tokens[j] {
            push_run(&mut changes, WordChangeKind::Unchanged, &left_tokens[i..=i]);
            i += 1;
            j += 1;
            continue;
        }

        match find_resync(&left_tokens, &right_tokens, i, j, lookahead) {
            Some((ni, nj)) => {
                push_run(&mut changes, WordChangeKind::Deleted, &left_tokens[i..ni]);
                push_run(&mut changes, WordChangeKind::Added, &right_tokens[j..nj]);
                i = ni;
                j = nj;
            }
            None => break,
        }
    }

    push_run(&mut changes, WordChangeKind::Deleted, &left_tokens[i..]);
    push_run(&mut changes, WordChangeKind::Added, &right_tokens[j..]);

    changes
}
