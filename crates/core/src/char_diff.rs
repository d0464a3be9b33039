//! Character-level diff runs for matched segment pairs

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Kind of a character run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharOpKind {
    Equal,
    Insert,
    Delete,
}

impl From<ChangeTag> for CharOpKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => CharOpKind::Equal,
            ChangeTag::Insert => CharOpKind::Insert,
            ChangeTag::Delete => CharOpKind::Delete,
        }
    }
}

/// A maximal run of characters sharing one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharOp {
    pub kind: CharOpKind,
    pub text: String,
}

impl CharOp {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Diff two strings character by character, merging adjacent changes of
/// the same kind into runs
pub fn diff_chars(left: &str, right: &str) -> Vec<CharOp> {
    let diff = TextDiff::from_chars(left, right);
    let mut ops: Vec<CharOp> = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = CharOpKind::from(change.tag());
        match ops.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => ops.push(CharOp {
                kind,
                text: change.value().to_string(),
            }),
        }
    }

    ops
}

/// Fraction of characters classified as common across all compared characters
pub fn common_ratio(ops: &[CharOp]) -> f64 {
    let (common, total) = ops.iter().fold((0usize, 0usize), |(common, total), op| {
        let n = op.char_count();
        match op.kind {
            CharOpKind::Equal => (common + n, total + n),
            _ => (common, total + n),
        }
    });

    if total == 0 {
        0.0
    } else {
        common as f64 / total as f64
    }
}

/// Rebuild one side of the diff from its runs
pub fn reconstruct(ops: &[CharOp], keep: CharOpKind) -> String {
    ops.iter()
        .filter(|op| op.kind == CharOpKind::Equal || op.kind == keep)
        .map(|op| op.text.as_str())
        .collect()
}
