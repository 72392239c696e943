use derive_more::Display;
use similar::{Algorithm, DiffOp};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The classification of a run of lines in a line-level edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffPartKind {
    /// The lines exist in both texts
    #[display(fmt = "Unchanged")]
    Unchanged,

    /// The lines only exist in the original text
    #[display(fmt = "Removed")]
    Removed,

    /// The lines only exist in the revised text
    #[display(fmt = "Added")]
    Added,
}

/// One classified run of whole lines, copied verbatim from its source text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffPart {
    /// What happened to these lines
    pub kind: DiffPartKind,

    /// The lines themselves, including their line terminators
    pub text: String,
}

impl DiffPart {
    /// Create a new diff part
    pub fn new(kind: DiffPartKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Shorthand for an unchanged part
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self::new(DiffPartKind::Unchanged, text)
    }

    /// Shorthand for a removed part
    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(DiffPartKind::Removed, text)
    }

    /// Shorthand for an added part
    pub fn added(text: impl Into<String>) -> Self {
        Self::new(DiffPartKind::Added, text)
    }

    /// Number of lines covered by this part
    pub fn line_count(&self) -> usize {
        split_lines(&self.text).len()
    }
}

/// Configuration for line-level diffing
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// The diff algorithm to use
    algorithm: Algorithm,

    /// Compare lines with surrounding whitespace trimmed
    ignore_whitespace: bool,

    /// Give up on a minimal diff after this long
    timeout: Option<Duration>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Myers,
            ignore_whitespace: true,
            timeout: None,
        }
    }
}

impl DiffConfig {
    /// Create a config that compares lines byte for byte
    pub fn exact() -> Self {
        Self::default().ignore_whitespace(false)
    }

    /// Set the diff algorithm
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set whether surrounding whitespace is ignored when comparing lines
    pub fn ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Set a deadline after which the diff falls back to a coarser result
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether surrounding whitespace is ignored when comparing lines
    pub fn ignores_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    /// Compute the line-level edit script turning `original` into `revised`.
    ///
    /// Lines that compare equal are emitted with the revised text, so the
    /// non-removed parts always concatenate back to `revised`.
    ///
    /// Where several minimal scripts exist, unchanged lines match at the
    /// earliest position: insertion-only and deletion-only blocks sit as late
    /// as they can. Competing matches between different lines are settled by
    /// the algorithm's forward search.
    pub fn diff_lines(&self, original: &str, revised: &str) -> Vec<DiffPart> {
        let old_lines = split_lines(original);
        let new_lines = split_lines(revised);

        let old_keys: Vec<&str> = old_lines.iter().map(|l| self.line_key(l)).collect();
        let new_keys: Vec<&str> = new_lines.iter().map(|l| self.line_key(l)).collect();

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let ops =
            similar::capture_diff_slices_deadline(self.algorithm, &old_keys, &new_keys, deadline);

        let mut lines = Vec::with_capacity(old_lines.len().max(new_lines.len()));
        for op in ops {
            match op {
                DiffOp::Equal {
                    old_index,
                    new_index,
                    len,
                } => lines.extend((0..len).map(|i| LineOp::Equal {
                    old: old_index + i,
                    new: new_index + i,
                })),
                DiffOp::Delete {
                    old_index, old_len, ..
                } => lines.extend((old_index..old_index + old_len).map(LineOp::Delete)),
                DiffOp::Insert {
                    new_index, new_len, ..
                } => lines.extend((new_index..new_index + new_len).map(LineOp::Insert)),
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    lines.extend((old_index..old_index + old_len).map(LineOp::Delete));
                    lines.extend((new_index..new_index + new_len).map(LineOp::Insert));
                }
            }
        }
        match_early(&mut lines, &old_keys, &new_keys);

        let mut script = EditScript::default();
        for line in lines {
            match line {
                LineOp::Equal { new, .. } => script.unchanged(&new_lines[new..=new]),
                LineOp::Delete(old) => script.removed(&old_lines[old..=old]),
                LineOp::Insert(new) => script.added(&new_lines[new..=new]),
            }
        }

        let parts = script.finish();
        log::trace!(
            "diffed {} old lines against {} new lines into {} parts",
            old_lines.len(),
            new_lines.len(),
            parts.len()
        );
        parts
    }

    fn line_key<'a>(&self, line: &'a str) -> &'a str {
        if self.ignore_whitespace {
            line.trim()
        } else {
            line
        }
    }
}

/// Compute the line-level edit script with the default configuration
pub fn diff_lines(original: &str, revised: &str) -> Vec<DiffPart> {
    DiffConfig::default().diff_lines(original, revised)
}

/// Split text into lines, keeping each line's `\n` terminator
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// One line of the edit script, by index into the old and new line lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOp {
    Equal { old: usize, new: usize },
    Delete(usize),
    Insert(usize),
}

impl LineOp {
    fn is_equal(self) -> bool {
        matches!(self, LineOp::Equal { .. })
    }
}

/// Slide every insertion-only or deletion-only block as far down as equal
/// lines allow.
///
/// When a block of changes can sit in several places, the unchanged lines
/// then match at the earliest position: `a` against `a a` keeps the first
/// `a` and adds the second. The number of changed lines is unaffected.
fn match_early(lines: &mut [LineOp], old_keys: &[&str], new_keys: &[&str]) {
    // A block that moves can free the one before it, so repeat until stable
    while slide_pass(lines, old_keys, new_keys) {}
}

/// One left-to-right pass of [`match_early`]; true if any block moved
fn slide_pass(lines: &mut [LineOp], old_keys: &[&str], new_keys: &[&str]) -> bool {
    let mut moved = false;
    let mut start = 0;
    while start < lines.len() {
        if lines[start].is_equal() {
            start += 1;
            continue;
        }
        let len = lines[start..]
            .iter()
            .take_while(|line| !line.is_equal())
            .count();
        let block = &lines[start..start + len];
        let inserts_only = block.iter().all(|line| matches!(line, LineOp::Insert(_)));
        let deletes_only = block.iter().all(|line| matches!(line, LineOp::Delete(_)));

        let slid = if inserts_only {
            slide_block(lines, start, len, |line, step| match (line, step) {
                (LineOp::Insert(first), LineOp::Equal { old, new })
                    if new_keys[first] == new_keys[new] =>
                {
                    Some(LineOp::Equal { old, new: first })
                }
                _ => None,
            })
        } else if deletes_only {
            slide_block(lines, start, len, |line, step| match (line, step) {
                (LineOp::Delete(first), LineOp::Equal { old, new })
                    if old_keys[first] == old_keys[old] =>
                {
                    Some(LineOp::Equal { old: first, new })
                }
                _ => None,
            })
        } else {
            0
        };
        moved |= slid > 0;
        start += slid + len;
    }
    moved
}

/// Move the block `lines[start..start + len]` down past equal lines while
/// `pair` can match its first line against the next equal line.
///
/// Returns how many lines the block moved.
fn slide_block(
    lines: &mut [LineOp],
    start: usize,
    len: usize,
    pair: impl Fn(LineOp, LineOp) -> Option<LineOp>,
) -> usize {
    let mut steps = 0;
    while let Some(&next) = lines.get(start + steps + len) {
        if !next.is_equal() {
            break;
        }
        // First line of the block once it has moved `steps` lines
        let first = shift(lines[start], steps);
        let Some(matched) = pair(first, next) else {
            break;
        };
        lines[start + steps + len] = matched;
        steps += 1;
    }
    if steps == 0 {
        return 0;
    }

    let head = lines[start];
    // Matched lines were parked where the block ended; the block now follows them
    lines[start..start + steps + len].rotate_right(steps);
    for (i, line) in lines[start + steps..start + steps + len]
        .iter_mut()
        .enumerate()
    {
        *line = shift(head, steps + i);
    }
    steps
}

/// The line `by` positions after a changed line, on the same side
fn shift(line: LineOp, by: usize) -> LineOp {
    match line {
        LineOp::Insert(new) => LineOp::Insert(new + by),
        LineOp::Delete(old) => LineOp::Delete(old + by),
        equal => equal,
    }
}

/// Accumulates diff ops into coalesced parts.
///
/// Changes between two unchanged runs are buffered so every changed block
/// comes out as one removed run followed by one added run.
#[derive(Default)]
struct EditScript {
    parts: Vec<DiffPart>,
    removed: String,
    added: String,
}

impl EditScript {
    fn unchanged(&mut self, lines: &[&str]) {
        if lines.is_empty() {
            return;
        }
        self.flush_changes();
        match self.parts.last_mut() {
            Some(last) if last.kind == DiffPartKind::Unchanged => {
                last.text.extend(lines.iter().copied())
            }
            _ => self.parts.push(DiffPart::unchanged(lines.concat())),
        }
    }

    fn removed(&mut self, lines: &[&str]) {
        self.removed.extend(lines.iter().copied());
    }

    fn added(&mut self, lines: &[&str]) {
        self.added.extend(lines.iter().copied());
    }

    fn flush_changes(&mut self) {
        if !self.removed.is_empty() {
            self.parts
                .push(DiffPart::removed(std::mem::take(&mut self.removed)));
        }
        if !self.added.is_empty() {
            self.parts.push(DiffPart::added(std::mem::take(&mut self.added)));
        }
    }

    fn finish(mut self) -> Vec<DiffPart> {
        self.flush_changes();
        self.parts
    }
}
