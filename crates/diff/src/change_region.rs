use derive_more::Display;
use std::ops::Range;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::marker::Marker;

/// The location of one hunk inside an annotated document.
///
/// All indices are 0-based lines of the annotated text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChangeRegion {
    /// Lines of the old code, empty for a pure insertion
    pub old_lines: Vec<usize>,

    /// Lines of the fixed code, empty for a pure deletion
    pub new_lines: Vec<usize>,

    /// The separator line
    pub merge_line: usize,

    /// The open marker line
    pub open_line: usize,

    /// The close marker line
    pub close_line: usize,
}

impl ChangeRegion {
    /// The old code lines as a range
    pub fn old_range(&self) -> Range<usize> {
        self.open_line + 1..self.merge_line
    }

    /// The fixed code lines as a range
    pub fn new_range(&self) -> Range<usize> {
        self.merge_line + 1..self.close_line
    }

    /// Every line of the hunk, markers included
    pub fn span(&self) -> Range<usize> {
        self.open_line..self.close_line + 1
    }

    /// Whether the hunk only adds lines
    pub fn is_insertion(&self) -> bool {
        self.old_lines.is_empty()
    }

    /// Whether the hunk only removes lines
    pub fn is_deletion(&self) -> bool {
        self.new_lines.is_empty()
    }

    /// Check if the given annotated line belongs to this hunk
    pub fn contains(&self, line: usize) -> bool {
        self.span().contains(&line)
    }
}

/// What went wrong while reading hunk markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AnnotationProblem {
    #[display(fmt = "{} outside of a hunk", _0)]
    OutsideHunk(Marker),

    #[display(fmt = "open marker inside a hunk opened at line {}", _0)]
    NestedOpen(usize),

    #[display(fmt = "close marker before the separator")]
    CloseBeforeSeparator,

    #[display(fmt = "second separator in one hunk")]
    DuplicateSeparator,

    #[display(fmt = "hunk opened at line {} is never closed", _0)]
    Unterminated(usize),
}

/// Annotated text whose markers are out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed annotation at line {line}: {problem}")]
pub struct MalformedAnnotation {
    /// The 0-based line where the problem was detected
    pub line: usize,
    pub problem: AnnotationProblem,
}

/// Progress through the current hunk
#[derive(Debug)]
enum ScanState {
    Idle,
    SawOpen {
        open_line: usize,
        old_lines: Vec<usize>,
    },
    SawSeparator {
        open_line: usize,
        old_lines: Vec<usize>,
        merge_line: usize,
        new_lines: Vec<usize>,
    },
}

/// Walks annotated text once and recovers the location of every hunk
#[derive(Debug)]
pub struct RegionExtractor {
    state: ScanState,
    regions: Vec<ChangeRegion>,
    line: usize,
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionExtractor {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            regions: Vec::new(),
            line: 0,
        }
    }

    /// Feed the next line, without its `\n`
    pub fn push_line(&mut self, text: &str) -> Result<(), MalformedAnnotation> {
        self.push(Marker::parse(text))
    }

    /// Feed the next line, already known to be a marker (`Some`) or content.
    ///
    /// A writer that knows which lines it emitted as markers uses this, so
    /// content that happens to read like a marker stays content.
    pub fn push(&mut self, marker: Option<Marker>) -> Result<(), MalformedAnnotation> {
        let index = self.line;
        self.line += 1;

        let state = std::mem::replace(&mut self.state, ScanState::Idle);
        self.state = match (state, marker) {
            (ScanState::Idle, None) => ScanState::Idle,
            (ScanState::Idle, Some(Marker::Open)) => ScanState::SawOpen {
                open_line: index,
                old_lines: Vec::new(),
            },
            (ScanState::Idle, Some(marker)) => {
                return Err(self.malformed(index, AnnotationProblem::OutsideHunk(marker)))
            }

            (
                ScanState::SawOpen {
                    open_line,
                    mut old_lines,
                },
                None,
            ) => {
                old_lines.push(index);
                ScanState::SawOpen {
                    open_line,
                    old_lines,
                }
            }
            (
                ScanState::SawOpen {
                    open_line,
                    old_lines,
                },
                Some(Marker::Separator),
            ) => ScanState::SawSeparator {
                open_line,
                old_lines,
                merge_line: index,
                new_lines: Vec::new(),
            },
            (ScanState::SawOpen { open_line, .. }, Some(Marker::Open))
            | (ScanState::SawSeparator { open_line, .. }, Some(Marker::Open)) => {
                return Err(self.malformed(index, AnnotationProblem::NestedOpen(open_line)))
            }
            (ScanState::SawOpen { .. }, Some(Marker::Close)) => {
                return Err(self.malformed(index, AnnotationProblem::CloseBeforeSeparator))
            }

            (
                ScanState::SawSeparator {
                    open_line,
                    old_lines,
                    merge_line,
                    mut new_lines,
                },
                None,
            ) => {
                new_lines.push(index);
                ScanState::SawSeparator {
                    open_line,
                    old_lines,
                    merge_line,
                    new_lines,
                }
            }
            (ScanState::SawSeparator { .. }, Some(Marker::Separator)) => {
                return Err(self.malformed(index, AnnotationProblem::DuplicateSeparator))
            }
            (
                ScanState::SawSeparator {
                    open_line,
                    old_lines,
                    merge_line,
                    new_lines,
                },
                Some(Marker::Close),
            ) => {
                self.regions.push(ChangeRegion {
                    old_lines,
                    new_lines,
                    merge_line,
                    open_line,
                    close_line: index,
                });
                ScanState::Idle
            }
        };
        Ok(())
    }

    /// Finish the scan; fails if a hunk is still open
    pub fn finish(self) -> Result<Vec<ChangeRegion>, MalformedAnnotation> {
        match self.state {
            ScanState::Idle => Ok(self.regions),
            ScanState::SawOpen { open_line, .. } | ScanState::SawSeparator { open_line, .. } => {
                Err(MalformedAnnotation {
                    line: self.line.saturating_sub(1),
                    problem: AnnotationProblem::Unterminated(open_line),
                })
            }
        }
    }

    fn malformed(&self, line: usize, problem: AnnotationProblem) -> MalformedAnnotation {
        log::debug!("rejecting annotation at line {}: {}", line, problem);
        MalformedAnnotation { line, problem }
    }
}

/// Locate every hunk in annotated text.
///
/// Fails on the first marker that is out of order instead of skipping the
/// broken hunk. Text alone cannot tell a marker from a source line with the
/// same content; [`AnnotatedDiff::regions`](crate::AnnotatedDiff::regions)
/// has no such ambiguity.
pub fn extract_regions(annotated: &str) -> Result<Vec<ChangeRegion>, MalformedAnnotation> {
    let mut extractor = RegionExtractor::new();
    for line in annotated.split('\n') {
        extractor.push_line(line)?;
    }
    extractor.finish()
}
