use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::annotate::{AnnotatedDocument, MergeAnnotator};
use crate::change_region::{ChangeRegion, MalformedAnnotation};
use crate::line_diff::{DiffConfig, DiffPart, DiffPartKind};

/// What a line of the annotated document shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnnotatedLineKind {
    /// Text both versions agree on
    #[display(fmt = "Unchanged")]
    Unchanged,

    /// Code the fix removes
    #[display(fmt = "Old")]
    Old,

    /// Code the fix introduces
    #[display(fmt = "New")]
    New,

    /// An open, separator or close line
    #[display(fmt = "Marker")]
    Marker,
}

/// The result of comparing submitted code with a proposed fix
#[derive(Debug, Clone)]
pub struct AnnotatedDiff {
    /// The code as submitted
    original: String,

    /// The code as proposed
    revised: String,

    /// The line-level edit script
    parts: Vec<DiffPart>,

    /// The merged document with inline hunks
    document: AnnotatedDocument,

    /// Where each hunk sits in the document
    regions: Vec<ChangeRegion>,
}

impl AnnotatedDiff {
    /// Diff, annotate and extract regions with the given configuration.
    ///
    /// Regions come from the annotator as it writes each line, so source
    /// lines that match a marker's text are never taken for markers.
    pub fn new(
        config: &DiffConfig,
        original: &str,
        revised: &str,
    ) -> Result<Self, MalformedAnnotation> {
        let parts = config.diff_lines(original, revised);

        let mut annotator = MergeAnnotator::new();
        for part in &parts {
            annotator.push(part);
        }
        let (text, regions) = annotator.finish_with_regions()?;
        let document = AnnotatedDocument::new(text);

        log::debug!(
            "annotated diff: {} parts, {} regions, {} annotated lines",
            parts.len(),
            regions.len(),
            document.len_lines()
        );

        Ok(Self {
            original: original.to_string(),
            revised: revised.to_string(),
            parts,
            document,
            regions,
        })
    }

    /// The annotated text
    pub fn annotated(&self) -> &str {
        self.document.as_str()
    }

    /// The annotated text with line access
    pub fn document(&self) -> &AnnotatedDocument {
        &self.document
    }

    /// One region per hunk, in document order
    pub fn regions(&self) -> &[ChangeRegion] {
        &self.regions
    }

    /// The edit script the document was rendered from
    pub fn parts(&self) -> &[DiffPart] {
        &self.parts
    }

    /// The code as submitted
    pub fn original_text(&self) -> &str {
        &self.original
    }

    /// The code with the fix applied
    pub fn fixed_text(&self) -> &str {
        &self.revised
    }

    /// Check if the fix changes anything
    pub fn has_changes(&self) -> bool {
        !self.regions.is_empty()
    }

    /// Get the number of hunks
    pub fn hunk_count(&self) -> usize {
        self.regions.len()
    }

    /// Get the number of added lines
    pub fn added_lines(&self) -> usize {
        self.count_lines(DiffPartKind::Added)
    }

    /// Get the number of removed lines
    pub fn removed_lines(&self) -> usize {
        self.count_lines(DiffPartKind::Removed)
    }

    /// Classify every line of the annotated document
    pub fn line_kinds(&self) -> Vec<AnnotatedLineKind> {
        let mut kinds = vec![AnnotatedLineKind::Unchanged; self.document.len_lines()];
        for region in &self.regions {
            kinds[region.open_line] = AnnotatedLineKind::Marker;
            kinds[region.merge_line] = AnnotatedLineKind::Marker;
            kinds[region.close_line] = AnnotatedLineKind::Marker;
            for &line in &region.old_lines {
                kinds[line] = AnnotatedLineKind::Old;
            }
            for &line in &region.new_lines {
                kinds[line] = AnnotatedLineKind::New;
            }
        }
        kinds
    }

    /// Classify one line of the annotated document
    pub fn line_kind(&self, line: usize) -> Option<AnnotatedLineKind> {
        if line >= self.document.len_lines() {
            return None;
        }
        let kind = self
            .regions
            .iter()
            .find(|region| region.contains(line))
            .map_or(AnnotatedLineKind::Unchanged, |region| {
                if region.old_range().contains(&line) {
                    AnnotatedLineKind::Old
                } else if region.new_range().contains(&line) {
                    AnnotatedLineKind::New
                } else {
                    AnnotatedLineKind::Marker
                }
            });
        Some(kind)
    }

    /// The shape handed to a display layer
    pub fn to_reply(&self) -> MergeReply {
        MergeReply {
            merged_code: self.annotated().to_string(),
            code_changes: self.regions.clone(),
        }
    }

    fn count_lines(&self, kind: DiffPartKind) -> usize {
        self.parts
            .iter()
            .filter(|part| part.kind == kind)
            .map(DiffPart::line_count)
            .sum()
    }
}

/// Annotated text plus its regions, as sent to a display layer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MergeReply {
    pub merged_code: String,
    pub code_changes: Vec<ChangeRegion>,
}

/// Compare two versions of a text and locate every change.
///
/// Lines are compared with surrounding whitespace ignored, and lines that
/// match this way appear with the revised text. Only the revised side
/// round-trips exactly from the annotated document in this mode; use
/// [`DiffConfig::exact`] when the original must be recoverable too.
pub fn diff_and_annotate(
    original: &str,
    revised: &str,
) -> Result<AnnotatedDiff, MalformedAnnotation> {
    DiffConfig::default().diff_and_annotate(original, revised)
}

impl DiffConfig {
    /// Diff, annotate and extract regions with this configuration
    pub fn diff_and_annotate(
        &self,
        original: &str,
        revised: &str,
    ) -> Result<AnnotatedDiff, MalformedAnnotation> {
        AnnotatedDiff::new(self, original, revised)
    }
}
