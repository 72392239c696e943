use ropey::Rope;

use crate::change_region::{ChangeRegion, MalformedAnnotation, RegionExtractor};
use crate::line_diff::{DiffPart, DiffPartKind};
use crate::marker::Marker;

/// Where the annotator is relative to a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HunkState {
    /// Copying unchanged text
    Idle,
    /// Old code and separator written, fixed code may still follow
    AwaitingFixed,
}

/// Renders an edit script as one document with delimited old/fixed hunks.
///
/// A removed run followed by an added run becomes a single hunk. A lone
/// removed run gets an empty fixed block and a lone added run gets an
/// empty old block.
///
/// Every line is classified as it is written, so the regions returned by
/// [`finish_with_regions`](Self::finish_with_regions) are exact even when
/// the source code contains a line that reads like a marker.
#[derive(Debug)]
pub struct MergeAnnotator {
    out: String,
    state: HunkState,
    hunks: usize,
    /// The last line written has no `\n` yet
    line_open: bool,
    extractor: RegionExtractor,
    error: Option<MalformedAnnotation>,
}

impl Default for MergeAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeAnnotator {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            state: HunkState::Idle,
            hunks: 0,
            line_open: false,
            extractor: RegionExtractor::new(),
            error: None,
        }
    }

    /// Feed the next part of the edit script
    pub fn push(&mut self, part: &DiffPart) {
        match (part.kind, self.state) {
            (DiffPartKind::Unchanged, HunkState::Idle) => {
                self.push_text(&part.text);
            }
            (DiffPartKind::Unchanged, HunkState::AwaitingFixed) => {
                self.close_hunk();
                self.push_text(&part.text);
            }
            (DiffPartKind::Removed, HunkState::Idle) => {
                self.open_hunk();
                self.push_text(&part.text);
                self.push_marker(Marker::Separator);
                self.state = HunkState::AwaitingFixed;
            }
            (DiffPartKind::Removed, HunkState::AwaitingFixed) => {
                // Two removed runs in a row; finish the first as a deletion.
                self.close_hunk();
                self.push(part);
            }
            (DiffPartKind::Added, HunkState::Idle) => {
                self.open_hunk();
                self.push_marker(Marker::Separator);
                self.push_text(&part.text);
                self.close_hunk();
            }
            (DiffPartKind::Added, HunkState::AwaitingFixed) => {
                self.push_text(&part.text);
                self.close_hunk();
            }
        }
    }

    /// Close any open hunk and return the annotated text
    pub fn finish(mut self) -> String {
        self.close_pending();
        self.out
    }

    /// Close any open hunk and return the annotated text together with the
    /// location of every hunk written
    pub fn finish_with_regions(
        mut self,
    ) -> Result<(String, Vec<ChangeRegion>), MalformedAnnotation> {
        self.close_pending();
        if let Some(err) = self.error {
            return Err(err);
        }
        let regions = self.extractor.finish()?;
        Ok((self.out, regions))
    }

    fn close_pending(&mut self) {
        if self.state == HunkState::AwaitingFixed {
            self.close_hunk();
        }
        log::trace!("annotated {} hunks", self.hunks);
    }

    fn open_hunk(&mut self) {
        self.push_marker(Marker::Open);
        self.hunks += 1;
    }

    fn close_hunk(&mut self) {
        self.push_marker(Marker::Close);
        self.state = HunkState::Idle;
    }

    /// Write source text; none of its lines count as markers
    fn push_text(&mut self, text: &str) {
        for segment in text.split_inclusive('\n') {
            if !self.line_open {
                self.record(None);
            }
            self.out.push_str(segment);
            self.line_open = !segment.ends_with('\n');
        }
    }

    /// Write a marker on a line of its own
    fn push_marker(&mut self, marker: Marker) {
        if self.line_open {
            self.out.push('\n');
            self.line_open = false;
        }
        self.record(Some(marker));
        self.out.push_str(marker.as_str());
        self.out.push('\n');
    }

    fn record(&mut self, marker: Option<Marker>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.extractor.push(marker) {
            self.error = Some(err);
        }
    }
}

/// Render an edit script as annotated text
pub fn annotate(parts: &[DiffPart]) -> String {
    let mut annotator = MergeAnnotator::new();
    for part in parts {
        annotator.push(part);
    }
    annotator.finish()
}

/// The annotated text with line-indexed access.
///
/// Lines are numbered from 0 and only `\n` breaks a line, so line `i` here is
/// the line `i` reported in a [`ChangeRegion`](crate::ChangeRegion).
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    text: String,
    rope: Rope,
}

impl AnnotatedDocument {
    pub fn new(text: String) -> Self {
        let rope = Rope::from_str(&text);
        Self { text, rope }
    }

    /// Render an edit script into a document
    pub fn from_parts(parts: &[DiffPart]) -> Self {
        Self::new(annotate(parts))
    }

    /// The full annotated text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The underlying rope
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of lines, counting the empty line after a final `\n`
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get a line without its terminator
    pub fn line(&self, index: usize) -> Option<String> {
        let mut line = self.rope.get_line(index)?.to_string();
        if line.ends_with('\n') {
            line.pop();
        }
        Some(line)
    }

    /// Iterate over all lines without their terminators
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.len_lines()).filter_map(move |i| self.line(i))
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl std::fmt::Display for AnnotatedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{CLOSE_MARKER, OPEN_MARKER, SEPARATOR};

    fn hunk(old: &str, new: &str) -> String {
        format!("{OPEN_MARKER}\n{old}{SEPARATOR}\n{new}{CLOSE_MARKER}\n")
    }

    #[test]
    fn replacement_is_one_hunk() {
        let parts = [
            DiffPart::unchanged("a\n"),
            DiffPart::removed("b\n"),
            DiffPart::added("x\n"),
            DiffPart::unchanged("c\n"),
        ];
        assert_eq!(annotate(&parts), format!("a\n{}c\n", hunk("b\n", "x\n")));
    }

    #[test]
    fn deletion_at_end_is_closed() {
        let parts = [DiffPart::unchanged("a\n"), DiffPart::removed("b\n")];
        assert_eq!(annotate(&parts), format!("a\n{}", hunk("b\n", "")));
    }

    #[test]
    fn insertion_has_empty_old_block() {
        let parts = [DiffPart::added("x\n"), DiffPart::unchanged("a\n")];
        assert_eq!(annotate(&parts), format!("{}a\n", hunk("", "x\n")));
    }

    #[test]
    fn consecutive_removals_become_two_hunks() {
        let parts = [DiffPart::removed("a\n"), DiffPart::removed("b\n")];
        assert_eq!(annotate(&parts), format!("{}{}", hunk("a\n", ""), hunk("b\n", "")));
    }

    #[test]
    fn markers_start_on_a_fresh_line() {
        let parts = [DiffPart::unchanged("a\n"), DiffPart::added("x")];
        assert_eq!(annotate(&parts), format!("a\n{}", hunk("", "x\n")));
    }

    #[test]
    fn marker_text_in_source_is_content() {
        let parts = [
            DiffPart::unchanged(format!("{SEPARATOR}\n")),
            DiffPart::removed(format!("{CLOSE_MARKER}\n")),
            DiffPart::added("x\n"),
        ];
        let mut annotator = MergeAnnotator::new();
        for part in &parts {
            annotator.push(part);
        }
        let (text, regions) = annotator.finish_with_regions().unwrap();

        let old = format!("{CLOSE_MARKER}\n");
        assert_eq!(text, format!("{SEPARATOR}\n{}", hunk(&old, "x\n")));
        assert_eq!(
            regions,
            vec![ChangeRegion {
                old_lines: vec![2],
                new_lines: vec![4],
                merge_line: 3,
                open_line: 1,
                close_line: 5,
            }]
        );
    }

    #[test]
    fn regions_follow_lines_split_across_parts() {
        let parts = [
            DiffPart::unchanged("a"),
            DiffPart::unchanged("b\n"),
            DiffPart::added("x"),
        ];
        let mut annotator = MergeAnnotator::new();
        for part in &parts {
            annotator.push(part);
        }
        let (text, regions) = annotator.finish_with_regions().unwrap();

        assert_eq!(text, format!("ab\n{}", hunk("", "x\n")));
        assert_eq!(regions[0].open_line, 1);
        assert_eq!(regions[0].new_lines, vec![3]);
        assert_eq!(regions[0].close_line, 4);
    }

    #[test]
    fn no_parts_render_nothing() {
        assert_eq!(annotate(&[]), "");
    }

    #[test]
    fn document_lines_follow_newlines_only() {
        let doc = AnnotatedDocument::new("a\r\nb\u{2028}c\n".to_string());
        assert_eq!(doc.len_lines(), 3);
        assert_eq!(doc.line(0).as_deref(), Some("a\r"));
        assert_eq!(doc.line(1).as_deref(), Some("b\u{2028}c"));
        assert_eq!(doc.line(2).as_deref(), Some(""));
        assert_eq!(doc.line(3), None);
    }
}
