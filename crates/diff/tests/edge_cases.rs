use fix_diff::{
    diff_and_annotate, extract_regions, AnnotatedLineKind, AnnotationProblem, ChangeRegion,
    DiffConfig, Marker, MalformedAnnotation, RegionExtractor, CLOSE_MARKER, OPEN_MARKER,
    SEPARATOR,
};
use pretty_assertions::assert_eq;

#[test]
fn test_unchanged_text_round_trips() {
    let text = "Line 1\nLine 2\nLine 3\n";
    let diff = diff_and_annotate(text, text).unwrap();

    assert_eq!(diff.annotated(), text);
    assert!(diff.regions().is_empty());
    assert!(!diff.has_changes());
}

#[test]
fn test_empty_inputs() {
    let diff = diff_and_annotate("", "").unwrap();

    assert_eq!(diff.annotated(), "");
    assert!(diff.regions().is_empty());
}

#[test]
fn test_full_replacement() {
    let text = "Line 1\nLine 2\nLine 3\n";
    let diff = diff_and_annotate("", text).unwrap();

    assert_eq!(diff.hunk_count(), 1);
    let region = &diff.regions()[0];
    assert!(region.old_lines.is_empty());
    assert_eq!(region.new_lines, vec![2, 3, 4]);

    let doc = diff.document();
    let new: Vec<String> = region.new_lines.iter().filter_map(|&i| doc.line(i)).collect();
    assert_eq!(new, vec!["Line 1", "Line 2", "Line 3"]);
}

#[test]
fn test_full_deletion() {
    let text = "Line 1\nLine 2\n";
    let diff = diff_and_annotate(text, "").unwrap();

    assert_eq!(diff.hunk_count(), 1);
    let region = &diff.regions()[0];
    assert!(region.new_lines.is_empty());
    assert_eq!(region.old_lines, vec![1, 2]);
    assert_eq!(diff.removed_lines(), 2);
    assert_eq!(diff.added_lines(), 0);
}

#[test]
fn test_fix_without_final_newline() {
    // Markers still sit on their own lines
    let diff = diff_and_annotate("a\nb\n", "a\nx").unwrap();

    assert_eq!(
        diff.annotated(),
        format!("a\n{OPEN_MARKER}\nb\n{SEPARATOR}\nx\n{CLOSE_MARKER}\n")
    );
    assert_eq!(diff.regions()[0].new_lines, vec![4]);
}

#[test]
fn test_unicode_text() {
    let old = "Line 1\nLine 2 🚀\nLine 3 😊\n";
    let new = "Line 1\nLine 2 🚀\nLine 3 🎉\n";

    let diff = diff_and_annotate(old, new).unwrap();
    let region = &diff.regions()[0];

    assert_eq!(diff.document().line(region.old_lines[0]).as_deref(), Some("Line 3 😊"));
    assert_eq!(diff.document().line(region.new_lines[0]).as_deref(), Some("Line 3 🎉"));
}

#[test]
fn test_crlf_lines_keep_their_carriage_returns() {
    let old = "a\r\nb\r\n";
    let new = "a\r\nc\r\n";

    let diff = diff_and_annotate(old, new).unwrap();

    assert_eq!(
        diff.annotated(),
        format!("a\r\n{OPEN_MARKER}\nb\r\n{SEPARATOR}\nc\r\n{CLOSE_MARKER}\n")
    );
    assert_eq!(diff.hunk_count(), 1);
}

#[test]
fn test_very_large_diff() {
    let mut old = String::new();
    let mut new = String::new();

    // 1000 lines, every 10th one changed
    for i in 0..1000 {
        old.push_str(&format!("Line {} of old text\n", i));
        if i % 10 == 0 {
            new.push_str(&format!("MODIFIED Line {} of new text\n", i));
        } else {
            new.push_str(&format!("Line {} of old text\n", i));
        }
    }

    let diff = diff_and_annotate(&old, &new).unwrap();

    assert_eq!(diff.hunk_count(), 100);
    assert_eq!(diff.added_lines(), 100);
    assert_eq!(diff.removed_lines(), 100);
}

#[test]
fn test_extraction_is_idempotent() {
    let diff = diff_and_annotate("a\nb\nc\nd\n", "a\nB\nc\n").unwrap();

    let first = extract_regions(diff.annotated()).unwrap();
    let second = extract_regions(diff.annotated()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, diff.regions());
}

#[test]
fn test_text_without_markers_has_no_regions() {
    assert_eq!(extract_regions("plain\ntext\n"), Ok(vec![]));
    assert_eq!(extract_regions(""), Ok(vec![]));
}

#[test]
fn test_separator_outside_hunk() {
    let text = format!("a\n{SEPARATOR}\n");

    assert_eq!(
        extract_regions(&text),
        Err(MalformedAnnotation {
            line: 1,
            problem: AnnotationProblem::OutsideHunk(Marker::Separator),
        })
    );
}

#[test]
fn test_close_outside_hunk() {
    let text = format!("{CLOSE_MARKER}\n");

    assert_eq!(
        extract_regions(&text).unwrap_err().problem,
        AnnotationProblem::OutsideHunk(Marker::Close)
    );
}

#[test]
fn test_nested_open() {
    let text = format!("{OPEN_MARKER}\nold\n{OPEN_MARKER}\n");

    assert_eq!(
        extract_regions(&text),
        Err(MalformedAnnotation {
            line: 2,
            problem: AnnotationProblem::NestedOpen(0),
        })
    );
}

#[test]
fn test_close_before_separator() {
    let text = format!("{OPEN_MARKER}\nold\n{CLOSE_MARKER}\n");

    assert_eq!(
        extract_regions(&text).unwrap_err(),
        MalformedAnnotation {
            line: 2,
            problem: AnnotationProblem::CloseBeforeSeparator,
        }
    );
}

#[test]
fn test_duplicate_separator() {
    let text = format!("{OPEN_MARKER}\n{SEPARATOR}\nnew\n{SEPARATOR}\n{CLOSE_MARKER}\n");

    assert_eq!(
        extract_regions(&text).unwrap_err().problem,
        AnnotationProblem::DuplicateSeparator
    );
}

#[test]
fn test_unterminated_hunk() {
    let text = format!("a\n{OPEN_MARKER}\nold\n{SEPARATOR}\nnew\n");

    assert_eq!(
        extract_regions(&text).unwrap_err().problem,
        AnnotationProblem::Unterminated(1)
    );
}

#[test]
fn test_extractor_fed_line_by_line() {
    let mut extractor = RegionExtractor::new();
    for line in [OPEN_MARKER, "old", SEPARATOR, "new", CLOSE_MARKER, "tail"] {
        extractor.push_line(line).unwrap();
    }

    let regions = extractor.finish().unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].old_lines, vec![1]);
    assert_eq!(regions[0].merge_line, 2);
    assert_eq!(regions[0].new_lines, vec![3]);
    assert_eq!(regions[0].close_line, 4);
}

#[test]
fn test_misspelled_markers_are_content() {
    // Only exact marker lines count
    let text = format!(
        "{OPEN_MARKER}\n>>> OLD CODE\n{SEPARATOR}\n>>> FIXED CODE\n{CLOSE_MARKER}\n"
    );

    let regions = extract_regions(&text).unwrap();
    assert_eq!(regions[0].old_lines, vec![1]);
    assert_eq!(regions[0].new_lines, vec![3]);
}

#[test]
fn test_marker_lines_in_unchanged_code() {
    let text = format!("x\n{SEPARATOR}\n{OPEN_MARKER}\ny\n");
    let diff = diff_and_annotate(&text, &text).unwrap();

    assert_eq!(diff.annotated(), text);
    assert!(diff.regions().is_empty());
    assert_eq!(diff.line_kind(1), Some(AnnotatedLineKind::Unchanged));
}

#[test]
fn test_marker_lines_around_an_edit() {
    let original = format!("x\n{SEPARATOR}\ny\n");
    let revised = format!("x\n{SEPARATOR}\nz\n");
    let diff = diff_and_annotate(&original, &revised).unwrap();

    assert_eq!(
        diff.annotated(),
        format!("x\n{SEPARATOR}\n{OPEN_MARKER}\ny\n{SEPARATOR}\nz\n{CLOSE_MARKER}\n")
    );
    assert_eq!(
        diff.regions().to_vec(),
        vec![ChangeRegion {
            old_lines: vec![3],
            new_lines: vec![5],
            merge_line: 4,
            open_line: 2,
            close_line: 6,
        }]
    );
    assert_eq!(diff.line_kind(1), Some(AnnotatedLineKind::Unchanged));
    assert_eq!(diff.line_kind(4), Some(AnnotatedLineKind::Marker));
}

#[test]
fn test_removing_a_marker_line() {
    let original = format!("a\n{CLOSE_MARKER}\n");
    let diff = diff_and_annotate(&original, "a\n").unwrap();

    let region = &diff.regions()[0];
    assert_eq!(region.old_lines, vec![2]);
    assert!(region.is_deletion());
    assert_eq!(diff.document().line(2).as_deref(), Some(CLOSE_MARKER));
    assert_eq!(diff.line_kind(2), Some(AnnotatedLineKind::Old));
}

#[test]
fn test_trimmed_comparison_keeps_revised_whitespace() {
    // Equal after trimming, so the revised line is what shows
    let diff = diff_and_annotate("a  \nb\n", "a\nb\n").unwrap();
    assert_eq!(diff.annotated(), "a\nb\n");
    assert!(!diff.has_changes());

    // Exact comparison keeps the original line in an old block
    let exact = DiffConfig::exact()
        .diff_and_annotate("a  \nb\n", "a\nb\n")
        .unwrap();
    assert_eq!(exact.regions()[0].old_lines, vec![1]);
    assert_eq!(exact.document().line(1).as_deref(), Some("a  "));
}
