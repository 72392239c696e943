// Core diff library for Adrenaline
// This crate turns submitted code and a proposed fix into one annotated
// document with delimited old/fixed hunks, and locates each hunk in it

mod annotate;
mod annotated_diff;
mod change_region;
mod line_diff;
mod marker;

pub use annotate::{annotate, AnnotatedDocument, MergeAnnotator};
pub use annotated_diff::{diff_and_annotate, AnnotatedDiff, AnnotatedLineKind, MergeReply};
pub use change_region::{
    extract_regions, AnnotationProblem, ChangeRegion, MalformedAnnotation, RegionExtractor,
};
pub use line_diff::{diff_lines, DiffConfig, DiffPart, DiffPartKind};
pub use marker::{Marker, CLOSE_MARKER, OPEN_MARKER, SEPARATOR};

pub use similar::Algorithm;
