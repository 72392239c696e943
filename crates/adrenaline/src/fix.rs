//! From code and a request to an annotated fix proposal

use fix_diff::{AnnotatedDiff, DiffConfig, MalformedAnnotation};
use thiserror::Error;

use crate::provider::{EditProvider, ProviderError};
use crate::request::FixRequest;

/// Why a fix could not be proposed
#[derive(Debug, Error)]
pub enum FixError {
    /// The edit-suggestion service failed
    #[error("edit service failed: {0}")]
    Provider(#[from] ProviderError),

    /// The annotated document could not be read back
    #[error(transparent)]
    Annotation(#[from] MalformedAnnotation),
}

/// A proposed fix, ready for display
#[derive(Debug, Clone)]
pub struct FixProposal {
    /// What was asked for
    pub request: FixRequest,

    /// Submitted code, fixed code and the annotated merge of both
    pub diff: AnnotatedDiff,
}

/// Ask `provider` for a fix and annotate it against `code`.
///
/// The diff only runs once the provider has returned revised code.
pub fn propose_fix(
    provider: &dyn EditProvider,
    config: &DiffConfig,
    code: &str,
    request: FixRequest,
) -> Result<FixProposal, FixError> {
    let instruction = request.instruction();
    log::info!("Requesting {} ({} bytes of code)", request, code.len());

    let revised = provider.suggest_edit(code, &instruction)?;
    let diff = config.diff_and_annotate(code, &revised)?;

    log::info!(
        "Proposal has {} hunk(s): +{} -{}",
        diff.hunk_count(),
        diff.added_lines(),
        diff.removed_lines()
    );

    Ok(FixProposal { request, diff })
}
