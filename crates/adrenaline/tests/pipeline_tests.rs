use adrenaline::render::{render_annotated, render_json};
use adrenaline::{propose_fix, EditProvider, FixError, FixRequest, ProviderError};
use fix_diff::{extract_regions, DiffConfig};
use pretty_assertions::assert_eq;

/// Applies a fixed search-and-replace instead of calling a service
struct ReplaceProvider {
    from: &'static str,
    to: &'static str,
}

impl EditProvider for ReplaceProvider {
    fn suggest_edit(&self, code: &str, _instruction: &str) -> Result<String, ProviderError> {
        Ok(code.replace(self.from, self.to))
    }
}

struct UnauthorizedProvider;

impl EditProvider for UnauthorizedProvider {
    fn suggest_edit(&self, _code: &str, _instruction: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unauthorized(401))
    }
}

const BROKEN: &str = "function add(a, b) {\n  return a - b;\n}\n\nconsole.log(add(1, 2));\n";

#[test]
fn test_fix_error_round_trip() {
    let provider = ReplaceProvider {
        from: "a - b",
        to: "a + b",
    };
    let request = FixRequest::FixError {
        stack_trace: "AssertionError: expected 3\n    at test.js:4".to_string(),
    };

    let proposal = propose_fix(&provider, &DiffConfig::default(), BROKEN, request).unwrap();
    let diff = &proposal.diff;

    assert_eq!(diff.hunk_count(), 1);
    assert_eq!(diff.fixed_text(), BROKEN.replace("a - b", "a + b"));

    let region = &diff.regions()[0];
    assert_eq!(
        diff.document().line(region.old_lines[0]).as_deref(),
        Some("  return a - b;")
    );
    assert_eq!(
        diff.document().line(region.new_lines[0]).as_deref(),
        Some("  return a + b;")
    );

    // The JSON reply carries regions a display layer can trust
    let json: serde_json::Value = serde_json::from_str(&render_json(diff).unwrap()).unwrap();
    let merged = json["mergedCode"].as_str().unwrap();
    assert_eq!(extract_regions(merged).unwrap(), diff.regions());
}

#[test]
fn test_rendering_lists_every_line() {
    let provider = ReplaceProvider {
        from: "console.log",
        to: "console.info",
    };

    let proposal =
        propose_fix(&provider, &DiffConfig::default(), BROKEN, FixRequest::Optimize).unwrap();
    let rendered = render_annotated(&proposal.diff, false);

    // Five source lines plus three marker lines and the new line
    assert_eq!(rendered.lines().count(), 9);
    assert!(rendered.contains("console.info(add(1, 2));"));
}

#[test]
fn test_provider_errors_stay_provider_errors() {
    let err = propose_fix(
        &UnauthorizedProvider,
        &DiffConfig::default(),
        BROKEN,
        FixRequest::Lint,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        FixError::Provider(ProviderError::Unauthorized(401))
    ));
    assert_eq!(
        err.to_string(),
        "edit service failed: service rejected the credentials (HTTP 401)"
    );
}
