//! Error types for the conformance harness.

use crate::output::OutputShape;
use thiserror::Error;

/// Errors produced while driving the module lifecycle or extracting outputs.
///
/// Every variant that originates from the external tool carries the captured
/// stderr verbatim, so a failing test prints the real diagnostic instead of a
/// summary of it.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The external binary could not be spawned or waited on.
    #[error("failed to run terraform: {0}")]
    Io(#[from] std::io::Error),

    /// The external tool exited non-zero.
    #[error("terraform {command} exited with code {exit_code}: {stderr}")]
    Execution {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// An output exists but was requested with the wrong shape.
    #[error("output '{name}' is a {actual}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: OutputShape,
        actual: OutputShape,
    },

    /// The requested output is not declared by the module.
    #[error("output '{0}' is not declared by the module")]
    NotFound(String),

    /// Apply kept failing after the retry budget was spent.
    #[error("apply failed after {attempts} attempt(s): {source}")]
    ApplyFailed {
        attempts: u32,
        #[source]
        source: Box<HarnessError>,
    },

    /// A scenario assertion failed after a successful apply.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// `terraform output -json` produced an unparseable document.
    #[error("failed to parse terraform output: {0}")]
    OutputParse(String),
}

/// Result type alias using [`HarnessError`].
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_keeps_stderr_verbatim() {
        let error = HarnessError::Execution {
            command: "apply".to_string(),
            exit_code: 1,
            stderr: "Error: creating Droplet: 429 Too Many Requests".to_string(),
        };

        let rendered = error.to_string();
        assert!(rendered.contains("terraform apply exited with code 1"));
        assert!(rendered.contains("429 Too Many Requests"));
    }

    #[test]
    fn test_apply_failed_preserves_source_diagnostics() {
        let source = HarnessError::Execution {
            command: "apply".to_string(),
            exit_code: 1,
            stderr: "Error: rate limit exceeded, retry later".to_string(),
        };
        let error = HarnessError::ApplyFailed {
            attempts: 4,
            source: Box::new(source),
        };

        let rendered = error.to_string();
        assert!(rendered.contains("after 4 attempt(s)"));
        assert!(
            rendered.contains("rate limit exceeded, retry later"),
            "exhaustion must not replace the original diagnostic text"
        );
    }

    #[test]
    fn test_type_mismatch_names_both_shapes() {
        let error = HarnessError::TypeMismatch {
            name: "droplet_public_ips".to_string(),
            expected: OutputShape::Scalar,
            actual: OutputShape::Map,
        };

        assert_eq!(
            error.to_string(),
            "output 'droplet_public_ips' is a map, not a scalar"
        );
    }
}
