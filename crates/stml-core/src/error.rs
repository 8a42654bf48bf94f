use crate::types::SourceSpan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of an engine failure.
///
/// `Malformed` errors come from the address itself and are reported back to
/// the author of the document. `Violation` errors come from the state of the
/// tree: a policy forbids the write, the target has the wrong kind, or an
/// internal invariant no longer holds. `Io` errors come from reading
/// documents before any engine sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StmlErrorKind {
    Malformed,
    Violation,
    Io,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct StmlError {
    pub kind: StmlErrorKind,
    pub code: String,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl StmlError {
    pub fn new(kind: StmlErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn malformed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StmlErrorKind::Malformed, code, message)
    }

    pub fn violation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StmlErrorKind::Violation, code, message)
    }

    pub fn io(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StmlErrorKind::Io, code, message)
    }

    /// Attaches a source position, keeping an already attached one.
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == StmlErrorKind::Malformed
    }

    pub fn is_violation(&self) -> bool {
        self.kind == StmlErrorKind::Violation
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_code() {
        let error = StmlError::malformed("NAME_MISPLACED_DOT", "bad dot");
        assert!(error.is_malformed());
        assert!(!error.is_violation());
        assert_eq!(error.code, "NAME_MISPLACED_DOT");
        assert_eq!(error.to_string(), "NAME_MISPLACED_DOT: bad dot");

        let error = StmlError::violation("SCOPE_CLOSED_ADD", "closed");
        assert!(error.is_violation());
        assert_eq!(error.span, None);

        let error = StmlError::io("CLI_SOURCE_READ", "denied");
        assert_eq!(error.kind, StmlErrorKind::Io);
        assert!(!error.is_malformed());
        assert!(!error.is_violation());
    }

    #[test]
    fn with_span_keeps_the_first_position() {
        let error = StmlError::violation("SCOPE_FINAL_OVERRIDE", "final")
            .with_span(SourceSpan::line(3, 10))
            .with_span(SourceSpan::line(7, 2));
        let span = error.span.expect("span");
        assert_eq!(span.start.line, 3);
        assert_eq!(span.end.column, 11);
    }
}
