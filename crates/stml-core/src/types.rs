use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 1 },
            end: SourceLocation { line: 1, column: 1 },
        }
    }

    /// Span covering `width` characters of a single line, 1-based.
    pub fn line(line: usize, width: usize) -> Self {
        Self {
            start: SourceLocation { line, column: 1 },
            end: SourceLocation {
                line,
                column: width + 1,
            },
        }
    }
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn line_span_covers_the_whole_line() {
        let span = SourceSpan::line(4, 12);
        assert_eq!(span.start, SourceLocation { line: 4, column: 1 });
        assert_eq!(span.end, SourceLocation { line: 4, column: 13 });
        assert_eq!(SourceSpan::synthetic().start.line, 1);
    }
}
