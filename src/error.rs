use std::fmt;

/// Source location span
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Create an empty/unknown span (used for synthesized nodes)
    pub fn empty() -> Self {
        Span { start: 0, end: 0 }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Span covering both input spans
    pub fn join(&self, other: Span) -> Span {
        if !self.is_valid() {
            return other;
        }
        if !other.is_valid() {
            return *self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Errors that can occur while parsing a script
///
/// The normalization engine itself has no error surface: rules decline by
/// returning `None` and the driver leaves the input as-is. Only the parser
/// front end can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    EmptySource,
    InvalidNumber {
        value: String,
        span: Span,
    },
    UnexpectedChar {
        ch: char,
        span: Span,
    },
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },
    UnexpectedEndOfInput,
}

impl ParseError {
    pub fn unexpected_token(expected: impl Into<String>, got: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            got: got.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptySource => write!(f, "Source cannot be empty"),
            ParseError::InvalidNumber { value, span } => {
                write!(f, "Invalid number format: '{}'{}", value, span.display())
            }
            ParseError::UnexpectedChar { ch, span } => {
                write!(f, "Unexpected character '{}'{}", ch, span.display())
            }
            ParseError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(f, "Expected {}, but got '{}'{}", expected, got, span.display())
            }
            ParseError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(0, 1).display(), " at position 1");
        assert_eq!(Span::new(2, 5).display(), " at positions 3-5");
        assert_eq!(Span::empty().display(), "");
    }

    #[test]
    fn test_span_join() {
        let joined = Span::new(2, 4).join(Span::new(7, 9));
        assert_eq!(joined, Span::new(2, 9));
        assert_eq!(Span::empty().join(Span::new(1, 3)), Span::new(1, 3));
    }
}
