//! Diagnostics for the csyn parsing pipeline.
//!
//! Parsing never aborts: lexical and syntactic problems become diagnostics
//! attached to the parse result while the tree is still produced
//! best-effort. A [`Diagnostic`] is a code, a severity, a message and one or
//! more labeled spans; rendering (colors, source excerpts) belongs to the
//! consumer.

use std::fmt;

use csyn_ir::Span;

/// Error codes for all syntax-layer diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: lexical errors
/// - E1xxx: parse errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexical errors (E0xxx)
    /// Byte sequence no token pattern accepts.
    E0001,
    /// Unterminated block comment.
    E0002,
    /// Unterminated string literal.
    E0003,
    /// Unterminated character literal.
    E0004,
    /// Incomplete universal character name (`\u` / `\U` escape).
    E0005,

    // Parse errors (E1xxx)
    /// Unexpected token.
    E1001,
    /// Expected an expression.
    E1002,
    /// Unclosed delimiter.
    E1003,
    /// Expected an identifier.
    E1004,
    /// Expected a type.
    E1005,
    /// Expected a declarator.
    E1006,
    /// Expected a statement.
    E1007,
    /// Malformed preprocessor directive.
    E1008,
    /// Expected a declaration.
    E1009,
}

impl ErrorCode {
    /// Short human-readable description of the error class.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unrecognized character",
            ErrorCode::E0002 => "unterminated block comment",
            ErrorCode::E0003 => "unterminated string literal",
            ErrorCode::E0004 => "unterminated character literal",
            ErrorCode::E0005 => "incomplete universal character name",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "expected type",
            ErrorCode::E1006 => "expected declarator",
            ErrorCode::E1007 => "expected statement",
            ErrorCode::E1008 => "malformed preprocessor directive",
            ErrorCode::E1009 => "expected declaration",
        }
    }

    /// Whether this is a lexical-phase code.
    pub const fn is_lexical(self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0004
                | ErrorCode::E0005
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled source location inside a diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    /// Create a new label.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
        }
    }
}

/// A complete diagnostic: code, severity, message, labeled spans.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic with the code's default message.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: code.description().to_owned(),
            labels: Vec::new(),
        }
    }

    /// Replace the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a labeled span.
    #[must_use]
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message));
        self
    }

    /// The primary span, if any label was attached.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|l| l.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            write!(f, "\n  at {}: {}", label.span, label.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_code_phases() {
        assert!(ErrorCode::E0001.is_lexical());
        assert!(ErrorCode::E0005.is_lexical());
        assert!(!ErrorCode::E1001.is_lexical());
    }

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error(ErrorCode::E1001)
            .with_message("unexpected `;`")
            .with_label(Span::new(4, 5), "here");

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "unexpected `;`");
        assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(ErrorCode::E0003).with_label(Span::new(10, 12), "opened here");
        let rendered = diag.to_string();
        assert!(rendered.contains("error[E0003]"));
        assert!(rendered.contains("unterminated string literal"));
        assert!(rendered.contains("10..12"));
    }

    #[test]
    fn test_default_message_from_code() {
        let diag = Diagnostic::error(ErrorCode::E1005);
        assert_eq!(diag.message, "expected type");
    }
}
