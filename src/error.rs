use crate::position::Span;
use thiserror::Error;

/// Every failure the pipeline can report. Each variant renders as
/// `source:line:column: message`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("{span}: Cannot redeclare variable '{name}'")]
    Redeclaration { name: String, span: Span },

    #[error("{span}: Cannot assign an undeclared variable '{name}'")]
    UndeclaredAssignment { name: String, span: Span },

    #[error("{span}: Cannot call non-function value {value}")]
    NonFunctionCall { value: String, span: Span },

    #[error("{span}: {message}")]
    TypeMismatch { message: String, span: Span },

    #[error("{span}: Cannot divide by 0")]
    DivideByZero { span: Span },

    /// An internal inconsistency: the evaluator met a node it cannot handle.
    #[error("{span}: This AST node cannot be interpreted: {kind}")]
    UnhandledNode { kind: String, span: Span },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn syntax(message: impl Into<String>, span: Span) -> Error {
        Error::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Error {
        Error::TypeMismatch {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Error::Syntax { span, .. }
            | Error::Redeclaration { span, .. }
            | Error::UndeclaredAssignment { span, .. }
            | Error::NonFunctionCall { span, .. }
            | Error::TypeMismatch { span, .. }
            | Error::DivideByZero { span }
            | Error::UnhandledNode { span, .. } => span,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Syntax { .. } => "SyntaxError",
            Error::Redeclaration { .. } => "RedeclarationError",
            Error::UndeclaredAssignment { .. } => "UndeclaredAssignmentError",
            Error::NonFunctionCall { .. } => "NonFunctionCallError",
            Error::TypeMismatch { .. } => "TypeMismatchError",
            Error::DivideByZero { .. } => "DivideByZeroError",
            Error::UnhandledNode { .. } => "UnhandledNodeError",
        }
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::Error;
    use crate::position::{Position, Span};

    #[test]
    fn diagnostic_format() {
        let mut pos = Position::new("script.ql");
        for c in "let\n  x".chars() {
            pos.advance(c);
        }
        let err = Error::DivideByZero {
            span: Span::at(pos),
        };
        assert_eq!(err.to_string(), "script.ql:2:4: Cannot divide by 0");
        assert_eq!(err.kind_name(), "DivideByZeroError");
    }

    #[test]
    fn syntax_message_is_verbatim() {
        let err = Error::syntax("Expected ')'", Span::at(Position::new("<stdin>")));
        assert_eq!(err.to_string(), "<stdin>:1:1: Expected ')'");
        assert_eq!(err.span().left.index, 0);
    }
}
