//! Parser error types

use sqlfold_ast::Span;
use sqlfold_lexer::{LexError, Token};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("syntax error: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        /// Index of the offending token
        position: usize,
        span: Span,
    },

    #[error("INSERT INTO {table}: row {row} has {actual_values} values, expected {expected_columns}")]
    ArityMismatch {
        table: String,
        /// Zero-based row index
        row: usize,
        expected_columns: usize,
        actual_values: usize,
        span: Span,
    },

    /// A grammar matched but its result lacks a field its builder needs
    #[error("malformed {rule} parse result")]
    MalformedNode { rule: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Syntax { span, .. } => *span,
            ParseError::ArityMismatch { span, .. } => *span,
            ParseError::MalformedNode { span, .. } => *span,
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Lex(LexError::UnterminatedString { .. }) => "E-LEX-001",
            ParseError::Lex(LexError::UnexpectedCharacter { .. }) => "E-LEX-002",
            ParseError::Syntax { .. } => "E-SYNTAX-001",
            ParseError::ArityMismatch { .. } => "E-ARITY-001",
            ParseError::MalformedNode { .. } => "E-INTERNAL-001",
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: &Token, position: usize) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.describe(),
            position,
            span: found.span,
        }
    }
}
