//! sqlfold Lexer - Tokenization using logos
//!
//! Produces classified tokens for the migration dialect:
//! - words are split into keywords, datatypes and identifiers by a
//!   [`Vocabulary`], case-sensitively
//! - quoted literals keep their quote characters
//! - `,` and `;` are both delimiters
//!
//! The token stream always ends with an `EndOfInput` token.

mod error;
mod token;

pub use error::*;
pub use token::*;

use logos::Logos;
use sqlfold_ast::Span;

/// Tokenize a source string with the default vocabulary
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(source, &Vocabulary::default())
}

/// Tokenize a source string, classifying words with `vocabulary`
pub fn tokenize_with(source: &str, vocabulary: &Vocabulary) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Lexeme::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        let text = lexer.slice();
        let kind = match result {
            Ok(Lexeme::LParen) => TokenKind::LeftParen,
            Ok(Lexeme::RParen) => TokenKind::RightParen,
            Ok(Lexeme::Delimiter) => TokenKind::Delimiter,
            Ok(Lexeme::Equals) => TokenKind::Equals,
            Ok(Lexeme::Quoted) | Ok(Lexeme::Digits) => TokenKind::Literal,
            Ok(Lexeme::Word) => vocabulary.classify(text),
            Ok(Lexeme::Unterminated) => return Err(LexError::UnterminatedString { span }),
            Err(()) => {
                let ch = text.chars().next().unwrap_or_default();
                let span = Span::new(span.start, span.start + ch.len_utf8());
                return Err(LexError::UnexpectedCharacter { ch, span });
            }
        };
        tokens.push(Token {
            kind,
            text: text.to_string(),
            span,
        });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::EndOfInput,
        text: String::new(),
        span: Span::new(end, end),
    });

    Ok(tokens)
}

/// A classified token with its source text and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// Human readable form for diagnostics, e.g. "identifier `name`"
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => self.kind.describe().to_string(),
            kind => format!("{} `{}`", kind.describe(), self.text),
        }
    }
}
