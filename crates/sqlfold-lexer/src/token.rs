//! Token definitions for the migration-script dialect

use std::collections::HashSet;

use logos::Logos;

/// Raw lexeme shapes recognised by logos; words are classified afterwards
/// against a [`Vocabulary`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
pub(crate) enum Lexeme {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    #[token(";")]
    Delimiter,
    #[token("=")]
    Equals,

    // Quoted literals keep their quotes; there are no escapes
    #[regex(r"'[^']*'")]
    #[regex(r#""[^"]*""#)]
    Quoted,

    // An opening quote that runs to end of input
    #[regex(r"'[^']*")]
    #[regex(r#""[^"]*"#)]
    Unterminated,

    #[regex(r"[0-9]+")]
    Digits,

    #[regex(r"[A-Za-z_]+")]
    Word,
}

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Datatype,
    LeftParen,
    RightParen,
    Literal,
    /// `,` or `;`
    Delimiter,
    Equals,
    EndOfInput,
    /// Not produced by [`tokenize`](crate::tokenize), which rejects
    /// unrecognised characters with a [`LexError`](crate::LexError)
    Unknown,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Datatype => "datatype",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Literal => "literal",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Equals => "'='",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Unknown => "unknown token",
        }
    }
}

/// Reserved words of the dialect
pub const KEYWORDS: &[&str] = &[
    "CREATE",
    "TABLE",
    "ALTER",
    "ADD",
    "DROP",
    "COLUMN",
    "INSERT",
    "INTO",
    "UPDATE",
    "SET",
    "WHERE",
    "PRIMARY",
    "KEY",
    "NOT",
    "NULL",
    "VALUES",
    "UNIQUE",
    "IF",
    "EXISTS",
    "AUTO_INCREMENT",
    "CONSTRAINT",
    "FOREIGN",
    "REFERENCES",
    "DEFAULT",
    "AND",
];

/// Column type names recognised out of the box
pub const DATATYPES: &[&str] = &["INT", "VARCHAR", "TINYINT"];

/// Word classification tables.
///
/// Matching is case-sensitive: `create` is an identifier, not `CREATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    keywords: HashSet<String>,
    datatypes: HashSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            keywords: KEYWORDS.iter().map(|k| k.to_string()).collect(),
            datatypes: DATATYPES.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Add a datatype name, e.g. `DECIMAL`
    pub fn with_datatype(mut self, name: impl Into<String>) -> Self {
        self.datatypes.insert(name.into());
        self
    }

    pub fn with_datatypes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datatypes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    pub fn is_datatype(&self, word: &str) -> bool {
        self.datatypes.contains(word)
    }

    /// Keyword first, then datatype, else identifier
    pub fn classify(&self, word: &str) -> TokenKind {
        if self.is_keyword(word) {
            TokenKind::Keyword
        } else if self.is_datatype(word) {
            TokenKind::Datatype
        } else {
            TokenKind::Identifier
        }
    }
}
