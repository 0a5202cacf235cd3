//! Backtracking parser combinators over a token slice
//!
//! A [`Parser`] either succeeds with a [`Value`] and advances the
//! [`Cursor`], or fails and leaves the cursor exactly where it was. Every
//! combinator that can fail after consuming input restores the saved
//! position itself, so callers never observe partial consumption.
//!
//! Failures are not errors: the cursor remembers the furthest position at
//! which any primitive failed and what it wanted there, and the statement
//! driver turns that into a [`ParseError::Syntax`](crate::ParseError).

use std::collections::HashMap;
use std::rc::Rc;

use sqlfold_ast::Span;
use sqlfold_lexer::{Token, TokenKind};

/// Result payload of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An `optional` that did not match
    Empty,
    /// A single matched token
    Token(Token),
    /// Unlabelled results in match order
    Positional(Vec<Value>),
    /// Labelled results; names are unique within one sequence
    Named(HashMap<String, Value>),
}

impl Value {
    /// Look up a labelled field
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Named(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Text of a single-token value
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Token(token) => Some(&token.text),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Value::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Items of a positional value; a lone non-list value is one item
    pub fn items(&self) -> &[Value] {
        match self {
            Value::Positional(items) => items,
            Value::Empty => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// Tokens in match order. Named values are skipped since their fields
    /// carry no order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'v>(&'v self, out: &mut Vec<&'v Token>) {
        match self {
            Value::Token(token) => out.push(token),
            Value::Positional(items) => items.iter().for_each(|item| item.collect_tokens(out)),
            Value::Empty | Value::Named(_) => {}
        }
    }

    /// Token texts joined by single spaces, e.g. `NOT NULL`
    pub fn phrase(&self) -> String {
        self.tokens()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
struct Expectation {
    position: usize,
    expected: Vec<String>,
}

/// Read position into a token slice
pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    eof: Token,
    furthest: Option<Expectation>,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::EndOfInput,
                text: String::new(),
                span: Span::new(end, end),
            },
            furthest: None,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind (or fast-forward) to a saved position
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn peek(&self) -> &Token {
        self.token_at(self.pos)
    }

    pub fn token_at(&self, pos: usize) -> &Token {
        self.tokens.get(pos).unwrap_or(&self.eof)
    }

    pub fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfInput
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Span covering tokens `start..end`
    pub fn span_between(&self, start: usize, end: usize) -> Span {
        let first = self.token_at(start).span;
        if end <= start {
            return Span::new(first.start, first.start);
        }
        first.merge(self.token_at(end - 1).span)
    }

    /// Record that `expected` was wanted at the current position
    pub fn expect(&mut self, expected: &str) {
        let pos = self.pos;
        if let Some(e) = &mut self.furthest {
            if e.position > pos {
                return;
            }
            if e.position == pos {
                if !e.expected.iter().any(|x| x == expected) {
                    e.expected.push(expected.to_string());
                }
                return;
            }
        }
        self.furthest = Some(Expectation {
            position: pos,
            expected: vec![expected.to_string()],
        });
    }

    /// Furthest failure position and the descriptions expected there
    pub fn furthest_failure(&self) -> Option<(usize, &[String])> {
        self.furthest
            .as_ref()
            .map(|e| (e.position, e.expected.as_slice()))
    }

    pub fn clear_failures(&mut self) {
        self.furthest = None;
    }
}

type ParseFn = dyn Fn(&mut Cursor<'_>) -> Option<Value>;

/// A composable parser
#[derive(Clone)]
pub struct Parser {
    run: Rc<ParseFn>,
}

impl Parser {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Cursor<'_>) -> Option<Value> + 'static,
    {
        Self { run: Rc::new(f) }
    }

    pub fn parse(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        (self.run)(cursor)
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Parser")
    }
}

// === Primitives ===

/// Consume one token satisfying `accept`
fn one<F>(expected: String, accept: F) -> Parser
where
    F: Fn(&Token) -> bool + 'static,
{
    Parser::new(move |cursor| {
        if accept(cursor.peek()) {
            Some(Value::Token(cursor.advance()))
        } else {
            cursor.expect(&expected);
            None
        }
    })
}

pub fn keyword(word: &str) -> Parser {
    let word = word.to_string();
    one(format!("'{}'", word), move |t| t.is_keyword(&word))
}

pub fn token_kind(kind: TokenKind) -> Parser {
    one(kind.describe().to_string(), move |t| t.kind == kind)
}

pub fn identifier() -> Parser {
    token_kind(TokenKind::Identifier)
}

pub fn literal() -> Parser {
    token_kind(TokenKind::Literal)
}

pub fn datatype() -> Parser {
    token_kind(TokenKind::Datatype)
}

pub fn equals() -> Parser {
    token_kind(TokenKind::Equals)
}

/// `,` or `;`
pub fn delimiter(ch: char) -> Parser {
    one(format!("'{}'", ch), move |t| {
        t.kind == TokenKind::Delimiter && t.text.len() == 1 && t.text.starts_with(ch)
    })
}

// === Combinators ===

/// All parsers in order; named results merge into one map, the rest are
/// collected positionally. The map wins when both are present.
pub fn sequence(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    let parsers: Vec<Parser> = parsers.into_iter().collect();
    Parser::new(move |cursor| {
        let start = cursor.position();
        let mut named = HashMap::new();
        let mut positional = Vec::new();

        for parser in &parsers {
            match parser.parse(cursor) {
                None => {
                    cursor.reset(start);
                    return None;
                }
                Some(Value::Empty) => {}
                Some(Value::Named(fields)) => named.extend(fields),
                Some(value) => positional.push(value),
            }
        }

        if named.is_empty() {
            Some(Value::Positional(positional))
        } else {
            Some(Value::Named(named))
        }
    })
}

/// First alternative that succeeds, in listed order
pub fn choice(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    let parsers: Vec<Parser> = parsers.into_iter().collect();
    Parser::new(move |cursor| {
        let start = cursor.position();
        for parser in &parsers {
            if let Some(value) = parser.parse(cursor) {
                return Some(value);
            }
            cursor.reset(start);
        }
        None
    })
}

/// One or more `parser` with no separator; fails on zero matches
pub fn many(parser: Parser) -> Parser {
    repeat(parser, None)
}

/// One or more `parser` separated by `separator`; a trailing separator is
/// left unconsumed
pub fn many_sep(parser: Parser, separator: Parser) -> Parser {
    repeat(parser, Some(separator))
}

fn repeat(parser: Parser, separator: Option<Parser>) -> Parser {
    Parser::new(move |cursor| {
        let mut items = Vec::new();
        loop {
            let mark = cursor.position();
            if !items.is_empty() {
                if let Some(separator) = &separator {
                    if separator.parse(cursor).is_none() {
                        break;
                    }
                }
            }
            match parser.parse(cursor) {
                Some(value) => items.push(value),
                None => {
                    cursor.reset(mark);
                    break;
                }
            }
            // Zero-width match would loop forever
            if cursor.position() == mark {
                break;
            }
        }

        if items.is_empty() {
            None
        } else {
            Some(Value::Positional(items))
        }
    })
}

/// Always succeeds; [`Value::Empty`] when `parser` does not match
pub fn optional(parser: Parser) -> Parser {
    Parser::new(move |cursor| Some(parser.parse(cursor).unwrap_or(Value::Empty)))
}

/// Wrap a result as `{name: value}` so `sequence` merges it by name
pub fn label(name: &str, parser: Parser) -> Parser {
    let name = name.to_string();
    Parser::new(move |cursor| match parser.parse(cursor)? {
        Value::Empty => Some(Value::Empty),
        value => Some(Value::Named(HashMap::from([(name.clone(), value)]))),
    })
}
