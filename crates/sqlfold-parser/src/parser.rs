//! Top-level statement dispatch

use sqlfold_ast::{Schema, Span, Statement};
use sqlfold_lexer::{Token, TokenKind};

use crate::combinator::{Cursor, Parser, Value};
use crate::grammar;
use crate::ParseError;

const STATEMENT_KEYWORDS: &str = "'CREATE', 'ALTER', 'INSERT' or 'UPDATE'";

/// Builds a statement node from a grammar result and its source span
type Builder = fn(&Value, Span) -> Result<Statement, ParseError>;

/// A statement grammar paired with its AST builder
struct Rule {
    name: &'static str,
    parser: Parser,
    build: Builder,
}

impl Rule {
    fn new(name: &'static str, parser: Parser, build: Builder) -> Self {
        Self { name, parser, build }
    }
}

fn build_create_table(value: &Value, span: Span) -> Result<Statement, ParseError> {
    grammar::build_create_table(value, span).map(Statement::CreateTable)
}

fn build_alter_table(value: &Value, span: Span) -> Result<Statement, ParseError> {
    grammar::build_alter_table(value, span).map(Statement::AlterTable)
}

fn build_insert(value: &Value, span: Span) -> Result<Statement, ParseError> {
    grammar::build_insert(value, span).map(Statement::Insert)
}

fn build_update(value: &Value, span: Span) -> Result<Statement, ParseError> {
    grammar::build_update(value, span).map(Statement::Update)
}

/// Parses a token stream into a [`Schema`], one statement at a time.
///
/// Each statement is chosen by its leading keyword; anything else is a
/// hard error. There is no recovery: the first error ends the parse.
pub struct SchemaParser {
    tokens: Vec<Token>,
    create_table: Rule,
    alter_table: Rule,
    insert: Rule,
    update: Rule,
}

impl SchemaParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            create_table: Rule::new("create_table", grammar::create_table(), build_create_table),
            alter_table: Rule::new("alter_table", grammar::alter_table(), build_alter_table),
            insert: Rule::new("insert", grammar::insert(), build_insert),
            update: Rule::new("update", grammar::update(), build_update),
        }
    }

    pub fn parse_schema(&self) -> Result<Schema, ParseError> {
        let mut cursor = Cursor::new(&self.tokens);
        let mut body = Vec::new();

        while !cursor.at_end() {
            body.push(self.parse_statement(&mut cursor)?);
        }

        Ok(Schema::new(body))
    }

    fn parse_statement(&self, cursor: &mut Cursor<'_>) -> Result<Statement, ParseError> {
        let start = cursor.position();
        let rule = match leading_keyword(cursor) {
            Some("CREATE") => &self.create_table,
            Some("ALTER") => &self.alter_table,
            Some("INSERT") => &self.insert,
            Some("UPDATE") => &self.update,
            _ => {
                return Err(ParseError::unexpected(
                    STATEMENT_KEYWORDS,
                    cursor.peek(),
                    start,
                ))
            }
        };

        tracing::debug!(rule = rule.name, position = start, "parsing statement");
        cursor.clear_failures();
        match rule.parser.parse(cursor) {
            Some(value) => {
                let span = cursor.span_between(start, cursor.position());
                (rule.build)(&value, span)
            }
            None => Err(syntax_error(cursor)),
        }
    }
}

fn leading_keyword<'c>(cursor: &'c Cursor<'_>) -> Option<&'c str> {
    let token = cursor.peek();
    (token.kind == TokenKind::Keyword).then_some(token.text.as_str())
}

/// Turn the cursor's furthest recorded failure into a syntax error
fn syntax_error(cursor: &Cursor<'_>) -> ParseError {
    let (position, expected) = match cursor.furthest_failure() {
        Some((position, expected)) => (position, describe_expected(expected)),
        None => (cursor.position(), "a statement".to_string()),
    };
    ParseError::unexpected(expected, cursor.token_at(position), position)
}

/// `a`, `a or b`, `a, b or c`
fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "a statement".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
