//! sqlfold Parser - Combinator-based statement parser
//!
//! Parses migration scripts (CREATE TABLE, ALTER TABLE, INSERT, UPDATE)
//! into a [`Schema`]. Grammars are composed from the backtracking
//! combinators in [`combinator`]; a failed alternative never leaves input
//! consumed.

pub mod combinator;
mod error;
pub mod grammar;
mod parser;

pub use error::*;
pub use parser::*;

use sqlfold_ast::Schema;
use sqlfold_lexer::{tokenize_with, Vocabulary};

/// Parse a source string into a Schema AST
pub fn parse(source: &str) -> Result<Schema, ParseError> {
    parse_with(source, &Vocabulary::default())
}

/// Parse using a custom keyword/datatype vocabulary
pub fn parse_with(source: &str, vocabulary: &Vocabulary) -> Result<Schema, ParseError> {
    let tokens = tokenize_with(source, vocabulary)?;
    SchemaParser::new(tokens).parse_schema()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlfold_ast::{Statement, ValueLiteral};
    use sqlfold_lexer::LexError;

    #[test]
    fn test_parse_create_table() {
        let source = "CREATE TABLE users (id INT PRIMARY KEY NOT NULL, name VARCHAR(64));";
        let result = parse(source);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());

        let schema = result.unwrap();
        assert_eq!(schema.len(), 1);
        let Statement::CreateTable(table) = &schema.body[0] else {
            panic!("expected CREATE TABLE, got {:?}", schema.body[0]);
        };
        assert_eq!(table.table_name, "users");
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].datatype, "INT");
        assert_eq!(table.columns[0].constraints, vec!["PRIMARY KEY", "NOT NULL"]);
        assert_eq!(table.columns[1].name, "name");
        assert_eq!(table.columns[1].datatype, "VARCHAR(64)");
        assert!(table.columns[1].constraints.is_empty());
        assert_eq!(table.span.start, 0);
        assert_eq!(table.span.end, source.len());
    }

    #[test]
    fn test_parse_insert() {
        let source = "INSERT INTO users (id, name) VALUES (1, 'Drew'), (2, 'Ethan');";
        let schema = parse(source).unwrap();
        let Statement::Insert(insert) = &schema.body[0] else {
            panic!("expected INSERT, got {:?}", schema.body[0]);
        };
        assert_eq!(insert.table_name, "users");
        assert_eq!(insert.columns, vec!["id", "name"]);
        assert_eq!(
            insert.rows,
            vec![
                vec![ValueLiteral::new("1"), ValueLiteral::new("'Drew'")],
                vec![ValueLiteral::new("2"), ValueLiteral::new("'Ethan'")],
            ]
        );
    }

    #[test]
    fn test_parse_update() {
        let schema = parse("UPDATE users SET name = 'Drew' WHERE id = 1;").unwrap();
        let Statement::Update(update) = &schema.body[0] else {
            panic!("expected UPDATE, got {:?}", schema.body[0]);
        };
        assert_eq!(update.table_name, "users");
        assert_eq!(update.columns, vec!["name"]);
        assert_eq!(update.values, vec![ValueLiteral::new("'Drew'")]);
        assert_eq!(update.conditions.len(), 1);
        assert_eq!(update.conditions[0].column, "id");
        assert_eq!(update.conditions[0].operator, "=");
        assert_eq!(update.conditions[0].value.raw_text, "1");
    }

    #[test]
    fn test_parse_statements_in_source_order() {
        let source = r#"
            CREATE TABLE users (id INT);
            ALTER TABLE users ADD COLUMN name VARCHAR(64);
            INSERT INTO users (id) VALUES (1);
            UPDATE users SET id = 2 WHERE id = 1;
        "#;
        let schema = parse(source).unwrap();
        let tables: Vec<_> = schema.body.iter().map(|s| s.table_name()).collect();
        assert_eq!(tables, vec!["users"; 4]);
        assert!(matches!(schema.body[0], Statement::CreateTable(_)));
        assert!(matches!(schema.body[1], Statement::AlterTable(_)));
        assert!(matches!(schema.body[2], Statement::Insert(_)));
        assert!(matches!(schema.body[3], Statement::Update(_)));
    }

    #[test]
    fn test_parse_empty_source() {
        let schema = parse("  \n ").unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_missing_comma_is_syntax_error() {
        let source = "CREATE TABLE users (id INT name VARCHAR(64));";
        match parse(source) {
            Err(ParseError::Syntax {
                expected,
                found,
                position,
                span,
            }) => {
                assert_eq!(position, 6);
                assert_eq!(found, "identifier `name`");
                assert!(expected.contains("')'"), "{}", expected);
                assert!(expected.contains("','"), "{}", expected);
                assert_eq!(&source[span.start..span.end], "name");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_leading_token_fails_fast() {
        let err = parse("CREATE TABLE t (a INT);\nDROP TABLE t;").unwrap_err();
        match err {
            ParseError::Syntax { found, position, .. } => {
                assert_eq!(found, "keyword `DROP`");
                assert_eq!(position, 8);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_lower_case_keywords_are_identifiers() {
        let err = parse("create table users (id INT);").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { position: 0, .. }), "{:?}", err);
    }

    #[test]
    fn test_unknown_datatype_fails() {
        let err = parse("CREATE TABLE t (price DECIMAL(10,2));").unwrap_err();
        match err {
            ParseError::Syntax { expected, found, .. } => {
                assert_eq!(expected, "datatype");
                assert_eq!(found, "identifier `DECIMAL`");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = Vocabulary::default().with_datatype("DECIMAL");
        let schema = parse_with("CREATE TABLE t (price DECIMAL(10,2));", &vocabulary).unwrap();
        let table = schema.create_table("t").unwrap();
        assert_eq!(table.columns[0].datatype, "DECIMAL(10,2)");
    }

    #[test]
    fn test_arity_mismatch() {
        let err = parse("INSERT INTO users (id, name) VALUES (1);").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ArityMismatch {
                expected_columns: 2,
                actual_values: 1,
                ..
            }
        ));
        assert_eq!(err.code(), "E-ARITY-001");
    }

    #[test]
    fn test_lex_errors_propagate() {
        let err = parse("INSERT INTO t VALUES ('x);").unwrap_err();
        assert!(matches!(err, ParseError::Lex(LexError::UnterminatedString { .. })));

        let err = parse("UPDATE t SET a = 1 WHERE b > 2;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnexpectedCharacter { ch: '>', .. })
        ));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("ALTER TABLE users DROP COLUMN id").unwrap_err();
        match err {
            ParseError::Syntax { found, .. } => assert_eq!(found, "end of input"),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }
}
