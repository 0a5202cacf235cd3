//! Statement grammars built from the combinators
//!
//! ```text
//! create_table  := CREATE TABLE [IF NOT EXISTS] identifier LPAREN
//!                  table_element (COMMA table_element)* [COMMA] RPAREN SEMICOLON
//! table_element := column_def | primary_key_clause | foreign_key_clause
//! column_def    := identifier datatype [LPAREN literal (COMMA literal)* RPAREN] constraint*
//! constraint    := NOT NULL | PRIMARY KEY | AUTO_INCREMENT | UNIQUE | DEFAULT value
//! alter_table   := ALTER TABLE identifier alter_op (COMMA alter_op)* SEMICOLON
//! alter_op      := ADD [COLUMN] column_def | DROP [COLUMN] identifier
//! insert        := INSERT INTO identifier [LPAREN identifier (COMMA identifier)* RPAREN]
//!                  VALUES value_list (COMMA value_list)* SEMICOLON
//! update        := UPDATE identifier SET assignment (COMMA assignment)*
//!                  [WHERE condition (AND condition)*] SEMICOLON
//! value         := literal | NULL
//! ```
//!
//! Each grammar has a matching `build_*` function turning its [`Value`]
//! into AST nodes.

use sqlfold_ast::*;
use sqlfold_lexer::TokenKind;

use crate::combinator::*;
use crate::ParseError;

fn lparen() -> Parser {
    token_kind(TokenKind::LeftParen)
}

fn rparen() -> Parser {
    token_kind(TokenKind::RightParen)
}

fn comma() -> Parser {
    delimiter(',')
}

fn semicolon() -> Parser {
    delimiter(';')
}

/// A value literal; `NULL` is accepted as one
pub fn value() -> Parser {
    choice([literal(), keyword("NULL")])
}

// === CREATE TABLE ===

pub fn create_table() -> Parser {
    sequence([
        keyword("CREATE"),
        keyword("TABLE"),
        optional(label(
            "condition",
            sequence([keyword("IF"), keyword("NOT"), keyword("EXISTS")]),
        )),
        label("table_name", identifier()),
        lparen(),
        label("elements", many_sep(table_element(), comma())),
        optional(comma()),
        rparen(),
        semicolon(),
    ])
}

fn table_element() -> Parser {
    choice([
        column_def(),
        label("primary_key", primary_key_clause()),
        label("foreign_key", foreign_key_clause()),
    ])
}

pub fn column_def() -> Parser {
    sequence([
        label("column_name", identifier()),
        label("datatype", datatype()),
        optional(sequence([
            lparen(),
            label("size", many_sep(literal(), comma())),
            rparen(),
        ])),
        optional(label("constraints", many(constraint()))),
    ])
}

pub fn constraint() -> Parser {
    choice([
        sequence([keyword("NOT"), keyword("NULL")]),
        sequence([keyword("PRIMARY"), keyword("KEY")]),
        keyword("AUTO_INCREMENT"),
        keyword("UNIQUE"),
        sequence([keyword("DEFAULT"), value()]),
    ])
}

fn primary_key_clause() -> Parser {
    sequence([
        keyword("PRIMARY"),
        keyword("KEY"),
        lparen(),
        label("column", identifier()),
        rparen(),
    ])
}

fn foreign_key_clause() -> Parser {
    sequence([
        keyword("CONSTRAINT"),
        label("name", identifier()),
        keyword("FOREIGN"),
        keyword("KEY"),
        lparen(),
        label("column", identifier()),
        rparen(),
        keyword("REFERENCES"),
        label("table", identifier()),
        lparen(),
        label("referenced_column", identifier()),
        rparen(),
    ])
}

// === ALTER TABLE ===

pub fn alter_table() -> Parser {
    sequence([
        keyword("ALTER"),
        keyword("TABLE"),
        label("table_name", identifier()),
        label("operations", many_sep(alter_op(), comma())),
        semicolon(),
    ])
}

fn alter_op() -> Parser {
    choice([
        sequence([
            label("action", keyword("ADD")),
            optional(keyword("COLUMN")),
            column_def(),
        ]),
        sequence([
            label("action", keyword("DROP")),
            optional(keyword("COLUMN")),
            label("column_name", identifier()),
        ]),
    ])
}

// === INSERT ===

pub fn insert() -> Parser {
    sequence([
        keyword("INSERT"),
        keyword("INTO"),
        label("table_name", identifier()),
        optional(sequence([
            lparen(),
            label("columns", many_sep(identifier(), comma())),
            rparen(),
        ])),
        keyword("VALUES"),
        label("rows", many_sep(value_list(), comma())),
        semicolon(),
    ])
}

fn value_list() -> Parser {
    sequence([lparen(), label("values", many_sep(value(), comma())), rparen()])
}

// === UPDATE ===

pub fn update() -> Parser {
    sequence([
        keyword("UPDATE"),
        label("table_name", identifier()),
        keyword("SET"),
        label("assignments", many_sep(assignment(), comma())),
        optional(sequence([
            keyword("WHERE"),
            label("conditions", many_sep(condition(), keyword("AND"))),
        ])),
        semicolon(),
    ])
}

fn assignment() -> Parser {
    sequence([
        label("column", identifier()),
        equals(),
        label("value", value()),
    ])
}

fn condition() -> Parser {
    sequence([
        label("column", identifier()),
        label("operator", equals()),
        label("value", value()),
    ])
}

// === Builders ===

/// Field access on a grammar result, failing with `MalformedNode`
struct Fields<'v> {
    value: &'v Value,
    rule: &'static str,
    span: Span,
}

impl<'v> Fields<'v> {
    fn new(value: &'v Value, rule: &'static str, span: Span) -> Self {
        Self { value, rule, span }
    }

    fn malformed(&self) -> ParseError {
        ParseError::MalformedNode {
            rule: self.rule,
            span: self.span,
        }
    }

    fn get(&self, name: &str) -> Result<&'v Value, ParseError> {
        self.value.get(name).ok_or_else(|| self.malformed())
    }

    fn text(&self, name: &str) -> Result<String, ParseError> {
        self.get(name)?
            .text()
            .map(str::to_string)
            .ok_or_else(|| self.malformed())
    }

    /// Items of an optional list field; empty when absent
    fn items(&self, name: &str) -> &'v [Value] {
        self.value.get(name).map(Value::items).unwrap_or(&[])
    }

    fn nested(&self, value: &'v Value, rule: &'static str) -> Fields<'v> {
        Fields::new(value, rule, self.span)
    }

    fn item_text(&self, value: &Value) -> Result<String, ParseError> {
        value.text().map(str::to_string).ok_or_else(|| self.malformed())
    }
}

pub fn build_create_table(value: &Value, span: Span) -> Result<CreateTable, ParseError> {
    let fields = Fields::new(value, "create_table", span);
    let mut table = CreateTable::new(fields.text("table_name")?, Vec::new());
    table.span = span;

    if let Some(condition) = value.get("condition") {
        table.condition_clauses.push(condition.phrase());
    }

    for element in fields.get("elements")?.items() {
        if let Some(pk) = element.get("primary_key") {
            let pk = fields.nested(pk, "primary_key_clause");
            table.table_constraints.push(Constraint::PrimaryKey {
                column_name: pk.text("column")?,
            });
        } else if let Some(fk) = element.get("foreign_key") {
            let fk = fields.nested(fk, "foreign_key_clause");
            table.table_constraints.push(Constraint::ForeignKey {
                name: fk.text("name")?,
                column_name: fk.text("column")?,
                referenced_table: fk.text("table")?,
                referenced_column: fk.text("referenced_column")?,
            });
        } else {
            table.columns.push(build_column_def(element, span)?);
        }
    }

    Ok(table)
}

pub fn build_column_def(value: &Value, span: Span) -> Result<ColumnDef, ParseError> {
    let fields = Fields::new(value, "column_def", span);
    let mut datatype = fields.text("datatype")?;

    let size = fields.items("size");
    if !size.is_empty() {
        let parts = size
            .iter()
            .map(|v| fields.item_text(v))
            .collect::<Result<Vec<_>, _>>()?;
        datatype = format!("{}({})", datatype, parts.join(","));
    }

    Ok(ColumnDef {
        name: fields.text("column_name")?,
        datatype,
        constraints: fields.items("constraints").iter().map(Value::phrase).collect(),
    })
}

pub fn build_alter_table(value: &Value, span: Span) -> Result<AlterTable, ParseError> {
    let fields = Fields::new(value, "alter_table", span);
    let operations = fields
        .get("operations")?
        .items()
        .iter()
        .map(|op| build_alter_op(op, span))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AlterTable {
        table_name: fields.text("table_name")?,
        operations,
        span,
    })
}

fn build_alter_op(value: &Value, span: Span) -> Result<AlterOperation, ParseError> {
    let fields = Fields::new(value, "alter_op", span);
    match fields.text("action")?.as_str() {
        "ADD" => Ok(AlterOperation::add(build_column_def(value, span)?)),
        "DROP" => Ok(AlterOperation::drop(fields.text("column_name")?)),
        _ => Err(fields.malformed()),
    }
}

pub fn build_insert(value: &Value, span: Span) -> Result<Insert, ParseError> {
    let fields = Fields::new(value, "insert", span);
    let table_name = fields.text("table_name")?;

    let columns = fields
        .items("columns")
        .iter()
        .map(|c| fields.item_text(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for row in fields.get("rows")?.items() {
        let row = fields.nested(row, "value_list");
        let values = row
            .items("values")
            .iter()
            .map(|v| row.item_text(v).map(ValueLiteral::new))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    Insert::new(table_name.clone(), columns, rows, span).map_err(|arity| {
        ParseError::ArityMismatch {
            table: table_name,
            row: arity.row,
            expected_columns: arity.expected,
            actual_values: arity.actual,
            span,
        }
    })
}

pub fn build_update(value: &Value, span: Span) -> Result<Update, ParseError> {
    let fields = Fields::new(value, "update", span);

    let mut columns = Vec::new();
    let mut values = Vec::new();
    for assignment in fields.get("assignments")?.items() {
        let assignment = fields.nested(assignment, "assignment");
        columns.push(assignment.text("column")?);
        values.push(ValueLiteral::new(assignment.text("value")?));
    }

    let conditions = fields
        .items("conditions")
        .iter()
        .map(|c| -> Result<UpdateCondition, ParseError> {
            let c = fields.nested(c, "condition");
            Ok(UpdateCondition {
                column: c.text("column")?,
                operator: c.text("operator")?,
                value: ValueLiteral::new(c.text("value")?),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Update {
        table_name: fields.text("table_name")?,
        columns,
        values,
        conditions,
        span,
    })
}
