//! Statement AST nodes (top-level items of a migration script)

use serde::{Deserialize, Serialize};
use crate::Span;

/// A top-level statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// `CREATE TABLE [IF NOT EXISTS] name ( ... );`
    CreateTable(CreateTable),

    /// `ALTER TABLE name ADD COLUMN ..., DROP COLUMN ...;`
    AlterTable(AlterTable),

    /// `INSERT INTO name (cols) VALUES (...), (...);`
    Insert(Insert),

    /// `UPDATE name SET col = value WHERE cond AND cond;`
    Update(Update),
}

impl Statement {
    /// Name of the table this statement targets
    pub fn table_name(&self) -> &str {
        match self {
            Statement::CreateTable(s) => &s.table_name,
            Statement::AlterTable(s) => &s.table_name,
            Statement::Insert(s) => &s.table_name,
            Statement::Update(s) => &s.table_name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::CreateTable(s) => s.span,
            Statement::AlterTable(s) => s.span,
            Statement::Insert(s) => s.span,
            Statement::Update(s) => s.span,
        }
    }

    pub fn is_alter(&self) -> bool {
        matches!(self, Statement::AlterTable(_))
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTable {
    pub table_name: String,
    /// Column definitions in declaration order
    pub columns: Vec<ColumnDef>,
    /// Clauses between `TABLE` and the name, e.g. `IF NOT EXISTS`
    pub condition_clauses: Vec<String>,
    pub table_constraints: Vec<Constraint>,
    pub span: Span,
}

impl CreateTable {
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            condition_clauses: Vec::new(),
            table_constraints: Vec::new(),
            span: Span::dummy(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// No columns and no table constraints. Such a table prints as
    /// `CREATE TABLE t (\n\n);`, which does not parse back.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.table_constraints.is_empty()
    }

    /// Apply a single alter operation to the column list.
    ///
    /// `Add` appends without checking for an existing column of the same
    /// name. `Drop` removes the first column with a matching name and is a
    /// no-op when there is none.
    pub fn apply(&mut self, op: &AlterOperation) {
        match op.action {
            AlterAction::Add => self.columns.push(op.column.clone()),
            AlterAction::Drop => {
                if let Some(index) = self.columns.iter().position(|c| c.name == op.column.name) {
                    self.columns.remove(index);
                }
            }
        }
    }
}

/// Column definition: `name DATATYPE[(size)] constraint*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Datatype including any size suffix, e.g. `VARCHAR(64)`
    pub datatype: String,
    /// Canonical constraint phrases: `NOT NULL`, `PRIMARY KEY`, ...
    pub constraints: Vec<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn has_constraint(&self, constraint: &str) -> bool {
        self.constraints.iter().any(|c| c == constraint)
    }
}

/// Table-level constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// `PRIMARY KEY (column)`
    PrimaryKey { column_name: String },

    /// `CONSTRAINT name FOREIGN KEY (column) REFERENCES table (column)`
    ForeignKey {
        name: String,
        column_name: String,
        referenced_table: String,
        referenced_column: String,
    },
}

/// Schema change: `ALTER TABLE name op, op, ...;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterTable {
    pub table_name: String,
    /// Operations in declaration order
    pub operations: Vec<AlterOperation>,
    pub span: Span,
}

impl AlterTable {
    pub fn new(table_name: impl Into<String>, operations: Vec<AlterOperation>) -> Self {
        Self {
            table_name: table_name.into(),
            operations,
            span: Span::dummy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlterAction {
    Add,
    Drop,
}

impl AlterAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            AlterAction::Add => "ADD",
            AlterAction::Drop => "DROP",
        }
    }
}

/// A single `ADD COLUMN` / `DROP COLUMN` operation.
///
/// For `Drop` only `column.name` carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterOperation {
    pub action: AlterAction,
    pub column: ColumnDef,
}

impl AlterOperation {
    pub fn add(column: ColumnDef) -> Self {
        Self {
            action: AlterAction::Add,
            column,
        }
    }

    pub fn drop(column_name: impl Into<String>) -> Self {
        Self {
            action: AlterAction::Drop,
            column: ColumnDef {
                name: column_name.into(),
                ..ColumnDef::default()
            },
        }
    }
}

/// A literal exactly as lexed, quotes included
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueLiteral {
    pub raw_text: String,
}

impl ValueLiteral {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// A row whose value count differs from the statement's column count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowArity {
    /// Zero-based row index
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Data statement: `INSERT INTO name (cols) VALUES rows;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insert {
    pub table_name: String,
    /// Explicit column list; empty when the statement omitted it
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ValueLiteral>>,
    pub span: Span,
}

impl Insert {
    /// Build an insert, rejecting rows whose length differs from the
    /// column list (or from the first row when no columns are named).
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<ValueLiteral>>,
        span: Span,
    ) -> Result<Self, RowArity> {
        let expected = if columns.is_empty() {
            rows.first().map(Vec::len).unwrap_or(0)
        } else {
            columns.len()
        };

        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(RowArity {
                row,
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            table_name: table_name.into(),
            columns,
            rows,
            span,
        })
    }
}

/// `column = value` in a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCondition {
    pub column: String,
    pub operator: String,
    pub value: ValueLiteral,
}

impl UpdateCondition {
    pub fn equals(column: impl Into<String>, value: ValueLiteral) -> Self {
        Self {
            column: column.into(),
            operator: "=".to_string(),
            value,
        }
    }
}

/// Data statement: `UPDATE name SET col = value WHERE cond AND cond;`
///
/// `columns[i]` is assigned `values[i]`; conditions are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub table_name: String,
    pub columns: Vec<String>,
    pub values: Vec<ValueLiteral>,
    pub conditions: Vec<UpdateCondition>,
    pub span: Span,
}

impl Update {
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &ValueLiteral)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> CreateTable {
        CreateTable::new(
            "users",
            vec![ColumnDef::new("id", "INT"), ColumnDef::new("name", "VARCHAR(64)")],
        )
    }

    #[test]
    fn test_apply_add_appends_duplicates() {
        let mut table = users();
        table.apply(&AlterOperation::add(ColumnDef::new("id", "INT")));
        assert_eq!(table.column_names(), vec!["id", "name", "id"]);
    }

    #[test]
    fn test_apply_drop_removes_first_match_only() {
        let mut table = users();
        table.columns.push(ColumnDef::new("id", "TINYINT"));
        table.apply(&AlterOperation::drop("id"));
        assert_eq!(table.column_names(), vec!["name", "id"]);
        assert_eq!(table.columns[1].datatype, "TINYINT");
    }

    #[test]
    fn test_apply_drop_missing_is_noop() {
        let mut table = users();
        table.apply(&AlterOperation::drop("email"));
        assert_eq!(table.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_insert_rejects_short_row() {
        let rows = vec![
            vec![ValueLiteral::new("1"), ValueLiteral::new("'Drew'")],
            vec![ValueLiteral::new("2")],
        ];
        let err = Insert::new("users", vec!["id".into(), "name".into()], rows, Span::dummy())
            .unwrap_err();
        assert_eq!(err, RowArity { row: 1, expected: 2, actual: 1 });
    }

    #[test]
    fn test_insert_without_columns_uses_first_row() {
        let rows = vec![
            vec![ValueLiteral::new("1"), ValueLiteral::new("'a'")],
            vec![ValueLiteral::new("2"), ValueLiteral::new("'b'"), ValueLiteral::new("3")],
        ];
        let err = Insert::new("users", vec![], rows, Span::dummy()).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 3);
    }
}
