//! Canonical SQL printer
//!
//! Serializes the AST back to SQL text. Output for every statement the
//! grammar accepts parses back to an equal tree. Literals are written
//! exactly as stored; nothing is re-quoted or escaped.

use crate::{
    AlterOperation, AlterTable, ColumnDef, Constraint, CreateTable, Insert, Schema, Statement,
    Update, UpdateCondition, ValueLiteral,
};
use crate::AlterAction;

/// Trait for converting AST nodes to canonical SQL text.
pub trait ToSql {
    fn to_sql(&self) -> String;
}

/// Indentation for column lines inside `CREATE TABLE`
const INDENT: &str = "  ";

fn join<T: ToSql>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToSql::to_sql)
        .collect::<Vec<_>>()
        .join(sep)
}

// ===== Schema =====

impl ToSql for Schema {
    fn to_sql(&self) -> String {
        join(&self.body, "\n\n")
    }
}

impl ToSql for Statement {
    fn to_sql(&self) -> String {
        match self {
            Statement::CreateTable(s) => s.to_sql(),
            Statement::AlterTable(s) => s.to_sql(),
            Statement::Insert(s) => s.to_sql(),
            Statement::Update(s) => s.to_sql(),
        }
    }
}

// ===== Schema definition =====

impl ToSql for CreateTable {
    fn to_sql(&self) -> String {
        let mut header = String::from("CREATE TABLE ");
        if !self.condition_clauses.is_empty() {
            header.push_str(&self.condition_clauses.join(" "));
            header.push(' ');
        }
        header.push_str(&self.table_name);

        let elements: Vec<String> = self
            .columns
            .iter()
            .map(ToSql::to_sql)
            .chain(self.table_constraints.iter().map(ToSql::to_sql))
            .map(|element| format!("{}{}", INDENT, element))
            .collect();

        format!("{} (\n{}\n);", header, elements.join(",\n"))
    }
}

impl ToSql for ColumnDef {
    fn to_sql(&self) -> String {
        if self.constraints.is_empty() {
            format!("{} {}", self.name, self.datatype)
        } else {
            format!("{} {} {}", self.name, self.datatype, self.constraints.join(" "))
        }
    }
}

impl ToSql for Constraint {
    fn to_sql(&self) -> String {
        match self {
            Constraint::PrimaryKey { column_name } => format!("PRIMARY KEY ({})", column_name),
            Constraint::ForeignKey {
                name,
                column_name,
                referenced_table,
                referenced_column,
            } => format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                name, column_name, referenced_table, referenced_column
            ),
        }
    }
}

impl ToSql for AlterTable {
    fn to_sql(&self) -> String {
        format!(
            "ALTER TABLE {}\n{};",
            self.table_name,
            join(&self.operations, ",\n")
        )
    }
}

impl ToSql for AlterOperation {
    fn to_sql(&self) -> String {
        match self.action {
            AlterAction::Add => format!("ADD COLUMN {}", self.column.to_sql()),
            AlterAction::Drop => format!("DROP COLUMN {}", self.column.name),
        }
    }
}

// ===== Data statements =====

impl ToSql for ValueLiteral {
    fn to_sql(&self) -> String {
        self.raw_text.clone()
    }
}

impl ToSql for Insert {
    fn to_sql(&self) -> String {
        let rows = self
            .rows
            .iter()
            .map(|row| format!("({})", join(row, ", ")))
            .collect::<Vec<_>>()
            .join(",\n");

        if self.columns.is_empty() {
            format!("INSERT INTO {} VALUES\n{};", self.table_name, rows)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES\n{};",
                self.table_name,
                self.columns.join(", "),
                rows
            )
        }
    }
}

impl ToSql for UpdateCondition {
    fn to_sql(&self) -> String {
        format!("{} {} {}", self.column, self.operator, self.value.raw_text)
    }
}

impl ToSql for Update {
    fn to_sql(&self) -> String {
        let assignments = self
            .assignments()
            .map(|(column, value)| format!("{} = {}", column, value.raw_text))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE {}\nSET {}", self.table_name, assignments);
        if !self.conditions.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&join(&self.conditions, " AND "));
        }
        sql.push(';');
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    fn users() -> CreateTable {
        CreateTable::new(
            "users",
            vec![
                ColumnDef::new("id", "INT")
                    .with_constraint("PRIMARY KEY")
                    .with_constraint("NOT NULL"),
                ColumnDef::new("name", "VARCHAR(64)"),
            ],
        )
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            users().to_sql(),
            "CREATE TABLE users (\n  id INT PRIMARY KEY NOT NULL,\n  name VARCHAR(64)\n);"
        );
    }

    #[test]
    fn test_create_table_with_clause_and_constraints() {
        let mut table = users();
        table.condition_clauses.push("IF NOT EXISTS".into());
        table.table_constraints.push(Constraint::PrimaryKey {
            column_name: "id".into(),
        });
        table.table_constraints.push(Constraint::ForeignKey {
            name: "fk_org".into(),
            column_name: "org_id".into(),
            referenced_table: "orgs".into(),
            referenced_column: "id".into(),
        });

        assert_eq!(
            table.to_sql(),
            "CREATE TABLE IF NOT EXISTS users (\n  id INT PRIMARY KEY NOT NULL,\n  \
             name VARCHAR(64),\n  PRIMARY KEY (id),\n  \
             CONSTRAINT fk_org FOREIGN KEY (org_id) REFERENCES orgs (id)\n);"
        );
    }

    #[test]
    fn test_create_table_without_elements() {
        let table = CreateTable::new("t", vec![]);
        assert!(table.is_empty());
        assert_eq!(table.to_sql(), "CREATE TABLE t (\n\n);");
    }

    #[test]
    fn test_alter_table() {
        let alter = AlterTable::new(
            "users",
            vec![
                AlterOperation::add(ColumnDef::new("email", "VARCHAR(64)").with_constraint("NOT NULL")),
                AlterOperation::drop("age"),
            ],
        );
        assert_eq!(
            alter.to_sql(),
            "ALTER TABLE users\nADD COLUMN email VARCHAR(64) NOT NULL,\nDROP COLUMN age;"
        );
    }

    #[test]
    fn test_insert_with_and_without_columns() {
        let rows = vec![
            vec![ValueLiteral::new("1"), ValueLiteral::new("'Drew'")],
            vec![ValueLiteral::new("2"), ValueLiteral::new("'Ethan'")],
        ];
        let insert = Insert::new(
            "users",
            vec!["id".into(), "name".into()],
            rows.clone(),
            Span::dummy(),
        )
        .unwrap();
        assert_eq!(
            insert.to_sql(),
            "INSERT INTO users (id, name) VALUES\n(1, 'Drew'),\n(2, 'Ethan');"
        );

        let bare = Insert::new("users", vec![], rows, Span::dummy()).unwrap();
        assert_eq!(bare.to_sql(), "INSERT INTO users VALUES\n(1, 'Drew'),\n(2, 'Ethan');");
    }

    #[test]
    fn test_update() {
        let update = Update {
            table_name: "users".into(),
            columns: vec!["name".into()],
            values: vec![ValueLiteral::new("'Drew'")],
            conditions: vec![
                UpdateCondition::equals("id", ValueLiteral::new("1")),
                UpdateCondition::equals("org", ValueLiteral::new("\"x\"")),
            ],
            span: Span::dummy(),
        };
        assert_eq!(
            update.to_sql(),
            "UPDATE users\nSET name = 'Drew'\nWHERE id = 1 AND org = \"x\";"
        );
    }

    #[test]
    fn test_update_without_where() {
        let update = Update {
            table_name: "users".into(),
            columns: vec!["a".into(), "b".into()],
            values: vec![ValueLiteral::new("1"), ValueLiteral::new("NULL")],
            conditions: vec![],
            span: Span::dummy(),
        };
        assert_eq!(update.to_sql(), "UPDATE users\nSET a = 1, b = NULL;");
    }

    #[test]
    fn test_schema_joins_with_blank_line() {
        let schema = Schema::new(vec![
            Statement::AlterTable(AlterTable::new("a", vec![AlterOperation::drop("x")])),
            Statement::AlterTable(AlterTable::new("b", vec![AlterOperation::drop("y")])),
        ]);
        assert_eq!(
            schema.to_sql(),
            "ALTER TABLE a\nDROP COLUMN x;\n\nALTER TABLE b\nDROP COLUMN y;"
        );
    }
}
