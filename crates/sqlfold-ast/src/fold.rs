//! ALTER TABLE folding
//!
//! Merges `ALTER TABLE` operations into the `CREATE TABLE` they target so a
//! sequence of migrations collapses into one definition per table. The
//! result is always a new [`Schema`]; the input is never touched.
//!
//! Output order is fixed: table definitions in the position their name was
//! first declared, then every other statement in source order, then the
//! alters that had no matching table.

use indexmap::IndexMap;

use crate::{AlterTable, CreateTable, Schema, Statement};

/// Outcome of [`Schema::fold_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldReport {
    pub schema: Schema,
    /// Number of partition-and-fold passes run (at least one)
    pub passes: usize,
    /// ALTER statements merged into a table definition
    pub folded: usize,
    /// ALTER statements left over because their table was never created
    pub remaining: usize,
}

impl FoldReport {
    /// Tables whose every element was dropped by folding
    pub fn empty_tables(&self) -> Vec<&str> {
        self.schema
            .create_tables()
            .filter(|t| t.is_empty())
            .map(|t| t.table_name.as_str())
            .collect()
    }
}

struct Pass {
    body: Vec<Statement>,
    folded: usize,
    remaining: usize,
}

impl Schema {
    /// Fold every ALTER TABLE into its CREATE TABLE
    pub fn fold(&self) -> Schema {
        self.fold_report().schema
    }

    /// Like [`Schema::fold`], also reporting how much was folded
    pub fn fold_report(&self) -> FoldReport {
        let mut body = self.body.clone();
        let mut passes = 0;
        let mut folded = 0;

        // Every repeated pass folds at least one alter, so this runs at most
        // once per input alter plus one.
        loop {
            passes += 1;
            let pass = fold_pass(body);
            body = pass.body;
            folded += pass.folded;
            tracing::debug!(
                pass = passes,
                folded = pass.folded,
                remaining = pass.remaining,
                "fold pass"
            );

            if pass.folded == 0 || pass.remaining == 0 {
                return FoldReport {
                    schema: Schema::new(body),
                    passes,
                    folded,
                    remaining: pass.remaining,
                };
            }
        }
    }
}

fn fold_pass(body: Vec<Statement>) -> Pass {
    // Last definition wins, first position is kept.
    let mut creates: IndexMap<String, CreateTable> = IndexMap::new();
    let mut alters: Vec<AlterTable> = Vec::new();
    let mut others: Vec<Statement> = Vec::new();

    for stmt in body {
        match stmt {
            Statement::CreateTable(create) => {
                creates.insert(create.table_name.clone(), create);
            }
            Statement::AlterTable(alter) => alters.push(alter),
            other => others.push(other),
        }
    }

    let mut folded = 0;
    let mut remaining = Vec::new();
    for alter in alters {
        match creates.get_mut(&alter.table_name) {
            Some(create) => {
                for op in &alter.operations {
                    tracing::trace!(
                        table = %alter.table_name,
                        action = op.action.keyword(),
                        column = %op.column.name,
                        "apply alter"
                    );
                    create.apply(op);
                }
                folded += 1;
            }
            None => remaining.push(alter),
        }
    }

    let remaining_count = remaining.len();
    let body = creates
        .into_values()
        .map(Statement::CreateTable)
        .chain(others)
        .chain(remaining.into_iter().map(Statement::AlterTable))
        .collect();

    Pass {
        body,
        folded,
        remaining: remaining_count,
    }
}
