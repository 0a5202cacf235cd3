//! sqlfold AST - Core types for the migration-script syntax tree
//!
//! This crate defines the statement nodes produced by the parser, spans
//! for source locations, the ALTER -> CREATE folding transform and the
//! canonical SQL printer.

mod span;
mod stmt;
mod fold;
mod printer;

pub use span::*;
pub use stmt::*;
pub use fold::*;
pub use printer::*;

use serde::{Deserialize, Serialize};

/// A parsed migration script: statements in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub body: Vec<Statement>,
}

impl Schema {
    pub fn new(body: Vec<Statement>) -> Self {
        Self { body }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// All CREATE TABLE statements, in body order
    pub fn create_tables(&self) -> impl Iterator<Item = &CreateTable> {
        self.body.iter().filter_map(|stmt| match stmt {
            Statement::CreateTable(create) => Some(create),
            _ => None,
        })
    }

    /// All ALTER TABLE statements, in body order
    pub fn alter_tables(&self) -> impl Iterator<Item = &AlterTable> {
        self.body.iter().filter_map(|stmt| match stmt {
            Statement::AlterTable(alter) => Some(alter),
            _ => None,
        })
    }

    /// Look up the last CREATE TABLE declared for `name`
    pub fn create_table(&self, name: &str) -> Option<&CreateTable> {
        self.create_tables().filter(|c| c.table_name == name).last()
    }
}
