//! sqlfold - Migration script consolidation
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use sqlfold_ast as ast;
pub use sqlfold_lexer as lexer;
pub use sqlfold_parser as parser;

pub use sqlfold_ast::{Schema, ToSql};
pub use sqlfold_parser::{parse, parse_with, ParseError};
