use sqlfold::ast::*;

/// Assert that parsing succeeds
pub fn assert_parses(source: &str) -> Schema {
    sqlfold::parse(source).expect("Expected source to parse successfully")
}

/// Assert that parsing fails
pub fn assert_parse_fails(source: &str) -> sqlfold::ParseError {
    match sqlfold::parse(source) {
        Ok(schema) => panic!("Expected source to fail parsing, got {:?}", schema),
        Err(e) => e,
    }
}

/// Assert the schema defines `name` and return its definition
pub fn assert_has_table<'s>(schema: &'s Schema, name: &str) -> &'s CreateTable {
    schema
        .create_table(name)
        .unwrap_or_else(|| panic!("Expected CREATE TABLE {}", name))
}

/// Assert the column names of a table, in order
pub fn assert_columns(table: &CreateTable, expected: &[&str]) {
    assert_eq!(
        table.column_names(),
        expected,
        "columns of {}",
        table.table_name
    );
}

/// Column names of every table definition, keyed by table in schema order
pub fn table_layout(schema: &Schema) -> Vec<(String, Vec<String>)> {
    schema
        .create_tables()
        .map(|t| {
            (
                t.table_name.clone(),
                t.column_names().into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}
