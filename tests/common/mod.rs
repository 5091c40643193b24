#![allow(dead_code)]

use sqlindent::{FormatOptions, Statement, TokenKind, format, parse, tokenize};

/// Format with the given options, failing the test on rejected options.
pub fn format_with(sql: &str, options: &FormatOptions) -> String {
    format(sql, options).unwrap_or_else(|e| panic!("format failed: {e}\n--- input ---\n{sql}"))
}

/// Format with `reindent` on and everything else at its default.
pub fn reindent(sql: &str) -> String {
    format_with(sql, &FormatOptions::new().reindent(true))
}

/// The first grouped statement of `sql`.
pub fn grouped(sql: &str) -> Statement {
    parse(sql)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no statement in {sql:?}"))
}

/// Values of every leaf below the root, in order.
pub fn leaf_values(stmt: &Statement) -> Vec<String> {
    stmt.flatten(stmt.root())
        .filter_map(|leaf| stmt.token(leaf))
        .map(|t| t.value.clone())
        .collect()
}

/// Token values of `sql` with whitespace and line breaks removed.
pub fn significant_values(sql: &str) -> Vec<String> {
    tokenize(sql)
        .into_iter()
        .filter(|t| !t.kind.is_a(TokenKind::Whitespace))
        .map(|t| t.value)
        .collect()
}
