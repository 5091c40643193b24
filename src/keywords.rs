//! Keyword dictionary used by the lexer to classify words.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::token::TokenKind;

const DML: &[&str] = &[
    "SELECT", "INSERT", "DELETE", "UPDATE", "UPSERT", "REPLACE", "MERGE",
];

const DDL: &[&str] = &["CREATE", "DROP", "ALTER", "TRUNCATE", "RENAME"];

const DCL: &[&str] = &["GRANT", "REVOKE"];

const ORDER: &[&str] = &["ASC", "DESC"];

const BUILTIN: &[&str] = &[
    "ARRAY", "BIGINT", "BINARY", "BIT", "BLOB", "BOOLEAN", "CHAR", "CHARACTER", "DATE", "DEC",
    "DECIMAL", "FLOAT", "INT", "INT8", "INTEGER", "INTERVAL", "LONG", "NUMBER", "NUMERIC",
    "NVARCHAR", "REAL", "SERIAL", "SERIAL8", "SIGNED", "SMALLINT", "SYSDATE", "TEXT", "TINYINT",
    "UNSIGNED", "VARCHAR", "VARCHAR2", "VARYING",
];

const KEYWORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALWAYS", "ANALYZE", "AND", "ANY", "AS", "AT",
    "AUTO_INCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BOTH", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "CLOSE", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CONTINUE",
    "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER",
    "CURSOR", "DATABASE", "DAY", "DECLARE", "DEFAULT", "DEFERRABLE", "DEFERRED", "DISTINCT",
    "DO", "EACH", "ELSE", "ELSIF", "END", "ESCAPE", "EXCEPT", "EXCEPTION", "EXCLUSIVE",
    "EXECUTE", "EXISTS", "EXPLAIN", "EXTRACT", "FALSE", "FETCH", "FIRST", "FOLLOWING", "FOR",
    "FOREACH", "FOREIGN", "FROM", "FULL", "FUNCTION", "GO", "GROUP", "HAVING", "HOUR", "IF",
    "IGNORE", "ILIKE", "IMMEDIATE", "IN", "INDEX", "INNER", "INOUT", "INTERSECT", "INTO", "IS",
    "ISNULL", "JOIN", "KEY", "LANGUAGE", "LAST", "LATERAL", "LEFT", "LIKE", "LIMIT", "LOCK",
    "LOOP", "MAX", "MIN", "MINUTE", "MONTH", "NATURAL", "NEXT", "NO", "NOT", "NOTHING",
    "NOTNULL", "NOWAIT", "NULL", "NULLS", "OF", "OFFSET", "ON", "ONLY", "OPEN", "OR", "ORDER",
    "OUT", "OUTER", "OVER", "PARTITION", "PRECEDING", "PRIMARY", "PROCEDURE", "RANGE",
    "RECURSIVE", "REFERENCES", "REGEXP", "RESTRICT", "RETURN", "RETURNING", "RETURNS", "RIGHT",
    "RLIKE", "ROLE", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SCHEMA", "SECOND", "SEQUENCE",
    "SET", "SOME", "STRAIGHT_JOIN", "TABLE", "TEMP", "TEMPORARY", "THEN", "TIES", "TIMESTAMP",
    "TO", "TOP", "TRANSACTION", "TRIGGER", "TRUE", "UNBOUNDED", "UNION", "UNIQUE", "UNKNOWN",
    "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WHILE", "WINDOW", "WITHOUT", "WORK", "YEAR",
    "ZONE",
];

static TABLE: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (words, kind) in [
        (KEYWORDS, TokenKind::Keyword),
        (BUILTIN, TokenKind::Builtin),
        (ORDER, TokenKind::Order),
        (DCL, TokenKind::Dcl),
        (DDL, TokenKind::Ddl),
        (DML, TokenKind::Dml),
    ] {
        for word in words {
            table.insert(*word, kind);
        }
    }
    table.insert("WITH", TokenKind::Cte);
    table
});

/// Classify a word: its keyword category, or `Name` when it is not a
/// keyword.
#[must_use]
pub fn classify(word: &str) -> TokenKind {
    TABLE
        .get(word.to_uppercase().as_str())
        .copied()
        .unwrap_or(TokenKind::Name)
}
