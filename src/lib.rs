//! Non-validating SQL parser and formatter.
//!
//! SQL text is scanned into classified tokens, split into statements and
//! grouped into a tree of grammar nodes (identifiers, lists, clauses,
//! parenthesized expressions and so on). Filters then rewrite the
//! whitespace of that tree; every other token keeps its text.
//!
//! # Quick start
//!
//! ## Reindent a query
//!
//! ```
//! use sqlindent::{FormatOptions, format};
//!
//! let options = FormatOptions::new().reindent(true);
//! let output = format("select a, b from t where a = 1", &options).unwrap();
//! assert_eq!(output, "select a, b\nfrom t\nwhere a = 1");
//! ```
//!
//! ## Inspect the grouped tree
//!
//! ```
//! use sqlindent::{GroupKind, parse};
//!
//! let statements = parse("select t.c from t");
//! let stmt = &statements[0];
//! assert_eq!(stmt.get_type(), "SELECT");
//!
//! let column = stmt.child(stmt.root(), 2);
//! assert_eq!(stmt.group_kind(column), Some(GroupKind::Identifier));
//! assert_eq!(stmt.get_real_name(column).as_deref(), Some("c"));
//! assert_eq!(stmt.get_parent_name(column).as_deref(), Some("t"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod aligned;
pub mod encoding;
pub mod filters;
pub mod formatter;
pub mod grammar;
pub mod grouping;
pub mod keywords;
pub mod lexer;
pub mod options;
pub mod reindent;
pub mod splitter;
pub mod token;
pub mod tree;

pub use aligned::AlignedIndentFilter;
pub use encoding::{Encoding, EncodingError, EncodingErrorKind};
pub use filters::{
    OutputFilter, SpacesAroundOperators, StatementFilter, StripComments, StripWhitespace,
};
pub use formatter::format;
pub use grammar::{CaseBranch, remove_quotes};
pub use grouping::group;
pub use lexer::tokenize;
pub use options::{
    FormatOptions, LetterCase, OptionsError, OptionsErrorKind, OutputFormat, ReindentOptions,
};
pub use reindent::ReindentFilter;
pub use splitter::split_statements;
pub use token::{Token, TokenKind};
pub use tree::{GroupKind, Matcher, NodeId, Pattern, Statement};

/// Unified error type of the crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Rejected formatting options.
    #[error("{0}")]
    Options(#[from] OptionsError),
}

/// Tokenize, split and group SQL text.
#[must_use]
pub fn parse(sql: &str) -> Vec<Statement> {
    let mut statements = split_statements(tokenize(sql));
    for stmt in &mut statements {
        group(stmt);
    }
    statements
}

/// Split SQL text into statement strings, trimmed of surrounding
/// whitespace.
#[must_use]
pub fn split(sql: &str) -> Vec<String> {
    split_statements(tokenize(sql))
        .iter()
        .map(|stmt| stmt.to_string().trim().to_string())
        .collect()
}
