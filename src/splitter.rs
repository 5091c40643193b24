//! Splits a token stream into statements.
//!
//! A statement ends at a `;` outside any nesting or at a `GO` batch
//! separator. Procedural bodies (`CREATE ... BEGIN ... END`) raise the
//! nesting level so their inner semicolons do not split.

use crate::token::{Token, TokenKind};
use crate::tree::Statement;

#[derive(Debug, Default)]
struct Splitter {
    in_case: bool,
    is_create: bool,
    begin_depth: usize,
    level: i32,
    consume_ws: bool,
    tokens: Vec<Token>,
}

impl Splitter {
    /// Nesting change caused by `token`.
    fn level_change(&mut self, token: &Token) -> i32 {
        if token.matches(TokenKind::Punctuation, Some(&["("])) {
            return 1;
        }
        if token.matches(TokenKind::Punctuation, Some(&[")"])) {
            return -1;
        }
        if !token.is_keyword() {
            return 0;
        }

        let word = token.normalized.as_str();
        if token.kind == TokenKind::Ddl && word.starts_with("CREATE") {
            self.is_create = true;
            return 0;
        }
        if word == "DECLARE" && self.is_create && self.begin_depth == 0 {
            return 1;
        }
        if word == "BEGIN" {
            self.begin_depth += 1;
            return i32::from(self.is_create);
        }
        if word == "END" {
            if self.in_case {
                self.in_case = false;
            } else {
                self.begin_depth = self.begin_depth.saturating_sub(1);
            }
            return -1;
        }
        if matches!(word, "IF" | "FOR" | "WHILE" | "CASE") && self.is_create && self.begin_depth > 0 {
            if word == "CASE" {
                self.in_case = true;
            }
            return 1;
        }
        if matches!(word, "END IF" | "END FOR" | "END WHILE") {
            return -1;
        }
        0
    }

    fn ends_statement(&self, token: &Token) -> bool {
        (self.level <= 0 && token.matches(TokenKind::Punctuation, Some(&[";"])))
            || (token.kind == TokenKind::Keyword
                && token.value.split_whitespace().next() == Some("GO"))
    }

    fn take(&mut self) -> Statement {
        Statement::new(std::mem::take(self).tokens)
    }
}

/// Split a token stream into ungrouped statements.
///
/// Whitespace and single-line comments following a statement terminator
/// stay with that statement. A trailing run of pure whitespace is dropped.
#[must_use]
pub fn split_statements(tokens: Vec<Token>) -> Vec<Statement> {
    let mut splitter = Splitter::default();
    let mut statements = Vec::new();

    for token in tokens {
        let trailing = token.kind == TokenKind::Whitespace || token.kind == TokenKind::CommentSingle;
        if splitter.consume_ws && !trailing {
            statements.push(splitter.take());
        }

        splitter.level += splitter.level_change(&token);
        if splitter.ends_statement(&token) {
            splitter.consume_ws = true;
        }
        splitter.tokens.push(token);
    }

    if !splitter.tokens.iter().all(Token::is_whitespace) {
        statements.push(splitter.take());
    }
    tracing::debug!(count = statements.len(), "split statements");
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn texts(sql: &str) -> Vec<String> {
        split_statements(tokenize(sql))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn splits_on_semicolon() {
        assert_eq!(texts("select 1; select 2;"), vec!["select 1; ", "select 2;"]);
    }

    #[test]
    fn newline_starts_next_statement() {
        assert_eq!(texts("select 1;\nselect 2"), vec!["select 1;", "\nselect 2"]);
    }

    #[test]
    fn trailing_comment_stays() {
        assert_eq!(
            texts("select 1; -- one\nselect 2"),
            vec!["select 1; -- one\n", "select 2"]
        );
    }

    #[test]
    fn semicolon_in_parenthesis_does_not_split() {
        assert_eq!(texts("select (1;2)"), vec!["select (1;2)"]);
    }

    #[test]
    fn procedure_body_stays_whole() {
        let sql = "create function f() begin select 1; select 2; end; select 3";
        let parts = texts(sql);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "create function f() begin select 1; select 2; end; ");
    }

    #[test]
    fn go_separates_batches() {
        assert_eq!(texts("select 1\nGO\nselect 2").len(), 2);
    }

    #[test]
    fn whitespace_only_tail_is_dropped() {
        assert_eq!(texts("select 1;\n\n"), vec!["select 1;"]);
        assert!(texts("   ").is_empty());
    }
}
