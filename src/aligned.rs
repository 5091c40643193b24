//! Aligned reindenting: clause keywords are right-aligned against the end
//! of `SELECT`, so that every clause body starts in the same column.
//!
//! ```text
//! select a,
//!        b
//!   from t
//!  where a = 1
//!    and b = 2
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filters::StatementFilter;
use crate::grammar::CaseBranch;
use crate::token::{Token, TokenKind};
use crate::tree::{GroupKind, Matcher, NodeId, Pattern, Statement};

const JOIN_WORDS: &str =
    r"((LEFT\s+|RIGHT\s+|FULL\s+)?(INNER\s+|OUTER\s+|STRAIGHT\s+)?|(CROSS\s+|NATURAL\s+)?)?JOIN\b";
const BY_WORDS: &str = r"(GROUP|ORDER)\s+BY\b";

fn keyword_patterns(words: &[&str]) -> Vec<Regex> {
    words
        .iter()
        .map(|word| Regex::new(&format!("(?i){word}")).expect("valid regex"))
        .collect()
}

static SPLIT_WORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    keyword_patterns(&[
        "FROM", JOIN_WORDS, "ON", BY_WORDS, "WHERE", "AND", "OR", "HAVING", "LIMIT", "UNION",
        "VALUES", "SET", "BETWEEN", "EXCEPT",
    ])
});

/// Keywords aligned on their first word only.
static MULTI_WORDS: Lazy<Vec<Regex>> = Lazy::new(|| keyword_patterns(&[JOIN_WORDS, BY_WORDS]));

static GROUP_ORDER_BY: Lazy<Vec<Regex>> = Lazy::new(|| keyword_patterns(&[BY_WORDS]));

const SELECT: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Dml, &["SELECT"])];
const END: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Keyword, &["END"])];

/// Length of `SELECT`, the keyword everything else is aligned to.
const KEYWORD_WIDTH: isize = 6;

/// Extra columns per nesting level: the keyword, a space and a `(`.
const LEVEL_WIDTH: isize = KEYWORD_WIDTH + 2;

/// Width of `CASE ` plus `WHEN `.
const CASE_WHEN_WIDTH: isize = 10;

/// Extra columns for lists after `GROUP BY` and `ORDER BY`.
const BY_LIST_OFFSET: isize = 3;

fn width(text: &str) -> isize {
    isize::try_from(text.chars().count()).unwrap_or(isize::MAX)
}

fn keyword_regex(stmt: &Statement, id: NodeId, patterns: &[Regex]) -> bool {
    stmt.matches(id, &Matcher::patterns(&[Pattern::Regex(TokenKind::Keyword, patterns)]))
}

/// Reindents statements with right-aligned clause keywords.
#[derive(Debug, Clone)]
pub struct AlignedIndentFilter {
    indent_char: char,
    newline: String,
    indent: isize,
    offset: isize,
    previous_ended_with_newline: Option<bool>,
}

impl AlignedIndentFilter {
    #[must_use]
    pub fn new(indent_char: char, newline: impl Into<String>) -> Self {
        Self {
            indent_char,
            newline: newline.into(),
            indent: 0,
            offset: 0,
            previous_ended_with_newline: None,
        }
    }

    /// A line break followed by enough fill to put text `adjust` columns
    /// right of the end of `SELECT`.
    fn nl(&self, adjust: isize) -> Token {
        let fill = KEYWORD_WIDTH + adjust + self.indent * LEVEL_WIDTH + self.offset;
        let mut value = self.newline.clone();
        value.extend(std::iter::repeat_n(self.indent_char, usize::try_from(fill).unwrap_or(0)));
        Token::whitespace(value)
    }

    fn scoped(
        &mut self,
        stmt: &mut Statement,
        indent: isize,
        offset: isize,
        f: impl FnOnce(&mut Self, &mut Statement),
    ) {
        self.indent += indent;
        self.offset += offset;
        f(self, stmt);
        self.indent -= indent;
        self.offset -= offset;
    }

    fn next_split_word(stmt: &Statement, list: NodeId, after: Option<usize>) -> Option<(usize, NodeId)> {
        let patterns = [Pattern::Regex(TokenKind::Keyword, SPLIT_WORDS.as_slice())];
        let found = stmt.token_next_by(list, &Matcher::patterns(&patterns), after, None)?;
        if stmt.normalized(found.1) != "BETWEEN" {
            return Some(found);
        }
        match Self::next_split_word(stmt, list, Some(found.0)) {
            Some((idx, node)) if stmt.normalized(node) == "AND" => Self::next_split_word(stmt, list, Some(idx)),
            other => other,
        }
    }

    fn split_keywords(&self, stmt: &mut Statement, list: NodeId) {
        let mut next = Self::next_split_word(stmt, list, None);
        while let Some((tidx, keyword)) = next {
            let value = stmt.value(keyword);
            let aligned = if keyword_regex(stmt, keyword, &MULTI_WORDS) {
                value.split_whitespace().next().unwrap_or_default()
            } else {
                value.as_str()
            };
            stmt.insert_before(list, tidx, self.nl(-width(aligned)));
            next = Self::next_split_word(stmt, list, Some(tidx + 1));
        }
    }

    fn visit(&mut self, stmt: &mut Statement, list: NodeId) {
        match stmt.group_kind(list) {
            Some(GroupKind::Parenthesis) => self.visit_parenthesis(stmt, list),
            Some(GroupKind::IdentifierList) => self.visit_identifier_list(stmt, list),
            Some(GroupKind::Case) => self.visit_case(stmt, list),
            _ => self.visit_default(stmt, list),
        }
    }

    fn visit_default(&mut self, stmt: &mut Statement, list: NodeId) {
        self.split_keywords(stmt, list);
        let sublists: Vec<NodeId> = stmt.get_sublists(list).collect();
        for sub in sublists {
            let idx = stmt.token_index(list, sub);
            let after_by = stmt
                .token_prev(list, idx, true, false)
                .is_some_and(|(_, prev)| keyword_regex(stmt, prev, &GROUP_ORDER_BY));
            let offset = if after_by { BY_LIST_OFFSET } else { 0 };
            self.scoped(stmt, 0, offset, |this, stmt| this.visit(stmt, sub));
        }
    }

    /// Subqueries open a new level; other parentheses are left alone.
    fn visit_parenthesis(&mut self, stmt: &mut Statement, list: NodeId) {
        if stmt.token_next_by(list, &Matcher::patterns(SELECT), None, None).is_none() {
            return;
        }
        self.scoped(stmt, 1, 0, |this, stmt| {
            stmt.insert_after(list, 0, this.nl(-KEYWORD_WIDTH), true);
            this.visit_default(stmt, list);
        });
        let close = stmt.children(list).len() - 1;
        stmt.insert_before(list, close, self.nl(1));
    }

    /// Every item after the first on its own line.
    fn visit_identifier_list(&mut self, stmt: &mut Statement, list: NodeId) {
        for ident in stmt.get_identifiers(list).into_iter().skip(1) {
            let idx = stmt.token_index(list, ident);
            stmt.insert_before(list, idx, self.nl(1));
        }
        self.visit_default(stmt, list);
    }

    /// WHEN, ELSE and END right-aligned under the first WHEN, with the
    /// THEN keywords padded into one column.
    fn visit_case(&mut self, stmt: &mut Statement, list: NodeId) {
        let Some((_, end)) = stmt.token_next_by(list, &Matcher::patterns(END), None, None) else {
            return;
        };
        let mut branches = stmt.get_cases(list, true);
        branches.push(CaseBranch {
            condition: None,
            value: vec![end],
        });

        let condition_width = |branch: &CaseBranch| {
            branch.condition.as_deref().map_or(0, |nodes| {
                let text: Vec<String> = nodes.iter().map(|&node| stmt.value(node)).collect();
                width(&text.join(" "))
            })
        };
        let widths: Vec<isize> = branches.iter().map(condition_width).collect();
        let widest = widths.iter().copied().max().unwrap_or(0);

        for (i, branch) in branches.iter().enumerate() {
            let condition = branch.condition.as_deref().unwrap_or_default();
            let Some(&head) = condition.first().or_else(|| branch.value.first()) else {
                continue;
            };
            if i > 0 {
                let idx = stmt.token_index(list, head);
                let adjust = CASE_WHEN_WIDTH - width(&stmt.value(head));
                stmt.insert_before(list, idx, self.nl(adjust));
            }
            if let Some(&last) = condition.last() {
                let idx = stmt.token_index(list, last);
                let fill = usize::try_from(widest - widths[i]).unwrap_or(0);
                let padding: String = std::iter::repeat_n(self.indent_char, fill).collect();
                stmt.insert_after(list, idx, Token::whitespace(padding), true);
            }
        }
    }
}

impl StatementFilter for AlignedIndentFilter {
    fn process(&mut self, stmt: &mut Statement) {
        let root = stmt.root();
        if self.indent == 0 && stmt.children(root).first().is_some_and(|&first| stmt.is_whitespace(first)) {
            stmt.remove(root, 0);
        }
        self.visit_default(stmt, root);

        if let Some(ended_with_newline) = self.previous_ended_with_newline {
            let separator = if ended_with_newline {
                self.newline.clone()
            } else {
                self.newline.repeat(2)
            };
            stmt.insert_before(root, 0, Token::whitespace(separator));
        }
        self.previous_ended_with_newline = Some(stmt.to_string().ends_with('\n'));
        tracing::debug!(statement = %stmt.get_type(), "aligned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{StripWhitespace, serialize};
    use crate::grouping::group;
    use crate::lexer::tokenize;

    fn aligned(sql: &str) -> String {
        let mut filter = AlignedIndentFilter::new(' ', "\n");
        crate::splitter::split_statements(tokenize(sql))
            .into_iter()
            .map(|mut stmt| {
                group(&mut stmt);
                StripWhitespace.process(&mut stmt);
                filter.process(&mut stmt);
                serialize(&stmt, "\n")
            })
            .collect()
    }

    #[test]
    fn nl_counts_from_end_of_select() {
        let mut filter = AlignedIndentFilter::new(' ', "\n");
        assert_eq!(filter.nl(1).value, "\n       ");
        assert_eq!(filter.nl(-4).value, "\n  ");
        filter.indent = 1;
        assert_eq!(filter.nl(-KEYWORD_WIDTH).value, "\n        ");
    }

    #[test]
    fn clause_keywords_are_right_aligned() {
        assert_eq!(
            aligned("select a from t where a = 1 and b = 2 limit 10"),
            "select a\n  from t\n where a = 1\n   and b = 2\n limit 10"
        );
    }

    #[test]
    fn join_aligns_on_first_word() {
        assert_eq!(
            aligned("select a from t left join u on t.id = u.id"),
            "select a\n  from t\n  left join u\n    on t.id = u.id"
        );
    }

    #[test]
    fn statements_are_separated() {
        assert_eq!(aligned("select 1; select 2"), "select 1;\n\nselect 2");
    }
}
