//! The reindent filter: rewrites whitespace so that clauses start on their
//! own lines and nested constructs are indented.
//!
//! Columns are measured from the text emitted so far. Before every
//! measurement the current statement is flattened up to the anchor token,
//! so edits made earlier in the same pass are always accounted for.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filters::StatementFilter;
use crate::options::ReindentOptions;
use crate::token::{Token, TokenKind};
use crate::tree::{GroupKind, Matcher, NodeId, Pattern, Statement};

/// Clause keywords that start a new line. Searched, not anchored, in the
/// upper-cased keyword text.
static SPLIT_WORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        "FROM",
        "STRAIGHT_JOIN$",
        "JOIN$",
        "AND",
        "OR",
        "GROUP BY",
        "ORDER BY",
        "UNION",
        "VALUES",
        "SET",
        "BETWEEN",
        "EXCEPT",
        "HAVING",
        "LIMIT",
    ]
    .iter()
    .map(|word| Regex::new(&format!("(?i){word}")).expect("valid regex"))
    .collect()
});

const STATEMENT_STARTS: Matcher<'static> = Matcher::exact(&[TokenKind::Dml, TokenKind::Ddl]);
const WHERE: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Keyword, &["WHERE"])];
const OPEN_PAREN: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Punctuation, &["("])];
const COMMA: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Punctuation, &[","])];
const END: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Keyword, &["END"])];

/// Width of `WHEN `, `THEN ` and `ELSE `.
const CASE_BODY_OFFSET: isize = 5;

fn width(text: &str) -> isize {
    isize::try_from(text.chars().count()).unwrap_or(isize::MAX)
}

/// The last line of `raw`, where a trailing line break does not open a
/// new line and empty text counts as one empty line.
fn last_line(raw: &str) -> &str {
    let trimmed = raw
        .strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .or_else(|| raw.strip_suffix('\r'))
        .unwrap_or(raw);
    trimmed.rsplit(['\r', '\n']).next().unwrap_or_default()
}

/// Reindents statements. One instance should see the statements of one
/// input in order, since the separator it puts in front of a statement
/// depends on how the previous one ended.
#[derive(Debug, Clone)]
pub struct ReindentFilter {
    options: ReindentOptions,
    indent: isize,
    offset: isize,
    last_func: Option<String>,
    /// Whether the previously processed statement ended in `\n`.
    previous_ended_with_newline: Option<bool>,
}

impl ReindentFilter {
    #[must_use]
    pub fn new(options: ReindentOptions) -> Self {
        let indent = isize::from(options.indent_after_first);
        Self {
            options,
            indent,
            offset: 0,
            last_func: None,
            previous_ended_with_newline: None,
        }
    }

    fn width(&self) -> isize {
        isize::try_from(self.options.width).unwrap_or(isize::MAX)
    }

    fn wrap_after(&self) -> isize {
        isize::try_from(self.options.wrap_after).unwrap_or(isize::MAX)
    }

    fn leading_ws(&self) -> isize {
        self.offset + self.indent * self.width()
    }

    /// A line break followed by the current indentation, shifted by `adjust`.
    fn nl(&self, adjust: isize) -> Token {
        let fill = usize::try_from(self.leading_ws() + adjust).unwrap_or(0);
        let mut value = self.options.newline.clone();
        value.extend(std::iter::repeat_n(self.options.indent_char, fill));
        Token::whitespace(value)
    }

    /// Column of `target` relative to the current indentation.
    fn get_offset(&self, stmt: &Statement, target: NodeId) -> isize {
        let anchor = stmt.flatten(target).next().unwrap_or(target);
        let raw: String = stmt
            .flatten(stmt.root())
            .take_while(|&leaf| leaf != anchor)
            .filter_map(|leaf| stmt.token(leaf))
            .map(|t| t.value.as_str())
            .collect();
        width(last_line(&raw)) - self.leading_ws().max(0)
    }

    /// Run `f` with indentation and offset temporarily increased.
    fn scoped<R>(
        &mut self,
        stmt: &mut Statement,
        indent: isize,
        offset: isize,
        f: impl FnOnce(&mut Self, &mut Statement) -> R,
    ) -> R {
        self.indent += indent;
        self.offset += offset;
        let result = f(self, stmt);
        self.indent -= indent;
        self.offset -= offset;
        result
    }

    fn next_split_word(stmt: &Statement, list: NodeId, after: Option<usize>) -> Option<(usize, NodeId)> {
        let patterns = [Pattern::Regex(TokenKind::Keyword, SPLIT_WORDS.as_slice())];
        let found = stmt.token_next_by(list, &Matcher::patterns(&patterns), after, None)?;
        if stmt.normalized(found.1) != "BETWEEN" {
            return Some(found);
        }
        // The AND of BETWEEN x AND y stays on the line.
        let next = Self::next_split_word(stmt, list, Some(found.0));
        match next {
            Some((idx, node)) if stmt.normalized(node) == "AND" => Self::next_split_word(stmt, list, Some(idx)),
            other => other,
        }
    }

    fn split_keywords(&self, stmt: &mut Statement, list: NodeId) {
        let mut next = Self::next_split_word(stmt, list, None);
        while let Some((mut tidx, _)) = next {
            let prev = stmt.token_prev(list, tidx, false, false);
            let prev_text = prev.map(|(_, p)| stmt.value(p));
            if let Some((pidx, p)) = prev {
                if stmt.is_whitespace(p) {
                    stmt.remove(list, pidx);
                    tidx -= 1;
                }
            }
            if !prev_text.is_some_and(|text| text.ends_with(['\n', '\r'])) {
                stmt.insert_before(list, tidx, self.nl(0));
                tidx += 1;
                tracing::trace!(keyword = %stmt.normalized(stmt.child(list, tidx)), "line break");
            }
            next = Self::next_split_word(stmt, list, Some(tidx));
        }
    }

    fn split_statements(&self, stmt: &mut Statement, list: NodeId) {
        let mut next = stmt.token_next_by(list, &STATEMENT_STARTS, None, None);
        while let Some((mut tidx, _)) = next {
            if let Some((pidx, prev)) = stmt.token_prev(list, tidx, false, false) {
                if stmt.is_whitespace(prev) {
                    stmt.remove(list, pidx);
                    tidx -= 1;
                }
            }
            // No break when nothing but whitespace precedes the keyword.
            let before = stmt.token_prev(list, tidx, true, false).map(|(_, id)| stmt.value(id));
            if before.is_some_and(|text| !text.ends_with(['\n', '\r'])) {
                stmt.insert_before(list, tidx, self.nl(0));
                tidx += 1;
            }
            next = stmt.token_next_by(list, &STATEMENT_STARTS, Some(tidx), None);
        }
    }

    fn visit(&mut self, stmt: &mut Statement, list: NodeId) {
        match stmt.group_kind(list) {
            Some(GroupKind::Where) => self.visit_where(stmt, list),
            Some(GroupKind::Parenthesis) => self.visit_parenthesis(stmt, list),
            Some(GroupKind::Function) => self.visit_function(stmt, list),
            Some(GroupKind::IdentifierList) => self.visit_identifier_list(stmt, list),
            Some(GroupKind::Case) => self.visit_case(stmt, list),
            Some(GroupKind::Values) => self.visit_values(stmt, list),
            Some(
                GroupKind::Statement
                | GroupKind::Identifier
                | GroupKind::TypedLiteral
                | GroupKind::SquareBrackets
                | GroupKind::Assignment
                | GroupKind::If
                | GroupKind::For
                | GroupKind::Comparison
                | GroupKind::Comment
                | GroupKind::Over
                | GroupKind::Having
                | GroupKind::Begin
                | GroupKind::Operation
                | GroupKind::Command
                | GroupKind::TokenList,
            )
            | None => self.visit_default(stmt, list, true),
        }
    }

    fn visit_default(&mut self, stmt: &mut Statement, list: NodeId, split_statements: bool) {
        if split_statements {
            self.split_statements(stmt, list);
        }
        self.split_keywords(stmt, list);
        let sublists: Vec<NodeId> = stmt.get_sublists(list).collect();
        for sub in sublists {
            self.visit(stmt, sub);
        }
    }

    fn visit_where(&mut self, stmt: &mut Statement, list: NodeId) {
        let Some((tidx, _)) = stmt.token_next_by(list, &Matcher::patterns(WHERE), None, None) else {
            return;
        };
        stmt.insert_before(list, tidx, self.nl(0));
        self.scoped(stmt, 1, 0, |this, stmt| this.visit_default(stmt, list, true));
    }

    fn visit_parenthesis(&mut self, stmt: &mut Statement, list: NodeId) {
        let subquery = stmt.token_next_by(list, &STATEMENT_STARTS, None, None).is_some();
        let Some((_, open)) = stmt.token_next_by(list, &Matcher::patterns(OPEN_PAREN), None, None) else {
            return;
        };

        self.scoped(stmt, isize::from(subquery), 0, |this, stmt| {
            if subquery {
                stmt.insert_before(list, 0, this.nl(0));
            }
            let column = this.get_offset(stmt, open) + 1;
            this.scoped(stmt, 0, column, |this, stmt| {
                this.visit_default(stmt, list, !subquery);
            });
        });
    }

    fn visit_function(&mut self, stmt: &mut Statement, list: NodeId) {
        self.last_func = stmt.children(list).first().map(|&name| stmt.value(name));
        self.visit_default(stmt, list, true);
    }

    fn visit_identifier_list(&mut self, stmt: &mut Statement, list: NodeId) {
        let mut identifiers = stmt.get_identifiers(list);
        if identifiers.is_empty() {
            self.visit_default(stmt, list, true);
            return;
        }
        let tabs = self.options.indent_char == '\t';
        let num_offset = if self.options.indent_columns {
            if tabs { 1 } else { self.width() }
        } else {
            let first = identifiers.remove(0);
            if tabs { 1 } else { self.get_offset(stmt, first) }
        };

        if stmt.within(list, GroupKind::Function) || stmt.within(list, GroupKind::Values) {
            self.wrap_arguments(stmt, list, &identifiers);
        } else {
            self.scoped(stmt, 0, num_offset, |this, stmt| {
                this.wrap_columns(stmt, list, &identifiers);
            });
        }
        self.visit_default(stmt, list, true);
    }

    /// Break a select list once the running width passes `wrap_after`.
    fn wrap_columns(&self, stmt: &mut Statement, list: NodeId, identifiers: &[NodeId]) {
        let wraps = self.options.wrap_after > 0 || self.options.indent_columns;
        let mut position = 0;
        for &ident in identifiers {
            position += width(&stmt.value(ident)) + 1;
            if !wraps || position <= self.wrap_after() - self.offset {
                continue;
            }

            let mut anchor = ident;
            let mut adjust = 0;
            if self.options.comma_first {
                adjust = -2;
                let idx = stmt.token_index(list, ident);
                let Some((_, comma)) = stmt.token_prev(list, idx, true, false) else {
                    continue;
                };
                anchor = comma;
            }
            let idx = stmt.token_index(list, anchor);
            stmt.insert_before(list, idx, self.nl(adjust));

            if self.options.comma_first {
                let idx = stmt.token_index(list, anchor);
                if let Some((_, after)) = stmt.token_next(list, idx, false, false) {
                    if stmt.kind(after) != Some(TokenKind::Whitespace) {
                        stmt.insert_after(list, idx, Token::whitespace(" "), true);
                    }
                }
            }
            position = 0;
        }
    }

    /// Argument lists of calls and rows of VALUES: one space after each
    /// comma, and breaks only when the whole list is too wide.
    fn wrap_arguments(&mut self, stmt: &mut Statement, list: NodeId, identifiers: &[NodeId]) {
        let mut idx = 0;
        while idx < stmt.children(list).len() {
            let child = stmt.child(list, idx);
            if stmt.token(child).is_some_and(|t| t.value == ",") {
                if let Some((_, after)) = stmt.token_next(list, idx, false, false) {
                    if !stmt.is_whitespace(after) {
                        stmt.insert_after(list, idx, Token::whitespace(" "), true);
                    }
                }
            }
            idx += 1;
        }

        let end_at = self.offset
            + identifiers
                .iter()
                .map(|&ident| width(&stmt.value(ident)) + 1)
                .sum::<isize>();
        let mut adjusted = 0;
        if self.options.wrap_after > 0 && end_at > self.wrap_after() - self.offset {
            if let Some(func) = &self.last_func {
                adjusted = -width(func) - 1;
            }
        }

        self.scoped(stmt, 1, adjusted, |this, stmt| {
            if adjusted < 0 {
                if let Some(&first) = identifiers.first() {
                    let idx = stmt.token_index(list, first);
                    stmt.insert_before(list, idx, this.nl(0));
                }
            }
            let mut position = 0;
            for &ident in identifiers {
                position += width(&stmt.value(ident)) + 1;
                if this.options.wrap_after > 0 && position > this.wrap_after() - this.offset {
                    let idx = stmt.token_index(list, ident);
                    stmt.insert_before(list, idx, this.nl(0));
                    position = 0;
                }
            }
        });
    }

    fn visit_case(&mut self, stmt: &mut Statement, list: NodeId) {
        let mut branches = stmt.get_cases(list, false).into_iter();
        let first = branches
            .next()
            .and_then(|branch| branch.condition)
            .and_then(|condition| condition.first().copied());
        let case = stmt.children(list).first().copied();
        let (Some(first), Some(case)) = (first, case) else {
            self.visit_default(stmt, list, true);
            return;
        };

        let case_column = self.get_offset(stmt, case);
        self.scoped(stmt, 0, case_column, |this, stmt| {
            let first_column = this.get_offset(stmt, first);
            this.scoped(stmt, 0, first_column, |this, stmt| {
                for branch in branches {
                    let condition = branch.condition.as_deref().unwrap_or_default();
                    let text_width: isize = condition
                        .iter()
                        .chain(&branch.value)
                        .map(|&node| width(&stmt.value(node)))
                        .sum();
                    let end_pos = this.offset + 1 + text_width;
                    if this.options.compact || end_pos <= this.wrap_after() {
                        continue;
                    }
                    let anchor = if branch.condition.is_some() {
                        condition.first()
                    } else {
                        branch.value.first()
                    };
                    if let Some(&anchor) = anchor {
                        let idx = stmt.token_index(list, anchor);
                        stmt.insert_before(list, idx, this.nl(0));
                    }
                }
                this.scoped(stmt, 0, CASE_BODY_OFFSET, |this, stmt| {
                    this.visit_default(stmt, list, true);
                });
            });

            if !this.options.compact {
                if let Some((end_idx, _)) = stmt.token_next_by(list, &Matcher::patterns(END), None, None) {
                    stmt.insert_before(list, end_idx, this.nl(0));
                }
            }
        });
    }

    /// Each row of a VALUES clause on its own line.
    fn visit_values(&self, stmt: &mut Statement, list: NodeId) {
        stmt.insert_before(list, 0, self.nl(0));
        let rows = Matcher::groups(&[GroupKind::Parenthesis]);
        let comma = Matcher::patterns(COMMA);

        let mut next = stmt.token_next_by(list, &rows, None, None);
        let first_row = next.map(|(_, row)| row);
        while let Some((tidx, row)) = next {
            if let Some((cidx, _)) = stmt.token_next_by(list, &comma, Some(tidx), None) {
                if self.options.comma_first {
                    let column = first_row.map_or(0, |first| self.get_offset(stmt, first)) - 2;
                    stmt.insert_before(list, cidx, self.nl(column));
                } else {
                    let column = self.get_offset(stmt, row);
                    stmt.insert_after(list, cidx, self.nl(column), true);
                }
            }
            next = stmt.token_next_by(list, &rows, Some(tidx), None);
        }
    }
}

impl StatementFilter for ReindentFilter {
    fn process(&mut self, stmt: &mut Statement) {
        let root = stmt.root();
        self.visit(stmt, root);

        if let Some(ended_with_newline) = self.previous_ended_with_newline {
            let separator = if ended_with_newline {
                self.options.newline.clone()
            } else {
                self.options.newline.repeat(2)
            };
            stmt.insert_before(root, 0, Token::whitespace(separator));
        }
        self.previous_ended_with_newline = Some(stmt.to_string().ends_with('\n'));
        tracing::debug!(statement = %stmt.get_type(), "reindented");
    }
}
