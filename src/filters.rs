//! Whitespace and comment rewriting passes over grouped statements, plus
//! the token preprocessors and the final serializer.
//!
//! Statement filters only ever replace, insert or remove whitespace and
//! comment nodes. Everything else in the tree keeps its text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::{LetterCase, OutputFormat};
use crate::token::{Token, TokenKind};
use crate::tree::{GroupKind, Matcher, NodeId, Statement};

/// A pass that rewrites one grouped statement in place.
///
/// Filters are applied to the statements of an input in document order, so
/// an implementation may carry state from one statement to the next.
pub trait StatementFilter {
    fn process(&mut self, stmt: &mut Statement);
}

fn is_punct(stmt: &Statement, id: NodeId, value: &str) -> bool {
    stmt.leaf_matches(id, TokenKind::Punctuation, Some(&[value]))
}

fn sublists(stmt: &Statement, list: NodeId) -> Vec<NodeId> {
    stmt.get_sublists(list).collect()
}

/// Upper-, lower- or capitalize every keyword token.
pub fn keyword_case(tokens: &mut [Token], case: LetterCase) {
    for token in tokens.iter_mut().filter(|t| t.is_keyword()) {
        *token = Token::new(token.kind, case.apply(&token.value));
    }
}

/// Change the case of names and quoted symbols. Double-quoted identifiers
/// keep their spelling.
pub fn identifier_case(tokens: &mut [Token], case: LetterCase) {
    for token in tokens.iter_mut() {
        let named = matches!(token.kind, TokenKind::Name | TokenKind::StringSymbol);
        if named && !token.value.trim_start().starts_with('"') {
            *token = Token::new(token.kind, case.apply(&token.value));
        }
    }
}

/// Cut single-quoted strings to `width` characters, marking the cut with
/// `marker`. Doubled quotes around the text are kept doubled.
pub fn truncate_strings(tokens: &mut [Token], width: usize, marker: &str) {
    for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::StringSingle) {
        let Some(body) = token.value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) else {
            continue;
        };
        let (quote, inner) = match body.strip_prefix('\'').and_then(|b| b.strip_suffix('\'')) {
            Some(inner) => ("''", inner),
            None => ("'", body),
        };
        if inner.chars().count() > width {
            let kept: String = inner.chars().take(width).collect();
            *token = Token::new(token.kind, format!("{quote}{kept}{marker}{quote}"));
        }
    }
}

/// Collapses whitespace to single spaces.
///
/// Inside every group, a whitespace run shrinks to one space and leading
/// whitespace disappears. Identifier lists lose the whitespace in front of
/// their commas, parentheses lose the whitespace just inside them, and the
/// statement loses one trailing whitespace token.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripWhitespace;

impl StripWhitespace {
    fn strip(stmt: &mut Statement, list: NodeId) {
        for sub in sublists(stmt, list) {
            Self::strip(stmt, sub);
        }

        match stmt.group_kind(list) {
            Some(GroupKind::IdentifierList) => Self::strip_before_commas(stmt, list),
            Some(GroupKind::Parenthesis) => Self::strip_inside_parens(stmt, list),
            _ => {}
        }
        Self::collapse(stmt, list);
    }

    fn collapse(stmt: &mut Statement, list: NodeId) {
        let mut last_was_ws = false;
        for (idx, child) in stmt.children(list).to_vec().into_iter().enumerate() {
            let is_ws = stmt.is_whitespace(child);
            if is_ws {
                let value = if last_was_ws || idx == 0 { "" } else { " " };
                stmt.set_whitespace(child, value);
            }
            last_was_ws = is_ws;
        }
    }

    fn strip_before_commas(stmt: &mut Statement, list: NodeId) {
        let mut idx = 1;
        while idx < stmt.children(list).len() {
            let child = stmt.child(list, idx);
            if is_punct(stmt, child, ",") && stmt.is_whitespace(stmt.child(list, idx - 1)) {
                stmt.remove(list, idx - 1);
            } else {
                idx += 1;
            }
        }
    }

    fn strip_inside_parens(stmt: &mut Statement, list: NodeId) {
        while stmt.children(list).len() > 2 && stmt.is_whitespace(stmt.child(list, 1)) {
            stmt.remove(list, 1);
        }
        while stmt.children(list).len() > 2 {
            let idx = stmt.children(list).len() - 2;
            if !stmt.is_whitespace(stmt.child(list, idx)) {
                break;
            }
            stmt.remove(list, idx);
        }

        let len = stmt.children(list).len();
        if len < 2 {
            return;
        }
        let inner = stmt.child(list, len - 2);
        while let Some(&last) = stmt.children(inner).last() {
            if !stmt.is_whitespace(last) {
                break;
            }
            let idx = stmt.children(inner).len() - 1;
            stmt.remove(inner, idx);
        }
    }
}

impl StatementFilter for StripWhitespace {
    fn process(&mut self, stmt: &mut Statement) {
        let root = stmt.root();
        Self::strip(stmt, root);
        if let Some(&last) = stmt.children(root).last() {
            if stmt.is_whitespace(last) {
                let idx = stmt.children(root).len() - 1;
                stmt.remove(root, idx);
            }
        }
    }
}

/// Replaces comments by a space, or by the line breaks they ended with.
///
/// Optimizer hints (`--+`, `# +`, `/*+`) are kept. A comment directly
/// after an opening parenthesis or at the start of a list is dropped
/// without replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripComments;

const COMMENTS: Matcher<'static> =
    Matcher::groups(&[GroupKind::Comment]).with_kinds(&[TokenKind::Comment]);

impl StripComments {
    fn is_hint(stmt: &Statement, id: NodeId) -> bool {
        let leaf = stmt.children(id).first().copied().unwrap_or(id);
        stmt.token(leaf).is_some_and(|t| {
            t.kind.is_a(TokenKind::Comment)
                && ["--+", "# +", "/*+"].iter().any(|hint| t.value.starts_with(hint))
        })
    }

    fn replacement(text: &str) -> Token {
        static TRAILING_BREAK: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"([\r\n]+) *$").expect("valid regex"));

        TRAILING_BREAK
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map_or_else(
                || Token::whitespace(" "),
                |breaks| Token::new(TokenKind::Newline, breaks.as_str()),
            )
    }

    fn strip(stmt: &mut Statement, list: NodeId) {
        // Comment groups are replaced as a whole, using their text from
        // before their own content was stripped.
        let mut group_texts = Vec::new();
        for sub in sublists(stmt, list) {
            if stmt.is_group_of(sub, GroupKind::Comment) {
                group_texts.push((sub, stmt.value(sub)));
            }
            Self::strip(stmt, sub);
        }

        let mut next = stmt.token_next_by(list, &COMMENTS, None, None);
        while let Some((tidx, comment)) = next {
            if Self::is_hint(stmt, comment) {
                next = stmt.token_next_by(list, &COMMENTS, Some(tidx), None);
                continue;
            }

            let text = group_texts
                .iter()
                .find(|(id, _)| *id == comment)
                .map_or_else(|| stmt.value(comment), |(_, text)| text.clone());
            let token = Self::replacement(&text);
            let prev = stmt.token_prev(list, tidx, false, false).map(|(_, id)| id);
            let after = stmt.token_next(list, tidx, false, false).map(|(_, id)| id);

            let resume = match (prev, after) {
                (Some(p), Some(n))
                    if !(stmt.is_whitespace(p)
                        || is_punct(stmt, p, "(")
                        || stmt.is_whitespace(n)
                        || is_punct(stmt, n, ")")) =>
                {
                    stmt.replace_child(list, tidx, token);
                    Some(tidx)
                }
                (Some(p), _) if !is_punct(stmt, p, "(") => {
                    stmt.insert_before(list, tidx, token);
                    stmt.remove(list, tidx + 1);
                    Some(tidx)
                }
                _ => {
                    stmt.remove(list, tidx);
                    tidx.checked_sub(1)
                }
            };
            next = stmt.token_next_by(list, &COMMENTS, resume, None);
        }
    }
}

impl StatementFilter for StripComments {
    fn process(&mut self, stmt: &mut Statement) {
        let root = stmt.root();
        Self::strip(stmt, root);
    }
}

/// Puts a space on both sides of every operator and comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacesAroundOperators;

impl SpacesAroundOperators {
    /// Operators and comparisons. A `*` counts when it sits inside an
    /// arithmetic operation.
    fn is_operator(stmt: &Statement, id: NodeId) -> bool {
        match stmt.kind(id) {
            Some(TokenKind::Operator | TokenKind::Comparison) => true,
            Some(TokenKind::Wildcard) => stmt
                .parent(id)
                .is_some_and(|p| stmt.is_group_of(p, GroupKind::Operation)),
            _ => false,
        }
    }

    fn space(stmt: &mut Statement, list: NodeId) {
        for sub in sublists(stmt, list) {
            Self::space(stmt, sub);
        }

        let mut next = stmt.token_matching(list, Self::is_operator, 0);
        while let Some((mut tidx, _)) = next {
            if let Some((_, after)) = stmt.token_next(list, tidx, false, false) {
                if stmt.kind(after) != Some(TokenKind::Whitespace) {
                    stmt.insert_after(list, tidx, Token::whitespace(" "), true);
                }
            }
            if let Some((_, before)) = stmt.token_prev(list, tidx, false, false) {
                if stmt.kind(before) != Some(TokenKind::Whitespace) {
                    stmt.insert_before(list, tidx, Token::whitespace(" "));
                    tidx += 1;
                }
            }
            next = stmt.token_matching(list, Self::is_operator, tidx + 1);
        }
    }
}

impl StatementFilter for SpacesAroundOperators {
    fn process(&mut self, stmt: &mut Statement) {
        let root = stmt.root();
        Self::space(stmt, root);
    }
}

/// Turns each statement into source code that assigns its text to a
/// string variable: `sql`, `sql2`, ... in Python, `$sql`, `$sql2`, ... in
/// PHP. Every line of the statement becomes its own string literal.
#[derive(Debug, Clone)]
pub struct OutputFilter {
    format: OutputFormat,
    count: usize,
}

impl OutputFilter {
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format, count: 0 }
    }

    fn varname(&self) -> String {
        let base = if self.format == OutputFormat::Php { "$sql" } else { "sql" };
        if self.count > 1 {
            format!("{base}{}", self.count)
        } else {
            base.to_string()
        }
    }

    /// The text after the first line break of a whitespace token, if the
    /// token holds one.
    fn line_break(token: &Token) -> Option<&str> {
        if !token.is_whitespace() {
            return None;
        }
        token.value.split_once('\n').map(|(_, rest)| rest)
    }

    fn python(&self, body: &[Token], multiline: bool) -> Vec<Token> {
        let varname = self.varname();
        let mut out = vec![
            Token::new(TokenKind::Name, varname.as_str()),
            Token::whitespace(" "),
            Token::new(TokenKind::Operator, "="),
            Token::whitespace(" "),
        ];
        if multiline {
            out.push(Token::new(TokenKind::Punctuation, "("));
        }
        out.push(Token::new(TokenKind::Text, "'"));
        for token in body {
            if let Some(indent) = Self::line_break(token) {
                out.push(Token::new(TokenKind::Text, " '"));
                out.push(Token::new(TokenKind::Newline, "\n"));
                out.push(Token::whitespace(" ".repeat(varname.chars().count() + 4)));
                out.push(Token::new(TokenKind::Text, "'"));
                if !indent.is_empty() {
                    out.push(Token::whitespace(indent));
                }
            } else {
                out.push(Token::new(TokenKind::Text, token.value.replace('\'', "\\'")));
            }
        }
        out.push(Token::new(TokenKind::Text, "'"));
        if multiline {
            out.push(Token::new(TokenKind::Punctuation, ")"));
        }
        out
    }

    fn php(&self, body: &[Token], multiline: bool) -> Vec<Token> {
        let varname = self.varname();
        let mut out = vec![Token::new(TokenKind::Name, varname.as_str()), Token::whitespace(" ")];
        if multiline {
            out.push(Token::whitespace(" "));
        }
        out.push(Token::new(TokenKind::Operator, "="));
        out.push(Token::whitespace(" "));
        out.push(Token::new(TokenKind::Text, "\""));
        for token in body {
            if let Some(indent) = Self::line_break(token) {
                out.push(Token::new(TokenKind::Text, " \";"));
                out.push(Token::new(TokenKind::Newline, "\n"));
                out.push(Token::new(TokenKind::Name, varname.as_str()));
                out.push(Token::whitespace(" "));
                out.push(Token::new(TokenKind::Operator, ".="));
                out.push(Token::whitespace(" "));
                out.push(Token::new(TokenKind::Text, "\""));
                if !indent.is_empty() {
                    out.push(Token::whitespace(indent));
                }
            } else {
                out.push(Token::new(TokenKind::Text, token.value.replace('"', "\\\"")));
            }
        }
        out.push(Token::new(TokenKind::Text, "\""));
        out.push(Token::new(TokenKind::Punctuation, ";"));
        out
    }
}

impl StatementFilter for OutputFilter {
    fn process(&mut self, stmt: &mut Statement) {
        if self.format == OutputFormat::Sql {
            return;
        }
        let leaves: Vec<Token> = stmt
            .flatten(stmt.root())
            .filter_map(|leaf| stmt.token(leaf))
            .cloned()
            .collect();
        let start = leaves.iter().position(|t| !t.is_whitespace()).unwrap_or(leaves.len());
        let end = leaves.iter().rposition(|t| !t.is_whitespace()).map_or(start, |i| i + 1);
        let body = &leaves[start..end];
        let text: String = body.iter().map(|t| t.value.as_str()).collect();
        let multiline = text.lines().count() > 1;

        self.count += 1;
        let mut tokens = Vec::new();
        if self.count > 1 {
            tokens.push(Token::new(TokenKind::Newline, "\n"));
        }
        tokens.extend(match self.format {
            OutputFormat::Php => self.php(body, multiline),
            OutputFormat::Python | OutputFormat::Sql => self.python(body, multiline),
        });
        *stmt = Statement::new(tokens);
    }
}

/// Statement text with every line right-trimmed and joined by `newline`.
///
/// Line breaks inside quoted strings do not end a line.
#[must_use]
pub fn serialize(stmt: &Statement, newline: &str) -> String {
    static PIECES: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"\r\n|\r|\n|[^\r\n'"]+|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#)
            .expect("valid regex")
    });

    let text = stmt.to_string();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut last = 0;
    for piece in PIECES.find_iter(&text) {
        current.push_str(&text[last..piece.start()]);
        if matches!(piece.as_str(), "\r\n" | "\r" | "\n") {
            lines.push(std::mem::take(&mut current));
        } else {
            current.push_str(piece.as_str());
        }
        last = piece.end();
    }
    current.push_str(&text[last..]);
    lines.push(current);

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join(newline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;
    use crate::lexer::tokenize;

    fn grouped(sql: &str) -> Statement {
        let mut stmt = Statement::new(tokenize(sql));
        group(&mut stmt);
        stmt
    }

    fn run(filter: &mut impl StatementFilter, sql: &str) -> String {
        let mut stmt = grouped(sql);
        filter.process(&mut stmt);
        stmt.to_string()
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            run(&mut StripWhitespace, "select  a ,\n  b\tfrom   t  "),
            "select a, b from t"
        );
    }

    #[test]
    fn trims_inside_parenthesis() {
        assert_eq!(run(&mut StripWhitespace, "select ( 1 + 2 )"), "select (1 + 2)");
        assert_eq!(run(&mut StripWhitespace, "select f( )"), "select f()");
    }

    #[test]
    fn comment_between_tokens_becomes_space() {
        assert_eq!(run(&mut StripComments, "select a/* x */from t"), "select a from t");
    }

    #[test]
    fn comment_keeps_line_break() {
        assert_eq!(
            run(&mut StripComments, "select * -- note\nfrom t"),
            "select * \nfrom t"
        );
    }

    #[test]
    fn leading_comment_is_dropped() {
        assert_eq!(run(&mut StripComments, "/* lead */select 1"), "select 1");
    }

    #[test]
    fn hints_are_kept() {
        let sql = "select /*+ index(t) */ a from t";
        assert_eq!(run(&mut StripComments, sql), sql);
    }

    #[test]
    fn spaces_operators() {
        assert_eq!(
            run(&mut SpacesAroundOperators, "select a+b*2 from t where c>=1"),
            "select a + b * 2 from t where c >= 1"
        );
        assert_eq!(
            run(&mut SpacesAroundOperators, "select * from t"),
            "select * from t"
        );
    }

    #[test]
    fn case_preprocessing() {
        let mut tokens = tokenize("select Foo, \"Bar\" from t");
        keyword_case(&mut tokens, LetterCase::Upper);
        identifier_case(&mut tokens, LetterCase::Upper);
        let text: String = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(text, "SELECT FOO, \"Bar\" FROM T");
    }

    #[test]
    fn serializer_trims_lines_outside_strings() {
        let stmt = Statement::new(tokenize("select 'a  \n b'  \nfrom t  "));
        assert_eq!(serialize(&stmt, "\n"), "select 'a  \n b'\nfrom t");
        let stmt = Statement::new(tokenize("a \nb"));
        assert_eq!(serialize(&stmt, "\r\n"), "a\r\nb");
    }
}
