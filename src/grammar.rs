//! Queries specific to grammar node kinds.
//!
//! These read a grouped tree; none of them mutate it. Asking a node for a
//! property its kind does not have yields `None` or an empty list.

use crate::token::TokenKind;
use crate::tree::{GroupKind, Matcher, NodeId, Pattern, Statement};

const DOT: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Punctuation, &["."])];
const AS: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Keyword, &["AS"])];
const DOUBLE_COLON: &[Pattern<'static>] = &[Pattern::Values(TokenKind::Punctuation, &["::"])];

/// One `WHEN`/`ELSE` branch of a CASE expression.
///
/// The buckets hold the tokens in document order, including the `WHEN`,
/// `THEN` and `ELSE` keywords themselves. `condition` is `None` for the
/// `ELSE` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseBranch {
    pub condition: Option<Vec<NodeId>>,
    pub value: Vec<NodeId>,
}

/// Strip one pair of matching surrounding quotes.
#[must_use]
pub fn remove_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'' | '`')), Some(last)) if first == last => {
            &value[1..value.len() - 1]
        }
        (Some('"' | '\'' | '`'), None) => "",
        _ => value,
    }
}

#[derive(Clone, Copy)]
enum NameScan {
    Forward(Option<usize>),
    Backward,
}

impl Statement {
    /// Upper-cased first DML or DDL keyword, looking past the CTE list of a
    /// `WITH` statement. `"UNKNOWN"` when there is none.
    #[must_use]
    pub fn get_type(&self) -> String {
        const UNKNOWN: &str = "UNKNOWN";
        let root = self.root();
        let Some(first) = self.token_first(root, true, true) else {
            return UNKNOWN.to_string();
        };
        let Some(token) = self.token(first) else {
            return UNKNOWN.to_string();
        };

        match token.kind {
            TokenKind::Dml | TokenKind::Ddl => token.normalized.clone(),
            TokenKind::Cte => {
                let mut idx = Some(self.token_index(root, first));
                while let Some(current) = idx {
                    let next = self.token_next(root, current, true, false);
                    idx = next.map(|(i, _)| i);
                    let Some((i, node)) = next else { break };
                    if self.is_group_of(node, GroupKind::Identifier)
                        || self.is_group_of(node, GroupKind::IdentifierList)
                    {
                        let after = self.token_next(root, i, true, false);
                        idx = after.map(|(i, _)| i);
                        if let Some(dml) = after
                            .and_then(|(_, n)| self.token(n))
                            .filter(|t| t.kind == TokenKind::Dml)
                        {
                            return dml.normalized.clone();
                        }
                    }
                }
                UNKNOWN.to_string()
            }
            _ => UNKNOWN.to_string(),
        }
    }

    fn has_name_parts(&self, id: NodeId) -> bool {
        matches!(
            self.group_kind(id),
            Some(GroupKind::Identifier | GroupKind::Function)
        )
    }

    /// Object name of an identifier or function: the name after the first
    /// dot, or the first name-like token.
    #[must_use]
    pub fn get_real_name(&self, id: NodeId) -> Option<String> {
        if !self.has_name_parts(id) {
            return None;
        }
        let dot = self
            .token_next_by(id, &Matcher::patterns(DOT), None, None)
            .map(|(i, _)| i);
        self.first_name(id, NameScan::Forward(dot), false, true)
    }

    /// Alias of an identifier or function, explicit (`AS x`) or implicit
    /// (the trailing name after whitespace).
    #[must_use]
    pub fn get_alias(&self, id: NodeId) -> Option<String> {
        if !self.has_name_parts(id) {
            return None;
        }
        if let Some((kw, _)) = self.token_next_by(id, &Matcher::patterns(AS), None, None) {
            return self.first_name(id, NameScan::Forward(Some(kw + 1)), true, false);
        }
        let whitespace = Matcher::kinds(&[TokenKind::Whitespace]);
        let has_ws = self.token_next_by(id, &whitespace, None, None).is_some();
        if self.children(id).len() > 2 && has_ws {
            return self.first_name(id, NameScan::Backward, false, false);
        }
        None
    }

    /// The alias when present, otherwise the real name.
    #[must_use]
    pub fn get_name(&self, id: NodeId) -> Option<String> {
        self.get_alias(id)
            .filter(|alias| !alias.is_empty())
            .or_else(|| self.get_real_name(id))
    }

    #[must_use]
    pub fn has_alias(&self, id: NodeId) -> bool {
        self.get_alias(id).is_some()
    }

    /// Unquoted text of the token before the first dot.
    #[must_use]
    pub fn get_parent_name(&self, id: NodeId) -> Option<String> {
        let (dot, _) = self.token_next_by(id, &Matcher::patterns(DOT), None, None)?;
        let (_, prev) = self.token_prev(id, dot, true, false)?;
        Some(remove_quotes(&self.value(prev)).to_string())
    }

    fn first_name(
        &self,
        list: NodeId,
        scan: NameScan,
        keywords: bool,
        real_name: bool,
    ) -> Option<String> {
        let children = self.children(list);
        let candidates: Box<dyn Iterator<Item = &NodeId>> = match scan {
            NameScan::Forward(Some(start)) if start > 0 => {
                Box::new(children.get(start..).unwrap_or_default().iter())
            }
            NameScan::Forward(_) => Box::new(children.iter()),
            NameScan::Backward => Box::new(children.iter().rev()),
        };

        for &child in candidates {
            if let Some(token) = self.token(child) {
                let named = matches!(
                    token.kind,
                    TokenKind::Name | TokenKind::Wildcard | TokenKind::StringSymbol
                ) || (keywords && token.kind == TokenKind::Keyword);
                if named {
                    return Some(remove_quotes(&token.value).to_string());
                }
            } else if self.has_name_parts(child) {
                return if real_name {
                    self.get_real_name(child)
                } else {
                    self.get_name(child)
                };
            }
        }
        None
    }

    /// Whether an identifier contains a `*`.
    #[must_use]
    pub fn is_wildcard(&self, id: NodeId) -> bool {
        self.token_next_by(id, &Matcher::kinds(&[TokenKind::Wildcard]), None, None)
            .is_some()
    }

    /// Text after `::` in an identifier.
    #[must_use]
    pub fn get_typecast(&self, id: NodeId) -> Option<String> {
        let (marker, _) = self.token_next_by(id, &Matcher::patterns(DOUBLE_COLON), None, None)?;
        let (_, next) = self.token_next(id, marker, false, false)?;
        Some(self.value(next))
    }

    /// `ASC`/`DESC` (possibly with `NULLS FIRST|LAST`) of an identifier.
    #[must_use]
    pub fn get_ordering(&self, id: NodeId) -> Option<String> {
        let (_, order) = self.token_next_by(id, &Matcher::kinds(&[TokenKind::Order]), None, None)?;
        Some(self.normalized(order))
    }

    /// The contents of each `[...]` subscript, brackets excluded.
    #[must_use]
    pub fn get_array_indices(&self, id: NodeId) -> Vec<Vec<NodeId>> {
        self.children(id)
            .iter()
            .filter(|&&c| self.is_group_of(c, GroupKind::SquareBrackets))
            .map(|&brackets| {
                let inner = self.children(brackets);
                inner[1..inner.len().saturating_sub(1).max(1)].to_vec()
            })
            .collect()
    }

    /// Children of a list without whitespace and comma separators.
    #[must_use]
    pub fn get_identifiers(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| {
                !(self.is_whitespace(c) || self.leaf_matches(c, TokenKind::Punctuation, Some(&[","])))
            })
            .collect()
    }

    /// Branches of a CASE group in document order.
    ///
    /// Tokens before the first `WHEN` form a branch of their own; tokens
    /// after `END` are ignored.
    #[must_use]
    pub fn get_cases(&self, id: NodeId, skip_ws: bool) -> Vec<CaseBranch> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mode {
            Condition,
            Value,
            Done,
        }

        let keyword = |node: NodeId, word: &str| self.leaf_matches(node, TokenKind::Keyword, Some(&[word]));

        let mut branches: Vec<CaseBranch> = Vec::new();
        let mut mode = Mode::Condition;

        for &child in self.children(id) {
            if keyword(child, "CASE") || (skip_ws && self.is_whitespace(child)) {
                continue;
            }
            if keyword(child, "WHEN") {
                branches.push(CaseBranch {
                    condition: Some(Vec::new()),
                    value: Vec::new(),
                });
                mode = Mode::Condition;
            } else if keyword(child, "THEN") {
                mode = Mode::Value;
            } else if keyword(child, "ELSE") {
                branches.push(CaseBranch {
                    condition: None,
                    value: Vec::new(),
                });
                mode = Mode::Value;
            } else if keyword(child, "END") {
                mode = Mode::Done;
            }

            if mode != Mode::Done && branches.is_empty() {
                branches.push(CaseBranch {
                    condition: Some(Vec::new()),
                    value: Vec::new(),
                });
            }

            let Some(branch) = branches.last_mut() else {
                continue;
            };
            match (mode, &mut branch.condition) {
                (Mode::Condition, Some(condition)) => condition.push(child),
                (Mode::Condition | Mode::Value, _) => branch.value.push(child),
                (Mode::Done, _) => {}
            }
        }
        branches
    }

    /// Arguments of a function call.
    #[must_use]
    pub fn get_parameters(&self, id: NodeId) -> Vec<NodeId> {
        let parens = Matcher::groups(&[GroupKind::Parenthesis]);
        let Some((_, parenthesis)) = self.token_next_by(id, &parens, None, None) else {
            return Vec::new();
        };
        let argument = Matcher::groups(&[
            GroupKind::Function,
            GroupKind::Identifier,
            GroupKind::TypedLiteral,
        ])
        .with_kinds(&[TokenKind::Literal]);

        let mut params = Vec::new();
        for &child in self.children(parenthesis) {
            if self.is_group_of(child, GroupKind::IdentifierList) {
                return self.get_identifiers(child);
            }
            if self.matches(child, &argument) {
                params.push(child);
            }
        }
        params
    }

    /// The window specification of `f(x) OVER (...)` or `OVER w`.
    #[must_use]
    pub fn get_window(&self, id: NodeId) -> Option<NodeId> {
        let over = Matcher::groups(&[GroupKind::Over]);
        let (_, clause) = self.token_next_by(id, &over, None, None)?;
        self.children(clause).last().copied()
    }

    /// Left operand of a comparison.
    #[must_use]
    pub fn comparison_left(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Right operand of a comparison.
    #[must_use]
    pub fn comparison_right(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Whether a comment group starts with a `/* */` comment.
    #[must_use]
    pub fn is_multiline(&self, id: NodeId) -> bool {
        self.children(id)
            .first()
            .is_some_and(|&c| self.kind(c) == Some(TokenKind::CommentMultiline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn quotes() {
        assert_eq!(remove_quotes("\"foo\""), "foo");
        assert_eq!(remove_quotes("'foo'"), "foo");
        assert_eq!(remove_quotes("`foo`"), "foo");
        assert_eq!(remove_quotes("\"foo'"), "\"foo'");
        assert_eq!(remove_quotes("foo"), "foo");
        assert_eq!(remove_quotes("\""), "");
        assert_eq!(remove_quotes(""), "");
    }

    #[test]
    fn statement_type() {
        let kind = |sql: &str| Statement::new(tokenize(sql)).get_type();
        assert_eq!(kind("select 1"), "SELECT");
        assert_eq!(kind("  -- note\n insert into t values (1)"), "INSERT");
        assert_eq!(kind("Create table t (a int)"), "CREATE");
        assert_eq!(kind(""), "UNKNOWN");
        assert_eq!(kind("   "), "UNKNOWN");
        assert_eq!(kind("foo bar"), "UNKNOWN");
    }

    #[test]
    fn names_need_identifier_or_function() {
        let stmt = Statement::new(tokenize("a"));
        assert_eq!(stmt.get_real_name(stmt.root()), None);
        assert_eq!(stmt.get_alias(stmt.root()), None);
    }
}
