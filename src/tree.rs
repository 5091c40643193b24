//! Arena-backed token tree.
//!
//! A [`Statement`] owns every node of one SQL statement in a flat arena.
//! Groups refer to their children by [`NodeId`] and every node keeps a
//! non-owning parent handle, so moving a run of siblings into a new group
//! is an index rewrite rather than a pointer dance.
//!
//! Child positions (`usize`) always index the direct children of one
//! list. Passing a position or node that does not belong to that list is a
//! programming error and panics.

use std::fmt;
use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{Token, TokenKind};

/// Handle to a node inside a [`Statement`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The closed set of grammar node kinds a group can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Statement,
    Identifier,
    IdentifierList,
    TypedLiteral,
    Parenthesis,
    SquareBrackets,
    Assignment,
    If,
    For,
    Comparison,
    Comment,
    Where,
    Over,
    Having,
    Case,
    Function,
    Begin,
    Operation,
    Values,
    Command,
    /// A plain group with no grammar meaning. As a match target it accepts
    /// every group kind.
    TokenList,
}

impl GroupKind {
    /// Whether a group of this kind satisfies a test for `wanted`.
    #[must_use]
    pub fn is_a(self, wanted: Self) -> bool {
        wanted == Self::TokenList || self == wanted
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A leaf test: exact token kind plus an optional value constraint.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'a> {
    Kind(TokenKind),
    Values(TokenKind, &'a [&'a str]),
    Regex(TokenKind, &'a [Regex]),
}

impl Pattern<'_> {
    #[must_use]
    pub fn matches(&self, token: &Token) -> bool {
        match *self {
            Self::Kind(kind) => token.matches(kind, None),
            Self::Values(kind, values) => token.matches(kind, Some(values)),
            Self::Regex(kind, patterns) => token.matches_regex(kind, patterns),
        }
    }
}

/// Node predicate used by the tree queries.
///
/// A node matches when any one criterion accepts it: a group whose kind is
/// in `groups`, or a leaf accepted by one of `patterns`, whose kind is
/// nested below one of `kinds`, or whose kind is exactly one of `exact`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher<'a> {
    pub groups: &'a [GroupKind],
    pub patterns: &'a [Pattern<'a>],
    pub kinds: &'a [TokenKind],
    pub exact: &'a [TokenKind],
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub const fn groups(groups: &'a [GroupKind]) -> Self {
        Self {
            groups,
            patterns: &[],
            kinds: &[],
            exact: &[],
        }
    }

    #[must_use]
    pub const fn patterns(patterns: &'a [Pattern<'a>]) -> Self {
        Self {
            groups: &[],
            patterns,
            kinds: &[],
            exact: &[],
        }
    }

    #[must_use]
    pub const fn kinds(kinds: &'a [TokenKind]) -> Self {
        Self {
            groups: &[],
            patterns: &[],
            kinds,
            exact: &[],
        }
    }

    #[must_use]
    pub const fn exact(exact: &'a [TokenKind]) -> Self {
        Self {
            groups: &[],
            patterns: &[],
            kinds: &[],
            exact,
        }
    }

    #[must_use]
    pub const fn with_groups(self, groups: &'a [GroupKind]) -> Self {
        Self { groups, ..self }
    }

    #[must_use]
    pub const fn with_patterns(self, patterns: &'a [Pattern<'a>]) -> Self {
        Self { patterns, ..self }
    }

    #[must_use]
    pub const fn with_kinds(self, kinds: &'a [TokenKind]) -> Self {
        Self { kinds, ..self }
    }

    #[must_use]
    pub const fn with_exact(self, exact: &'a [TokenKind]) -> Self {
        Self { exact, ..self }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Leaf(Token),
    Group {
        kind: GroupKind,
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// One SQL statement: an arena of nodes rooted at a `Statement` group.
#[derive(Debug, Clone)]
pub struct Statement {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Statement {
    /// Wrap a flat token sequence in a new, ungrouped statement.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let root = NodeId(0);
        let mut nodes = Vec::with_capacity(tokens.len() + 1);
        nodes.push(Node {
            parent: None,
            data: NodeData::Group {
                kind: GroupKind::Statement,
                children: (1..=tokens.len()).map(NodeId).collect(),
            },
        });
        nodes.extend(tokens.into_iter().map(|token| Node {
            parent: Some(root),
            data: NodeData::Leaf(token),
        }));
        Self { nodes, root }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn alloc(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent, data });
        id
    }

    fn children_mut(&mut self, list: NodeId) -> &mut Vec<NodeId> {
        match &mut self.nodes[list.0].data {
            NodeData::Group { children, .. } => children,
            NodeData::Leaf(token) => panic!("{token:?} is not a group"),
        }
    }

    /// The token of a leaf node, `None` for groups.
    #[must_use]
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        match &self.node(id).data {
            NodeData::Leaf(token) => Some(token),
            NodeData::Group { .. } => None,
        }
    }

    /// The grammar kind of a group node, `None` for leaves.
    #[must_use]
    pub fn group_kind(&self, id: NodeId) -> Option<GroupKind> {
        match self.node(id).data {
            NodeData::Group { kind, .. } => Some(kind),
            NodeData::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn is_group(&self, id: NodeId) -> bool {
        self.group_kind(id).is_some()
    }

    /// Whether `id` is a group satisfying a test for `kind`.
    #[must_use]
    pub fn is_group_of(&self, id: NodeId, kind: GroupKind) -> bool {
        self.group_kind(id).is_some_and(|k| k.is_a(kind))
    }

    /// Direct children of a group; empty for leaves.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).data {
            NodeData::Group { children, .. } => children,
            NodeData::Leaf(_) => &[],
        }
    }

    /// The child at position `idx` of `list`.
    #[must_use]
    pub fn child(&self, list: NodeId, idx: usize) -> NodeId {
        self.children(list)[idx]
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Lexical kind of a leaf, `None` for groups.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<TokenKind> {
        self.token(id).map(|t| t.kind)
    }

    /// Hierarchical kind test; always false for groups.
    #[must_use]
    pub fn is_kind(&self, id: NodeId, kind: TokenKind) -> bool {
        self.kind(id).is_some_and(|k| k.is_a(kind))
    }

    #[must_use]
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        self.token(id).is_some_and(Token::is_whitespace)
    }

    #[must_use]
    pub fn is_newline(&self, id: NodeId) -> bool {
        self.token(id).is_some_and(Token::is_newline)
    }

    #[must_use]
    pub fn is_keyword(&self, id: NodeId) -> bool {
        self.token(id).is_some_and(Token::is_keyword)
    }

    /// [`Token::matches`] lifted to nodes; groups never match.
    #[must_use]
    pub fn leaf_matches(&self, id: NodeId, kind: TokenKind, values: Option<&[&str]>) -> bool {
        self.token(id).is_some_and(|t| t.matches(kind, values))
    }

    #[must_use]
    pub fn matches(&self, id: NodeId, matcher: &Matcher<'_>) -> bool {
        match &self.node(id).data {
            NodeData::Group { kind, .. } => matcher.groups.iter().any(|g| kind.is_a(*g)),
            NodeData::Leaf(token) => {
                matcher.patterns.iter().any(|p| p.matches(token))
                    || matcher.kinds.iter().any(|k| token.kind.is_a(*k))
                    || matcher.exact.contains(&token.kind)
            }
        }
    }

    /// Leaves below `id` in document order. A leaf flattens to itself.
    #[must_use]
    pub fn flatten(&self, id: NodeId) -> Flatten<'_> {
        Flatten {
            tree: self,
            stack: vec![id],
        }
    }

    /// Concatenated text of every leaf below `id`.
    #[must_use]
    pub fn value(&self, id: NodeId) -> String {
        self.flatten(id)
            .filter_map(|leaf| self.token(leaf))
            .map(|t| t.value.as_str())
            .collect()
    }

    /// Normalized text of a leaf; the plain text of a group.
    #[must_use]
    pub fn normalized(&self, id: NodeId) -> String {
        self.token(id)
            .map_or_else(|| self.value(id), |t| t.normalized.clone())
    }

    /// Whether some ancestor of `id` is a group of `kind`.
    #[must_use]
    pub fn within(&self, id: NodeId, kind: GroupKind) -> bool {
        self.ancestors(id).any(|a| self.is_group_of(a, kind))
    }

    #[must_use]
    pub fn has_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    #[must_use]
    pub fn is_child_of(&self, id: NodeId, other: NodeId) -> bool {
        self.parent(id) == Some(other)
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Direct children of `list` that are groups.
    pub fn get_sublists(&self, list: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(list)
            .iter()
            .copied()
            .filter(|&c| self.is_group(c))
    }

    fn is_skipped(&self, id: NodeId, skip_ws: bool, skip_cm: bool) -> bool {
        (skip_ws && self.is_whitespace(id))
            || (skip_cm
                && (self.is_kind(id, TokenKind::Comment)
                    || self.is_group_of(id, GroupKind::Comment)))
    }

    /// First child of `list`, optionally skipping whitespace and comments.
    #[must_use]
    pub fn token_first(&self, list: NodeId, skip_ws: bool, skip_cm: bool) -> Option<NodeId> {
        self.token_matching(list, |s, c| !s.is_skipped(c, skip_ws, skip_cm), 0)
            .map(|(_, id)| id)
    }

    /// First child at or after position `start` satisfying `pred`.
    pub fn token_matching(
        &self,
        list: NodeId,
        pred: impl Fn(&Self, NodeId) -> bool,
        start: usize,
    ) -> Option<(usize, NodeId)> {
        self.children(list)
            .iter()
            .copied()
            .enumerate()
            .skip(start)
            .find(|&(_, c)| pred(self, c))
    }

    /// First child at or after position `start` *not* satisfying `pred`.
    pub fn token_not_matching(
        &self,
        list: NodeId,
        pred: impl Fn(&Self, NodeId) -> bool,
        start: usize,
    ) -> Option<(usize, NodeId)> {
        self.token_matching(list, |s, c| !pred(s, c), start)
    }

    /// First child matching `matcher` strictly after position `after`
    /// (from the start when `after` is `None`) and before `end`.
    #[must_use]
    pub fn token_next_by(
        &self,
        list: NodeId,
        matcher: &Matcher<'_>,
        after: Option<usize>,
        end: Option<usize>,
    ) -> Option<(usize, NodeId)> {
        let children = self.children(list);
        let start = after.map_or(0, |i| i + 1);
        let end = end.map_or(children.len(), |e| e.min(children.len()));
        children
            .iter()
            .copied()
            .enumerate()
            .take(end)
            .skip(start)
            .find(|&(_, c)| self.matches(c, matcher))
    }

    /// Next child after position `idx`.
    #[must_use]
    pub fn token_next(
        &self,
        list: NodeId,
        idx: usize,
        skip_ws: bool,
        skip_cm: bool,
    ) -> Option<(usize, NodeId)> {
        self.token_matching(list, |s, c| !s.is_skipped(c, skip_ws, skip_cm), idx + 1)
    }

    /// Closest child before position `idx`.
    #[must_use]
    pub fn token_prev(
        &self,
        list: NodeId,
        idx: usize,
        skip_ws: bool,
        skip_cm: bool,
    ) -> Option<(usize, NodeId)> {
        let children = self.children(list);
        children[..idx.min(children.len())]
            .iter()
            .copied()
            .enumerate()
            .rev()
            .find(|&(_, c)| !self.is_skipped(c, skip_ws, skip_cm))
    }

    /// Position of `child` within `list`.
    ///
    /// # Panics
    ///
    /// Panics when `child` is not a direct child of `list`.
    #[must_use]
    pub fn token_index(&self, list: NodeId, child: NodeId) -> usize {
        self.children(list)
            .iter()
            .position(|&c| c == child)
            .unwrap_or_else(|| panic!("{child:?} is not a child of {list:?}"))
    }

    /// Replace the children `start..=end` (or `start..end` without
    /// `include_end`) of `list` by one group of `kind`.
    ///
    /// With `extend`, when the child at `start` already is a group of
    /// `kind`, the rest of the range is appended to it instead. Returns the
    /// new or extended group.
    pub fn group_tokens(
        &mut self,
        list: NodeId,
        kind: GroupKind,
        start: usize,
        end: usize,
        include_end: bool,
        extend: bool,
    ) -> NodeId {
        let end = end + usize::from(include_end);
        let len = self.children(list).len();
        assert!(
            start < len && start <= end && end <= len,
            "group range {start}..{end} out of bounds for {len} children"
        );
        let first = self.children(list)[start];

        let (group, moved) = if extend && self.is_group_of(first, kind) {
            let moved: Vec<NodeId> = self.children_mut(list).drain(start + 1..end).collect();
            self.children_mut(first).extend_from_slice(&moved);
            (first, moved)
        } else {
            let group = self.alloc(
                Some(list),
                NodeData::Group {
                    kind,
                    children: Vec::new(),
                },
            );
            let moved: Vec<NodeId> = self
                .children_mut(list)
                .splice(start..end, [group])
                .collect();
            self.children_mut(group).extend_from_slice(&moved);
            (group, moved)
        };

        for id in moved {
            self.nodes[id.0].parent = Some(group);
        }
        group
    }

    /// Insert a new leaf at position `idx` of `list`.
    pub fn insert_before(&mut self, list: NodeId, idx: usize, token: Token) -> NodeId {
        let id = self.alloc(Some(list), NodeData::Leaf(token));
        self.children_mut(list).insert(idx, id);
        id
    }

    /// Insert a new leaf after the child at `idx`. With `skip_ws` it lands
    /// just before the next non-whitespace child; without a next child it
    /// is appended.
    pub fn insert_after(&mut self, list: NodeId, idx: usize, token: Token, skip_ws: bool) -> NodeId {
        match self.token_next(list, idx, skip_ws, false) {
            Some((next, _)) => self.insert_before(list, next, token),
            None => {
                let end = self.children(list).len();
                self.insert_before(list, end, token)
            }
        }
    }

    /// Detach the child at `idx` from `list`.
    pub fn remove(&mut self, list: NodeId, idx: usize) -> NodeId {
        let id = self.children_mut(list).remove(idx);
        self.nodes[id.0].parent = None;
        id
    }

    /// Put a new leaf in place of the child at `idx`.
    pub fn replace_child(&mut self, list: NodeId, idx: usize, token: Token) -> NodeId {
        let id = self.alloc(Some(list), NodeData::Leaf(token));
        let old = std::mem::replace(&mut self.children_mut(list)[idx], id);
        self.nodes[old.0].parent = None;
        id
    }

    /// Replace the text of a whitespace leaf, keeping its kind.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not a whitespace leaf.
    pub fn set_whitespace(&mut self, id: NodeId, value: &str) {
        match &mut self.nodes[id.0].data {
            NodeData::Leaf(token) if token.is_whitespace() => {
                *token = Token::new(token.kind, value);
            }
            other => panic!("cannot rewrite non-whitespace node {other:?}"),
        }
    }

    /// The leaf covering character position `offset` of the statement text.
    #[must_use]
    pub fn get_token_at_offset(&self, offset: usize) -> Option<NodeId> {
        let mut start = 0;
        for leaf in self.flatten(self.root) {
            let end = start + self.token(leaf).map_or(0, |t| t.value.chars().count());
            if (start..end).contains(&offset) {
                return Some(leaf);
            }
            start = end;
        }
        None
    }

    /// Indented dump of the subtree below `id`, one child per line.
    #[must_use]
    pub fn pretty_tree(&self, id: NodeId, max_depth: Option<usize>) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, id, max_depth, 0, "");
        out
    }

    fn write_tree(&self, out: &mut String, list: NodeId, max_depth: Option<usize>, depth: usize, pre: &str) {
        static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

        let children = self.children(list);
        for (idx, &child) in children.iter().enumerate() {
            let last = idx + 1 == children.len();
            let name = self.group_kind(child).as_ref().map_or_else(
                || self.kind(child).as_ref().map(ToString::to_string).unwrap_or_default(),
                ToString::to_string,
            );
            let raw = self.value(child);
            let short = if raw.chars().count() > 7 {
                format!("{}...", raw.chars().take(6).collect::<String>())
            } else {
                raw
            };
            let short = WS.replace_all(&short, " ");
            let quote = if short.starts_with('\'') && short.ends_with('\'') {
                '"'
            } else {
                '\''
            };
            let branch = if last { "`- " } else { "|- " };
            let _ = writeln!(out, "{pre}{branch}{idx} {name} {quote}{short}{quote}");

            if self.is_group(child) && max_depth.is_none_or(|max| depth < max) {
                let nested = format!("{pre}{}", if last { "   " } else { "|  " });
                self.write_tree(out, child, max_depth, depth + 1, &nested);
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for leaf in self.flatten(self.root) {
            if let Some(token) = self.token(leaf) {
                f.write_str(&token.value)?;
            }
        }
        Ok(())
    }
}

/// Depth-first iterator over the leaves of a subtree.
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    tree: &'a Statement,
    stack: Vec<NodeId>,
}

impl Iterator for Flatten<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            match &self.tree.node(id).data {
                NodeData::Leaf(_) => return Some(id),
                NodeData::Group { children, .. } => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[(TokenKind, &str)]) -> Vec<Token> {
        parts.iter().map(|&(k, v)| Token::new(k, v)).collect()
    }

    fn dotted() -> Statement {
        Statement::new(tokens(&[
            (TokenKind::Name, "t"),
            (TokenKind::Punctuation, "."),
            (TokenKind::Name, "c"),
        ]))
    }

    #[test]
    fn new_statement_is_flat() {
        let stmt = dotted();
        let root = stmt.root();
        assert_eq!(stmt.group_kind(root), Some(GroupKind::Statement));
        assert_eq!(stmt.children(root).len(), 3);
        assert!(stmt.children(root).iter().all(|&c| stmt.is_child_of(c, root)));
        assert_eq!(stmt.to_string(), "t.c");
    }

    #[test]
    fn group_tokens_reparents() {
        let mut stmt = dotted();
        let root = stmt.root();
        let leaves: Vec<_> = stmt.children(root).to_vec();
        let group = stmt.group_tokens(root, GroupKind::Identifier, 0, 2, true, false);
        assert_eq!(stmt.children(root), &[group]);
        assert_eq!(stmt.children(group), leaves.as_slice());
        assert!(leaves.iter().all(|&l| stmt.is_child_of(l, group)));
        assert!(stmt.within(leaves[0], GroupKind::Identifier));
        assert!(stmt.has_ancestor(leaves[0], root));
        assert_eq!(stmt.value(group), "t.c");
    }

    #[test]
    fn group_tokens_extend() {
        let mut stmt = dotted();
        let root = stmt.root();
        let first = stmt.group_tokens(root, GroupKind::Identifier, 0, 0, true, false);
        let extended = stmt.group_tokens(root, GroupKind::Identifier, 0, 2, true, true);
        assert_eq!(first, extended);
        assert_eq!(stmt.children(first).len(), 3);
        assert_eq!(stmt.children(root), &[first]);
    }

    #[test]
    fn token_list_kind_extends_any_group() {
        let mut stmt = dotted();
        let root = stmt.root();
        let ident = stmt.group_tokens(root, GroupKind::Identifier, 0, 0, true, false);
        let grown = stmt.group_tokens(root, GroupKind::TokenList, 0, 1, true, true);
        assert_eq!(ident, grown);
        assert_eq!(stmt.group_kind(grown), Some(GroupKind::Identifier));
    }

    #[test]
    fn navigation() {
        let stmt = Statement::new(tokens(&[
            (TokenKind::Keyword, "from"),
            (TokenKind::Whitespace, " "),
            (TokenKind::CommentSingle, "-- x\n"),
            (TokenKind::Name, "t"),
        ]));
        let root = stmt.root();
        assert_eq!(stmt.token_next(root, 0, true, false).map(|(i, _)| i), Some(2));
        assert_eq!(stmt.token_next(root, 0, true, true).map(|(i, _)| i), Some(3));
        assert_eq!(stmt.token_prev(root, 3, true, false).map(|(i, _)| i), Some(2));
        assert_eq!(stmt.token_prev(root, 2, true, false).map(|(i, _)| i), Some(0));
        assert_eq!(stmt.token_prev(root, 0, true, false), None);
        assert_eq!(stmt.token_first(root, true, false), Some(stmt.child(root, 0)));
    }

    #[test]
    fn token_next_by_past_end_is_none() {
        let stmt = dotted();
        let root = stmt.root();
        let keyword = Matcher::kinds(&[TokenKind::Keyword]);
        assert_eq!(stmt.token_next_by(root, &keyword, Some(10), None), None);
        let empty = Statement::new(Vec::new());
        assert_eq!(empty.token_next_by(empty.root(), &keyword, None, None), None);
    }

    #[test]
    fn insert_after_skips_whitespace() {
        let mut stmt = Statement::new(tokens(&[
            (TokenKind::Punctuation, ","),
            (TokenKind::Whitespace, " "),
            (TokenKind::Name, "b"),
        ]));
        let root = stmt.root();
        stmt.insert_after(root, 0, Token::whitespace("\n"), true);
        assert_eq!(stmt.to_string(), ", \nb");
        stmt.insert_after(root, 3, Token::whitespace("!"), true);
        assert_eq!(stmt.to_string(), ", \nb!");
    }

    #[test]
    #[should_panic(expected = "is not a child of")]
    fn token_index_of_foreign_node_panics() {
        let mut stmt = dotted();
        let root = stmt.root();
        let group = stmt.group_tokens(root, GroupKind::Identifier, 0, 1, true, false);
        let inner = stmt.child(group, 0);
        let _ = stmt.token_index(root, inner);
    }

    #[test]
    #[should_panic(expected = "non-whitespace")]
    fn set_whitespace_rejects_other_tokens() {
        let mut stmt = dotted();
        let name = stmt.child(stmt.root(), 0);
        stmt.set_whitespace(name, " ");
    }

    #[test]
    fn offsets_and_dump() {
        let mut stmt = dotted();
        let root = stmt.root();
        assert_eq!(stmt.get_token_at_offset(2), Some(stmt.child(root, 2)));
        assert_eq!(stmt.get_token_at_offset(3), None);
        stmt.group_tokens(root, GroupKind::Identifier, 0, 2, true, false);
        assert_eq!(
            stmt.pretty_tree(root, None),
            "`- 0 Identifier 't.c'\n   |- 0 Name 't'\n   |- 1 Punctuation '.'\n   `- 2 Name 'c'\n"
        );
    }
}
