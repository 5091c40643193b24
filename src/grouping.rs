//! Grouping pass: nests a flat statement into grammar nodes.
//!
//! Each step scans one list of children, wraps matching runs with
//! [`Statement::group_tokens`], and (for most steps) descends into the
//! groups it finds. Steps run in a fixed order because later ones rely on
//! the groups built by earlier ones. Unbalanced or incomplete constructs
//! are left ungrouped.

use crate::token::TokenKind;
use crate::tree::{GroupKind, Matcher, NodeId, Pattern, Statement};

/// Numbers, strings and plain names, compared exactly.
const OPERAND_KINDS: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Integer,
    TokenKind::Float,
    TokenKind::String,
    TokenKind::StringSingle,
    TokenKind::StringSymbol,
    TokenKind::Name,
    TokenKind::Placeholder,
];

const LIST_ITEM_KINDS: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Integer,
    TokenKind::Float,
    TokenKind::String,
    TokenKind::StringSingle,
    TokenKind::StringSymbol,
    TokenKind::Name,
    TokenKind::Placeholder,
    TokenKind::Keyword,
    TokenKind::Comment,
    TokenKind::Wildcard,
];

const WHERE_END: &[&str] = &[
    "ORDER BY", "GROUP BY", "LIMIT", "UNION", "UNION ALL", "EXCEPT", "HAVING", "RETURNING", "INTO",
];

const INTERVAL_UNITS: &[&str] = &["DAY", "HOUR", "MINUTE", "MONTH", "SECOND", "YEAR"];

/// Run every grouping step over `stmt`.
pub fn group(stmt: &mut Statement) {
    let root = stmt.root();
    let steps: &[(&str, fn(&mut Statement, NodeId))] = &[
        ("comments", group_comments),
        ("brackets", group_brackets),
        ("parenthesis", group_parenthesis),
        ("case", group_case),
        ("if", group_if),
        ("for", group_for),
        ("begin", group_begin),
        ("over", group_over),
        ("functions", group_functions),
        ("where", group_where),
        ("period", group_period),
        ("arrays", group_arrays),
        ("identifier", group_identifier),
        ("order", group_order),
        ("typecasts", group_typecasts),
        ("tzcasts", group_tzcasts),
        ("typed_literal", group_typed_literal),
        ("operator", group_operator),
        ("comparison", group_comparison),
        ("as", group_as),
        ("aliased", group_aliased),
        ("assignment", group_assignment),
        ("align_comments", align_comments),
        ("identifier_list", group_identifier_list),
        ("values", group_values),
    ];
    for &(name, step) in steps {
        tracing::trace!(step = name, "grouping");
        step(stmt, root);
    }
    tracing::debug!(statement = %stmt.get_type(), "grouped statement");
}

/// Apply `step` to every nested group (except those of a kind in `skip`)
/// bottom-up, then to `list` itself.
fn recurse(stmt: &mut Statement, list: NodeId, skip: &[GroupKind], step: fn(&mut Statement, NodeId)) {
    let sublists: Vec<NodeId> = stmt.get_sublists(list).collect();
    for sub in sublists {
        if !stmt.group_kind(sub).is_some_and(|k| skip.contains(&k)) {
            recurse(stmt, sub, skip, step);
        }
    }
    step(stmt, list);
}

type NodeTest<'a> = &'a dyn Fn(&Statement, NodeId) -> bool;
type NextTest<'a> = &'a dyn Fn(&Statement, Option<NodeId>) -> bool;
type SpanFn<'a> = &'a dyn Fn(&Statement, NodeId, usize, usize, Option<usize>) -> Option<(usize, usize)>;

/// A binary grouping rule: `prev <marker> next` becomes one group.
struct Rule<'a> {
    kind: GroupKind,
    marker: NodeTest<'a>,
    valid_prev: NodeTest<'a>,
    valid_next: NextTest<'a>,
    /// Picks the range to group from `(list, prev, marker, next)` positions.
    span: SpanFn<'a>,
    extend: bool,
}

fn prev_to_next(_: &Statement, _: NodeId, prev: usize, _: usize, next: Option<usize>) -> Option<(usize, usize)> {
    Some((prev, next?))
}

fn marker_to_next(_: &Statement, _: NodeId, _: usize, marker: usize, next: Option<usize>) -> Option<(usize, usize)> {
    Some((marker, next?))
}

fn any_node(_: &Statement, _: NodeId) -> bool {
    true
}

fn any_next(_: &Statement, _: Option<NodeId>) -> bool {
    true
}

fn some_next(_: &Statement, next: Option<NodeId>) -> bool {
    next.is_some()
}

/// Scan `list` once and group around every marker accepted by `rule`.
///
/// The scan walks a snapshot of the children, so after a group swallows
/// its neighbours the swallowed nodes are still visited; their position is
/// derived from the number of children removed so far.
fn apply_rule(stmt: &mut Statement, list: NodeId, rule: &Rule<'_>, recurse: bool) {
    let snapshot = stmt.children(list).to_vec();
    let mut removed = 0;
    let mut prev: Option<(usize, NodeId)> = None;

    for (idx, node) in snapshot.into_iter().enumerate() {
        let Some(tidx) = idx.checked_sub(removed) else {
            continue;
        };
        if stmt.is_whitespace(node) {
            continue;
        }
        if recurse && stmt.group_kind(node).is_some_and(|k| k != rule.kind) {
            apply_rule(stmt, node, rule, true);
        }

        if (rule.marker)(stmt, node) {
            let view: &Statement = stmt;
            let next = view.token_next(list, tidx, true, false);
            let span = prev
                .filter(|&(_, p)| (rule.valid_prev)(view, p))
                .filter(|_| (rule.valid_next)(view, next.map(|(_, n)| n)))
                .and_then(|(pidx, _)| (rule.span)(view, list, pidx, tidx, next.map(|(i, _)| i)));
            if let Some((from, to)) = span {
                let group = stmt.group_tokens(list, rule.kind, from, to, true, rule.extend);
                tracing::trace!(kind = %rule.kind, from, to, "grouped");
                removed += to - from;
                prev = Some((from, group));
                continue;
            }
        }
        prev = Some((tidx, node));
    }
}

/// Group balanced `open ... close` runs, innermost first.
fn group_matching(stmt: &mut Statement, list: NodeId, kind: GroupKind, open: &[Pattern<'_>], close: &[Pattern<'_>]) {
    let snapshot = stmt.children(list).to_vec();
    let mut opens: Vec<usize> = Vec::new();
    let mut removed = 0;

    for (idx, node) in snapshot.into_iter().enumerate() {
        let tidx = idx - removed;
        if stmt.is_whitespace(node) {
            continue;
        }
        if stmt.group_kind(node).is_some_and(|k| k != kind) {
            group_matching(stmt, node, kind, open, close);
            continue;
        }
        let Some(token) = stmt.token(node) else {
            continue;
        };
        if open.iter().any(|p| p.matches(token)) {
            opens.push(tidx);
        } else if close.iter().any(|p| p.matches(token)) {
            // Unbalanced close: keep scanning for later valid groups.
            let Some(open_idx) = opens.pop() else {
                continue;
            };
            stmt.group_tokens(list, kind, open_idx, tidx, true, false);
            tracing::trace!(%kind, from = open_idx, to = tidx, "grouped");
            removed += tidx - open_idx;
        }
    }
}

fn group_brackets(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::SquareBrackets,
        &[Pattern::Values(TokenKind::Punctuation, &["["])],
        &[Pattern::Values(TokenKind::Punctuation, &["]"])],
    );
}

fn group_parenthesis(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::Parenthesis,
        &[Pattern::Values(TokenKind::Punctuation, &["("])],
        &[Pattern::Values(TokenKind::Punctuation, &[")"])],
    );
}

fn group_case(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::Case,
        &[Pattern::Values(TokenKind::Keyword, &["CASE"])],
        &[Pattern::Values(TokenKind::Keyword, &["END"])],
    );
}

fn group_if(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::If,
        &[Pattern::Values(TokenKind::Keyword, &["IF"])],
        &[Pattern::Values(TokenKind::Keyword, &["END IF"])],
    );
}

fn group_for(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::For,
        &[Pattern::Values(TokenKind::Keyword, &["FOR", "FOREACH"])],
        &[Pattern::Values(TokenKind::Keyword, &["END LOOP"])],
    );
}

fn group_begin(stmt: &mut Statement, list: NodeId) {
    group_matching(
        stmt,
        list,
        GroupKind::Begin,
        &[Pattern::Values(TokenKind::Keyword, &["BEGIN"])],
        &[Pattern::Values(TokenKind::Keyword, &["END"])],
    );
}

/// Runs of comments (and the line breaks between them) that are followed
/// by something else.
fn group_comments(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Comment], |stmt, list| {
        let comment = Matcher::kinds(&[TokenKind::Comment]);
        let mut found = stmt.token_next_by(list, &comment, None, None);
        while let Some((tidx, _)) = found {
            let end = stmt.token_not_matching(
                list,
                |s, c| s.is_kind(c, TokenKind::Comment) || s.is_newline(c),
                tidx,
            );
            if let Some((eidx, _)) = end {
                stmt.group_tokens(list, GroupKind::Comment, tidx, eidx - 1, true, false);
            }
            found = stmt.token_next_by(list, &comment, Some(tidx), None);
        }
    });
}

fn group_over(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Over], |stmt, list| {
        let open = [Pattern::Values(TokenKind::Keyword, &["OVER"])];
        let over = Matcher::patterns(&open);
        let mut found = stmt.token_next_by(list, &over, None, None);
        while let Some((tidx, _)) = found {
            if let Some((nidx, next)) = stmt.token_next(list, tidx, true, false) {
                if stmt.is_group_of(next, GroupKind::Parenthesis) || stmt.is_kind(next, TokenKind::Name) {
                    stmt.group_tokens(list, GroupKind::Over, tidx, nidx, true, false);
                }
            }
            found = stmt.token_next_by(list, &over, Some(tidx), None);
        }
    });
}

/// `name(...)`, optionally followed by an `OVER` clause.
fn group_functions(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Function], |stmt, list| {
        let (mut has_create, mut has_table, mut has_as) = (false, false, false);
        for token in stmt.children(list).iter().filter_map(|&c| stmt.token(c)) {
            has_create |= token.value.eq_ignore_ascii_case("CREATE");
            has_table |= token.value.eq_ignore_ascii_case("TABLE");
            has_as |= token.value == "AS";
        }
        // Column definitions of CREATE TABLE look like calls.
        if has_create && has_table && !has_as {
            return;
        }

        let name = Matcher::kinds(&[TokenKind::Name]);
        let mut found = stmt.token_next_by(list, &name, None, None);
        while let Some((tidx, _)) = found {
            if let Some((nidx, next)) = stmt.token_next(list, tidx, true, false) {
                if stmt.is_group_of(next, GroupKind::Parenthesis) {
                    let end = match stmt.token_next(list, nidx, true, false) {
                        Some((oidx, over)) if stmt.is_group_of(over, GroupKind::Over) => oidx,
                        _ => nidx,
                    };
                    stmt.group_tokens(list, GroupKind::Function, tidx, end, true, false);
                }
            }
            found = stmt.token_next_by(list, &name, Some(tidx), None);
        }
    });
}

/// `WHERE` up to the next clause keyword or the end of the list.
fn group_where(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Where], |stmt, list| {
        let open = [Pattern::Values(TokenKind::Keyword, &["WHERE"])];
        let close = [Pattern::Values(TokenKind::Keyword, WHERE_END)];
        let mut found = stmt.token_next_by(list, &Matcher::patterns(&open), None, None);
        while let Some((tidx, _)) = found {
            let end = match stmt.token_next_by(list, &Matcher::patterns(&close), Some(tidx), None) {
                Some((eidx, _)) => eidx - 1,
                None => last_groupable(stmt, list),
            };
            stmt.group_tokens(list, GroupKind::Where, tidx, end, true, false);
            found = stmt.token_next_by(list, &Matcher::patterns(&open), Some(tidx), None);
        }
    });
}

/// Position of the last child that may be grouped; brackets keep their
/// closing token.
fn last_groupable(stmt: &Statement, list: NodeId) -> usize {
    let len = stmt.children(list).len();
    let bracketed = stmt.is_group_of(list, GroupKind::Parenthesis)
        || stmt.is_group_of(list, GroupKind::SquareBrackets);
    len.saturating_sub(if bracketed { 2 } else { 1 })
}

/// `schema.table`, `t.*`, `col->'key'`.
fn group_period(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| {
        s.leaf_matches(n, TokenKind::Punctuation, Some(&["."]))
            || s.leaf_matches(n, TokenKind::Operator, Some(&["->", "->>"]))
    };
    let valid_prev = |s: &Statement, n: NodeId| {
        s.matches(
            n,
            &Matcher::groups(&[GroupKind::SquareBrackets, GroupKind::Identifier])
                .with_exact(&[TokenKind::Name, TokenKind::StringSymbol]),
        )
    };
    // A dot followed by something unexpected still joins the prefix.
    let span = |s: &Statement, list: NodeId, prev: usize, marker: usize, next: Option<usize>| {
        let target = Matcher::groups(&[GroupKind::SquareBrackets, GroupKind::Function]).with_exact(&[
            TokenKind::Name,
            TokenKind::StringSymbol,
            TokenKind::Wildcard,
            TokenKind::StringSingle,
        ]);
        match next {
            Some(n) if s.matches(s.child(list, n), &target) => Some((prev, n)),
            _ => Some((prev, marker)),
        }
    };
    let rule = Rule {
        kind: GroupKind::Identifier,
        marker: &marker,
        valid_prev: &valid_prev,
        valid_next: &any_next,
        span: &span,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `col[1]` subscripts join the preceding operand.
fn group_arrays(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.is_group_of(n, GroupKind::SquareBrackets);
    let valid_prev = |s: &Statement, n: NodeId| {
        s.matches(
            n,
            &Matcher::groups(&[
                GroupKind::SquareBrackets,
                GroupKind::Identifier,
                GroupKind::Function,
            ])
            .with_exact(&[TokenKind::Name, TokenKind::StringSymbol]),
        )
    };
    let span = |_: &Statement, _: NodeId, prev: usize, marker: usize, _: Option<usize>| Some((prev, marker));
    let rule = Rule {
        kind: GroupKind::Identifier,
        marker: &marker,
        valid_prev: &valid_prev,
        valid_next: &any_next,
        span: &span,
        extend: true,
    };
    apply_rule(stmt, list, &rule, false);
}

/// Every remaining bare name becomes a one-token identifier.
fn group_identifier(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Identifier], |stmt, list| {
        let names = Matcher::exact(&[TokenKind::StringSymbol, TokenKind::Name]);
        let mut found = stmt.token_next_by(list, &names, None, None);
        while let Some((tidx, _)) = found {
            stmt.group_tokens(list, GroupKind::Identifier, tidx, tidx, true, false);
            found = stmt.token_next_by(list, &names, Some(tidx), None);
        }
    });
}

/// `col DESC`, `1 ASC`.
fn group_order(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[GroupKind::Identifier], |stmt, list| {
        let order = Matcher::kinds(&[TokenKind::Order]);
        let operand = Matcher::groups(&[GroupKind::Identifier]).with_kinds(&[TokenKind::Number]);
        let mut found = stmt.token_next_by(list, &order, None, None);
        while let Some((mut tidx, _)) = found {
            if let Some((pidx, prev)) = stmt.token_prev(list, tidx, true, false) {
                if stmt.matches(prev, &operand) {
                    stmt.group_tokens(list, GroupKind::Identifier, pidx, tidx, true, false);
                    tidx = pidx;
                }
            }
            found = stmt.token_next_by(list, &order, Some(tidx), None);
        }
    });
}

/// `expr::type`
fn group_typecasts(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.leaf_matches(n, TokenKind::Punctuation, Some(&["::"]));
    let rule = Rule {
        kind: GroupKind::Identifier,
        marker: &marker,
        valid_prev: &any_node,
        valid_next: &some_next,
        span: &prev_to_next,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `ts AT TIME ZONE 'UTC'`
fn group_tzcasts(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.kind(n) == Some(TokenKind::TzCast);
    let valid_next = |s: &Statement, n: Option<NodeId>| {
        n.is_some_and(|n| {
            s.is_whitespace(n)
                || s.leaf_matches(n, TokenKind::Keyword, Some(&["AS"]))
                || s.leaf_matches(n, TokenKind::StringSingle, None)
        })
    };
    let rule = Rule {
        kind: GroupKind::Identifier,
        marker: &marker,
        valid_prev: &any_node,
        valid_next: &valid_next,
        span: &prev_to_next,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `DATE '2020-01-01'`, `INTERVAL '2' DAY`.
fn group_typed_literal(stmt: &mut Statement, list: NodeId) {
    let open = [
        Pattern::Kind(TokenKind::Builtin),
        Pattern::Values(TokenKind::Keyword, &["TIMESTAMP"]),
    ];
    let marker = |s: &Statement, n: NodeId| s.matches(n, &Matcher::patterns(&open));
    let valid_next = |s: &Statement, n: Option<NodeId>| {
        n.is_some_and(|n| s.leaf_matches(n, TokenKind::StringSingle, None))
    };
    let rule = Rule {
        kind: GroupKind::TypedLiteral,
        marker: &marker,
        valid_prev: &any_node,
        valid_next: &valid_next,
        span: &marker_to_next,
        extend: false,
    };
    apply_rule(stmt, list, &rule, true);

    let literal = |s: &Statement, n: NodeId| s.is_group_of(n, GroupKind::TypedLiteral);
    let unit = |s: &Statement, n: Option<NodeId>| {
        n.is_some_and(|n| s.leaf_matches(n, TokenKind::Keyword, Some(INTERVAL_UNITS)))
    };
    let rule = Rule {
        kind: GroupKind::TypedLiteral,
        marker: &literal,
        valid_prev: &any_node,
        valid_next: &unit,
        span: &marker_to_next,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

fn is_operand(stmt: &Statement, node: NodeId, groups: &[GroupKind]) -> bool {
    stmt.matches(node, &Matcher::groups(groups).with_exact(OPERAND_KINDS))
}

/// `a + b`, `price * qty`
fn group_operator(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| {
        matches!(s.kind(n), Some(TokenKind::Operator | TokenKind::Wildcard))
    };
    let valid = |s: &Statement, n: NodeId| {
        is_operand(
            s,
            n,
            &[
                GroupKind::SquareBrackets,
                GroupKind::Parenthesis,
                GroupKind::Function,
                GroupKind::Identifier,
                GroupKind::Operation,
                GroupKind::TypedLiteral,
            ],
        ) || s.leaf_matches(
            n,
            TokenKind::Keyword,
            Some(&["CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP"]),
        )
    };
    let valid_next = |s: &Statement, n: Option<NodeId>| n.is_some_and(|n| valid(s, n));
    let rule = Rule {
        kind: GroupKind::Operation,
        marker: &marker,
        valid_prev: &valid,
        valid_next: &valid_next,
        span: &prev_to_next,
        extend: false,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `a = b`, `x IS NULL`-style comparisons with a comparison operator.
fn group_comparison(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.kind(n) == Some(TokenKind::Comparison);
    let valid = |s: &Statement, n: NodeId| {
        is_operand(
            s,
            n,
            &[
                GroupKind::Parenthesis,
                GroupKind::Function,
                GroupKind::Identifier,
                GroupKind::Operation,
                GroupKind::TypedLiteral,
            ],
        ) || s.token(n).is_some_and(|t| t.is_keyword() && t.normalized == "NULL")
    };
    let valid_next = |s: &Statement, n: Option<NodeId>| n.is_some_and(|n| valid(s, n));
    let rule = Rule {
        kind: GroupKind::Comparison,
        marker: &marker,
        valid_prev: &valid,
        valid_next: &valid_next,
        span: &prev_to_next,
        extend: false,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `expr AS alias`
fn group_as(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.token(n).is_some_and(|t| t.is_keyword() && t.normalized == "AS");
    let valid_prev = |s: &Statement, n: NodeId| {
        s.token(n)
            .is_none_or(|t| t.normalized == "NULL" || !t.is_keyword())
    };
    let valid_next = |s: &Statement, n: Option<NodeId>| {
        n.is_some_and(|n| {
            !matches!(
                s.kind(n),
                Some(TokenKind::Dml | TokenKind::Ddl | TokenKind::Cte)
            )
        })
    };
    let rule = Rule {
        kind: GroupKind::Identifier,
        marker: &marker,
        valid_prev: &valid_prev,
        valid_next: &valid_next,
        span: &prev_to_next,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `expr alias`: an expression directly followed by an identifier.
fn group_aliased(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[], |stmt, list| {
        let aliasable = Matcher::groups(&[
            GroupKind::Parenthesis,
            GroupKind::Function,
            GroupKind::Case,
            GroupKind::Identifier,
            GroupKind::Operation,
            GroupKind::Comparison,
        ])
        .with_kinds(&[TokenKind::Number]);
        let mut found = stmt.token_next_by(list, &aliasable, None, None);
        while let Some((tidx, _)) = found {
            if let Some((nidx, next)) = stmt.token_next(list, tidx, true, false) {
                if stmt.is_group_of(next, GroupKind::Identifier) {
                    stmt.group_tokens(list, GroupKind::Identifier, tidx, nidx, true, true);
                }
            }
            found = stmt.token_next_by(list, &aliasable, Some(tidx), None);
        }
    });
}

/// `var := value;`
fn group_assignment(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.leaf_matches(n, TokenKind::Assignment, Some(&[":="]));
    let valid_prev = |s: &Statement, n: NodeId| s.kind(n) != Some(TokenKind::Keyword);
    let valid_next = |s: &Statement, n: Option<NodeId>| n.is_some_and(|n| valid_prev(s, n));
    let span = |s: &Statement, list: NodeId, prev: usize, _: usize, next: Option<usize>| {
        let next = next?;
        let semicolon = [Pattern::Values(TokenKind::Punctuation, &[";"])];
        let end = s
            .token_next_by(list, &Matcher::patterns(&semicolon), Some(next), None)
            .map_or(next, |(i, _)| i);
        Some((prev, end))
    };
    let rule = Rule {
        kind: GroupKind::Assignment,
        marker: &marker,
        valid_prev: &valid_prev,
        valid_next: &valid_next,
        span: &span,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// A comment group following another group is absorbed by it.
fn align_comments(stmt: &mut Statement, list: NodeId) {
    recurse(stmt, list, &[], |stmt, list| {
        let comment = Matcher::groups(&[GroupKind::Comment]);
        let mut found = stmt.token_next_by(list, &comment, None, None);
        while let Some((mut tidx, _)) = found {
            if let Some((pidx, prev)) = stmt.token_prev(list, tidx, true, false) {
                if stmt.is_group(prev) {
                    stmt.group_tokens(list, GroupKind::TokenList, pidx, tidx, true, true);
                    tidx = pidx;
                }
            }
            found = stmt.token_next_by(list, &comment, Some(tidx), None);
        }
    });
}

/// `a, b, c`
fn group_identifier_list(stmt: &mut Statement, list: NodeId) {
    let marker = |s: &Statement, n: NodeId| s.leaf_matches(n, TokenKind::Punctuation, Some(&[","]));
    let role = [Pattern::Values(TokenKind::Keyword, &["NULL", "ROLE"])];
    let item = Matcher::groups(&[
        GroupKind::Function,
        GroupKind::Case,
        GroupKind::Identifier,
        GroupKind::Comparison,
        GroupKind::IdentifierList,
        GroupKind::Operation,
    ])
    .with_patterns(&role)
    .with_exact(LIST_ITEM_KINDS);
    let valid_prev = |s: &Statement, n: NodeId| s.matches(n, &item);
    let valid_next = |s: &Statement, n: Option<NodeId>| n.is_some_and(|n| s.matches(n, &item));
    let rule = Rule {
        kind: GroupKind::IdentifierList,
        marker: &marker,
        valid_prev: &valid_prev,
        valid_next: &valid_next,
        span: &prev_to_next,
        extend: true,
    };
    apply_rule(stmt, list, &rule, true);
}

/// `VALUES (...), (...)` up to the last tuple; top level only.
fn group_values(stmt: &mut Statement, list: NodeId) {
    let keyword = [Pattern::Values(TokenKind::Keyword, &["VALUES"])];
    let Some((start, first)) = stmt.token_next_by(list, &Matcher::patterns(&keyword), None, None) else {
        return;
    };
    let mut end = None;
    let mut current = Some((start, first));
    while let Some((tidx, node)) = current {
        if stmt.is_group_of(node, GroupKind::Parenthesis) {
            end = Some(tidx);
        }
        current = stmt.token_next(list, tidx, true, false);
    }
    if let Some(end) = end {
        stmt.group_tokens(list, GroupKind::Values, start, end, true, true);
    }
}
