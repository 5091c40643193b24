//! Token tree navigation and editing.

mod common;

use common::{grouped, leaf_values};
use sqlindent::{GroupKind, Matcher, Pattern, Statement, Token, TokenKind, group};

fn statement(parts: &[(TokenKind, &str)]) -> Statement {
    Statement::new(parts.iter().map(|&(kind, value)| Token::new(kind, value)).collect())
}

// -----------------------------------------------------------
// Grouping flat sequences.
// -----------------------------------------------------------

#[test]
fn dotted_name_becomes_identifier() {
    let mut stmt = statement(&[
        (TokenKind::Name, "t"),
        (TokenKind::Punctuation, "."),
        (TokenKind::Name, "c"),
    ]);
    group(&mut stmt);

    let root = stmt.root();
    assert_eq!(stmt.children(root).len(), 1);
    let ident = stmt.child(root, 0);
    assert_eq!(stmt.group_kind(ident), Some(GroupKind::Identifier));
    assert_eq!(stmt.get_real_name(ident).as_deref(), Some("c"));
    assert_eq!(stmt.get_parent_name(ident).as_deref(), Some("t"));
    assert_eq!(stmt.value(ident), "t.c");
}

#[test]
fn group_range_keeps_leaves_in_order() {
    let mut stmt = statement(&[
        (TokenKind::Name, "a"),
        (TokenKind::Whitespace, " "),
        (TokenKind::Comparison, "="),
        (TokenKind::Whitespace, " "),
        (TokenKind::Integer, "1"),
    ]);
    let root = stmt.root();
    let before: Vec<_> = stmt.children(root)[1..4].to_vec();

    let group = stmt.group_tokens(root, GroupKind::TokenList, 1, 3, true, false);

    assert_eq!(stmt.children(root).len(), 3);
    assert_eq!(stmt.child(root, 1), group);
    assert_eq!(stmt.children(group), before.as_slice());
    assert!(before.iter().all(|&leaf| stmt.parent(leaf) == Some(group)));
    assert_eq!(stmt.value(group), " = ");
    assert_eq!(stmt.to_string(), "a = 1");
}

#[test]
fn group_range_without_end() {
    let mut stmt = statement(&[
        (TokenKind::Name, "a"),
        (TokenKind::Punctuation, ","),
        (TokenKind::Name, "b"),
    ]);
    let root = stmt.root();
    let group = stmt.group_tokens(root, GroupKind::IdentifierList, 0, 2, false, false);
    assert_eq!(stmt.value(group), "a,");
    assert_eq!(stmt.children(root).len(), 2);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn group_range_past_end_panics() {
    let mut stmt = statement(&[(TokenKind::Name, "a")]);
    let root = stmt.root();
    stmt.group_tokens(root, GroupKind::Identifier, 0, 3, true, false);
}

// -----------------------------------------------------------
// Searching.
// -----------------------------------------------------------

#[test]
fn token_next_by_past_end_is_not_found() {
    let keyword = Matcher::kinds(&[TokenKind::Keyword]);

    let empty = statement(&[]);
    assert_eq!(empty.token_next_by(empty.root(), &keyword, None, None), None);
    assert_eq!(empty.token_next_by(empty.root(), &keyword, Some(5), None), None);

    let stmt = grouped("select a from t");
    let root = stmt.root();
    let len = stmt.children(root).len();
    assert_eq!(stmt.token_next_by(root, &keyword, Some(len - 1), None), None);
    assert_eq!(stmt.token_next_by(root, &keyword, Some(len + 10), None), None);
}

#[test]
fn token_next_by_respects_end() {
    let stmt = grouped("select a from t");
    let root = stmt.root();
    let from = [Pattern::Values(TokenKind::Keyword, &["FROM"])];
    let matcher = Matcher::patterns(&from);
    let (idx, _) = stmt
        .token_next_by(root, &matcher, None, None)
        .expect("from keyword");
    assert_eq!(stmt.token_next_by(root, &matcher, None, Some(idx)), None);
}

#[test]
fn keyword_values_match_case_insensitively() {
    let stmt = grouped("SeLeCt 1");
    let dml = [Pattern::Values(TokenKind::Dml, &["select"])];
    assert!(stmt.token_next_by(stmt.root(), &Matcher::patterns(&dml), None, None).is_some());
}

#[test]
fn group_matcher_finds_nested_kinds() {
    let stmt = grouped("select a from t where b = 1");
    let where_clause = Matcher::groups(&[GroupKind::Where]);
    let (_, clause) = stmt
        .token_next_by(stmt.root(), &where_clause, None, None)
        .expect("where clause");
    assert_eq!(stmt.value(clause), "where b = 1");

    let comparison = stmt
        .get_sublists(clause)
        .find(|&sub| stmt.is_group_of(sub, GroupKind::Comparison))
        .expect("comparison");
    assert!(stmt.within(comparison, GroupKind::Where));
    assert!(!stmt.within(clause, GroupKind::Where));
}

// -----------------------------------------------------------
// Editing.
// -----------------------------------------------------------

#[test]
fn insert_and_remove_children() {
    let mut stmt = grouped("select a");
    let root = stmt.root();
    stmt.insert_before(root, 0, Token::whitespace("\n"));
    assert_eq!(stmt.to_string(), "\nselect a");

    let removed = stmt.remove(root, 0);
    assert_eq!(stmt.parent(removed), None);
    assert_eq!(stmt.to_string(), "select a");

    let end = stmt.children(root).len() - 1;
    stmt.insert_after(root, end, Token::new(TokenKind::Punctuation, ";"), false);
    assert_eq!(stmt.to_string(), "select a;");
}

#[test]
fn replace_child_detaches_old_node() {
    let mut stmt = grouped("select a");
    let root = stmt.root();
    let old = stmt.child(root, 1);
    let new = stmt.replace_child(root, 1, Token::whitespace("   "));
    assert_eq!(stmt.parent(old), None);
    assert_eq!(stmt.parent(new), Some(root));
    assert_eq!(stmt.to_string(), "select   a");
}

#[test]
fn whitespace_can_be_rewritten() {
    let mut stmt = grouped("select a");
    let ws = stmt.child(stmt.root(), 1);
    stmt.set_whitespace(ws, "\n  ");
    assert_eq!(leaf_values(&stmt), vec!["select", "\n  ", "a"]);
    assert_eq!(stmt.kind(ws), Some(TokenKind::Whitespace));
}

// -----------------------------------------------------------
// Offsets and dumps.
// -----------------------------------------------------------

#[test]
fn token_at_offset_counts_characters() {
    let stmt = grouped("select 'é', b");
    let leaf = stmt.get_token_at_offset(12).expect("token at offset");
    assert_eq!(stmt.value(leaf), "b");
    assert_eq!(stmt.get_token_at_offset(13), None);
}

#[test]
fn pretty_tree_limits_depth() {
    let stmt = grouped("select t.c");
    let dump = stmt.pretty_tree(stmt.root(), Some(0));
    assert_eq!(
        dump,
        "|- 0 Dml 'select'\n|- 1 Whitespace ' '\n`- 2 Identifier 't.c'\n"
    );
}
