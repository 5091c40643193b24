//! Reindent output for the common statement shapes.

mod common;

use common::{format_with, reindent};
use pretty_assertions::assert_eq;
use sqlindent::FormatOptions;

fn options() -> FormatOptions {
    FormatOptions::new().reindent(true)
}

// -----------------------------------------------------------
// Clauses.
// -----------------------------------------------------------

#[test]
fn select_where_and() {
    assert_eq!(
        reindent("select a, b from t where a=1 and b=2"),
        "select a, b\nfrom t\nwhere a=1\n  and b=2"
    );
}

#[test]
fn join_group_order_limit() {
    assert_eq!(
        reindent("select a from t left join u on t.id = u.id group by a order by a limit 10"),
        "select a\nfrom t\nleft join u on t.id = u.id\ngroup by a\norder by a\nlimit 10"
    );
}

#[test]
fn existing_whitespace_is_normalized() {
    assert_eq!(
        reindent("select   a\n\n  from\tt"),
        "select a\nfrom t"
    );
}

#[test]
fn union_starts_a_line() {
    assert_eq!(
        reindent("select a from t union select a from u"),
        "select a\nfrom t\nunion\nselect a\nfrom u"
    );
}

#[test]
fn update_set() {
    assert_eq!(
        reindent("update t set a = 1 where b = 2"),
        "update t\nset a = 1\nwhere b = 2"
    );
}

// -----------------------------------------------------------
// Column lists.
// -----------------------------------------------------------

#[test]
fn wrap_after_breaks_long_lists() {
    assert_eq!(
        format_with(
            "select very_long_name_1, very_long_name_2, very_long_name_3",
            &options().wrap_after(20),
        ),
        "select very_long_name_1,\n       very_long_name_2,\n       very_long_name_3"
    );
}

#[test]
fn zero_wrap_after_keeps_list_on_one_line() {
    assert_eq!(
        reindent("select very_long_name_1, very_long_name_2, very_long_name_3"),
        "select very_long_name_1, very_long_name_2, very_long_name_3"
    );
}

#[test]
fn comma_first() {
    assert_eq!(
        format_with(
            "select foo, bar, baz from table1",
            &options().comma_first(true).wrap_after(1),
        ),
        "select foo\n     , bar\n     , baz\nfrom table1"
    );
}

#[test]
fn indent_columns() {
    assert_eq!(
        format_with("select a, b from foo", &FormatOptions::new().indent_columns(true)),
        "select\n  a,\n  b\nfrom foo"
    );
}

#[test]
fn function_arguments_get_spaces() {
    assert_eq!(
        reindent("select coalesce(a,b,c) from t"),
        "select coalesce(a, b, c)\nfrom t"
    );
}

// -----------------------------------------------------------
// Nesting.
// -----------------------------------------------------------

#[test]
fn subquery_is_indented() {
    assert_eq!(
        reindent("select count(*) from (select * from foo);"),
        "select count(*)\nfrom\n  (select *\n   from foo);"
    );
}

#[test]
fn case_branches_on_own_lines() {
    assert_eq!(
        reindent("case when foo = 1 then 2 when foo = 3 then 4 else 5 end"),
        "case\n    when foo = 1 then 2\n    when foo = 3 then 4\n    else 5\nend"
    );
}

#[test]
fn compact_case_stays_on_one_line() {
    assert_eq!(
        format_with(
            "case when foo = 1 then 2 else 5 end",
            &options().compact(true),
        ),
        "case when foo = 1 then 2 else 5 end"
    );
}

#[test]
fn values_rows_on_own_lines() {
    assert_eq!(
        reindent("insert into t (a,b) values (1,2),(3,4)"),
        "insert into t (a, b)\nvalues (1,2),\n       (3,4)"
    );
}

#[test]
fn values_rows_comma_first() {
    assert_eq!(
        format_with(
            "insert into t values (1,2), (3,4)",
            &options().comma_first(true),
        ),
        "insert into t\nvalues (1,2)\n     , (3,4)"
    );
}

// -----------------------------------------------------------
// Indentation settings.
// -----------------------------------------------------------

#[test]
fn indent_after_first() {
    assert_eq!(
        format_with("select a from t", &options().indent_after_first(true)),
        "select a\n  from t"
    );
}

#[test]
fn tabs_and_width() {
    assert_eq!(
        format_with(
            "select a from t where b = 1 and c = 2",
            &options().indent_tabs(true).indent_width(1),
        ),
        "select a\nfrom t\nwhere b = 1\n\tand c = 2"
    );
}

#[test]
fn wider_indent() {
    assert_eq!(
        format_with(
            "select a from t where b = 1 and c = 2",
            &options().indent_width(4),
        ),
        "select a\nfrom t\nwhere b = 1\n    and c = 2"
    );
}

// -----------------------------------------------------------
// Several statements.
// -----------------------------------------------------------

#[test]
fn statements_separated_by_blank_line() {
    assert_eq!(
        reindent("select 1; select 2; select 3"),
        "select 1;\n\nselect 2;\n\nselect 3"
    );
}

#[test]
fn line_break_after_semicolon_is_not_doubled() {
    assert_eq!(reindent("select 1;\nselect 2"), "select 1;\n\nselect 2");
}

#[test]
fn leading_whitespace_is_dropped() {
    assert_eq!(reindent("  \n select a from t"), "select a\nfrom t");
}

#[test]
fn mixed_separators_are_idempotent() {
    let once = reindent("select a from t; select b from u;\nselect c from v");
    assert_eq!(
        once,
        "select a\nfrom t;\n\nselect b\nfrom u;\n\nselect c\nfrom v"
    );
    assert_eq!(reindent(&once), once);
}

#[test]
fn reindent_is_idempotent() {
    let once = reindent("select a, b from t where a = 1 and b in (select c from u) order by a");
    assert_eq!(reindent(&once), once);
}
