//! Statement splitting.

use sqlindent::{parse, split};

#[test]
fn split_empty_input() {
    assert!(split("").is_empty());
    assert!(split(" \n\t").is_empty());
}

#[test]
fn split_without_terminator() {
    assert_eq!(split("select 1"), vec!["select 1"]);
}

#[test]
fn split_ignores_semicolon_in_string() {
    assert_eq!(split("select ';'; select 2"), vec!["select ';';", "select 2"]);
}

#[test]
fn split_ignores_semicolon_in_dollar_quotes() {
    let sql = "create function f() returns int as $$ select 1; $$ language sql; select 2";
    assert_eq!(
        split(sql),
        vec![
            "create function f() returns int as $$ select 1; $$ language sql;",
            "select 2",
        ]
    );
}

#[test]
fn split_keeps_procedure_body() {
    let sql = "create procedure p() begin declare x int; set x = 1; end; call p()";
    assert_eq!(
        split(sql),
        vec![
            "create procedure p() begin declare x int; set x = 1; end;",
            "call p()",
        ]
    );
}

#[test]
fn split_case_end_does_not_nest() {
    let sql = "select case when a then 1 end; select 2";
    assert_eq!(split(sql).len(), 2);
}

#[test]
fn parse_groups_each_statement() {
    let statements = parse("select 1;\ninsert into t values (1);\ndrop table t");
    let types: Vec<_> = statements.iter().map(|s| s.get_type()).collect();
    assert_eq!(types, vec!["SELECT", "INSERT", "DROP"]);
    let joined: String = statements.iter().map(ToString::to_string).collect();
    assert_eq!(joined, "select 1;\ninsert into t values (1);\ndrop table t");
}
