//! Formatter options end to end.

mod common;

use common::{format_with, significant_values};
use sqlindent::{
    Error, FormatOptions, LetterCase, OptionsErrorKind, OutputFormat, format, split,
};

#[test]
fn format_empty_input() {
    assert_eq!(format_with("", &FormatOptions::new()), "");
    assert_eq!(format_with("", &FormatOptions::new().reindent(true)), "");
}

#[test]
fn format_without_options_keeps_text() {
    let sql = "select a,b from t";
    assert_eq!(format_with(sql, &FormatOptions::new()), sql);
}

#[test]
fn format_normalizes_line_breaks() {
    assert_eq!(format_with("select a\r\nfrom t\rwhere b", &FormatOptions::new()), "select a\nfrom t\nwhere b");
    assert_eq!(
        format_with("select a\nfrom t", &FormatOptions::new().newline("\r\n")),
        "select a\r\nfrom t"
    );
}

#[test]
fn format_keeps_line_breaks_inside_strings() {
    let sql = "select 'a\r\nb'";
    assert_eq!(format_with(sql, &FormatOptions::new()), sql);
}

// -----------------------------------------------------------
// Letter case.
// -----------------------------------------------------------

#[test]
fn format_keywords_upper() {
    let options = FormatOptions::new().reindent(true).keyword_case(LetterCase::Upper);
    assert_eq!(
        format_with("select a from t where b=1", &options),
        "SELECT a\nFROM t\nWHERE b=1"
    );
}

#[test]
fn format_identifiers_upper_skips_quoted() {
    let options = FormatOptions::new().identifier_case(LetterCase::Upper);
    assert_eq!(
        format_with("select \"Foo\", bar from baz", &options),
        "select \"Foo\", BAR from BAZ"
    );
}

#[test]
fn letter_case_from_str() {
    assert_eq!("capitalize".parse::<LetterCase>(), Ok(LetterCase::Capitalize));
    let err = "title".parse::<LetterCase>().unwrap_err();
    assert_eq!(err.kind, OptionsErrorKind::UnknownCase("title".to_string()));
}

// -----------------------------------------------------------
// Whitespace, comments and operators.
// -----------------------------------------------------------

#[test]
fn format_strip_whitespace() {
    let options = FormatOptions::new().strip_whitespace(true);
    assert_eq!(
        format_with("select  a ,  b\n\n  from   t ", &options),
        "select a, b from t"
    );
}

#[test]
fn format_strip_comments_keeps_line_break() {
    let options = FormatOptions::new().strip_comments(true);
    assert_eq!(format_with("select a -- first\nfrom t", &options), "select a\nfrom t");
}

#[test]
fn format_strip_comments_with_reindent() {
    let options = FormatOptions::new().strip_comments(true).reindent(true);
    assert_eq!(format_with("select a -- first\nfrom t", &options), "select a\nfrom t");
}

#[test]
fn format_spaces_around_operators() {
    let options = FormatOptions::new().use_space_around_operators(true);
    assert_eq!(
        format_with("select a+b, c||d from t where x<>1", &options),
        "select a + b, c || d from t where x <> 1"
    );
}

#[test]
fn format_only_touches_whitespace() {
    let sql = "select a,b,count(*) from t join u using (id) where a between 1 and 2 group by a,b";
    let options = FormatOptions::new()
        .reindent(true)
        .use_space_around_operators(true)
        .wrap_after(10);
    let formatted = format_with(sql, &options);
    assert_eq!(significant_values(&formatted), significant_values(sql));
}

// -----------------------------------------------------------
// Aligned reindent.
// -----------------------------------------------------------

#[test]
fn format_reindent_aligned() {
    let options = FormatOptions::new().reindent_aligned(true);
    assert_eq!(
        format_with("select a from t where a = 1 and b = 2 limit 10", &options),
        "select a\n  from t\n where a = 1\n   and b = 2\n limit 10"
    );
}

#[test]
fn format_reindent_aligned_group_by() {
    let options = FormatOptions::new().reindent_aligned(true);
    assert_eq!(
        format_with("select a, b from t group by a, b", &options),
        "select a,\n       b\n  from t\n group by a,\n          b"
    );
}

// -----------------------------------------------------------
// String truncation and output languages.
// -----------------------------------------------------------

#[test]
fn format_truncate_strings() {
    let options = FormatOptions::new().truncate_strings(10);
    assert_eq!(
        format_with("select 'xxxxxxxxxxxxxxx', 'short' from t", &options),
        "select 'xxxxxxxxxx[...]', 'short' from t"
    );
    let options = options.truncate_char("..");
    assert_eq!(
        format_with("select 'xxxxxxxxxxxxxxx'", &options),
        "select 'xxxxxxxxxx..'"
    );
}

#[test]
fn format_rejects_short_truncation() {
    let Error::Options(err) = format("select 1", &FormatOptions::new().truncate_strings(1)).unwrap_err();
    assert_eq!(err.kind, OptionsErrorKind::TruncateTooShort(1));
}

#[test]
fn format_python_output() {
    let options = FormatOptions::new().output_format(OutputFormat::Python);
    assert_eq!(format_with("select * from foo", &options), "sql = 'select * from foo'");

    let options = options.reindent(true);
    assert_eq!(
        format_with("select * from foo; select 1 from dual", &options),
        "sql = ('select * '\n       'from foo;')\nsql2 = ('select 1 '\n        'from dual')"
    );
}

#[test]
fn format_php_output() {
    let options = FormatOptions::new().output_format(OutputFormat::Php);
    assert_eq!(format_with("select * from foo;", &options), "$sql = \"select * from foo;\";");

    let options = options.reindent(true);
    assert_eq!(
        format_with("select * from foo;", &options),
        "$sql  = \"select * \";\n$sql .= \"from foo;\";"
    );
}

#[test]
fn output_format_from_str() {
    assert_eq!("php".parse::<OutputFormat>(), Ok(OutputFormat::Php));
    let err = "perl".parse::<OutputFormat>().unwrap_err();
    assert_eq!(err.kind, OptionsErrorKind::UnknownOutputFormat("perl".to_string()));
}

// -----------------------------------------------------------
// Option validation.
// -----------------------------------------------------------

#[test]
fn format_rejects_zero_indent_width() {
    let err = format("select 1", &FormatOptions::new().indent_width(0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for indent_width: requires a positive integer"
    );
}

#[test]
fn format_rejects_bad_newlines() {
    let Error::Options(err) = format("select 1", &FormatOptions::new().newline("")).unwrap_err();
    assert_eq!(err.kind, OptionsErrorKind::EmptyNewline);

    let Error::Options(err) = format("select 1", &FormatOptions::new().newline("<br>")).unwrap_err();
    assert_eq!(err.kind, OptionsErrorKind::InvalidNewline("<br>".to_string()));
}

#[test]
fn validate_resolves_implied_options() {
    let options = FormatOptions::new().indent_columns(true).validate().expect("valid");
    assert!(options.reindent);
    assert!(options.strip_whitespace);
}

// -----------------------------------------------------------
// Splitting.
// -----------------------------------------------------------

#[test]
fn split_trims_statements() {
    assert_eq!(
        split("select 1;\n\n  select 2 ;  -- end\n"),
        vec!["select 1;", "select 2 ;  -- end"]
    );
}
