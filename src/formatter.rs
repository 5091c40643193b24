//! The formatting pipeline: tokenize, split, group, filter, serialize.

use crate::Error;
use crate::aligned::AlignedIndentFilter;
use crate::filters::{
    OutputFilter, SpacesAroundOperators, StatementFilter, StripComments, StripWhitespace,
    identifier_case, keyword_case, serialize, truncate_strings,
};
use crate::grouping::group;
use crate::lexer::tokenize;
use crate::options::{FormatOptions, OutputFormat};
use crate::reindent::ReindentFilter;
use crate::splitter::split_statements;

/// Statement filters enabled by `options`, in the order they run.
fn statement_filters(options: &FormatOptions) -> Vec<Box<dyn StatementFilter>> {
    let mut filters: Vec<Box<dyn StatementFilter>> = Vec::new();
    if options.use_space_around_operators {
        filters.push(Box::new(SpacesAroundOperators));
    }
    if options.strip_comments {
        filters.push(Box::new(StripComments));
    }
    if options.strip_whitespace {
        filters.push(Box::new(StripWhitespace));
    }
    if options.reindent {
        filters.push(Box::new(ReindentFilter::new(options.reindent_options())));
    }
    if options.reindent_aligned {
        let indent_char = options.reindent_options().indent_char;
        filters.push(Box::new(AlignedIndentFilter::new(indent_char, options.newline.as_str())));
    }
    if options.output_format != OutputFormat::Sql {
        filters.push(Box::new(OutputFilter::new(options.output_format)));
    }
    filters
}

/// Format SQL text.
///
/// Options are validated first; that is the only way this can fail. Each
/// statement is formatted on its own and the results are concatenated.
///
/// ```
/// use sqlindent::{FormatOptions, LetterCase, format};
///
/// let options = FormatOptions::new().keyword_case(LetterCase::Upper);
/// assert_eq!(format("select 1", &options).unwrap(), "SELECT 1");
/// ```
pub fn format(sql: &str, options: &FormatOptions) -> Result<String, Error> {
    let options = options.clone().validate()?;

    let mut tokens = tokenize(sql);
    if let Some(case) = options.keyword_case {
        keyword_case(&mut tokens, case);
    }
    if let Some(case) = options.identifier_case {
        identifier_case(&mut tokens, case);
    }
    if let Some(width) = options.truncate_strings {
        truncate_strings(&mut tokens, width, &options.truncate_char);
    }

    let grouping = options.needs_grouping();
    let mut filters = statement_filters(&options);
    let mut out = String::new();
    for mut stmt in split_statements(tokens) {
        if grouping {
            group(&mut stmt);
        }
        for filter in &mut filters {
            filter.process(&mut stmt);
        }
        out.push_str(&serialize(&stmt, &options.newline));
    }
    tracing::debug!(bytes_in = sql.len(), bytes_out = out.len(), "formatted");
    Ok(out)
}
