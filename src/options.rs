//! Formatting options and their validation.

use std::fmt;
use std::str::FromStr;

/// Letter case applied to keywords or identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterCase {
    Upper,
    Lower,
    /// First letter upper case, the rest lower case.
    Capitalize,
}

impl LetterCase {
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Capitalize => {
                let mut chars = text.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                })
            }
        }
    }
}

impl FromStr for LetterCase {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "capitalize" => Ok(Self::Capitalize),
            other => Err(OptionsError {
                kind: OptionsErrorKind::UnknownCase(other.to_string()),
                option: "case",
            }),
        }
    }
}

/// Language of the formatted output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain SQL text.
    #[default]
    Sql,
    /// Assignments of string literals to `sql`, `sql2`, ...
    Python,
    /// Assignments of string literals to `$sql`, `$sql2`, ...
    Php,
}

impl FromStr for OutputFormat {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(Self::Sql),
            "python" => Ok(Self::Python),
            "php" => Ok(Self::Php),
            other => Err(OptionsError {
                kind: OptionsErrorKind::UnknownOutputFormat(other.to_string()),
                option: "output_format",
            }),
        }
    }
}

/// Classifies an option validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsErrorKind {
    /// Indentation must be at least one column.
    ZeroIndentWidth,
    /// The line break sequence is empty.
    EmptyNewline,
    /// The line break sequence contains something besides `\r` and `\n`.
    InvalidNewline(String),
    /// Not one of `upper`, `lower`, `capitalize`.
    UnknownCase(String),
    /// Not one of `sql`, `python`, `php`.
    UnknownOutputFormat(String),
    /// Strings cannot be cut to fewer than two characters.
    TruncateTooShort(usize),
}

impl fmt::Display for OptionsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroIndentWidth => write!(f, "requires a positive integer"),
            Self::EmptyNewline => write!(f, "must not be empty"),
            Self::InvalidNewline(value) => {
                write!(f, "expected line break characters, got {value:?}")
            }
            Self::UnknownCase(value) => {
                write!(
                    f,
                    "expected one of upper, lower, capitalize, got {value:?}"
                )
            }
            Self::UnknownOutputFormat(value) => {
                write!(f, "expected one of sql, python, php, got {value:?}")
            }
            Self::TruncateTooShort(width) => {
                write!(f, "requires an integer greater than 1, got {width}")
            }
        }
    }
}

/// Error produced when options are rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {option}: {kind}")]
pub struct OptionsError {
    pub kind: OptionsErrorKind,
    pub option: &'static str,
}

/// Settings for the whole formatting pipeline.
///
/// ```
/// use sqlindent::FormatOptions;
///
/// let options = FormatOptions::new().reindent(true).wrap_after(40);
/// let options = options.validate().unwrap();
/// assert!(options.strip_whitespace);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormatOptions {
    pub keyword_case: Option<LetterCase>,
    pub identifier_case: Option<LetterCase>,
    pub strip_comments: bool,
    pub use_space_around_operators: bool,
    pub strip_whitespace: bool,
    pub reindent: bool,
    /// Right-align clause keywords against the end of `SELECT`.
    pub reindent_aligned: bool,
    pub indent_tabs: bool,
    pub indent_width: usize,
    pub indent_after_first: bool,
    pub indent_columns: bool,
    pub wrap_after: usize,
    pub comma_first: bool,
    pub compact: bool,
    /// Cut single-quoted strings longer than this many characters.
    pub truncate_strings: Option<usize>,
    /// Appended to truncated strings.
    pub truncate_char: String,
    pub output_format: OutputFormat,
    pub newline: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            keyword_case: None,
            identifier_case: None,
            strip_comments: false,
            use_space_around_operators: false,
            strip_whitespace: false,
            reindent: false,
            reindent_aligned: false,
            indent_tabs: false,
            indent_width: 2,
            indent_after_first: false,
            indent_columns: false,
            wrap_after: 0,
            comma_first: false,
            compact: false,
            truncate_strings: None,
            truncate_char: "[...]".to_string(),
            output_format: OutputFormat::Sql,
            newline: "\n".to_string(),
        }
    }
}

impl FormatOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn keyword_case(mut self, case: LetterCase) -> Self {
        self.keyword_case = Some(case);
        self
    }

    #[must_use]
    pub const fn identifier_case(mut self, case: LetterCase) -> Self {
        self.identifier_case = Some(case);
        self
    }

    #[must_use]
    pub const fn strip_comments(mut self, yes: bool) -> Self {
        self.strip_comments = yes;
        self
    }

    #[must_use]
    pub const fn use_space_around_operators(mut self, yes: bool) -> Self {
        self.use_space_around_operators = yes;
        self
    }

    #[must_use]
    pub const fn strip_whitespace(mut self, yes: bool) -> Self {
        self.strip_whitespace = yes;
        self
    }

    #[must_use]
    pub const fn reindent(mut self, yes: bool) -> Self {
        self.reindent = yes;
        self
    }

    #[must_use]
    pub const fn reindent_aligned(mut self, yes: bool) -> Self {
        self.reindent_aligned = yes;
        self
    }

    #[must_use]
    pub const fn indent_tabs(mut self, yes: bool) -> Self {
        self.indent_tabs = yes;
        self
    }

    #[must_use]
    pub const fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    #[must_use]
    pub const fn indent_after_first(mut self, yes: bool) -> Self {
        self.indent_after_first = yes;
        self
    }

    #[must_use]
    pub const fn indent_columns(mut self, yes: bool) -> Self {
        self.indent_columns = yes;
        self
    }

    #[must_use]
    pub const fn wrap_after(mut self, columns: usize) -> Self {
        self.wrap_after = columns;
        self
    }

    #[must_use]
    pub const fn comma_first(mut self, yes: bool) -> Self {
        self.comma_first = yes;
        self
    }

    #[must_use]
    pub const fn compact(mut self, yes: bool) -> Self {
        self.compact = yes;
        self
    }

    #[must_use]
    pub const fn truncate_strings(mut self, width: usize) -> Self {
        self.truncate_strings = Some(width);
        self
    }

    #[must_use]
    pub fn truncate_char(mut self, marker: impl Into<String>) -> Self {
        self.truncate_char = marker.into();
        self
    }

    #[must_use]
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn newline(mut self, sequence: impl Into<String>) -> Self {
        self.newline = sequence.into();
        self
    }

    /// Check the options and resolve implied settings: `indent_columns`
    /// turns on `reindent`, and either reindent mode turns on
    /// `strip_whitespace`.
    pub fn validate(mut self) -> Result<Self, OptionsError> {
        if let Some(width) = self.truncate_strings.filter(|&w| w <= 1) {
            return Err(OptionsError {
                kind: OptionsErrorKind::TruncateTooShort(width),
                option: "truncate_strings",
            });
        }
        if self.indent_width == 0 {
            return Err(OptionsError {
                kind: OptionsErrorKind::ZeroIndentWidth,
                option: "indent_width",
            });
        }
        if self.newline.is_empty() {
            return Err(OptionsError {
                kind: OptionsErrorKind::EmptyNewline,
                option: "newline",
            });
        }
        if self.newline.chars().any(|c| c != '\r' && c != '\n') {
            return Err(OptionsError {
                kind: OptionsErrorKind::InvalidNewline(self.newline),
                option: "newline",
            });
        }

        self.reindent |= self.indent_columns;
        self.strip_whitespace |= self.reindent || self.reindent_aligned;
        Ok(self)
    }

    /// Whether any enabled step needs the grouped tree.
    #[must_use]
    pub const fn needs_grouping(&self) -> bool {
        self.use_space_around_operators
            || self.strip_comments
            || self.strip_whitespace
            || self.reindent
            || self.reindent_aligned
    }

    /// Reindent settings derived from these options.
    #[must_use]
    pub fn reindent_options(&self) -> ReindentOptions {
        ReindentOptions {
            width: self.indent_width,
            indent_char: if self.indent_tabs { '\t' } else { ' ' },
            wrap_after: self.wrap_after,
            newline: self.newline.clone(),
            comma_first: self.comma_first,
            indent_after_first: self.indent_after_first,
            indent_columns: self.indent_columns,
            compact: self.compact,
        }
    }
}

/// Settings of the reindent filter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReindentOptions {
    /// Fill characters per indentation level.
    pub width: usize,
    pub indent_char: char,
    /// Column budget for identifier lists; 0 disables forced wraps.
    pub wrap_after: usize,
    pub newline: String,
    pub comma_first: bool,
    /// Start one level deep.
    pub indent_after_first: bool,
    /// Put every selected column on its own line.
    pub indent_columns: bool,
    /// Skip optional breaks such as the one before a CASE's `END`.
    pub compact: bool,
}

impl Default for ReindentOptions {
    fn default() -> Self {
        FormatOptions::default().reindent_options()
    }
}
