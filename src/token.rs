use std::fmt;

use regex::Regex;

/// Lexical categories produced by the lexer.
///
/// Categories form a shallow hierarchy: `Newline` is a kind of
/// `Whitespace`, `Dml` is a kind of `Keyword`, `Integer` is a kind of
/// `Number` which is a kind of `Literal`, and so on. Use [`TokenKind::is_a`]
/// for hierarchical checks and `==` for exact ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    Whitespace,
    Newline,
    Keyword,
    /// Data manipulation: `SELECT`, `INSERT`, `UPDATE`, ...
    Dml,
    /// Data definition: `CREATE`, `DROP`, `ALTER`, ...
    Ddl,
    /// Data control: `GRANT`, `REVOKE`.
    Dcl,
    /// Common table expression: `WITH`.
    Cte,
    /// `ASC`, `DESC`, `NULLS FIRST`, ...
    Order,
    /// `AT TIME ZONE 'zone'`.
    TzCast,
    Name,
    /// Built-in type names such as `INT` or `DATE`.
    Builtin,
    /// Bind parameters: `?`, `%s`, `:name`, `$1`.
    Placeholder,
    Literal,
    Number,
    Integer,
    Float,
    Hexadecimal,
    String,
    /// Single-quoted string literal.
    StringSingle,
    /// Double-quoted identifier.
    StringSymbol,
    Punctuation,
    Operator,
    Comparison,
    /// `:=`
    Assignment,
    /// `*`
    Wildcard,
    Comment,
    CommentSingle,
    CommentMultiline,
    /// Client command such as `\copy`.
    Command,
    /// A character no lexer rule accepts.
    Error,
}

impl TokenKind {
    /// The enclosing category, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Whitespace => Some(Self::Text),
            Self::Newline => Some(Self::Whitespace),
            Self::Dml | Self::Ddl | Self::Dcl | Self::Cte | Self::Order | Self::TzCast => {
                Some(Self::Keyword)
            }
            Self::Builtin | Self::Placeholder => Some(Self::Name),
            Self::Number | Self::String => Some(Self::Literal),
            Self::Integer | Self::Float | Self::Hexadecimal => Some(Self::Number),
            Self::StringSingle | Self::StringSymbol => Some(Self::String),
            Self::Comparison => Some(Self::Operator),
            Self::CommentSingle | Self::CommentMultiline => Some(Self::Comment),
            _ => None,
        }
    }

    /// Whether this kind equals `ancestor` or is nested below it.
    #[must_use]
    pub fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single classified lexeme.
///
/// Tokens are plain values: the owning tree keeps parent links, so two
/// tokens with the same kind and text compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Upper-cased text for keywords, the raw text otherwise.
    pub normalized: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        let value = value.into();
        let normalized = if kind.is_a(TokenKind::Keyword) {
            value.to_uppercase()
        } else {
            value.clone()
        };
        Self {
            kind,
            value,
            normalized,
        }
    }

    #[must_use]
    pub fn whitespace(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Whitespace, value)
    }

    #[must_use]
    pub fn is_keyword(&self) -> bool {
        self.kind.is_a(TokenKind::Keyword)
    }

    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_a(TokenKind::Whitespace)
    }

    #[must_use]
    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Newline
    }

    /// Exact kind match plus, when `values` is given, a match against one
    /// of the candidate values.
    ///
    /// Keywords compare case-insensitively against their normalized form;
    /// every other kind compares the raw text exactly.
    #[must_use]
    pub fn matches(&self, kind: TokenKind, values: Option<&[&str]>) -> bool {
        if self.kind != kind {
            return false;
        }
        let Some(values) = values else {
            return true;
        };
        if self.is_keyword() {
            values
                .iter()
                .any(|v| v.eq_ignore_ascii_case(&self.normalized))
        } else {
            values.iter().any(|v| *v == self.normalized)
        }
    }

    /// Like [`Token::matches`] but searches each pattern in the normalized
    /// text. Keyword patterns should be compiled case-insensitive.
    #[must_use]
    pub fn matches_regex(&self, kind: TokenKind, patterns: &[Regex]) -> bool {
        self.kind == kind && patterns.iter().any(|p| p.is_match(&self.normalized))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
