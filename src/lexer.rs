//! Lossless SQL scanner.
//!
//! Every input character ends up in exactly one token, so joining the
//! token values gives back the input. Characters no rule accepts become
//! single-character `Error` tokens.

use crate::keywords;
use crate::token::{Token, TokenKind};

/// Words that are keywords even when followed by `(`.
const ALWAYS_KEYWORDS: &[&str] = &["CASE", "IN", "VALUES", "USING", "FROM", "AS"];

/// Tokenize a SQL source string.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic()
}

fn is_ident_tail(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.pos < self.input.len() {
            let (kind, len) = self.next_token();
            tokens.push(Token::new(kind, &self.input[self.pos..self.pos + len]));
            self.pos += len;
        }
        tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset..)?.chars().next()
    }

    fn prev_char(&self) -> Option<char> {
        self.input[..self.pos].chars().next_back()
    }

    /// Byte length of the run of characters satisfying `pred` starting at
    /// `offset` (relative to the cursor).
    fn run_len(&self, offset: usize, pred: impl Fn(char) -> bool) -> usize {
        self.rest()[offset..]
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.rest().len() - offset, |(i, _)| i)
    }

    /// Classify the token at the cursor, returning its kind and byte length.
    fn next_token(&self) -> (TokenKind, usize) {
        let rest = self.rest();
        let Some(ch) = rest.chars().next() else {
            return (TokenKind::Error, 0);
        };

        if rest.starts_with("--") || rest.starts_with("# ") {
            return (TokenKind::CommentSingle, self.single_comment_len());
        }
        if rest.starts_with("/*") {
            if let Some(end) = rest[2..].find("*/") {
                return (TokenKind::CommentMultiline, end + 4);
            }
        }

        match ch {
            '\r' => {
                let len = if rest.starts_with("\r\n") { 2 } else { 1 };
                (TokenKind::Newline, len)
            }
            '\n' => (TokenKind::Newline, 1),
            c if c.is_whitespace() => (
                TokenKind::Whitespace,
                self.run_len(0, |c| c.is_whitespace() && c != '\r' && c != '\n'),
            ),
            ':' if rest.starts_with(":=") => (TokenKind::Assignment, 2),
            ':' if rest.starts_with("::") => (TokenKind::Punctuation, 2),
            '*' => (TokenKind::Wildcard, 1),
            '`' => self
                .quoted_len('`', false)
                .map_or((TokenKind::Error, 1), |len| (TokenKind::Name, len)),
            '$' => self.dollar_quoted_len().map_or_else(
                || self.prefixed_placeholder(),
                |len| (TokenKind::Literal, len),
            ),
            '?' => (TokenKind::Placeholder, 1),
            '%' => self.percent_placeholder(),
            ':' => self.prefixed_placeholder(),
            '\\' => {
                let len = self.run_len(1, is_word_char);
                if len > 0 {
                    (TokenKind::Command, len + 1)
                } else {
                    (TokenKind::Error, 1)
                }
            }
            '@' | '#' => self.prefixed_name(),
            '\'' => self
                .quoted_len('\'', true)
                .map_or((TokenKind::Error, 1), |len| (TokenKind::StringSingle, len)),
            '"' => self
                .quoted_len('"', true)
                .map_or((TokenKind::Error, 1), |len| (TokenKind::StringSymbol, len)),
            '[' => self.bracketed_name(),
            '.' => self
                .number()
                .unwrap_or((TokenKind::Punctuation, 1)),
            c if c.is_ascii_digit() => self.number().unwrap_or_else(|| self.word()),
            c if is_word_char(c) => self.word(),
            ';' | '(' | ')' | ']' | ',' => (TokenKind::Punctuation, 1),
            _ => self.operator(),
        }
    }

    fn single_comment_len(&self) -> usize {
        let rest = self.rest();
        match rest.find(['\r', '\n']) {
            None => rest.len(),
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
        }
    }

    /// Length of a string delimited by `quote`, where a doubled quote and
    /// (optionally) a backslash-escaped quote stand for a literal quote.
    fn quoted_len(&self, quote: char, backslash: bool) -> Option<usize> {
        let scan = |backslash: bool| {
            let body = &self.rest()[1..];
            let mut chars = body.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c == quote {
                    if chars.peek().is_some_and(|&(_, n)| n == quote) {
                        chars.next();
                        continue;
                    }
                    return Some(i + 2);
                }
                if backslash && c == '\\' && chars.peek().is_some_and(|&(_, n)| n == quote) {
                    chars.next();
                }
            }
            None
        };
        scan(backslash).or_else(|| if backslash { scan(false) } else { None })
    }

    /// `$tag$ ... $tag$` literal.
    fn dollar_quoted_len(&self) -> Option<usize> {
        if self
            .prev_char()
            .is_some_and(|c| is_word_char(c) || c == '"' || c == '$')
        {
            return None;
        }
        let rest = self.rest();
        let tag_body = if self.char_at(1).is_some_and(is_ident_tail) {
            self.run_len(1, is_word_char)
        } else {
            0
        };
        if !rest[1 + tag_body..].starts_with('$') {
            return None;
        }
        let tag = &rest[..tag_body + 2];
        rest[tag.len()..]
            .find(tag)
            .map(|end| tag.len() + end + tag.len())
    }

    /// `$1`, `:name` style parameters.
    fn prefixed_placeholder(&self) -> (TokenKind, usize) {
        let len = self.run_len(1, is_word_char);
        if len > 0 && !self.prev_char().is_some_and(is_word_char) {
            (TokenKind::Placeholder, len + 1)
        } else if self.rest().starts_with(':') {
            (TokenKind::Punctuation, 1)
        } else {
            (TokenKind::Error, 1)
        }
    }

    /// `%s` and `%(name)s` style parameters.
    fn percent_placeholder(&self) -> (TokenKind, usize) {
        let rest = self.rest();
        if rest.starts_with("%s") {
            return (TokenKind::Placeholder, 2);
        }
        if rest.starts_with("%(") {
            let name = self.run_len(2, is_word_char);
            if name > 0 && rest[2 + name..].starts_with(")s") {
                return (TokenKind::Placeholder, name + 4);
            }
        }
        self.operator()
    }

    /// `@var`, `#temp`, `##global` names.
    fn prefixed_name(&self) -> (TokenKind, usize) {
        let prefix = if self.rest().starts_with("##") { 2 } else { 1 };
        let starts_name = self.char_at(prefix).is_some_and(is_name_start);
        let len = self.run_len(prefix, is_word_char);
        if starts_name && len > 1 {
            (TokenKind::Name, prefix + len)
        } else {
            self.operator()
        }
    }

    /// `[column name]` style quoted names; otherwise plain punctuation.
    fn bracketed_name(&self) -> (TokenKind, usize) {
        let after_operand = self
            .prev_char()
            .is_some_and(|c| is_word_char(c) || c == ']' || c == ')');
        if !after_operand {
            let body = &self.rest()[1..];
            if let Some(end) = body.find([']', '[']) {
                if end > 0 && body[end..].starts_with(']') {
                    return (TokenKind::Name, end + 2);
                }
            }
        }
        (TokenKind::Punctuation, 1)
    }

    fn number(&self) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        let not_glued = |len: usize| !rest[len..].chars().next().is_some_and(is_ident_tail);

        if rest.len() > 2 && (rest.starts_with("0x") || rest.starts_with("0X")) {
            let digits = self.run_len(2, |c| c.is_ascii_hexdigit());
            if digits > 0 {
                return Some((TokenKind::Hexadecimal, digits + 2));
            }
        }

        let int = self.run_len(0, |c| c.is_ascii_digit());
        let frac = if rest[int..].starts_with('.') {
            Some(self.run_len(int + 1, |c| c.is_ascii_digit()))
        } else {
            None
        };

        if int > 0 {
            // 1e10, 1.5E-3
            let mantissa = match frac {
                Some(f) if f > 0 => int + 1 + f,
                _ => int,
            };
            if rest[mantissa..].starts_with(['e', 'E']) {
                let sign = usize::from(rest[mantissa + 1..].starts_with('-'));
                let exp = self.run_len(mantissa + 1 + sign, |c| c.is_ascii_digit());
                if exp > 0 {
                    return Some((TokenKind::Float, mantissa + 1 + sign + exp));
                }
            }
        }

        match frac {
            Some(f) if int > 0 && not_glued(int + 1 + f) => {
                return Some((TokenKind::Float, int + 1 + f));
            }
            Some(f) if int == 0 && f > 0 && not_glued(1 + f) => {
                return Some((TokenKind::Float, 1 + f));
            }
            _ => {}
        }

        if int > 0 && not_glued(int) {
            return Some((TokenKind::Integer, int));
        }
        None
    }

    /// The upper-cased `\w` run starting at `offset`, with its end offset.
    fn word_at(&self, offset: usize) -> Option<(String, usize)> {
        let len = self.run_len(offset, is_word_char);
        (len > 0).then(|| (self.rest()[offset..offset + len].to_uppercase(), offset + len))
    }

    /// Skip at least one whitespace character; returns the new offset.
    fn skip_space(&self, offset: usize) -> Option<usize> {
        let len = self.run_len(offset, char::is_whitespace);
        (len > 0).then_some(offset + len)
    }

    /// The next word after whitespace following `offset`.
    fn next_word(&self, offset: usize) -> Option<(String, usize)> {
        self.word_at(self.skip_space(offset)?)
    }

    fn word(&self) -> (TokenKind, usize) {
        let rest = self.rest();
        let ident_len = self.run_len(0, is_word_char);
        let word_len = self.run_len(0, |c| is_word_char(c) || c == '$' || c == '#');
        let upper = rest[..ident_len].to_uppercase();
        let starts_with_letter = rest.chars().next().is_some_and(is_name_start);

        if ALWAYS_KEYWORDS.contains(&upper.as_str()) {
            return (TokenKind::Keyword, ident_len);
        }

        if starts_with_letter {
            let after = &rest[ident_len..];
            let followed_by_dot = after.trim_start().starts_with('.');
            if followed_by_dot || self.prev_char() == Some('.') || after.starts_with('(') {
                return (TokenKind::Name, ident_len);
            }
        }

        if let Some(phrase) = self.phrase(&upper, ident_len) {
            return phrase;
        }

        (keywords::classify(&rest[..word_len]), word_len)
    }

    /// Multi-word keywords and keyword-like operators.
    fn phrase(&self, first: &str, end: usize) -> Option<(TokenKind, usize)> {
        let second = self.next_word(end);
        let second_is = |words: &[&str]| {
            second
                .as_ref()
                .filter(|(w, _)| words.contains(&w.as_str()))
                .map(|(_, e)| *e)
        };

        match first {
            "LEFT" | "RIGHT" | "FULL" => {
                if let Some(e) = second_is(&["JOIN"]) {
                    return Some((TokenKind::Keyword, e));
                }
                let mid = second_is(&["INNER", "OUTER", "STRAIGHT"])?;
                let (third, e) = self.next_word(mid)?;
                (third == "JOIN").then_some((TokenKind::Keyword, e))
            }
            "INNER" | "OUTER" | "STRAIGHT" | "CROSS" | "NATURAL" => {
                second_is(&["JOIN"]).map(|e| (TokenKind::Keyword, e))
            }
            "END" => second_is(&["IF", "LOOP", "WHILE"]).map(|e| (TokenKind::Keyword, e)),
            "NOT" => second_is(&["NULL"])
                .map(|e| (TokenKind::Keyword, e))
                .or_else(|| {
                    second_is(&["LIKE", "ILIKE", "RLIKE", "REGEXP"])
                        .map(|e| (TokenKind::Comparison, e))
                }),
            "LIKE" | "ILIKE" | "RLIKE" | "REGEXP" => Some((TokenKind::Comparison, end)),
            "ASC" | "DESC" => {
                let nulls = second_is(&["NULLS"]).and_then(|e| {
                    let (third, e) = self.next_word(e)?;
                    (third == "FIRST" || third == "LAST").then_some(e)
                });
                Some((TokenKind::Order, nulls.unwrap_or(end)))
            }
            "NULLS" => second_is(&["FIRST", "LAST"]).map(|e| (TokenKind::Order, e)),
            "UNION" => second_is(&["ALL"]).map(|e| (TokenKind::Keyword, e)),
            "CREATE" => {
                let replace = second_is(&["OR"]).and_then(|e| {
                    let (third, e) = self.next_word(e)?;
                    (third == "REPLACE").then_some(e)
                });
                Some((TokenKind::Ddl, replace.unwrap_or(end)))
            }
            "DOUBLE" => second_is(&["PRECISION"]).map(|e| (TokenKind::Builtin, e)),
            "GROUP" | "ORDER" => second_is(&["BY"]).map(|e| (TokenKind::Keyword, e)),
            "PRIMARY" => second_is(&["KEY"]).map(|e| (TokenKind::Keyword, e)),
            "HANDLER" => second_is(&["FOR"]).map(|e| (TokenKind::Keyword, e)),
            "GO" => self.go_count(end),
            "LATERAL" => {
                let view = second_is(&["VIEW"])?;
                let (third, e) = self.next_word(view)?;
                ["EXPLODE", "INLINE", "PARSE_URL_TUPLE", "POSEXPLODE", "STACK"]
                    .contains(&third.as_str())
                    .then_some((TokenKind::Keyword, e))
            }
            "AT" => self.time_zone(end),
            _ => None,
        }
    }

    /// `GO 2`: batch separator with a repeat count.
    fn go_count(&self, end: usize) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        let space = rest[end..].chars().next().filter(|c| c.is_whitespace())?;
        let start = end + space.len_utf8();
        let digits = self.run_len(start, |c| c.is_ascii_digit());
        let boundary = !rest[start + digits..].chars().next().is_some_and(is_word_char);
        (digits > 0 && boundary).then_some((TokenKind::Keyword, start + digits))
    }

    /// `AT TIME ZONE 'UTC'`
    fn time_zone(&self, end: usize) -> Option<(TokenKind, usize)> {
        let (time, e) = self.next_word(end)?;
        if time != "TIME" {
            return None;
        }
        let (zone, e) = self.next_word(e)?;
        if zone != "ZONE" {
            return None;
        }
        let start = self.skip_space(e)?;
        let body = self.rest()[start..].strip_prefix('\'')?;
        let close = body.find('\'')?;
        (close > 0).then_some((TokenKind::TzCast, start + close + 2))
    }

    fn operator(&self) -> (TokenKind, usize) {
        let rest = self.rest();
        for op in ["->>", "->", "#>>", "#>", "@>", "<@", "-|-", "<->"] {
            if rest.starts_with(op) {
                return (TokenKind::Operator, op.len());
            }
        }
        let comparison = self.run_len(0, |c| matches!(c, '<' | '>' | '=' | '~' | '!'));
        if comparison > 0 {
            return (TokenKind::Comparison, comparison);
        }
        let operator = self.run_len(0, |c| {
            matches!(c, '+' | '/' | '@' | '#' | '%' | '^' | '&' | '|' | '-')
        });
        if operator > 0 {
            return (TokenKind::Operator, operator);
        }
        let len = rest.chars().next().map_or(0, char::len_utf8);
        (TokenKind::Error, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn simple_select() {
        let tokens = kinds("select a from t");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Dml, "select".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Name, "a".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Keyword, "from".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Name, "t".to_string()),
            ]
        );
    }

    #[test]
    fn multi_word_keywords() {
        let tokens = tokenize("left outer join x group  by y");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].normalized, "LEFT OUTER JOIN");
        assert_eq!(tokens[4].value, "group  by");
    }

    #[test]
    fn function_name_is_name() {
        let tokens = tokenize("max(a)");
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[1].kind, TokenKind::Punctuation);
    }

    #[test]
    fn case_stays_keyword_before_paren() {
        let tokens = tokenize("case(foo)");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42")[0].0, TokenKind::Integer);
        assert_eq!(kinds("4.2")[0].0, TokenKind::Float);
        assert_eq!(kinds(".5")[0].0, TokenKind::Float);
        assert_eq!(kinds("1e10")[0].0, TokenKind::Float);
        assert_eq!(kinds("0xFF")[0].0, TokenKind::Hexadecimal);
        assert_eq!(kinds("1abc")[0].0, TokenKind::Name);
    }

    #[test]
    fn strings_and_symbols() {
        let tokens = tokenize("'it''s' \"col\"");
        assert_eq!(tokens[0].kind, TokenKind::StringSingle);
        assert_eq!(tokens[0].value, "'it''s'");
        assert_eq!(tokens[2].kind, TokenKind::StringSymbol);
    }

    #[test]
    fn comment_keeps_line_break() {
        let tokens = tokenize("a -- note\nb");
        assert_eq!(tokens[2].kind, TokenKind::CommentSingle);
        assert_eq!(tokens[2].value, "-- note\n");
        assert_eq!(tokens[3].value, "b");
    }

    #[test]
    fn placeholders() {
        let tokens = tokenize("? :name $1 %s %(key)s");
        let placeholders: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Placeholder)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(placeholders, vec!["?", ":name", "$1", "%s", "%(key)s"]);
    }

    #[test]
    fn operators() {
        let tokens = kinds("a<>b||c::int");
        assert_eq!(tokens[1], (TokenKind::Comparison, "<>".to_string()));
        assert_eq!(tokens[3], (TokenKind::Operator, "||".to_string()));
        assert_eq!(tokens[5], (TokenKind::Punctuation, "::".to_string()));
    }

    #[test]
    fn unknown_character_is_error_token() {
        let tokens = tokenize("a § b");
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].value, "§");
    }

    #[test]
    fn lossless() {
        let input = "SELECT \"a\".b, $$x$$ FROM [t] /* c */\r\nWHERE c NOT LIKE 'x%';";
        let joined: String = tokenize(input).iter().map(|t| t.value.as_str()).collect();
        assert_eq!(joined, input);
    }
}
