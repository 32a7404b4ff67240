use std::fmt;

const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntactic kind of a raw token. Tokens stay plain strings; the kind is
/// derived from their text on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Phrase,
    Operator(Operator),
}

impl TokenKind {
    pub fn of(token: &str) -> Self {
        match token {
            "AND" => TokenKind::Operator(Operator::And),
            "OR" => TokenKind::Operator(Operator::Or),
            _ if token.starts_with('"') => TokenKind::Phrase,
            _ => TokenKind::Word,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, TokenKind::Operator(_))
    }
}

/// Split search text into tokens.
///
/// Quotes are kept in the token text and backslash escapes are kept verbatim;
/// both are stripped later when leaves are built. An unterminated quote is
/// closed at end of input.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut token = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                token.push(c);
                // the escaped char goes through untouched, whatever it is
                if let Some(escaped) = chars.next() {
                    token.push(escaped);
                }
            }
            '"' => {
                in_quotes = !in_quotes;
                token.push(c);
            }
            c if !in_quotes && WHITESPACE.contains(&c) => {
                if !token.is_empty() {
                    tokens.push(std::mem::take(&mut token));
                }
            }
            _ => token.push(c),
        }
    }

    if in_quotes {
        if !token.is_empty() {
            token.push('"');
        } else if let Some(last) = tokens.last_mut() {
            last.push('"');
        }
    }

    if !token.is_empty() {
        tokens.push(token);
    }

    tokens
}
