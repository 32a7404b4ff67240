use std::fmt;

use super::escape::{strip_quotes, unescape};
use super::lexer::{Operator, TokenKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("not an operator token: {0}")]
    NotAnOperator(String),

    #[error("query has {count} operators, limit is {limit}")]
    TooManyOperators { count: usize, limit: usize },
}

/// Boolean query tree handed to the search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Analyzed term match of `text` against `field`.
    Match { field: String, text: String },
    /// Exact phrase match of `text` against `field`.
    Phrase { field: String, text: String },
    And(Vec<QueryNode>),
    /// At least one child must match.
    Or(Vec<QueryNode>),
}

impl QueryNode {
    pub fn match_text(field: &str, text: impl Into<String>) -> Self {
        QueryNode::Match {
            field: field.to_string(),
            text: text.into(),
        }
    }

    pub fn phrase(field: &str, text: impl Into<String>) -> Self {
        QueryNode::Phrase {
            field: field.to_string(),
            text: text.into(),
        }
    }

    fn fold(op: Operator, clauses: Vec<QueryNode>) -> Self {
        match op {
            Operator::And => QueryNode::And(clauses),
            Operator::Or => QueryNode::Or(clauses),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, children) = match self {
            QueryNode::Match { field, text } => return write!(f, "{field}:{text}"),
            QueryNode::Phrase { field, text } => return write!(f, "{field}:\"{text}\""),
            QueryNode::And(children) => (Operator::And, children),
            QueryNode::Or(children) => (Operator::Or, children),
        };
        f.write_str("(")?;
        for (idx, child) in children.iter().enumerate() {
            if idx > 0 {
                write!(f, " {op} ")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}

struct Parser<'a> {
    field: &'a str,
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(field: &'a str, tokens: &'a [String]) -> Self {
        Self {
            field,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn advance(&mut self) -> Option<&'a str> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// match = word ... | '"' phrase '"'
    ///
    /// Runs of plain words become one match clause; each phrase splits the
    /// run and becomes its own clause.
    fn parse_match(&mut self) -> Vec<QueryNode> {
        let mut clauses = Vec::new();
        let mut words: Vec<&str> = Vec::new();

        while let Some(tok) = self.peek() {
            match TokenKind::of(tok) {
                TokenKind::Operator(_) => break,
                TokenKind::Phrase => {
                    self.flush_words(&mut words, &mut clauses);
                    clauses.push(QueryNode::phrase(self.field, unescape(strip_quotes(tok))));
                }
                TokenKind::Word => words.push(tok),
            }
            self.pos += 1;
        }
        self.flush_words(&mut words, &mut clauses);

        clauses
    }

    fn flush_words(&self, words: &mut Vec<&str>, clauses: &mut Vec<QueryNode>) {
        if !words.is_empty() {
            clauses.push(QueryNode::match_text(self.field, unescape(&words.join(" "))));
            words.clear();
        }
    }

    fn expect_operator(&mut self) -> Result<Operator, ParseError> {
        let tok = self.advance().unwrap_or_default();
        match TokenKind::of(tok) {
            TokenKind::Operator(op) => Ok(op),
            // parse_match only stops at an operator or end of input
            _ => Err(ParseError::NotAnOperator(tok.to_string())),
        }
    }

    /// query = match | match oper
    /// oper  = "AND" query | "OR" query
    ///
    /// Each operator takes everything to its right as one operand, so
    /// `a OR b AND c` is `a OR (b AND c)`. The segments are collected first
    /// and folded from the right, which keeps the stack flat however long
    /// the operator chain is.
    fn parse_query(&mut self) -> Result<Vec<QueryNode>, ParseError> {
        let mut segments: Vec<(Vec<QueryNode>, Operator)> = Vec::new();
        let mut lhs = self.parse_match();
        while self.peek().is_some() {
            let op = self.expect_operator()?;
            segments.push((lhs, op));
            lhs = self.parse_match();
        }

        let mut rhs = lhs;
        while let Some((mut lhs, op)) = segments.pop() {
            lhs.extend(rhs);
            rhs = vec![QueryNode::fold(op, lhs)];
        }
        Ok(rhs)
    }
}

fn count_operators(tokens: &[String]) -> usize {
    tokens
        .iter()
        .filter(|t| TokenKind::of(t).is_operator())
        .count()
}

/// Parse tokens into top-level clauses.
///
/// An empty token list yields no clauses. More than `max_operators` operators
/// is rejected, since every operator adds one level of nesting to the tree.
pub fn parse_query(
    field: &str,
    tokens: &[String],
    max_operators: usize,
) -> Result<Vec<QueryNode>, ParseError> {
    let count = count_operators(tokens);
    if count > max_operators {
        return Err(ParseError::TooManyOperators {
            count,
            limit: max_operators,
        });
    }
    Parser::new(field, tokens).parse_query()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_words_join_into_one_match() {
        let clauses = parse_query("f", &tokens(&["abc", "def"]), 8).unwrap();
        assert_eq!(clauses, vec![QueryNode::match_text("f", "abc def")]);
    }

    #[test]
    fn test_phrase_splits_word_run() {
        let clauses = parse_query("f", &tokens(&["a", "b", "\"c d\"", "e"]), 8).unwrap();
        assert_eq!(
            clauses,
            vec![
                QueryNode::match_text("f", "a b"),
                QueryNode::phrase("f", "c d"),
                QueryNode::match_text("f", "e"),
            ]
        );
    }

    #[test]
    fn test_fold_is_right_associative() {
        let clauses = parse_query("f", &tokens(&["a", "OR", "b", "AND", "c"]), 8).unwrap();
        assert_eq!(
            clauses,
            vec![QueryNode::Or(vec![
                QueryNode::match_text("f", "a"),
                QueryNode::And(vec![
                    QueryNode::match_text("f", "b"),
                    QueryNode::match_text("f", "c"),
                ]),
            ])]
        );
    }

    #[test]
    fn test_same_operator_chain_nests() {
        let clauses = parse_query("f", &tokens(&["a", "AND", "b", "AND", "c"]), 8).unwrap();
        assert_eq!(
            clauses,
            vec![QueryNode::And(vec![
                QueryNode::match_text("f", "a"),
                QueryNode::And(vec![
                    QueryNode::match_text("f", "b"),
                    QueryNode::match_text("f", "c"),
                ]),
            ])]
        );
    }

    #[test]
    fn test_multiple_leaves_on_left_are_flattened_into_fold() {
        let clauses = parse_query("f", &tokens(&["a", "\"b\"", "OR", "c"]), 8).unwrap();
        assert_eq!(
            clauses,
            vec![QueryNode::Or(vec![
                QueryNode::match_text("f", "a"),
                QueryNode::phrase("f", "b"),
                QueryNode::match_text("f", "c"),
            ])]
        );
    }

    #[test]
    fn test_dangling_operators() {
        let clauses = parse_query("f", &tokens(&["AND"]), 8).unwrap();
        assert_eq!(clauses, vec![QueryNode::And(vec![])]);

        let clauses = parse_query("f", &tokens(&["OR", "a"]), 8).unwrap();
        assert_eq!(clauses, vec![QueryNode::Or(vec![QueryNode::match_text("f", "a")])]);

        let clauses = parse_query("f", &tokens(&["a", "AND", "OR"]), 8).unwrap();
        assert_eq!(
            clauses,
            vec![QueryNode::And(vec![
                QueryNode::match_text("f", "a"),
                QueryNode::Or(vec![]),
            ])]
        );
    }

    #[test]
    fn test_empty_tokens() {
        assert_eq!(parse_query("f", &[], 8).unwrap(), vec![]);
    }

    #[test]
    fn test_operator_limit() {
        let err = parse_query("f", &tokens(&["a", "OR", "b", "OR", "c"]), 1).unwrap_err();
        assert_eq!(err, ParseError::TooManyOperators { count: 2, limit: 1 });
        assert!(parse_query("f", &tokens(&["a", "OR", "b"]), 1).is_ok());
    }

    #[test]
    fn test_expect_operator_guard() {
        let toks = tokens(&["abc"]);
        let mut parser = Parser::new("f", &toks);
        assert_eq!(
            parser.expect_operator(),
            Err(ParseError::NotAnOperator("abc".to_string()))
        );
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut raw = vec!["a".to_string()];
        for _ in 0..10_000 {
            raw.push("OR".to_string());
            raw.push("a".to_string());
        }
        let clauses = parse_query("f", &raw, usize::MAX).unwrap();
        assert_eq!(clauses.len(), 1);
        // drop the tree one level at a time
        let mut node = clauses.into_iter().next();
        let mut depth = 0;
        while let Some(QueryNode::Or(mut children)) = node {
            depth += 1;
            node = children.pop();
        }
        assert_eq!(depth, 10_000);
    }

    #[test]
    fn test_display() {
        let node = QueryNode::Or(vec![
            QueryNode::match_text("f", "a"),
            QueryNode::And(vec![QueryNode::phrase("f", "b c"), QueryNode::match_text("f", "d")]),
        ]);
        assert_eq!(node.to_string(), "(f:a OR (f:\"b c\" AND f:d))");
    }
}
