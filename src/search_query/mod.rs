mod escape;
mod lexer;
mod parser;
mod serialize;

use crate::config::QueryConfig;

pub use escape::unescape;
pub use lexer::{tokenize, Operator, TokenKind};
pub use parser::{ParseError, QueryNode};

/// Parses user search text into a boolean query tree.
///
/// Syntax:
///
/// ```text
/// query = match | match oper
/// oper  = "AND" query | "OR" query
/// match = word ... | '"' word ... '"'
/// ```
///
/// Behavior:
/// - Adjacent words become a single text match (`abc def`)
/// - Quoted runs become phrase matches; an unterminated quote is closed at the end
/// - `\` escapes the next character (`14.1\"` is a literal quote, not a phrase)
/// - `AND`/`OR` are case-sensitive and right-associative with no precedence:
///   `a OR b AND c` is `a OR (b AND c)`
/// - Several clauses with no operator between them are OR'ed together
/// - Anything unparseable degrades to one text match over the raw input,
///   including queries with more than `max_operators` operators (512 by
///   default), since each operator nests the tree one level deeper
///
/// Never fails. Empty or whitespace-only input yields `Match { text: "" }`,
/// a degenerate filter callers should treat as "no search".
#[derive(Clone, Debug, Default)]
pub struct QueryParser {
    config: QueryConfig,
}

impl QueryParser {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn parse(&self, field: &str, text: &str) -> QueryNode {
        let tokens = tokenize(text);
        log::debug!("search tokens: {tokens:?}");

        let mut clauses = match parser::parse_query(field, &tokens, self.config.max_operators) {
            Ok(clauses) => clauses,
            Err(e) => {
                log::warn!("search query degraded to plain match: {e}");
                return QueryNode::match_text(field, text);
            }
        };

        let node = match clauses.len() {
            0 => QueryNode::match_text(field, ""),
            1 => clauses.remove(0),
            _ => QueryNode::Or(clauses),
        };
        log::debug!("search query: {node}");
        node
    }

    /// Parses against `default_field` from the config.
    pub fn parse_default(&self, text: &str) -> QueryNode {
        self.parse(&self.config.default_field, text)
    }

    /// Parses and serializes to the backend query mapping.
    pub fn generate(&self, field: &str, text: &str) -> serde_json::Value {
        self.parse(field, text).to_value()
    }
}

/// Parses `text` against `field` with default settings.
pub fn parse(field: &str, text: &str) -> QueryNode {
    QueryParser::default().parse(field, text)
}

/// Parses `text` against `field` and returns the backend query mapping.
pub fn generate_query_parsed(field: &str, text: &str) -> serde_json::Value {
    parse(field, text).to_value()
}
