//! Boolean search-box query parsing.
//!
//! Turns free-form search text (bare words, quoted phrases, `AND`/`OR`) into
//! a [`QueryNode`] tree and serializes it into the nested mapping a document
//! search backend executes.
//!
//! ```
//! use serde_json::json;
//!
//! let query = searchq::generate_query_parsed("description", r#"crash AND "start page""#);
//! assert_eq!(
//!     query,
//!     json!({"bool": {"must": [
//!         {"text": {"description": "crash"}},
//!         {"text_phrase": {"description": "start page"}},
//!     ]}})
//! );
//! ```

pub mod config;
pub mod search_query;

pub use config::QueryConfig;
pub use search_query::{
    generate_query_parsed, parse, tokenize, unescape, Operator, ParseError, QueryNode, QueryParser,
    TokenKind,
};
