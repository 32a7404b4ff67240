use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::parser::QueryNode;

fn leaf(kind: &str, field: &str, text: &str) -> Value {
    let mut inner = Map::new();
    inner.insert(field.to_string(), Value::String(text.to_string()));
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(inner));
    Value::Object(outer)
}

impl QueryNode {
    /// Backend query mapping for this tree.
    ///
    /// ```text
    /// Match   -> {"text": {field: text}}
    /// Phrase  -> {"text_phrase": {field: text}}
    /// And     -> {"bool": {"must": [..]}}
    /// Or      -> {"bool": {"minimum_should_match": 1, "should": [..]}}
    /// ```
    pub fn to_value(&self) -> Value {
        match self {
            QueryNode::Match { field, text } => leaf("text", field, text),
            QueryNode::Phrase { field, text } => leaf("text_phrase", field, text),
            QueryNode::And(children) => {
                let must: Vec<Value> = children.iter().map(QueryNode::to_value).collect();
                json!({ "bool": { "must": must } })
            }
            QueryNode::Or(children) => {
                let should: Vec<Value> = children.iter().map(QueryNode::to_value).collect();
                json!({ "bool": { "minimum_should_match": 1, "should": should } })
            }
        }
    }
}

impl Serialize for QueryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
