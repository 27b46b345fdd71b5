//! Relay-style global object identifiers
//!
//! A `nodeId` is the base64 of a compact JSON array: `["items", 1]` for a row
//! (collection tag plus primary key), `["query"]` for the root query type.
//! Opaque to clients; only round-tripping is promised.

use async_graphql::Value;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Tag used for the root query type's own `nodeId`
pub const QUERY_TAG: &str = "query";

#[derive(Debug, Clone, PartialEq)]
pub enum NodeId {
    /// The root query type
    Query,
    /// A row: collection tag (pluralized camelCase table name) plus primary key
    Row { collection: String, pk: Value },
}

/// Encode a row identifier
pub fn encode_row(collection: &str, pk: &Value) -> String {
    let pk_json = match pk {
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        other => serde_json::Value::String(other.to_string()),
    };
    let payload = serde_json::Value::Array(vec![
        serde_json::Value::String(collection.to_string()),
        pk_json,
    ]);
    BASE64.encode(payload.to_string())
}

/// Encode the root query identifier
pub fn encode_query() -> String {
    BASE64.encode(format!("[\"{}\"]", QUERY_TAG))
}

/// Decode a `nodeId`; `None` when the payload is not one of ours
pub fn decode(node_id: &str) -> Option<NodeId> {
    let bytes = BASE64.decode(node_id).ok()?;
    let json: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let parts = json.as_array()?;

    match parts.as_slice() {
        [serde_json::Value::String(tag)] if tag == QUERY_TAG => Some(NodeId::Query),
        [serde_json::Value::String(collection), pk] => {
            let pk = match pk {
                serde_json::Value::Number(n) => Value::Number(n.clone()),
                serde_json::Value::String(s) => Value::String(s.clone()),
                _ => return None,
            };
            Some(NodeId::Row {
                collection: collection.clone(),
                pk,
            })
        }
        _ => None,
    }
}
