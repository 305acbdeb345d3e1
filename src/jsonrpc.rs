//! JSON-RPC 2.0 envelope types.
//!
//! Request envelopes here are deliberately permissive: every field is
//! optional so that malformed variants can be expressed and serialized with
//! the missing keys omitted rather than sent as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    /// Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;

    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i64 = -32600;

    /// The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

/// Message paired with [`error_codes::INVALID_REQUEST`].
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid Request";

/// A JSON-RPC 2.0 request envelope with optionally absent fields.
///
/// Field order matches the order the envelope is written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Request identifier; absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Protocol version tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,

    /// Method name to invoke.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Positional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RequestEnvelope {
    /// Creates a canonical request with all four fields present.
    #[must_use]
    pub fn canonical(id: i64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id: Some(id),
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            method: Some(method.into()),
            params: Some(params),
        }
    }
}

/// Builds the exact success envelope a conformant server returns.
#[must_use]
pub fn success_envelope(id: i64, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

/// Builds the exact error envelope a conformant server returns.
///
/// A missing request id is echoed back as `null`.
#[must_use]
pub fn error_envelope(id: Option<i64>, code: i64, message: &str) -> Value {
    let mut error = Map::new();
    error.insert("code".to_string(), Value::from(code));
    error.insert("message".to_string(), Value::from(message));

    json!({
        "id": id,
        "jsonrpc": JSONRPC_VERSION,
        "error": error,
    })
}
