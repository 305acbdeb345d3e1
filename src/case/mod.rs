//! Test cases: what to send and what must come back.
//!
//! A [`TestCase`] pairs one request with the outcome a conformant server
//! produces for it. Canonical cases come from the [`synth`] module; the
//! malformed variants come from [`mutation`].

pub mod mutation;
pub mod synth;

use serde::Serialize;
use serde_json::Value;

use crate::jsonrpc::{RequestEnvelope, error_envelope, success_envelope};

pub use mutation::Mutation;
pub use synth::{CaseSynthesizer, ID_BASE};

/// Content type a conformant server requires.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type sent by the wrong-content-type variant.
pub const WRONG_CONTENT_TYPE: &str = "text/plain";

/// Body a conformant server returns for a non-JSON content type.
pub const INVALID_CONTENT_TYPE_BODY: &str =
    "invalid content type, only application/json is supported";

/// The response body a case requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedOutcome {
    /// `{jsonrpc, id, result}` with exactly those keys.
    SuccessEnvelope {
        /// Echoed request id.
        id: i64,
        /// Required `result` member.
        result: Value,
    },
    /// `{id, jsonrpc, error: {code, message}}` with exactly those keys.
    ErrorEnvelope {
        /// Echoed request id, `null` when the request had none.
        id: Option<i64>,
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },
    /// No body at all.
    EmptyBody,
    /// An exact plain-text body.
    PlainTextBody {
        /// Required body text.
        text: String,
    },
}

impl ExpectedOutcome {
    /// The JSON object a structural comparison checks against, if any.
    #[must_use]
    pub fn envelope(&self) -> Option<Value> {
        match self {
            Self::SuccessEnvelope { id, result } => Some(success_envelope(*id, result.clone())),
            Self::ErrorEnvelope { id, code, message } => Some(error_envelope(*id, *code, message)),
            Self::EmptyBody | Self::PlainTextBody { .. } => None,
        }
    }

    /// The exact body text a literal comparison checks against, if any.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::EmptyBody => Some(""),
            Self::PlainTextBody { text } => Some(text),
            Self::SuccessEnvelope { .. } | Self::ErrorEnvelope { .. } => None,
        }
    }
}

/// A single request/response check against the server-under-test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Unique display name, `<fixture>` or `<fixture>/<strategy>`.
    pub name: String,
    /// Name of the fixture the case was derived from.
    pub fixture: String,
    /// Id assigned to the canonical case of this fixture.
    pub id: i64,
    /// Strategy that produced this case; `None` for the canonical case.
    pub mutation: Option<Mutation>,
    /// Envelope to send.
    pub request: RequestEnvelope,
    /// `Content-Type` header to send.
    pub content_type: String,
    /// Required HTTP status.
    pub expected_status: u16,
    /// Required body.
    pub expected: ExpectedOutcome,
}

impl TestCase {
    /// Label of the strategy, `"canonical"` for unmutated cases.
    #[must_use]
    pub fn strategy_label(&self) -> &'static str {
        self.mutation.map_or("canonical", Mutation::name)
    }
}
