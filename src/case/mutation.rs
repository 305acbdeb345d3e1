//! Malformed-request strategies.
//!
//! Each strategy derives one variant from a well-formed case together with
//! the response a conformant server owes it:
//!
//! | Strategy | Change | Status | Body |
//! |---|---|---|---|
//! | `missing-id` | drop `id` | 200 | empty (notification) |
//! | `missing-params` | drop `params` | 200 | canonical success envelope |
//! | `missing-jsonrpc` | drop `jsonrpc` | 200 | canonical success envelope |
//! | `wrong-content-type` | send `text/plain` | 200 | fixed plain-text error |
//! | `missing-method` | drop `method` | 400 | `-32600 Invalid Request` envelope |

use clap::ValueEnum;
use serde::Serialize;

use super::{ExpectedOutcome, INVALID_CONTENT_TYPE_BODY, TestCase, WRONG_CONTENT_TYPE};
use crate::jsonrpc::{INVALID_REQUEST_MESSAGE, error_codes};

/// A transformation that turns a well-formed request into a malformed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mutation {
    /// Remove `id`; the server must treat the call as a notification.
    MissingId,
    /// Remove `params`; the server must treat them as empty.
    MissingParams,
    /// Remove `jsonrpc`; the server must tolerate the missing version tag.
    MissingJsonrpc,
    /// Declare a non-JSON content type; the server must reject it in plain text.
    WrongContentType,
    /// Remove `method`; the server must answer `-32600 Invalid Request`.
    MissingMethod,
}

impl Mutation {
    /// Every strategy, in the order cases are generated.
    pub const ALL: [Self; 5] = [
        Self::MissingId,
        Self::MissingParams,
        Self::MissingJsonrpc,
        Self::WrongContentType,
        Self::MissingMethod,
    ];

    /// Stable kebab-case name used in case names and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingId => "missing-id",
            Self::MissingParams => "missing-params",
            Self::MissingJsonrpc => "missing-jsonrpc",
            Self::WrongContentType => "wrong-content-type",
            Self::MissingMethod => "missing-method",
        }
    }

    /// Derives the mutated case from `base`.
    ///
    /// `base` is normally a canonical case; its id is kept so the variant can
    /// be correlated with the case it came from.
    #[must_use]
    pub fn apply(self, base: &TestCase) -> TestCase {
        let mut case = base.clone();
        case.name = format!("{}/{}", base.fixture, self.name());
        case.mutation = Some(self);

        match self {
            Self::MissingId => {
                case.request.id = None;
                case.expected_status = 200;
                case.expected = ExpectedOutcome::EmptyBody;
            }
            Self::MissingParams => {
                case.request.params = None;
            }
            Self::MissingJsonrpc => {
                case.request.jsonrpc = None;
            }
            Self::WrongContentType => {
                case.content_type = WRONG_CONTENT_TYPE.to_string();
                case.expected_status = 200;
                case.expected = ExpectedOutcome::PlainTextBody {
                    text: INVALID_CONTENT_TYPE_BODY.to_string(),
                };
            }
            Self::MissingMethod => {
                case.request.method = None;
                case.expected_status = 400;
                case.expected = ExpectedOutcome::ErrorEnvelope {
                    id: case.request.id,
                    code: error_codes::INVALID_REQUEST,
                    message: INVALID_REQUEST_MESSAGE.to_string(),
                };
            }
        }

        case
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
