//! Error types for `rpc-certify`
//!
//! Three families of failure: a fixture that cannot be turned into cases, a
//! server that cannot be reached, and a server that answered wrongly. Only
//! the last one is a conformance signal.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `rpc-certify` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Every case passed
    pub const SUCCESS: i32 = 0;

    /// At least one case failed its assertions
    pub const CONFORMANCE_FAILURE: i32 = 1;

    /// Fixture error (invalid YAML, missing field)
    pub const FIXTURE_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Transport error (server unreachable, timeout)
    pub const TRANSPORT_ERROR: i32 = 4;

    /// Usage error (invalid arguments, unknown fixture name)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `rpc-certify` operations.
#[derive(Debug, Error)]
pub enum CertifyError {
    /// Fixture loading or validation error
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Transport error outside of a single case (e.g. client construction)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The run completed but not every case passed
    #[error("{failed} case(s) failed, {errored} case(s) could not reach the server")]
    Conformance {
        /// Cases whose response did not match the expected outcome
        failed: usize,
        /// Cases that ended in a transport error
        errored: usize,
    },

    /// Invalid command-line usage detected after parsing
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CertifyError {
    /// Returns the appropriate exit code for this error.
    ///
    /// A run with any unreachable case exits with the transport code even
    /// when other cases failed, since the failures may be a side effect of
    /// the server going away.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Fixture(_) | Self::Json(_) => ExitCode::FIXTURE_ERROR,
            Self::Transport(_) => ExitCode::TRANSPORT_ERROR,
            Self::Conformance { errored, .. } if *errored > 0 => ExitCode::TRANSPORT_ERROR,
            Self::Conformance { .. } => ExitCode::CONFORMANCE_FAILURE,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Fixture Errors
// ============================================================================

/// Fixture loading and validation errors.
///
/// All of these are raised before any request is sent.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the fixture file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Fixture file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Fixture file contains no entries
    #[error("fixture file {path} contains no entries")]
    Empty {
        /// Path to the fixture file
        path: PathBuf,
    },

    /// Fixture file exceeds the configured size limit
    #[error("fixture file {path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the fixture file
        path: PathBuf,
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Two entries resolve to the same scenario name (e.g. keys `1` and `"1"`)
    #[error("duplicate scenario '{fixture}' in {path}")]
    DuplicateScenario {
        /// Path to the fixture file
        path: PathBuf,
        /// Scenario name that appears twice
        fixture: String,
    },

    /// Required field is missing from a fixture entry
    #[error("missing required field '{field}' in fixture '{fixture}'")]
    MissingField {
        /// Fixture (scenario) name
        fixture: String,
        /// Dotted path of the missing field (e.g. "request.params")
        field: String,
    },

    /// Field is present but has the wrong shape
    #[error("invalid value for '{field}' in fixture '{fixture}': expected {expected}")]
    InvalidValue {
        /// Fixture (scenario) name
        fixture: String,
        /// Dotted path of the offending field
        field: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Failures to complete a single HTTP exchange.
///
/// These mean the server-under-test could not be talked to, which is an
/// infrastructure problem rather than non-conformance.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransportError {
    /// Failed to establish a connection (refused, DNS)
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The exchange did not finish in time
    #[error("timeout: {0}")]
    Timeout(String),

    /// The request could not be built or encoded
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other client-side failure
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Client(err.to_string())
        }
    }
}

// ============================================================================
// Assertion Errors
// ============================================================================

/// A response that did not match the expected outcome of its case.
///
/// Carries the raw response body so "server sent nothing" can be told apart
/// from "server sent the wrong JSON".
#[derive(Debug, Clone, Error, Serialize)]
#[error("{case}: {mismatch}")]
pub struct AssertionError {
    /// Name of the failing case (e.g. "eth_chainId/missing-method")
    pub case: String,
    /// What differed
    pub mismatch: Mismatch,
    /// Raw response body, lossily decoded as UTF-8
    pub raw_body: String,
    /// `Content-Type` of the response, if the server sent one
    pub content_type: Option<String>,
}

/// The specific difference found by the response validator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// HTTP status differed
    #[error("expected status {expected}, got {actual}")]
    Status {
        /// Required status code
        expected: u16,
        /// Status code returned by the server
        actual: u16,
    },

    /// Body was expected to be JSON but did not parse
    #[error("response body is not valid JSON: {message}")]
    InvalidJson {
        /// Parser error message
        message: String,
    },

    /// Value at `path` was expected to be an object
    #[error("expected a JSON object at {path}, got {actual}")]
    NotObject {
        /// Field path (`$` for the root)
        path: String,
        /// The value actually found
        actual: Value,
    },

    /// Value at `path` differs (or is missing, when `actual` is `None`)
    #[error("field {path}: expected {expected}, got {}", display_actual(.actual.as_ref()))]
    Field {
        /// Field path (e.g. `error.code`)
        path: String,
        /// Required value
        expected: Value,
        /// Value found, `None` if the key was absent
        actual: Option<Value>,
    },

    /// Object at `path` has a different number of keys
    #[error("object at {path} has {actual} key(s), expected {expected}")]
    KeyCount {
        /// Field path (`$` for the root)
        path: String,
        /// Required key count
        expected: usize,
        /// Key count found
        actual: usize,
    },

    /// Literal body differs
    #[error("expected body {expected:?}, got {actual:?}")]
    Body {
        /// Required body text
        expected: String,
        /// Body text returned by the server
        actual: String,
    },
}

fn display_actual(actual: Option<&Value>) -> String {
    actual.map_or_else(|| "<missing>".to_string(), ToString::to_string)
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `rpc-certify` operations.
pub type Result<T> = std::result::Result<T, CertifyError>;

// ============================================================================
// Tests
// ============================================================================
