//! In-memory fixture and harness configuration types.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Environment variable naming the host of the server-under-test.
pub const ENDPOINT_ENV: &str = "SERVER_ENDPOINT";

/// Host used when no endpoint is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Fixed JSON-RPC port of the server-under-test.
pub const SERVER_PORT: u16 = 8545;

// ============================================================================
// Fixtures
// ============================================================================

/// One named method invocation and the result a conformant server returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    /// Scenario name (the key in the fixture document).
    pub name: String,
    /// JSON-RPC method to call.
    pub method: String,
    /// Positional parameters.
    pub params: Vec<Value>,
    /// Expected `result` member of the success envelope.
    pub result: Value,
}

/// Ordered set of fixtures, keyed by scenario name.
///
/// Iteration follows document order, which drives id assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSet {
    entries: IndexMap<String, Fixture>,
}

impl FixtureSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fixture, replacing any earlier entry of the same name in place.
    pub fn insert(&mut self, fixture: Fixture) {
        self.entries.insert(fixture.name.clone(), fixture);
    }

    /// Looks up a fixture by scenario name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Fixture> {
        self.entries.get(name)
    }

    /// Number of fixtures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no fixtures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates fixtures in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.entries.values()
    }

    /// Scenario names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keeps only the named fixtures, preserving document order.
    #[must_use]
    pub fn select(&self, names: &[String]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(name, _)| names.iter().any(|n| n == *name))
                .map(|(name, fixture)| (name.clone(), fixture.clone()))
                .collect(),
        }
    }

    /// Suggests the closest scenario name for typo correction.
    ///
    /// Returns a match only if its Damerau-Levenshtein distance is at most 3.
    #[must_use]
    pub fn suggest(&self, input: &str) -> Option<&str> {
        self.names()
            .map(|name| (name, strsim::damerau_levenshtein(input, name)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name)
    }
}

impl FromIterator<Fixture> for FixtureSet {
    fn from_iter<I: IntoIterator<Item = Fixture>>(iter: I) -> Self {
        let mut set = Self::new();
        for fixture in iter {
            set.insert(fixture);
        }
        set
    }
}

// ============================================================================
// Harness Configuration
// ============================================================================

/// Where and how to send requests.
///
/// Resolved once at startup and passed by value into the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// URL every request is POSTed to.
    pub base_url: String,
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// Maximum number of exchanges in flight at once.
    pub jobs: usize,
}

impl HarnessConfig {
    /// Targets `http://<host>:8545/`.
    #[must_use]
    pub fn for_host(host: &str) -> Self {
        let host = host.trim();
        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        // Bare IPv6 literals need brackets in a URL authority.
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        Self::with_base_url(format!("http://{authority}:{SERVER_PORT}/"))
    }

    /// Targets an explicit URL, e.g. a test server on an ephemeral port.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            jobs: 1,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the concurrency limit (at least 1).
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST)
    }
}
