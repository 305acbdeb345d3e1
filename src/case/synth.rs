//! Canonical case synthesis.
//!
//! Ids are handed out here, once, in fixture order. Nothing downstream
//! touches the counter, so cases can be executed in any order or in parallel.

use super::{ExpectedOutcome, JSON_CONTENT_TYPE, Mutation, TestCase};
use crate::config::{Fixture, FixtureSet};
use crate::jsonrpc::RequestEnvelope;

/// First id assigned in a run. Ids 0 and 1 are left free for other traffic.
pub const ID_BASE: i64 = 10;

/// Turns fixtures into canonical cases and their malformed variants.
#[derive(Debug, Clone)]
pub struct CaseSynthesizer {
    next_id: i64,
    mutations: Vec<Mutation>,
}

impl Default for CaseSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseSynthesizer {
    /// Starts at [`ID_BASE`] with every mutation strategy enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: ID_BASE,
            mutations: Mutation::ALL.to_vec(),
        }
    }

    /// Restricts the generated variants to `mutations`.
    ///
    /// Strategies are always emitted in [`Mutation::ALL`] order and each at
    /// most once, whatever order they are given in.
    #[must_use]
    pub fn with_mutations(mut self, mutations: &[Mutation]) -> Self {
        self.mutations = Mutation::ALL
            .into_iter()
            .filter(|m| mutations.contains(m))
            .collect();
        self
    }


    /// Builds the canonical case for one fixture, consuming one id.
    pub fn canonical(&mut self, fixture: &Fixture) -> TestCase {
        let id = self.next_id;
        self.next_id += 1;

        TestCase {
            name: fixture.name.clone(),
            fixture: fixture.name.clone(),
            id,
            mutation: None,
            request: RequestEnvelope::canonical(id, fixture.method.clone(), fixture.params.clone()),
            content_type: JSON_CONTENT_TYPE.to_string(),
            expected_status: 200,
            expected: ExpectedOutcome::SuccessEnvelope {
                id,
                result: fixture.result.clone(),
            },
        }
    }

    /// Builds the canonical case and every enabled variant for one fixture.
    pub fn expand(&mut self, fixture: &Fixture) -> Vec<TestCase> {
        let canonical = self.canonical(fixture);
        let mut cases = Vec::with_capacity(1 + self.mutations.len());
        cases.extend(self.mutations.iter().map(|m| m.apply(&canonical)));
        cases.insert(0, canonical);
        cases
    }

    /// Builds all cases for a fixture set, grouped by fixture in document order.
    pub fn synthesize(&mut self, fixtures: &FixtureSet) -> Vec<TestCase> {
        let cases: Vec<TestCase> = fixtures.iter().flat_map(|f| self.expand(f)).collect();
        tracing::debug!(
            fixtures = fixtures.len(),
            cases = cases.len(),
            "synthesized test cases"
        );
        cases
    }
}
