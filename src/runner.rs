//! Case runner.
//!
//! Drives every case through one exchange and one validation and records a
//! verdict. A failing or unreachable case never stops the others.

use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::case::TestCase;
use crate::config::HarnessConfig;
use crate::error::{AssertionError, CertifyError, TransportError};
use crate::exchange::{Exchanger, HttpExchanger};
use crate::observability::{Event, EventEmitter};
use crate::validate::validate;

/// Outcome of a single case.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The response matched.
    Pass,
    /// The server answered, but not as required.
    Fail {
        /// What differed.
        error: AssertionError,
    },
    /// No complete response was received.
    Error {
        /// Why the exchange failed.
        error: TransportError,
    },
}

impl Verdict {
    /// Short uppercase label for human output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail { .. } => "FAIL",
            Self::Error { .. } => "ERROR",
        }
    }
}

/// Verdict for one case, with enough context to report it.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Fixture the case came from.
    pub fixture: String,
    /// Request id of the canonical case.
    pub id: i64,
    /// Strategy label (`canonical` or a mutation name).
    pub strategy: &'static str,
    /// Verdict and its diagnostics.
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Wall time spent on the exchange.
    pub duration_ms: u64,
}

/// Verdicts for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: String,
    /// Where requests were sent.
    pub endpoint: String,
    /// Number of passing cases.
    pub passed: usize,
    /// Number of failing cases.
    pub failed: usize,
    /// Number of cases that hit a transport error.
    pub errored: usize,
    /// One entry per case, in synthesis order.
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    fn new(run_id: String, endpoint: String, cases: Vec<CaseReport>) -> Self {
        let mut report = Self {
            run_id,
            endpoint,
            passed: 0,
            failed: 0,
            errored: 0,
            cases,
        };
        for case in &report.cases {
            match case.verdict {
                Verdict::Pass => report.passed += 1,
                Verdict::Fail { .. } => report.failed += 1,
                Verdict::Error { .. } => report.errored += 1,
            }
        }
        report
    }

    /// Total number of cases.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if every case passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Maps a run with any non-passing case to [`CertifyError::Conformance`].
    ///
    /// # Errors
    ///
    /// Returns [`CertifyError::Conformance`] unless every case passed.
    pub fn ensure_success(&self) -> Result<(), CertifyError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(CertifyError::Conformance {
                failed: self.failed,
                errored: self.errored,
            })
        }
    }
}

/// Runs cases against one server.
pub struct Harness {
    exchanger: Arc<dyn Exchanger>,
    endpoint: String,
    jobs: usize,
    events: Arc<EventEmitter>,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("endpoint", &self.endpoint)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl Harness {
    /// Creates a sequential harness over any exchanger.
    #[must_use]
    pub fn new(exchanger: Arc<dyn Exchanger>, endpoint: impl Into<String>) -> Self {
        Self {
            exchanger,
            endpoint: endpoint.into(),
            jobs: 1,
            events: Arc::new(EventEmitter::noop()),
        }
    }

    /// Creates a harness POSTing over HTTP as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, TransportError> {
        let exchanger = HttpExchanger::new(config.base_url.clone(), config.timeout)?;
        let endpoint = exchanger.url().to_string();
        Ok(Self::new(Arc::new(exchanger), endpoint).jobs(config.jobs))
    }

    /// Sets how many exchanges may be in flight at once (at least 1).
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Sends structured events to `events`.
    #[must_use]
    pub fn events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// Runs a single case.
    pub async fn run_case(&self, case: &TestCase) -> CaseReport {
        let started = Instant::now();
        let outcome = self
            .exchanger
            .exchange(&case.request, &case.content_type)
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let verdict = match outcome {
            Ok(exchange) => match validate(case, &exchange) {
                Ok(()) => {
                    info!(case = %case.name, id = case.id, status = exchange.status, "pass");
                    Verdict::Pass
                }
                Err(error) => {
                    warn!(case = %case.name, id = case.id, mismatch = %error.mismatch, "fail");
                    Verdict::Fail { error }
                }
            },
            Err(error) => {
                error!(case = %case.name, id = case.id, %error, "transport error");
                Verdict::Error { error }
            }
        };

        self.events.emit(case_event(case, &verdict, duration_ms));

        CaseReport {
            name: case.name.clone(),
            fixture: case.fixture.clone(),
            id: case.id,
            strategy: case.strategy_label(),
            verdict,
            duration_ms,
        }
    }

    /// Runs every case and collects the verdicts in input order.
    pub async fn run(&self, cases: &[TestCase]) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        info!(
            run_id = %run_id,
            endpoint = %self.endpoint,
            cases = cases.len(),
            jobs = self.jobs,
            "starting conformance run"
        );
        self.events.emit(Event::RunStarted {
            timestamp: Utc::now(),
            run_id: run_id.clone(),
            endpoint: self.endpoint.clone(),
            cases: cases.len(),
        });

        let reports: Vec<CaseReport> = stream::iter(cases)
            .map(|case| self.run_case(case))
            .buffered(self.jobs)
            .collect()
            .await;

        let report = RunReport::new(run_id, self.endpoint.clone(), reports);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            passed = report.passed,
            failed = report.failed,
            errored = report.errored,
            duration_ms,
            "conformance run finished"
        );
        self.events.emit(Event::RunFinished {
            timestamp: Utc::now(),
            run_id: report.run_id.clone(),
            passed: report.passed,
            failed: report.failed,
            errored: report.errored,
            duration_ms,
        });

        report
    }
}

fn case_event(case: &TestCase, verdict: &Verdict, duration_ms: u64) -> Event {
    let timestamp = Utc::now();
    let name = case.name.clone();
    match verdict {
        Verdict::Pass => Event::CasePassed {
            timestamp,
            case: name,
            id: case.id,
            duration_ms,
        },
        Verdict::Fail { error } => Event::CaseFailed {
            timestamp,
            case: name,
            id: case.id,
            mismatch: error.mismatch.clone(),
            raw_body: error.raw_body.clone(),
            content_type: error.content_type.clone(),
        },
        Verdict::Error { error } => Event::CaseErrored {
            timestamp,
            case: name,
            id: case.id,
            error: error.clone(),
        },
    }
}
