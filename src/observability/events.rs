//! Structured event stream for conformance runs.
//!
//! Discrete, typed events emitted while a run progresses. Events are
//! serialized as newline-delimited JSON (JSONL) and carry a monotonically
//! increasing sequence number so consumers can restore order.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Mismatch, TransportError};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a run.
///
/// Each variant is tagged with `"type"` when serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A run has started.
    RunStarted {
        /// When the run started.
        timestamp: DateTime<Utc>,
        /// Unique run id.
        run_id: String,
        /// URL of the server-under-test.
        endpoint: String,
        /// Number of cases about to run.
        cases: usize,
    },

    /// A case passed.
    CasePassed {
        /// When the verdict was reached.
        timestamp: DateTime<Utc>,
        /// Case name.
        case: String,
        /// Request id.
        id: i64,
        /// Exchange time in milliseconds.
        duration_ms: u64,
    },

    /// A case got a non-conformant response.
    CaseFailed {
        /// When the verdict was reached.
        timestamp: DateTime<Utc>,
        /// Case name.
        case: String,
        /// Request id.
        id: i64,
        /// What differed.
        mismatch: Mismatch,
        /// Raw response body.
        raw_body: String,
        /// Response `Content-Type`, if any.
        content_type: Option<String>,
    },

    /// A case could not complete its exchange.
    CaseErrored {
        /// When the error surfaced.
        timestamp: DateTime<Utc>,
        /// Case name.
        case: String,
        /// Request id.
        id: i64,
        /// Transport failure.
        error: TransportError,
    },

    /// A run has finished.
    RunFinished {
        /// When the run finished.
        timestamp: DateTime<Utc>,
        /// Unique run id.
        run_id: String,
        /// Passing cases.
        passed: usize,
        /// Failing cases.
        failed: usize,
        /// Cases with transport errors.
        errored: usize,
        /// Total run time in milliseconds.
        duration_ms: u64,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as one JSON line, and flushes. Serialization and
/// I/O failures are dropped; an event sink must never fail a run.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
