//! Run report rendering.

use std::io::{self, Write};

use crate::runner::{RunReport, Verdict};

/// Writes one line per case, failure diagnostics, and a summary.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_human(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
    for case in &report.cases {
        writeln!(
            out,
            "{:<5} {} (id {}, {} ms)",
            case.verdict.label(),
            case.name,
            case.id,
            case.duration_ms
        )?;

        match &case.verdict {
            Verdict::Pass => {}
            Verdict::Fail { error } => {
                writeln!(out, "      {}", error.mismatch)?;
                writeln!(out, "      raw body: {:?}", error.raw_body)?;
                if let Some(content_type) = &error.content_type {
                    writeln!(out, "      content type: {content_type}")?;
                }
            }
            Verdict::Error { error } => {
                writeln!(out, "      {error}")?;
            }
        }
    }

    writeln!(
        out,
        "\n{} passed, {} failed, {} errored ({} total) against {}",
        report.passed,
        report.failed,
        report.errored,
        report.total(),
        report.endpoint
    )
}

/// Writes the report as a single pretty-printed JSON document.
///
/// # Errors
///
/// Returns an I/O error if writing or serialization fails.
pub fn write_json(report: &RunReport, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
