//! `run`: execute the conformance matrix against a live server.

use std::sync::Arc;
use std::time::Duration;

use crate::case::CaseSynthesizer;
use crate::cli::args::{OutputFormat, RunArgs, selected_mutations};
use crate::config::{FixtureLoader, FixtureSet, HarnessConfig};
use crate::error::CertifyError;
use crate::observability::EventEmitter;
use crate::report;
use crate::runner::Harness;

/// Load fixtures, synthesize cases, run them, and print the report.
///
/// The report is printed even when cases fail; `quiet` suppresses it for
/// human output only.
///
/// # Errors
///
/// Returns a fixture or usage error before any request is sent, and
/// [`CertifyError::Conformance`] if any case did not pass.
pub async fn run(args: &RunArgs, quiet: bool) -> Result<(), CertifyError> {
    let fixtures = FixtureLoader::default().load(&args.fixtures)?;
    let fixtures = filter_fixtures(&fixtures, &args.only)?;

    let mutations = selected_mutations(&args.strategies, args.canonical_only);
    let cases = CaseSynthesizer::new()
        .with_mutations(&mutations)
        .synthesize(&fixtures);

    let config = HarnessConfig::for_host(&args.endpoint)
        .timeout(args.timeout.map(Duration::from_secs))
        .jobs(args.jobs);

    let mut harness = Harness::from_config(&config)?;
    let mut emitter = None;
    if let Some(path) = &args.events_file {
        let events = Arc::new(EventEmitter::from_file(path)?);
        harness = harness.events(Arc::clone(&events));
        emitter = Some((path, events));
    }

    let report = harness.run(&cases).await;

    if let Some((path, events)) = emitter {
        tracing::info!(
            file = %path.display(),
            events = events.event_count(),
            "event stream written"
        );
    }

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Human if quiet => {}
        OutputFormat::Human => report::write_human(&report, &mut stdout)?,
        OutputFormat::Json => report::write_json(&report, &mut stdout)?,
    }

    report.ensure_success()
}

/// Narrows `fixtures` to the names given with `--only`.
///
/// # Errors
///
/// Returns [`CertifyError::Usage`] naming the first unknown fixture, with a
/// suggestion when a close match exists.
pub fn filter_fixtures(fixtures: &FixtureSet, only: &[String]) -> Result<FixtureSet, CertifyError> {
    if only.is_empty() {
        return Ok(fixtures.clone());
    }

    if let Some(unknown) = only.iter().find(|name| fixtures.get(name).is_none()) {
        let hint = fixtures
            .suggest(unknown)
            .map(|s| format!(" (did you mean '{s}'?)"))
            .unwrap_or_default();
        return Err(CertifyError::Usage(format!("no fixture named '{unknown}'{hint}")));
    }

    Ok(fixtures.select(only))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fixture;
    use serde_json::json;

    fn set() -> FixtureSet {
        ["eth_chainId", "net_version"]
            .into_iter()
            .map(|name| Fixture {
                name: name.to_string(),
                method: name.to_string(),
                params: vec![],
                result: json!(null),
            })
            .collect()
    }

    #[test]
    fn no_filter_keeps_all() {
        assert_eq!(filter_fixtures(&set(), &[]).unwrap().len(), 2);
    }

    #[test]
    fn filter_selects_named() {
        let picked = filter_fixtures(&set(), &["net_version".to_string()]).unwrap();
        assert_eq!(picked.names().collect::<Vec<_>>(), vec!["net_version"]);
    }

    #[test]
    fn unknown_name_suggests() {
        let err = filter_fixtures(&set(), &["net_versoin".to_string()]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no fixture named 'net_versoin'"), "{msg}");
        assert!(msg.contains("did you mean 'net_version'"), "{msg}");
        assert_eq!(err.exit_code(), crate::error::ExitCode::USAGE_ERROR);
    }
}
