//! `list`: show the cases a fixture file expands to.

use serde::Serialize;

use crate::case::{CaseSynthesizer, TestCase};
use crate::cli::args::{ListArgs, OutputFormat, selected_mutations};
use crate::config::FixtureLoader;
use crate::error::CertifyError;
use crate::jsonrpc::RequestEnvelope;

/// One row of the case listing.
#[derive(Debug, Serialize)]
struct CaseRow<'a> {
    name: &'a str,
    id: i64,
    strategy: &'static str,
    content_type: &'a str,
    expected_status: u16,
    request: &'a RequestEnvelope,
}

impl<'a> From<&'a TestCase> for CaseRow<'a> {
    fn from(case: &'a TestCase) -> Self {
        Self {
            name: &case.name,
            id: case.id,
            strategy: case.strategy_label(),
            content_type: &case.content_type,
            expected_status: case.expected_status,
            request: &case.request,
        }
    }
}

/// Print the synthesized cases without sending anything.
///
/// # Errors
///
/// Returns a fixture error if the file cannot be loaded.
pub fn run(args: &ListArgs) -> Result<(), CertifyError> {
    let fixtures = FixtureLoader::default().load(&args.fixtures)?;
    let mutations = selected_mutations(&args.strategies, args.canonical_only);
    let cases = CaseSynthesizer::new()
        .with_mutations(&mutations)
        .synthesize(&fixtures);

    match args.format {
        OutputFormat::Human => {
            for case in &cases {
                println!(
                    "{:>4}  {:<20} {}  {}",
                    case.id,
                    case.strategy_label(),
                    case.expected_status,
                    case.name
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<CaseRow<'_>> = cases.iter().map(CaseRow::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
