//! `validate`: load fixture files without contacting a server.

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::FixtureLoader;
use crate::error::CertifyError;

/// Load each file and report how many fixtures it holds.
///
/// # Errors
///
/// Returns the first [`FixtureError`](crate::error::FixtureError) found.
pub fn run(args: &ValidateArgs, quiet: bool) -> Result<(), CertifyError> {
    let loader = FixtureLoader::default();
    let mut summaries = Vec::with_capacity(args.files.len());

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating fixtures");
        let set = loader.load(path)?;
        tracing::info!(file = %path.display(), fixtures = set.len(), "fixtures valid");
        summaries.push((path, set.len()));
    }

    match args.format {
        OutputFormat::Human if quiet => {}
        OutputFormat::Human => {
            for (path, count) in &summaries {
                println!("{}: {count} fixture(s) ok", path.display());
            }
        }
        OutputFormat::Json => {
            let files: Vec<_> = summaries
                .iter()
                .map(|(path, count)| json!({"file": path.display().to_string(), "fixtures": count}))
                .collect();
            println!("{}", json!({ "valid": true, "files": files }));
        }
    }

    Ok(())
}
