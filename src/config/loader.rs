//! Fixture loader
//!
//! Loading pipeline:
//! 1. Size check and raw read (UTF-8 BOM stripped)
//! 2. YAML parsing into an untyped tree
//! 3. Per-entry extraction of `request.method`, `request.params` and
//!    `response.result`, with field-level errors
//!
//! Extraction works on the untyped tree rather than a derived struct so that
//! an explicit `result: null` stays distinguishable from a missing `result`.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::schema::{Fixture, FixtureSet};
use crate::error::FixtureError;

/// Limits applied while loading fixture files.
#[derive(Debug, Clone)]
pub struct FixtureLimits {
    /// Maximum fixture file size in bytes.
    pub max_file_size: usize,
}

impl Default for FixtureLimits {
    fn default() -> Self {
        Self {
            max_file_size: env_or("RPC_CERTIFY_MAX_FIXTURE_SIZE", 10 * 1024 * 1024),
        }
    }
}

/// Reads fixture documents into [`FixtureSet`]s.
#[derive(Debug, Clone, Default)]
pub struct FixtureLoader {
    limits: FixtureLimits,
}

impl FixtureLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: FixtureLimits) -> Self {
        Self { limits }
    }

    /// Loads and validates a fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file is missing, too large, not
    /// valid YAML, empty, or any entry lacks a required field.
    pub fn load(&self, path: &Path) -> Result<FixtureSet, FixtureError> {
        let metadata = std::fs::metadata(path).map_err(|_| FixtureError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.limits.max_file_size {
            return Err(FixtureError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.limits.max_file_size,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| FixtureError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let set = self.parse_str(&raw, path)?;
        tracing::debug!(file = %path.display(), fixtures = set.len(), "fixtures loaded");
        Ok(set)
    }

    /// Parses fixture YAML that has already been read into memory.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the file-system failures.
    pub fn parse_str(&self, content: &str, path: &Path) -> Result<FixtureSet, FixtureError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.len() > self.limits.max_file_size {
            return Err(FixtureError::TooLarge {
                path: path.to_path_buf(),
                size: content.len(),
                limit: self.limits.max_file_size,
            });
        }

        let root: Value = serde_yaml::from_str(content).map_err(|e| FixtureError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        let entries = match root {
            Value::Null => return Err(empty(path)),
            Value::Mapping(map) => map,
            _ => {
                return Err(FixtureError::ParseError {
                    path: path.to_path_buf(),
                    line: None,
                    message: "top level must be a mapping of scenario name to fixture"
                        .to_string(),
                });
            }
        };

        if entries.is_empty() {
            return Err(empty(path));
        }

        let mut set = FixtureSet::new();
        for (key, value) in &entries {
            let name = scenario_name(key, path)?;
            // `1` and `"1"` are distinct YAML keys but the same scenario name.
            if set.get(&name).is_some() {
                return Err(FixtureError::DuplicateScenario {
                    path: path.to_path_buf(),
                    fixture: name,
                });
            }
            set.insert(extract_fixture(name, value)?);
        }
        Ok(set)
    }
}

fn empty(path: &Path) -> FixtureError {
    FixtureError::Empty {
        path: PathBuf::from(path),
    }
}

fn scenario_name(key: &Value, path: &Path) -> Result<String, FixtureError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(FixtureError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "scenario names must be scalars".to_string(),
        }),
    }
}

/// Pulls `{request: {method, params}, response: {result}}` out of one entry.
fn extract_fixture(name: String, value: &Value) -> Result<Fixture, FixtureError> {
    let entry = as_mapping(&name, value, "<entry>")?;

    let request = required(&name, entry, "request", "request")?;
    let request = as_mapping(&name, request, "request")?;

    let method = match required(&name, request, "method", "request.method")? {
        Value::String(s) => s.clone(),
        _ => return Err(invalid(&name, "request.method", "a string")),
    };

    let params = match required(&name, request, "params", "request.params")? {
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| to_json(&name, &format!("request.params[{i}]"), item))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(invalid(&name, "request.params", "a sequence")),
    };

    let response = required(&name, entry, "response", "response")?;
    let response = as_mapping(&name, response, "response")?;
    let result = to_json(
        &name,
        "response.result",
        required(&name, response, "result", "response.result")?,
    )?;

    Ok(Fixture {
        name,
        method,
        params,
        result,
    })
}

fn required<'a>(
    fixture: &str,
    map: &'a Mapping,
    key: &str,
    field: &str,
) -> Result<&'a Value, FixtureError> {
    map.get(key).ok_or_else(|| FixtureError::MissingField {
        fixture: fixture.to_string(),
        field: field.to_string(),
    })
}

fn as_mapping<'a>(
    fixture: &str,
    value: &'a Value,
    field: &str,
) -> Result<&'a Mapping, FixtureError> {
    value
        .as_mapping()
        .ok_or_else(|| invalid(fixture, field, "a mapping"))
}

fn to_json(fixture: &str, field: &str, value: &Value) -> Result<serde_json::Value, FixtureError> {
    serde_json::to_value(value)
        .map_err(|e| invalid(fixture, field, &format!("a JSON-representable value ({e})")))
}

fn invalid(fixture: &str, field: &str, expected: &str) -> FixtureError {
    FixtureError::InvalidValue {
        fixture: fixture.to_string(),
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
