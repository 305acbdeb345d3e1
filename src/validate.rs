//! Response validation.
//!
//! Status is checked first and on its own. The body is then compared either
//! structurally (JSON envelopes: every expected key deep-equal, and the same
//! number of keys at every object level) or literally (exact text).

use serde_json::{Map, Value};

use crate::case::TestCase;
use crate::error::{AssertionError, Mismatch};
use crate::exchange::Exchange;

/// Root path used in mismatch reports.
const ROOT: &str = "$";

/// Checks one exchange against the outcome its case requires.
///
/// # Errors
///
/// Returns an [`AssertionError`] describing the first mismatch found.
pub fn validate(case: &TestCase, exchange: &Exchange) -> Result<(), AssertionError> {
    check(case, exchange).map_err(|mismatch| AssertionError {
        case: case.name.clone(),
        mismatch,
        raw_body: exchange.body_text(),
        content_type: exchange.content_type.clone(),
    })
}

fn check(case: &TestCase, exchange: &Exchange) -> Result<(), Mismatch> {
    if exchange.status != case.expected_status {
        return Err(Mismatch::Status {
            expected: case.expected_status,
            actual: exchange.status,
        });
    }

    if let Some(expected) = case.expected.literal() {
        return compare_literal(expected, &exchange.body_text());
    }

    match case.expected.envelope() {
        Some(expected) => compare_structural(&expected, &exchange.body),
        None => Ok(()),
    }
}

/// Compares a raw body against an exact string.
///
/// # Errors
///
/// Returns [`Mismatch::Body`] if the texts differ.
pub fn compare_literal(expected: &str, actual: &str) -> Result<(), Mismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(Mismatch::Body {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Parses `body` as a JSON object and compares it against `expected`.
///
/// # Errors
///
/// Returns the first [`Mismatch`] found, or [`Mismatch::InvalidJson`] if the
/// body does not parse.
pub fn compare_structural(expected: &Value, body: &[u8]) -> Result<(), Mismatch> {
    let actual: Value = serde_json::from_slice(body).map_err(|e| Mismatch::InvalidJson {
        message: e.to_string(),
    })?;

    if !actual.is_object() {
        return Err(Mismatch::NotObject {
            path: ROOT.to_string(),
            actual,
        });
    }

    diff(ROOT, expected, &actual).map_or(Ok(()), Err)
}

/// Returns the first difference between `expected` and `actual`, if any.
///
/// Objects are walked key by key in expected order and then checked for an
/// equal key count, so both wrong values and extra keys are caught. Arrays of
/// equal length are walked element by element; anything else must be equal.
#[must_use]
pub fn diff(path: &str, expected: &Value, actual: &Value) -> Option<Mismatch> {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => diff_objects(path, exp, act),
        (Value::Object(_), other) => Some(Mismatch::NotObject {
            path: path.to_string(),
            actual: other.clone(),
        }),
        (Value::Array(exp), Value::Array(act)) if exp.len() == act.len() => exp
            .iter()
            .zip(act)
            .enumerate()
            .find_map(|(i, (e, a))| diff(&format!("{path}[{i}]"), e, a)),
        _ if expected == actual => None,
        _ => Some(Mismatch::Field {
            path: path.to_string(),
            expected: expected.clone(),
            actual: Some(actual.clone()),
        }),
    }
}

fn diff_objects(
    path: &str,
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
) -> Option<Mismatch> {
    for (key, exp) in expected {
        let child = child_path(path, key);
        match actual.get(key) {
            Some(act) => {
                if let Some(mismatch) = diff(&child, exp, act) {
                    return Some(mismatch);
                }
            }
            None => {
                return Some(Mismatch::Field {
                    path: child,
                    expected: exp.clone(),
                    actual: None,
                });
            }
        }
    }

    (expected.len() != actual.len()).then(|| Mismatch::KeyCount {
        path: path.to_string(),
        expected: expected.len(),
        actual: actual.len(),
    })
}

fn child_path(parent: &str, key: &str) -> String {
    if parent == ROOT {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
