//! Recording adapters that capture interactions to cassettes.

pub mod git;
pub mod id_gen;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Record an interaction with a simple (non-Result) return value.
///
/// Mirror of the replaying adapters - records input/output instead of reading.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let values = (serde_json::to_value(input), serde_json::to_value(output));
    let (input_json, output_json) = match values {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            warn!(port, method, error = %e, "interaction not recorded");
            return;
        }
    };
    push(recorder, port, method, input_json, output_json);
}

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Convention:
/// - `Ok(v)` is serialized as `{"ok": v}`
/// - `Err(e)` is serialized as `{"err": e}`, keeping the error's structure
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::to_value(v).map(|inner| serde_json::json!({ "ok": inner })),
        Err(e) => serde_json::to_value(e).map(|inner| serde_json::json!({ "err": inner })),
    };
    match (serde_json::to_value(input), output) {
        (Ok(input_json), Ok(output_json)) => push(recorder, port, method, input_json, output_json),
        (Err(e), _) | (_, Err(e)) => warn!(port, method, error = %e, "interaction not recorded"),
    }
}

fn push(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(_) => warn!(port, method, "recorder lock poisoned; interaction not recorded"),
    }
}
