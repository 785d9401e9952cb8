//! Automatic capture of submitted form data into the session data
//! bag, so prototype pages can read back anything any form ever
//! submitted without per-page wiring.

use serde_json::{Map, Value};

/// Value an unchecked checkbox group reports via its hidden companion
/// input. The literal is what's on the wire; nothing outside this
/// module compares against it directly.
pub const UNCHECKED: &str = "_unchecked";

/// Keys starting with this prefix carry request metadata (the hidden
/// inputs, framework query markers) and are never captured.
pub const RESERVED_PREFIX: char = '_';

fn is_unchecked(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == UNCHECKED)
}

/// Apply the unchecked convention to one submitted value. `None`
/// means the key is to be removed from the bag rather than stored.
fn filtered(value: &Value) -> Option<Value> {
    if is_unchecked(value) {
        return None
    }
    if let Value::Array(items) = value {
        if items.iter().any(is_unchecked) {
            let kept: Vec<Value> =
                items.iter().filter(|v| ! is_unchecked(v)).cloned().collect();
            if kept.is_empty() {
                return None
            }
            return Some(Value::Array(kept))
        }
    }
    Some(value.clone())
}

/// Write one input mapping into `data`. Values are stored verbatim
/// (nested mappings included); no shape validation happens here.
fn store_data(input: &Map<String, Value>, data: &mut Map<String, Value>) {
    for (key, value) in input {
        if key.starts_with(RESERVED_PREFIX) {
            continue
        }
        match filtered(value) {
            Some(v) => {
                data.insert(key.clone(), v);
            }
            None => {
                data.remove(key);
            }
        }
    }
}

/// The session-autosave merge.
///
/// Starts from the session's current bag, backfills defaults for keys
/// the bag doesn't have yet (defaults never overwrite), then applies
/// the request payload with the unchecked filtering. The result is
/// what gets persisted back into the session and exposed to the view
/// as `data`. The payload is not modified.
pub fn auto_store_data(
    payload: &Map<String, Value>,
    session_data: &Map<String, Value>,
    defaults: &Map<String, Value>,
) -> Map<String, Value> {
    let mut data = session_data.clone();
    for (key, value) in defaults {
        if ! data.contains_key(key) {
            data.insert(key.clone(), value.clone());
        }
    }
    store_data(payload, &mut data);
    data
}
