//! Decoding of query strings and `application/x-www-form-urlencoded`
//! request bodies into the nested mapping shape the session layer
//! works with.

//! Bracket notation nests (`person[name]=x` gives
//! `{"person":{"name":"x"}}`), an empty trailing bracket pushes onto
//! a sequence (`colour[]=red&colour[]=blue`), and a plain key
//! repeated also accumulates into a sequence. Everything arrives as
//! strings; no further typing is attempted.

use serde_json::{Map, Value};

use crate::url_encoding::{form_decode, UrlDecodingError};

/// Split into decoded key/value pairs, in submission order.
pub fn parse_pairs(s: &str) -> Result<Vec<(String, String)>, UrlDecodingError> {
    let mut v = Vec::new();
    for partraw in s.split('&') {
        if ! partraw.is_empty() {
            if let Some((key, val)) = partraw.split_once('=') {
                v.push((form_decode(key)?,
                        form_decode(val)?));
            } else {
                // value-less entry, treat as empty string
                v.push((form_decode(partraw)?,
                        String::new()));
            }
        }
    }
    Ok(v)
}

/// `a[b][c]` to `["a", "b", "c"]`. `None` if the key doesn't use
/// (well-formed) bracket syntax; such keys are taken literally.
fn key_path(key: &str) -> Option<Vec<&str>> {
    let open = key.find('[')?;
    if open == 0 || ! key.ends_with(']') {
        return None
    }
    let mut path = vec![&key[..open]];
    let mut rest = &key[open..];
    while ! rest.is_empty() {
        if ! rest.starts_with('[') {
            return None
        }
        let close = rest.find(']')?;
        path.push(&rest[1..close]);
        rest = &rest[close + 1..];
    }
    Some(path)
}

fn insert_leaf(map: &mut Map<String, Value>, key: &str, val: Value) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), val);
        }
        Some(Value::Array(items)) => {
            items.push(val);
        }
        Some(slot) => {
            let prev = slot.take();
            *slot = Value::Array(vec![prev, val]);
        }
    }
}

fn insert_path(map: &mut Map<String, Value>, path: &[&str], val: Value) {
    let (first, rest) = path.split_first().expect("path is never empty");
    if rest.is_empty() {
        insert_leaf(map, first, val);
    } else if rest == [""] {
        // `a[]=v`
        let slot = map.entry(first.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(val),
            other => {
                let prev = other.take();
                *other = Value::Array(vec![prev, val]);
            }
        }
    } else {
        let slot = map.entry(first.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if ! slot.is_object() {
            // scalar submitted under the same name earlier; the
            // nested entry wins
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(m) => insert_path(m, rest, val),
            _ => unreachable!("just made it an object")
        }
    }
}

/// Decode a whole query string or urlencoded body into a nested
/// mapping.
pub fn parse_form(s: &str) -> Result<Map<String, Value>, UrlDecodingError> {
    let mut map = Map::new();
    for (key, val) in parse_pairs(s)? {
        match key_path(&key) {
            Some(path) => insert_path(&mut map, &path, Value::String(val)),
            None => insert_leaf(&mut map, &key, Value::String(val)),
        }
    }
    Ok(map)
}

/// One payload out of the two request sources. Body fields win over
/// query fields on conflicting keys.
pub fn merge_payload(
    query: &Map<String, Value>,
    body: &Map<String, Value>,
) -> Map<String, Value> {
    let mut payload = query.clone();
    for (key, val) in body {
        payload.insert(key.clone(), val.clone());
    }
    payload
}
