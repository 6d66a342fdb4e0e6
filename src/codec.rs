//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! The marker codec: rewriting custom values to tagged maps and back.
//!
//! Every format-agnostic round trip of a registered type goes through two
//! reserved map keys. On encode, a registered custom value becomes
//!
//! ```text
//! { "__class_name__": <identity>, "__dumped_obj__": <encoded payload> }
//! ```
//!
//! and on decode a map carrying `__class_name__` is handed back to the
//! matching registration's `from_plain`. Payloads are encoded and decoded
//! recursively, so registered types may nest other registered types. Maps
//! whose identity is not registered (or whose shape is off) pass through
//! untouched, so data written by a build with more registered types still
//! loads.

use crate::error::Result;
use crate::registry::Registry;
use crate::traverse;
use crate::value::Value;

/// Reserved map key naming the registered type of an encoded value.
pub const CLASS_KEY: &str = "__class_name__";

/// Reserved map key carrying the encoded payload of a marked value.
pub const PAYLOAD_KEY: &str = "__dumped_obj__";

/// Builds the tagged-map form for an identity and its encoded payload.
#[must_use]
pub fn marker(identity: &str, payload: Value) -> Value {
    Value::Map(vec![
        (
            Value::Str(CLASS_KEY.to_string()),
            Value::Str(identity.to_string()),
        ),
        (Value::Str(PAYLOAD_KEY.to_string()), payload),
    ])
}

/// Whether a map's entries carry the class marker key.
#[must_use]
pub fn has_marker_key(entries: &[(Value, Value)]) -> bool {
    entries
        .iter()
        .any(|(key, _)| matches!(key, Value::Str(s) if s == CLASS_KEY))
}

/// The identity string carried by a marked map, if the marker value is a
/// string.
#[must_use]
pub fn marker_identity(entries: &[(Value, Value)]) -> Option<&str> {
    entries.iter().find_map(|(key, value)| match (key, value) {
        (Value::Str(k), Value::Str(identity)) if k == CLASS_KEY => Some(identity.as_str()),
        _ => None,
    })
}

/// Replaces one registered custom value with its tagged-map form.
///
/// The payload produced by `to_plain` is itself recursively encoded with the
/// default traversal table. Plain values are returned unchanged; an
/// unregistered custom value is also returned unchanged, leaving the serde
/// boundary to report it.
pub fn encode(registry: &Registry, value: Value) -> Value {
    encode_or_else(registry, value, &|v| v)
}

/// Like [`encode`], but routes unregistered custom values through a
/// caller-supplied fallback instead of passing them along.
pub fn encode_or_else(
    registry: &Registry,
    value: Value,
    default_fn: &dyn Fn(Value) -> Value,
) -> Value {
    let encoded = encode_node(
        registry,
        value,
        &|payload| Ok(encode_tree(registry, payload)),
        default_fn,
    );
    match encoded {
        Ok(encoded) => encoded,
        Err(err) => unreachable!("encoding cannot fail: {err}"),
    }
}

/// Marker construction parameterized over payload encoding, so a traversal
/// with a custom table keeps that table in effect inside payloads.
pub(crate) fn encode_node(
    registry: &Registry,
    value: Value,
    encode_payload: &dyn Fn(Value) -> Result<Value>,
    default_fn: &dyn Fn(Value) -> Value,
) -> Result<Value> {
    let Value::Custom(inner) = value else {
        return Ok(value);
    };
    match registry.class_for(inner.as_ref()) {
        Some(class) => {
            let payload = encode_payload(class.to_plain(inner.as_ref()))?;
            Ok(marker(class.identity(), payload))
        }
        None => Ok(default_fn(Value::Custom(inner))),
    }
}

/// Rebuilds a registered type from its tagged-map form.
///
/// The payload is recursively decoded with the default traversal table
/// before `from_plain` runs, mirroring [`encode`]. Anything that is not a
/// well-formed marker for a *registered* identity is returned unchanged:
/// non-maps, maps without the marker key, maps whose marker value is not a
/// string, maps missing the payload key, and markers naming an unknown
/// identity.
///
/// # Errors
///
/// Whatever the matching registration's `from_plain` reports.
pub fn decode(registry: &Registry, value: Value) -> Result<Value> {
    decode_node(registry, value, &|payload| decode_tree(registry, payload))
}

/// Marker unwrapping parameterized over payload decoding; see
/// [`encode_node`].
pub(crate) fn decode_node(
    registry: &Registry,
    value: Value,
    decode_payload: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Map(entries) = value else {
        return Ok(value);
    };

    let Some(class) =
        marker_identity(&entries).and_then(|identity| registry.class_by_identity(identity))
    else {
        return Ok(Value::Map(entries));
    };

    let mut entries = entries;
    let Some(position) = entries
        .iter()
        .position(|(key, _)| matches!(key, Value::Str(s) if s == PAYLOAD_KEY))
    else {
        return Ok(Value::Map(entries));
    };

    let (_, payload) = entries.swap_remove(position);
    class.from_plain(decode_payload(payload)?)
}

/// Recursively encodes a whole value tree with the default traversal table.
pub fn encode_tree(registry: &Registry, value: Value) -> Value {
    encode_tree_with(registry, value, &traverse::Table::encode_defaults())
}

/// Recursively encodes a whole value tree with an explicit traversal table.
pub fn encode_tree_with(registry: &Registry, value: Value, table: &traverse::Table) -> Value {
    // Encoding itself is infallible; only decode converters can fail. The
    // shared handler signature is fallible, so unwrap the impossible error.
    match traverse::traverse_and_encode(registry, value, table) {
        Ok(encoded) => encoded,
        Err(err) => unreachable!("encode traversal cannot fail: {err}"),
    }
}

/// Recursively decodes a whole value tree with the default traversal table.
///
/// # Errors
///
/// Whatever a matched registration's `from_plain` reports.
pub fn decode_tree(registry: &Registry, value: Value) -> Result<Value> {
    decode_tree_with(registry, value, &traverse::Table::decode_defaults())
}

/// Recursively decodes a whole value tree with an explicit traversal table.
///
/// # Errors
///
/// Whatever a matched registration's `from_plain` reports.
pub fn decode_tree_with(
    registry: &Registry,
    value: Value,
    table: &traverse::Table,
) -> Result<Value> {
    traverse::traverse_and_decode(registry, value, table)
}
