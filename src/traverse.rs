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

//! Depth-first traversal of value trees with a replaceable dispatch table.
//!
//! Backends that have no native hook for custom types rewrite the whole
//! tree before serialization and after deserialization. The walk is driven
//! by a [`Table`] of `(predicate, handler)` pairs checked in order; the
//! first match wins, and a value matching no entry is treated as a leaf.
//! Backends with nonstandard container support prepend their own handlers
//! (see [`Table::tuple_preserving_encode`]) without touching the engine.
//!
//! Each handler receives the matched value plus two callbacks: `recurse`
//! re-enters the walk with the same table, and `leaf` applies the marker
//! codec to a single node.

use crate::codec;
use crate::error::Result;
use crate::registry::Registry;
use crate::value::Value;

/// Decides whether a table entry's handler applies to a value.
pub type Predicate = fn(&Value) -> bool;

/// Rewrites one matched container.
///
/// Arguments are the matched value, the `recurse` callback, and the `leaf`
/// callback, in that order.
pub type Handler =
    fn(Value, &dyn Fn(Value) -> Result<Value>, &dyn Fn(Value) -> Result<Value>) -> Result<Value>;

/// Identity string for the tuple surrogate used by backends whose data
/// model cannot distinguish tuples from sequences.
pub const TUPLE_IDENTITY: &str = "builtin_tuple";

/// An ordered dispatch table for one walk direction.
#[derive(Clone)]
pub struct Table {
    entries: Vec<(Predicate, Handler)>,
}

impl Table {
    /// The default encode-direction table: maps, sequences, and tuples are
    /// walked; everything else is a leaf handed to the marker codec.
    #[must_use]
    pub fn encode_defaults() -> Self {
        Self {
            entries: vec![
                (Value::is_map, encode_map),
                (Value::is_seq, walk_seq),
                (Value::is_tuple, walk_tuple),
            ],
        }
    }

    /// The default decode-direction table. Maps carrying the marker key are
    /// handed whole to the marker codec instead of being walked entry by
    /// entry; everything unmatched passes through unchanged.
    #[must_use]
    pub fn decode_defaults() -> Self {
        Self {
            entries: vec![
                (Value::is_map, decode_map),
                (Value::is_seq, walk_seq),
                (Value::is_tuple, walk_tuple),
            ],
        }
    }

    /// Adds an entry ahead of all existing ones, so it shadows any default
    /// matching the same values.
    #[must_use]
    pub fn prepend(mut self, predicate: Predicate, handler: Handler) -> Self {
        self.entries.insert(0, (predicate, handler));
        self
    }

    /// Encode table that rewrites tuples into `builtin_tuple` surrogate
    /// markers, for backends that would otherwise flatten them into plain
    /// sequences.
    #[must_use]
    pub fn tuple_preserving_encode() -> Self {
        Self::encode_defaults().prepend(Value::is_tuple, tuple_to_surrogate)
    }

    /// Decode counterpart of [`Table::tuple_preserving_encode`]: rebuilds
    /// tuples from surrogate markers and defers everything else to the
    /// default map handling.
    #[must_use]
    pub fn tuple_preserving_decode() -> Self {
        Self::decode_defaults().prepend(Value::is_map, surrogate_to_tuple)
    }

    fn handler_for(&self, value: &Value) -> Option<Handler> {
        self.entries
            .iter()
            .find(|(predicate, _)| predicate(value))
            .map(|&(_, handler)| handler)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Walks a value tree, replacing every registered custom value with its
/// marker form. Unmatched values are leaves: the marker codec either wraps
/// them (registered custom) or passes them along.
///
/// # Errors
///
/// None in practice; the signature is shared with the decode direction.
pub fn traverse_and_encode(registry: &Registry, value: Value, table: &Table) -> Result<Value> {
    let recurse = |v: Value| traverse_and_encode(registry, v, table);
    let leaf = |v: Value| codec::encode_node(registry, v, &recurse, &|v| v);
    match table.handler_for(&value) {
        Some(handler) => handler(value, &recurse, &leaf),
        None => leaf(value),
    }
}

/// Walks a value tree, rebuilding registered types from their marker forms.
/// Unmatched values pass through unchanged.
///
/// # Errors
///
/// Whatever a matched registration's `from_plain` reports.
pub fn traverse_and_decode(registry: &Registry, value: Value, table: &Table) -> Result<Value> {
    let recurse = |v: Value| traverse_and_decode(registry, v, table);
    let leaf = |v: Value| codec::decode_node(registry, v, &recurse);
    match table.handler_for(&value) {
        Some(handler) => handler(value, &recurse, &leaf),
        None => Ok(value),
    }
}

fn encode_map(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    _leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Map(entries) = value else {
        unreachable!("handler is gated on is_map")
    };
    let entries = entries
        .into_iter()
        .map(|(key, value)| Ok((recurse(key)?, recurse(value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Map(entries))
}

fn decode_map(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Map(entries) = value else {
        unreachable!("handler is gated on is_map")
    };
    // A marker map is one logical value, not a container to walk into.
    if codec::has_marker_key(&entries) {
        return leaf(Value::Map(entries));
    }
    let entries = entries
        .into_iter()
        .map(|(key, value)| Ok((recurse(key)?, recurse(value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Map(entries))
}

fn walk_seq(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    _leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Seq(items) = value else {
        unreachable!("handler is gated on is_seq")
    };
    let items = items.into_iter().map(recurse).collect::<Result<Vec<_>>>()?;
    Ok(Value::Seq(items))
}

fn walk_tuple(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    _leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Tuple(items) = value else {
        unreachable!("handler is gated on is_tuple")
    };
    let items = items.into_iter().map(recurse).collect::<Result<Vec<_>>>()?;
    Ok(Value::Tuple(items))
}

fn tuple_to_surrogate(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    _leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Tuple(items) = value else {
        unreachable!("handler is gated on is_tuple")
    };
    let items = items.into_iter().map(recurse).collect::<Result<Vec<_>>>()?;
    Ok(codec::marker(TUPLE_IDENTITY, Value::Seq(items)))
}

fn surrogate_to_tuple(
    value: Value,
    recurse: &dyn Fn(Value) -> Result<Value>,
    leaf: &dyn Fn(Value) -> Result<Value>,
) -> Result<Value> {
    let Value::Map(entries) = value else {
        unreachable!("handler is gated on is_map")
    };
    if codec::marker_identity(&entries) != Some(TUPLE_IDENTITY) {
        return decode_map(Value::Map(entries), recurse, leaf);
    }
    let position = entries.iter().position(|(key, value)| {
        matches!(key, Value::Str(s) if s == codec::PAYLOAD_KEY) && matches!(value, Value::Seq(_))
    });
    let Some(position) = position else {
        // Not the shape this crate writes; treat it like an unknown marker.
        return Ok(Value::Map(entries));
    };
    let mut entries = entries;
    let (_, payload) = entries.swap_remove(position);
    let Value::Seq(items) = payload else {
        unreachable!("position is gated on a sequence payload")
    };
    let items = items.into_iter().map(recurse).collect::<Result<Vec<_>>>()?;
    Ok(Value::Tuple(items))
}
