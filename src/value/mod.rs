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

//! The dynamic value tree every format operates on.
//!
//! [`Value`] is a small closed set of container shapes and scalar leaves,
//! plus one escape hatch: [`Value::Custom`], a type-erased user value that
//! only the encode/decode core (via the class registry) knows how to turn
//! into plain data and back.
//!
//! The serde bridges live in the `ser` and `de` submodules: the plain
//! subset of `Value` serializes into and deserializes from any serde
//! backend. A `Custom` value that reaches a backend without having been
//! encoded first is a serialization error naming the offending type.
//!
//! # Examples
//!
//! ```rust
//! use anyformat::Value;
//!
//! let tree = Value::Map(vec![
//!     (Value::from("numbers"), Value::Seq(vec![Value::Int(1), Value::Int(2)])),
//!     (Value::from("label"), Value::from("demo")),
//! ]);
//! assert!(tree.is_map());
//! assert_eq!(tree.get("label").and_then(Value::as_str), Some("demo"));
//! ```

mod de;
mod ser;

use std::any::Any;
use std::fmt;

/// Object-safe closure over the traits a custom value must provide.
///
/// Implemented automatically for every `Any + Debug + Clone + PartialEq +
/// Send + Sync` type; user code never implements this by hand. It exists so
/// that [`Value::Custom`] can be cloned and compared despite holding a
/// type-erased box.
pub trait CustomValue: fmt::Debug + Send + Sync {
    /// Returns the value as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Clones the value behind a fresh box.
    fn clone_box(&self) -> Box<dyn CustomValue>;

    /// Compares against another erased value; `false` when the concrete
    /// types differ.
    fn eq_box(&self, other: &dyn CustomValue) -> bool;

    /// The concrete type's name, used in diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T> CustomValue for T
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn CustomValue> {
        Box::new(self.clone())
    }

    fn eq_box(&self, other: &dyn CustomValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A dynamically typed value, the common currency of every format backend.
///
/// Containers are insertion-ordered; [`Value::Map`] equality is sensitive to
/// entry order, matching what order-preserving backends round-trip.
///
/// [`Value::Tuple`] is the fixed-arity ordered sequence. serde data models
/// have no dynamic fixed-arity kind, so backends serialize it as a plain
/// sequence unless their adapter opts into the tuple-surrogate traversal
/// table (see [`crate::traverse`]).
#[derive(Debug)]
pub enum Value {
    /// The absent value (`null`, `None`, `~`).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// A raw byte sequence. Not every backend can represent this natively.
    Bytes(Vec<u8>),
    /// An ordered, growable sequence.
    Seq(Vec<Value>),
    /// An ordered, fixed-arity sequence.
    Tuple(Vec<Value>),
    /// An insertion-ordered mapping with arbitrary keys.
    Map(Vec<(Value, Value)>),
    /// A user-defined value awaiting encoding (or produced by decoding).
    Custom(Box<dyn CustomValue>),
}

impl Value {
    /// Wraps a user value for later encoding by a registered converter pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyformat::Value;
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Point { x: i64, y: i64 }
    ///
    /// let value = Value::custom(Point { x: 1, y: 2 });
    /// assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
    /// ```
    pub fn custom<T: CustomValue + 'static>(value: T) -> Self {
        Self::Custom(Box::new(value))
    }

    /// Borrows the concrete type behind a [`Value::Custom`], if it matches.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(inner) => inner.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Map`].
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` for [`Value::Seq`].
    #[must_use]
    pub fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Returns `true` for [`Value::Tuple`].
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Returns `true` for [`Value::Custom`].
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// The boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is a [`Value::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload, if this is a [`Value::Float`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string payload, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of a [`Value::Seq`] or [`Value::Tuple`].
    ///
    /// Both shapes are accepted because backends without a fixed-arity kind
    /// legitimately hand a tuple payload back as a sequence.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a [`Value::Map`].
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Consumes a [`Value::Seq`] or [`Value::Tuple`] into its elements.
    pub fn into_vec(self) -> Option<Vec<Value>> {
        match self {
            Self::Seq(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes a [`Value::Map`] into its entries.
    pub fn into_entries(self) -> Option<Vec<(Value, Value)>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the first entry of a [`Value::Map`] whose key is the given
    /// string.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let entries = self.as_entries()?;
        entries
            .iter()
            .find_map(|(k, v)| matches!(k, Self::Str(s) if s == key).then_some(v))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Float(f) => Self::Float(*f),
            Self::Str(s) => Self::Str(s.clone()),
            Self::Bytes(b) => Self::Bytes(b.clone()),
            Self::Seq(items) => Self::Seq(items.clone()),
            Self::Tuple(items) => Self::Tuple(items.clone()),
            Self::Map(entries) => Self::Map(entries.clone()),
            Self::Custom(inner) => Self::Custom(inner.clone_box()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.eq_box(b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(value: Vec<(Value, Value)>) -> Self {
        Self::Map(value)
    }
}
