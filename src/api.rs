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

//! The crate-level facade: free functions over one process-wide registry.
//!
//! Everything here is a thin pass-through to the same method on
//! [`registry()`]. Code that needs isolation (tests, plugins with their own
//! format sets) builds its own [`Registry`] and calls the methods directly.

use crate::error::Result;
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::LazyLock;

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    match Registry::with_default_formats() {
        Ok(registry) => registry,
        Err(err) => unreachable!("default formats register once into a fresh registry: {err}"),
    }
});

/// The process-wide default registry, created on first use with every
/// compiled backend registered.
pub fn registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Serializes a value to bytes using the named format.
///
/// # Errors
///
/// See [`Registry::dumps`].
pub fn dumps(value: &Value, fmt: &str) -> Result<Vec<u8>> {
    registry().dumps(value, fmt)
}

/// Serializes a value into a writer; the format must be named explicitly.
///
/// # Errors
///
/// See [`Registry::dump`].
pub fn dump(value: &Value, writer: &mut dyn Write, fmt: &str) -> Result<()> {
    registry().dump(value, writer, fmt)
}

/// Serializes a value to a file, inferring the format from the path's
/// extension when `fmt` is `None`.
///
/// # Errors
///
/// See [`Registry::dump_path`].
pub fn dump_path(value: &Value, path: impl AsRef<Path>, fmt: Option<&str>) -> Result<()> {
    registry().dump_path(value, path.as_ref(), fmt)
}

/// Deserializes a value from bytes using the named format.
///
/// # Errors
///
/// See [`Registry::loads`].
pub fn loads(bytes: &[u8], fmt: &str) -> Result<Value> {
    registry().loads(bytes, fmt)
}

/// Deserializes a value from a reader; the format must be named explicitly.
///
/// # Errors
///
/// See [`Registry::load`].
pub fn load(reader: &mut dyn Read, fmt: &str) -> Result<Value> {
    registry().load(reader, fmt)
}

/// Deserializes a value from a file, inferring the format from the path's
/// extension when `fmt` is `None`.
///
/// # Errors
///
/// See [`Registry::load_path`].
pub fn load_path(path: impl AsRef<Path>, fmt: Option<&str>) -> Result<Value> {
    registry().load_path(path.as_ref(), fmt)
}

/// Registers a custom type with the default registry.
///
/// See [`Registry::register_class`] for the contract and an example.
pub fn register_class<T, F, G>(to_plain: F, from_plain: G)
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
    F: Fn(&T) -> Value + Send + Sync + 'static,
    G: Fn(Value) -> Result<T> + Send + Sync + 'static,
{
    registry().register_class(to_plain, from_plain);
}

/// Registers a format with the default registry.
///
/// # Errors
///
/// See [`Registry::register_format`].
pub fn register_format(spec: FormatSpec) -> Result<()> {
    registry().register_format(spec)
}

/// Records a format as known but unusable in the default registry.
pub fn register_unavailable(name: &str, message: impl Into<String>) {
    registry().register_unavailable(name, message);
}

/// Records a format as unusable because a backend crate is missing.
pub fn register_unavailable_package(name: &str, package: &str) {
    registry().register_unavailable_package(name, package);
}
