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

//! Built-in backend adapters.
//!
//! Each submodule binds one serialization crate to the registry: it encodes
//! the value tree to its plain form, hands that to the backend, and reverses
//! both steps on load. Every backend is feature-gated; a disabled backend is
//! registered as unavailable rather than dropped, so asking for it by name
//! or extension produces an error naming the missing crate instead of an
//! unknown-format error.

#[cfg(feature = "bson")]
mod bson;
#[cfg(feature = "json")]
mod json;
#[cfg(feature = "msgpack")]
mod msgpack;
#[cfg(feature = "pickle")]
mod pickle;
#[cfg(feature = "ron")]
mod ron;
#[cfg(feature = "yaml")]
mod yaml;

use crate::error::Result;
use crate::registry::Registry;

/// Registers every compiled backend with `registry`, and records each
/// disabled backend as unavailable.
///
/// # Errors
///
/// [`crate::Error::DuplicateFormat`] if any default format name is already
/// taken in `registry`.
pub fn register_defaults(registry: &Registry) -> Result<()> {
    #[cfg(feature = "json")]
    json::register(registry)?;
    #[cfg(not(feature = "json"))]
    registry.register_unavailable_package("json", "serde_json");

    #[cfg(feature = "yaml")]
    yaml::register(registry)?;
    #[cfg(not(feature = "yaml"))]
    registry.register_unavailable_package("yaml", "serde_yaml");

    #[cfg(feature = "msgpack")]
    msgpack::register(registry)?;
    #[cfg(not(feature = "msgpack"))]
    registry.register_unavailable_package("msgpack", "rmp-serde");

    #[cfg(feature = "bson")]
    bson::register(registry)?;
    #[cfg(not(feature = "bson"))]
    registry.register_unavailable_package("bson", "bson");

    #[cfg(feature = "pickle")]
    pickle::register(registry)?;
    #[cfg(not(feature = "pickle"))]
    registry.register_unavailable_package("pickle", "serde-pickle");

    #[cfg(feature = "ron")]
    ron::register(registry)?;
    #[cfg(not(feature = "ron"))]
    registry.register_unavailable_package("ron", "ron");

    Ok(())
}
