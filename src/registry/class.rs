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

//! Class registrations: the converter pair binding a user type to plain data.

use crate::error::Result;
use crate::value::{CustomValue, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

type ToPlainFn = Arc<dyn Fn(&dyn CustomValue) -> Value + Send + Sync>;
type FromPlainFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A registered type's identity and its `to_plain`/`from_plain` converter
/// pair.
///
/// Stored under both the type's `TypeId` (for encode-time lookup against a
/// live value) and its derived identity string (for decode-time lookup, when
/// a marker carries only a string). Handed to each format's class hook so
/// backends needing per-type setup can react.
///
/// The round-trip contract `from_plain(to_plain(x)) == x` is the
/// registrant's responsibility; the core only guarantees that a payload is
/// routed through exactly the pair registered for its identity string.
#[derive(Clone)]
pub struct ClassRegistration {
    type_id: TypeId,
    identity: String,
    to_plain: ToPlainFn,
    from_plain: FromPlainFn,
}

impl ClassRegistration {
    /// Builds a registration for `T` from a typed converter pair.
    ///
    /// The identity string is derived from `std::any::type_name`, which is
    /// stable within one build of one program — the only scope in which the
    /// matching `from_plain` exists anyway.
    pub(crate) fn new<T, F, G>(to_plain: F, from_plain: G) -> Self
    where
        T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
        F: Fn(&T) -> Value + Send + Sync + 'static,
        G: Fn(Value) -> Result<T> + Send + Sync + 'static,
    {
        let to_plain: ToPlainFn = Arc::new(move |erased: &dyn CustomValue| {
            let Some(concrete) = erased.as_any().downcast_ref::<T>() else {
                unreachable!("class registry lookups are keyed by TypeId")
            };
            to_plain(concrete)
        });
        let from_plain: FromPlainFn =
            Arc::new(move |payload: Value| Ok(Value::custom(from_plain(payload)?)));
        Self {
            type_id: TypeId::of::<T>(),
            identity: std::any::type_name::<T>().to_string(),
            to_plain,
            from_plain,
        }
    }

    /// The `TypeId` this registration is keyed under.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The string identity carried inside encoded markers.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Converts a live value of the registered type into plain data.
    pub fn to_plain(&self, value: &dyn CustomValue) -> Value {
        (self.to_plain)(value)
    }

    /// Rebuilds the registered type from a marker payload.
    ///
    /// # Errors
    ///
    /// Whatever the registered converter reports, typically
    /// [`crate::Error::Reconstruct`].
    pub fn from_plain(&self, payload: Value) -> Result<Value> {
        (self.from_plain)(payload)
    }
}

impl fmt::Debug for ClassRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistration")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
