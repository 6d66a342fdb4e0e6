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

//! BSON backend, via the `bson` crate.
//!
//! A BSON document is a map at the top level, so any other value is dumped
//! inside a single-entry wrapper map under a reserved key and unwrapped
//! again on load.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;

const FOLLOW_KEY: &str = "__bson_follow__";

fn wrap(value: Value) -> Value {
    match value {
        Value::Map(_) => value,
        other => Value::Map(vec![(Value::Str(FOLLOW_KEY.to_string()), other)]),
    }
}

fn unwrap(value: Value) -> Value {
    // Only the exact wrapper shape is unwrapped; a user map that merely
    // contains the reserved key alongside other entries is left intact.
    match value {
        Value::Map(entries)
            if entries.len() == 1
                && matches!(&entries[0].0, Value::Str(s) if s == FOLLOW_KEY) =>
        {
            entries.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("bson")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree(registry, wrap(value.clone()));
                bson::to_vec(&plain).map_err(|err| Error::dump("bson", err))
            })
            .with_loads(|registry, bytes| {
                let plain: Value =
                    bson::from_slice(bytes).map_err(|err| Error::load("bson", err))?;
                Ok(unwrap(codec::decode_tree(registry, plain)?))
            }),
    )
}
