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

//! JSON backend, via `serde_json`.
//!
//! Registers two sub-variants: compact `json` (the default) and indented
//! `json:pretty`. Both share the `json` extension, which the compact variant
//! claims by registering first.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;

fn loads(registry: &Registry, bytes: &[u8]) -> Result<Value> {
    let plain: Value = serde_json::from_slice(bytes).map_err(|err| Error::load("json", err))?;
    codec::decode_tree(registry, plain)
}

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("json")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree(registry, value.clone());
                serde_json::to_vec(&plain).map_err(|err| Error::dump("json", err))
            })
            .with_loads(loads),
    )?;
    registry.register_format(
        FormatSpec::new("json:pretty")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree(registry, value.clone());
                serde_json::to_vec_pretty(&plain).map_err(|err| Error::dump("json:pretty", err))
            })
            .with_loads(loads),
    )
}
