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

//! MessagePack backend, via `rmp-serde`.
//!
//! MessagePack has a single array type, so tuples would come back as plain
//! sequences. This adapter uses the tuple-preserving traversal tables, which
//! rewrite tuples as `builtin_tuple` surrogate markers on the wire.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::traverse::Table;
use crate::value::Value;

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("msgpack")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree_with(
                    registry,
                    value.clone(),
                    &Table::tuple_preserving_encode(),
                );
                rmp_serde::to_vec(&plain).map_err(|err| Error::dump("msgpack", err))
            })
            .with_loads(|registry, bytes| {
                let plain: Value =
                    rmp_serde::from_slice(bytes).map_err(|err| Error::load("msgpack", err))?;
                codec::decode_tree_with(registry, plain, &Table::tuple_preserving_decode())
            }),
    )
}
