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

//! YAML backend, via `serde_yaml`.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("yaml")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree(registry, value.clone());
                let text = serde_yaml::to_string(&plain).map_err(|err| Error::dump("yaml", err))?;
                Ok(text.into_bytes())
            })
            .with_loads(|registry, bytes| {
                let plain: Value =
                    serde_yaml::from_slice(bytes).map_err(|err| Error::load("yaml", err))?;
                codec::decode_tree(registry, plain)
            }),
    )
}
