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

//! Pickle backend, via `serde-pickle`.
//!
//! `serde-pickle` works against readers and writers, so only the stream
//! operations are supplied; the buffer forms are synthesized at
//! registration.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;
use serde_pickle::{DeOptions, SerOptions};

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("pickle")
            .with_dump(|registry, value, mut writer| {
                let plain = codec::encode_tree(registry, value.clone());
                serde_pickle::to_writer(&mut writer, &plain, SerOptions::new())
                    .map_err(|err| Error::dump("pickle", err))
            })
            .with_load(|registry, reader| {
                let plain: Value = serde_pickle::from_reader(reader, DeOptions::new())
                    .map_err(|err| Error::load("pickle", err))?;
                codec::decode_tree(registry, plain)
            }),
    )
}
