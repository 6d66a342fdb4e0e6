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

//! RON backend, via the `ron` crate: a human-readable text format that,
//! unlike JSON, allows non-string map keys.

use crate::codec;
use crate::error::{Error, Result};
use crate::registry::{FormatSpec, Registry};
use crate::value::Value;

pub(crate) fn register(registry: &Registry) -> Result<()> {
    registry.register_format(
        FormatSpec::new("ron")
            .with_dumps(|registry, value| {
                let plain = codec::encode_tree(registry, value.clone());
                let text = ron::to_string(&plain).map_err(|err| Error::dump("ron", err))?;
                Ok(text.into_bytes())
            })
            .with_loads(|registry, bytes| {
                let text = std::str::from_utf8(bytes).map_err(|err| Error::load("ron", err))?;
                let plain: Value = ron::from_str(text).map_err(|err| Error::load("ron", err))?;
                codec::decode_tree(registry, plain)
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_text() {
        let registry = Registry::new();
        register(&registry).unwrap();

        let value = Value::Map(vec![
            (Value::from("name"), Value::from("ron")),
            (Value::Int(1), Value::Seq(vec![Value::Float(0.5)])),
        ]);
        let bytes = registry.dumps(&value, "ron").unwrap();
        assert!(std::str::from_utf8(&bytes).is_ok());
        assert_eq!(registry.loads(&bytes, "ron").unwrap(), value);
    }

    #[test]
    fn test_invalid_utf8_is_a_load_error() {
        let registry = Registry::new();
        register(&registry).unwrap();

        let err = registry.loads(&[0xff, 0xfe], "ron").unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
