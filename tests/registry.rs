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

//! Registration behavior observed through the public API: user formats next
//! to the defaults, synthesis, placeholders, and error taxonomy.

use anyformat::{Error, FormatSpec, Registry, Value};

/// A toy text format that only handles strings, registered from buffer
/// operations so the stream operations are synthesized.
fn shout_spec() -> FormatSpec {
    FormatSpec::new("shout")
        .with_extension("loud")
        .with_dumps(|_, value| match value {
            Value::Str(s) => Ok(s.to_uppercase().into_bytes()),
            other => Ok(format!("{other:?}").to_uppercase().into_bytes()),
        })
        .with_loads(|_, bytes| {
            Ok(Value::Str(
                String::from_utf8_lossy(bytes).to_lowercase(),
            ))
        })
}

#[test]
fn test_user_format_registers_alongside_defaults() {
    let registry = Registry::with_default_formats().unwrap();
    registry.register_format(shout_spec()).unwrap();

    let bytes = registry.dumps(&Value::from("hello"), "shout").unwrap();
    assert_eq!(bytes, b"HELLO");
    assert_eq!(
        registry.loads(&bytes, "shout").unwrap(),
        Value::from("hello")
    );
    assert_eq!(registry.format_for_extension("loud").unwrap(), "shout");
}

#[test]
fn test_synthesized_stream_operations() {
    let registry = Registry::new();
    registry.register_format(shout_spec()).unwrap();

    let mut buffer = Vec::new();
    registry
        .dump(&Value::from("quiet"), &mut buffer, "shout")
        .unwrap();
    assert_eq!(buffer, b"QUIET");

    let mut reader: &[u8] = b"QUIET";
    assert_eq!(
        registry.load(&mut reader, "shout").unwrap(),
        Value::from("quiet")
    );
}

#[cfg(feature = "json")]
#[test]
fn test_default_names_cannot_be_reused() {
    let registry = Registry::with_default_formats().unwrap();
    let err = registry.register_format(FormatSpec::new("json")).unwrap_err();
    assert!(matches!(err, Error::DuplicateFormat { .. }));

    // The original registration is untouched.
    let bytes = registry.dumps(&Value::Int(7), "json").unwrap();
    assert_eq!(bytes, b"7");
}

#[test]
fn test_placeholder_format_is_known_but_unusable() {
    let registry = Registry::new();
    registry.register_format(FormatSpec::new("someday")).unwrap();

    assert!(registry.format("someday").is_ok());
    let err = registry.dumps(&Value::Null, "someday").unwrap_err();
    assert!(matches!(err, Error::NotImplemented { .. }));
    let err = registry.loads(b"", "someday").unwrap_err();
    assert!(matches!(err, Error::NotImplemented { .. }));
}

#[test]
fn test_unknown_format_error_lists_valid_names() {
    let registry = Registry::new();
    registry.register_format(shout_spec()).unwrap();

    let err = registry.dumps(&Value::Null, "xml").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'xml'"));
    assert!(message.contains("shout"));
}

#[test]
fn test_unavailable_format_reports_the_missing_crate() {
    let registry = Registry::new();
    registry.register_unavailable_package("exotic", "exotic-serde");

    let err = registry.loads(b"", "exotic").unwrap_err();
    assert!(matches!(err, Error::UnavailableFormat { .. }));
    assert!(err.to_string().contains("exotic-serde"));
    assert_eq!(registry.unavailable_format_names(), vec!["exotic"]);
}

#[cfg(feature = "json")]
#[test]
fn test_variant_shares_extension_with_its_base() {
    let registry = Registry::with_default_formats().unwrap();
    // Compact json registered first, so it owns the extension even though
    // json:pretty derives the same one.
    assert_eq!(registry.format_for_extension("json").unwrap(), "json");
    assert!(registry.format("json:pretty").is_ok());
}

#[test]
fn test_format_without_extension_is_name_only() {
    let registry = Registry::new();
    registry
        .register_format(shout_spec().without_extension())
        .unwrap();

    assert!(registry.format("shout").is_ok());
    let err = registry.format_for_extension("shout").unwrap_err();
    assert!(matches!(err, Error::UnknownExtension { .. }));
}

#[cfg(feature = "json")]
#[test]
fn test_default_registry_facade() {
    // The process-wide registry carries the compiled defaults.
    let names = anyformat::registry().format_names();
    assert!(names.contains(&"json".to_string()));

    let bytes = anyformat::dumps(&Value::Bool(true), "json").unwrap();
    assert_eq!(anyformat::loads(&bytes, "json").unwrap(), Value::Bool(true));
}

#[test]
fn test_class_reregistration_replaces_converters() {
    #[derive(Debug, Clone, PartialEq)]
    struct Flag(bool);

    let registry = Registry::new();
    registry.register_format(
        FormatSpec::new("debugfmt")
            .with_dumps(|registry, value| {
                let plain = anyformat::codec::encode_tree(registry, value.clone());
                Ok(format!("{plain:?}").into_bytes())
            }),
    )
    .unwrap();

    registry.register_class(|f: &Flag| Value::Bool(f.0), |_: Value| Ok(Flag(false)));
    registry.register_class(
        |f: &Flag| Value::Str(format!("flag:{}", f.0)),
        |_: Value| Ok(Flag(true)),
    );

    let bytes = registry.dumps(&Value::custom(Flag(true)), "debugfmt").unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("flag:true"), "got: {text}");
}
