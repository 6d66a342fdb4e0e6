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

//! Round-trip coverage: the same fixture suite runs against every built-in
//! format.

use anyformat::{Error, Registry, Value};

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

fn fresh_registry() -> Registry {
    let registry = Registry::with_default_formats().expect("fresh registry");
    registry.register_class(
        |p: &Point| {
            Value::Map(vec![
                (Value::from("x"), Value::Int(p.x)),
                (Value::from("y"), Value::Int(p.y)),
            ])
        },
        |v: Value| {
            let x = v
                .get("x")
                .and_then(Value::as_i64)
                .ok_or_else(|| Error::reconstruct("Point", "missing x"))?;
            let y = v
                .get("y")
                .and_then(Value::as_i64)
                .ok_or_else(|| Error::reconstruct("Point", "missing y"))?;
            Ok(Point { x, y })
        },
    );
    registry
}

fn assert_round_trip(registry: &Registry, fmt: &str, value: &Value) {
    let bytes = registry
        .dumps(value, fmt)
        .unwrap_or_else(|err| panic!("{fmt} dumps failed: {err}"));
    let back = registry
        .loads(&bytes, fmt)
        .unwrap_or_else(|err| panic!("{fmt} loads failed: {err}"));
    assert_eq!(&back, value, "{fmt} round trip changed the value");
}

// Keys are sorted so backends that normalize key order still compare equal.
fn nested_fixture() -> Value {
    let level2 = |values: &[i64]| Value::Seq(values.iter().copied().map(Value::Int).collect());
    Value::Map(vec![
        (
            Value::from("level1_1"),
            Value::Map(vec![
                (Value::from("level2_1"), level2(&[1, 2, 3])),
                (Value::from("level2_2"), level2(&[4, 5, 6])),
            ]),
        ),
        (
            Value::from("level1_2"),
            Value::Map(vec![
                (Value::from("level2_1"), level2(&[1, 2, 3])),
                (Value::from("level2_2"), level2(&[4, 5, 6])),
            ]),
        ),
        (
            Value::from("level1_3"),
            Value::Map(vec![
                (
                    Value::from("level2_1"),
                    Value::Map(vec![
                        (Value::from("level3_1"), level2(&[1, 2, 3])),
                        (Value::from("level3_2"), level2(&[4, 5, 6])),
                    ]),
                ),
                (Value::from("level2_2"), level2(&[4, 5, 6])),
            ]),
        ),
    ])
}

macro_rules! format_suite {
    ($suite:ident, $feature:literal, $fmt:literal) => {
        #[cfg(feature = $feature)]
        mod $suite {
            use super::*;

            #[test]
            fn test_output_is_nonempty() {
                let registry = fresh_registry();
                let bytes = registry.dumps(&Value::from("here I am"), $fmt).unwrap();
                assert!(!bytes.is_empty());
            }

            #[test]
            fn test_simple_types() {
                let registry = fresh_registry();
                assert_round_trip(&registry, $fmt, &Value::from("hello"));
                assert_round_trip(&registry, $fmt, &Value::Int(1));
                assert_round_trip(&registry, $fmt, &Value::Int(-40));
                assert_round_trip(&registry, $fmt, &Value::Float(1.1));
                assert_round_trip(&registry, $fmt, &Value::Null);
                assert_round_trip(&registry, $fmt, &Value::Bool(true));
                assert_round_trip(&registry, $fmt, &Value::Bool(false));
            }

            #[test]
            fn test_map() {
                let registry = fresh_registry();
                assert_round_trip(&registry, $fmt, &Value::Map(vec![]));
                assert_round_trip(
                    &registry,
                    $fmt,
                    &Value::Map(vec![
                        (Value::from("x"), Value::Int(1)),
                        (Value::from("y"), Value::Int(2)),
                        (Value::from("z"), Value::Int(3)),
                    ]),
                );
            }

            #[test]
            fn test_seq() {
                let registry = fresh_registry();
                assert_round_trip(&registry, $fmt, &Value::Seq(vec![]));
                assert_round_trip(
                    &registry,
                    $fmt,
                    &Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                );
            }

            #[test]
            fn test_nested_map() {
                let registry = fresh_registry();
                assert_round_trip(&registry, $fmt, &nested_fixture());
            }

            #[test]
            fn test_custom_object() {
                let registry = fresh_registry();
                let value = Value::custom(Point { x: 3, y: 4 });
                assert_round_trip(&registry, $fmt, &value);
            }

            #[test]
            fn test_custom_objects_in_containers() {
                let registry = fresh_registry();
                let value = Value::Map(vec![
                    (Value::from("a"), Value::custom(Point { x: 3, y: 4 })),
                    (Value::from("b"), Value::custom(Point { x: 1, y: 2 })),
                    (
                        Value::from("d"),
                        Value::Seq(vec![
                            Value::custom(Point { x: 0, y: 1 }),
                            Value::custom(Point { x: 2, y: 3 }),
                        ]),
                    ),
                ]);
                assert_round_trip(&registry, $fmt, &value);
            }

            #[test]
            fn test_unregistered_class_does_not_dump() {
                #[derive(Debug, Clone, PartialEq)]
                struct Stranger(i64);

                let registry = fresh_registry();
                let err = registry
                    .dumps(&Value::custom(Stranger(1)), $fmt)
                    .unwrap_err();
                assert!(err.to_string().contains("Stranger"), "got: {err}");
            }
        }
    };
}

format_suite!(json, "json", "json");
format_suite!(json_pretty, "json", "json:pretty");
format_suite!(yaml, "yaml", "yaml");
format_suite!(msgpack, "msgpack", "msgpack");
format_suite!(bson, "bson", "bson");
format_suite!(pickle, "pickle", "pickle");
format_suite!(ron, "ron", "ron");

#[cfg(feature = "msgpack")]
#[test]
fn test_registered_class_with_tuple_payload_survives_msgpack() {
    #[derive(Debug, Clone, PartialEq)]
    struct Pair(i64, i64);

    let registry = fresh_registry();
    registry.register_class(
        |p: &Pair| Value::Tuple(vec![Value::Int(p.0), Value::Int(p.1)]),
        |v: Value| {
            let items = v
                .into_vec()
                .ok_or_else(|| Error::reconstruct("Pair", "expected a sequence"))?;
            match items.as_slice() {
                [Value::Int(a), Value::Int(b)] => Ok(Pair(*a, *b)),
                _ => Err(Error::reconstruct("Pair", "expected two integers")),
            }
        },
    );

    let value = Value::custom(Pair(5, 6));
    let bytes = registry.dumps(&value, "msgpack").unwrap();
    let back = registry.loads(&bytes, "msgpack").unwrap();
    assert_eq!(back, value);
}

#[cfg(all(feature = "json", feature = "yaml"))]
#[test]
fn test_formats_are_independent() {
    // Bytes written by one format are not readable by another.
    let registry = fresh_registry();
    let value = Value::Map(vec![(Value::from("a"), Value::Int(1))]);
    let bytes = registry.dumps(&value, "json").unwrap();
    assert_eq!(registry.loads(&bytes, "json").unwrap(), value);
    // JSON happens to be a subset of YAML, so compare against msgpack-style
    // failure is not reliable; assert the dumps differ instead.
    let yaml_bytes = registry.dumps(&value, "yaml").unwrap();
    assert_ne!(bytes, yaml_bytes);
}
