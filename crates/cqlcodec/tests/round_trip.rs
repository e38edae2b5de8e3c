// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomized round trips: decode(encode(v)) == v for every descriptor shape,
// frozen and multi-cell, nested at least four levels deep.

use cqlcodec::{Codec, CodecConfig, CqlType, CqlValue, PrimitiveKind, RandomValues, SchemaRegistry, UdtValue};

const ITERATIONS: usize = 25;

fn leaf_udt() -> CqlType {
    CqlType::udt("rt", "leaf")
        .with_field("label", CqlType::text())
        .with_field("score", CqlType::map(CqlType::text(), CqlType::frozen(CqlType::list(CqlType::int()))))
        .with_field("nothing", CqlType::empty())
        .build()
}

fn outer_udt() -> CqlType {
    CqlType::udt("rt", "outer")
        .with_field("id", CqlType::timeuuid())
        .with_field("leaves", CqlType::list(CqlType::frozen(leaf_udt())))
        .with_field("addr", CqlType::inet())
        .with_field("amount", CqlType::decimal())
        .build()
}

/// Composite descriptors, each at least four levels deep.
fn deep_types() -> Vec<CqlType> {
    vec![
        // list > set > map > tuple > udt
        CqlType::list(CqlType::frozen(CqlType::set(CqlType::frozen(CqlType::map(
            CqlType::int(),
            CqlType::frozen(CqlType::tuple(vec![CqlType::text(), CqlType::frozen(leaf_udt())])),
        ))))),
        // udt > list > udt > map > list
        outer_udt(),
        // map > tuple > set > list
        CqlType::map(
            CqlType::uuid(),
            CqlType::frozen(CqlType::tuple(vec![
                CqlType::frozen(CqlType::set(CqlType::frozen(CqlType::list(CqlType::varint())))),
                CqlType::blob(),
                CqlType::empty(),
            ])),
        ),
        // set > tuple > map > list
        CqlType::set(CqlType::frozen(CqlType::tuple(vec![
            CqlType::bigint(),
            CqlType::frozen(CqlType::map(
                CqlType::date(),
                CqlType::frozen(CqlType::list(CqlType::time())),
            )),
        ]))),
        CqlType::tuple(vec![
            CqlType::frozen(outer_udt()),
            CqlType::frozen(CqlType::list(CqlType::frozen(CqlType::map(
                CqlType::ascii(),
                CqlType::frozen(CqlType::set(CqlType::double())),
            )))),
        ]),
    ]
}

fn registry_for(types: &[CqlType]) -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    for ty in types {
        registry.register_all(ty);
    }
    registry
}

fn assert_round_trip(codec: &Codec<'_>, ty: &CqlType, value: &CqlValue) {
    let bytes = codec
        .serialize(ty, value)
        .unwrap_or_else(|e| panic!("serialize {}: {}", ty, e));
    let decoded = codec
        .deserialize(ty, &bytes)
        .unwrap_or_else(|e| panic!("deserialize {}: {}", ty, e));
    assert_eq!(&decoded, value, "round trip of {}", ty);
}

#[test]
fn test_primitives_round_trip() {
    let registry = SchemaRegistry::new();
    let codec = Codec::new(&registry);
    let mut values = RandomValues::with_seed(0x5eed);
    for kind in PrimitiveKind::ALL {
        let ty = CqlType::Primitive(kind);
        for _ in 0..ITERATIONS {
            let value = values.value(&ty);
            assert_round_trip(&codec, &ty, &value);
        }
    }
}

#[test]
fn test_deep_types_round_trip_frozen_and_multi_cell() {
    let types = deep_types();
    let registry = registry_for(&types);
    let codec = Codec::new(&registry);
    let mut values = RandomValues::new(
        CodecConfig::builder()
            .seed(17)
            .max_extra_elements(3)
            .max_text_len(8)
            .build(),
    );

    for ty in &types {
        for variant in [ty.clone().unfreeze(), CqlType::frozen(ty.clone())] {
            for min in [0, 1] {
                for _ in 0..ITERATIONS {
                    let value = values.value_with_min(&variant, min);
                    assert_round_trip(&codec, &variant, &value);
                }
            }
        }
    }
}

#[test]
fn test_collections_of_every_primitive() {
    let registry = SchemaRegistry::new();
    let codec = Codec::new(&registry);
    let mut values = RandomValues::with_seed(99);
    for kind in PrimitiveKind::ALL {
        let elem = CqlType::Primitive(kind);
        let types = [
            CqlType::list(elem.clone()),
            CqlType::set(elem.clone()),
            CqlType::map(elem.clone(), CqlType::text()),
            CqlType::tuple(vec![elem.clone(), CqlType::int()]),
        ];
        for ty in &types {
            let value = values.value_with_min(ty, 1);
            assert_round_trip(&codec, ty, &value);
        }
    }
}

#[test]
fn test_collection_cardinality() {
    let shallow = [
        CqlType::list(CqlType::int()),
        CqlType::set(CqlType::text()),
        CqlType::map(CqlType::bigint(), CqlType::blob()),
    ];
    let nested = CqlType::list(CqlType::frozen(CqlType::map(
        CqlType::uuid(),
        CqlType::frozen(CqlType::set(CqlType::int())),
    )));

    for k in [0usize, 1, 4, 32] {
        for ty in &shallow {
            let value = ty.random_value(k);
            assert!(value.collection_len().expect("collection") >= k, "{} with k={}", ty, k);
        }
        if k <= 4 {
            let value = nested.random_value(k);
            let outer = value.as_elements().expect("list");
            assert!(outer.len() >= k);
            for map in outer {
                let CqlValue::Map(entries) = map else {
                    panic!("expected map, got {:?}", map);
                };
                assert!(entries.len() >= k);
                for (_, set) in entries {
                    assert!(set.collection_len().expect("set") >= k);
                }
            }
        }
    }
}

#[test]
fn test_udt_field_independence() {
    let ty = CqlType::udt("rt", "wide")
        .with_field("a", CqlType::text())
        .with_field("b", CqlType::int())
        .with_field("c", CqlType::frozen(CqlType::list(CqlType::double())))
        .with_field("d", CqlType::uuid())
        .build();
    let registry = registry_for(std::slice::from_ref(&ty));
    let codec = Codec::new(&registry);
    let full = ty.random_value(1);
    let full = full.as_udt().expect("udt").clone();
    let names = ["a", "b", "c", "d"];

    for variant in [ty.clone(), CqlType::frozen(ty.clone())] {
        // Every subset of nulled fields, including none and all.
        for mask in 0u32..(1 << names.len()) {
            let mut value = UdtValue::new();
            for (i, name) in names.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    value.set(*name, full.get(name).cloned().unwrap_or(CqlValue::Null));
                }
            }
            let bytes = codec.serialize(&variant, &CqlValue::Udt(value.clone())).expect("serialize");
            let decoded = codec.deserialize(&variant, &bytes).expect("deserialize");
            let decoded = decoded.as_udt().expect("udt");
            for (i, name) in names.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    assert_eq!(decoded.get(name), full.get(name), "field {} mask {:04b}", name, mask);
                } else {
                    assert!(decoded.is_null(name), "field {} mask {:04b}", name, mask);
                }
            }
        }
    }
}
