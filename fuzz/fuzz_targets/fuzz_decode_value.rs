// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cqlcodec::{Codec, CqlType, SchemaRegistry};
use libfuzzer_sys::fuzz_target;

fn catalog() -> Vec<CqlType> {
    let address = CqlType::udt("fz", "address")
        .with_field("street", CqlType::text())
        .with_field("zip", CqlType::int())
        .with_field("tags", CqlType::set(CqlType::text()))
        .build();
    vec![
        CqlType::list(CqlType::int()),
        CqlType::set(CqlType::frozen(CqlType::list(CqlType::varint()))),
        CqlType::map(CqlType::text(), CqlType::decimal()),
        CqlType::tuple(vec![CqlType::uuid(), CqlType::inet(), CqlType::date()]),
        address.clone(),
        CqlType::frozen(address.clone()),
        CqlType::list(CqlType::frozen(address)),
        CqlType::timeuuid(),
        CqlType::time(),
    ]
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let types = catalog();
    let ty = &types[usize::from(selector) % types.len()];
    let registry = SchemaRegistry::new();
    registry.register_all(ty);
    let codec = Codec::new(&registry);

    // Whatever decodes re-encodes canonically: a second pass is byte-identical.
    if let Ok(value) = codec.deserialize(ty, payload) {
        let Ok(first) = codec.serialize(ty, &value) else {
            return;
        };
        let decoded = codec.deserialize(ty, &first).expect("canonical bytes decode");
        let second = codec.serialize(ty, &decoded).expect("decoded value re-encodes");
        assert_eq!(first, second);
    }
});
