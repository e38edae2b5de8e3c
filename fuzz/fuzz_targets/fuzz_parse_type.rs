// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cqlcodec::{parse_type, CqlType, SchemaRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let registry = SchemaRegistry::new();
    registry.register_all(
        &CqlType::udt("fz", "point")
            .with_field("x", CqlType::double())
            .build(),
    );

    // A parsed type prints a name that parses back to the same type.
    if let Ok(ty) = parse_type(input, "fz", &registry) {
        let name = ty.cql_name();
        let again = parse_type(&name, "fz", &registry).expect("rendered name parses");
        assert_eq!(again, ty);
    }
});
