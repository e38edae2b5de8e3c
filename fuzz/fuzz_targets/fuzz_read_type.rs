// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use cqlcodec::{type_from_bytes, type_to_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(ty) = type_from_bytes(data) {
        let bytes = type_to_bytes(&ty).expect("descriptor re-encodes");
        let again = type_from_bytes(&bytes).expect("re-encoded descriptor decodes");
        assert_eq!(again, ty);
    }
});
