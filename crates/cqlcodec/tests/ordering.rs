// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Collation properties: primitives whose encoding is order-preserving must
// sort the same way as their bytes, and every comparator must be a total order.

use cqlcodec::{Codec, CqlType, CqlValue, PrimitiveKind, RandomValues, SchemaRegistry};
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_order_preserving() -> impl Strategy<Value = (CqlType, CqlValue, CqlValue)> {
    prop_oneof![
        ("[ -~]{0,12}", "[ -~]{0,12}")
            .prop_map(|(a, b)| (CqlType::ascii(), CqlValue::ascii(a), CqlValue::ascii(b))),
        (".{0,8}", ".{0,8}").prop_map(|(a, b)| (CqlType::text(), CqlValue::text(a), CqlValue::text(b))),
        (
            prop::collection::vec(any::<u8>(), 0..12),
            prop::collection::vec(any::<u8>(), 0..12)
        )
            .prop_map(|(a, b)| (CqlType::blob(), CqlValue::Blob(a), CqlValue::Blob(b))),
        (any::<bool>(), any::<bool>())
            .prop_map(|(a, b)| (CqlType::boolean(), CqlValue::Boolean(a), CqlValue::Boolean(b))),
        (any::<i32>(), any::<i32>())
            .prop_map(|(a, b)| (CqlType::date(), CqlValue::Date(a), CqlValue::Date(b))),
    ]
}

proptest! {
    #[test]
    fn prop_primitive_order_matches_bytes((ty, a, b) in arb_order_preserving()) {
        let registry = SchemaRegistry::new();
        let codec = Codec::new(&registry);
        let kind = ty.as_primitive().expect("primitive");
        prop_assert!(kind.is_byte_order_comparable());

        let ea = codec.serialize(&ty, &a).expect("serialize a");
        let eb = codec.serialize(&ty, &b).expect("serialize b");
        prop_assert_eq!(ty.compare(&a, &b), ea.cmp(&eb));
    }

    #[test]
    fn prop_int_order_is_numeric(a in any::<i64>(), b in any::<i64>()) {
        let ty = CqlType::bigint();
        prop_assert_eq!(ty.compare(&CqlValue::BigInt(a), &CqlValue::BigInt(b)), a.cmp(&b));
    }
}

/// Antisymmetry and transitivity over a random sample.
fn assert_total_order(ty: &CqlType, sample: &[CqlValue]) {
    for a in sample {
        assert_eq!(ty.compare(a, a), Ordering::Equal, "reflexive on {}", ty);
        for b in sample {
            let ab = ty.compare(a, b);
            assert_eq!(ab, ty.compare(b, a).reverse(), "antisymmetric on {}", ty);
            for c in sample {
                if ab != Ordering::Greater && ty.compare(b, c) != Ordering::Greater {
                    assert_ne!(ty.compare(a, c), Ordering::Greater, "transitive on {}", ty);
                }
            }
        }
    }
}

#[test]
fn test_comparators_are_total_orders() {
    let point = CqlType::udt("ord", "point")
        .with_field("x", CqlType::int())
        .with_field("y", CqlType::frozen(CqlType::set(CqlType::text())))
        .build();
    let mut types: Vec<CqlType> = PrimitiveKind::ALL.into_iter().map(CqlType::Primitive).collect();
    types.extend([
        CqlType::list(CqlType::smallint()),
        CqlType::set(CqlType::timeuuid()),
        CqlType::map(CqlType::text(), CqlType::decimal()),
        CqlType::tuple(vec![CqlType::boolean(), CqlType::varint()]),
        CqlType::frozen(point),
    ]);

    let mut values = RandomValues::with_seed(4242);
    for ty in &types {
        let mut sample: Vec<CqlValue> = (0..12).map(|_| values.value(ty)).collect();
        sample.push(CqlValue::Null);
        assert_total_order(ty, &sample);
    }
}

#[test]
fn test_null_sorts_first_and_prefix_shorter_list_first() {
    let ty = CqlType::list(CqlType::int());
    let short = CqlValue::List(vec![1.into()]);
    let long = CqlValue::List(vec![1.into(), 2.into()]);
    assert_eq!(ty.compare(&CqlValue::Null, &short), Ordering::Less);
    assert_eq!(ty.compare(&short, &long), Ordering::Less);
}

#[test]
fn test_uuid_compares_signed_halves() {
    let ty = CqlType::uuid();
    let high_bit: CqlValue = uuid::Uuid::from_u128(1u128 << 127).into();
    let low: CqlValue = uuid::Uuid::from_u128(1).into();
    assert_eq!(ty.compare(&high_bit, &low), Ordering::Less);
}
