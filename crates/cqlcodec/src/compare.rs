// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collation order over logical values.
//!
//! Null sorts before any value. Sequences compare element by element; a
//! sequence that runs out first sorts first, unless everything left in the
//! longer one is null. Sets and maps are sorted before being walked, with
//! repeated elements (or repeated keys, first entry kept) counted once.
//!
//! These functions trust the UDT field order of the descriptor they are
//! given; [`Codec::compare`](crate::codec::Codec::compare) first swaps every
//! UDT for its registered definition.

use crate::types::{CqlType, PrimitiveKind};
use crate::value::CqlValue;
use std::cmp::Ordering;
use uuid::Uuid;

/// Order two values of type `ty`.
pub fn compare(ty: &CqlType, a: &CqlValue, b: &CqlValue) -> Ordering {
    match (a, b) {
        (CqlValue::Null, CqlValue::Null) => return Ordering::Equal,
        (CqlValue::Null, _) => return Ordering::Less,
        (_, CqlValue::Null) => return Ordering::Greater,
        _ => {}
    }
    match ty {
        CqlType::Frozen(inner) => compare(inner, a, b),
        CqlType::Primitive(kind) => compare_primitive(*kind, a, b),
        CqlType::List(elem) => match (a, b) {
            (CqlValue::List(x), CqlValue::List(y)) => {
                let x: Vec<_> = x.iter().collect();
                let y: Vec<_> = y.iter().collect();
                compare_sequences(elem, &x, &y)
            }
            _ => fallback(a, b),
        },
        CqlType::Set(elem) => match (a, b) {
            (CqlValue::Set(x), CqlValue::Set(y)) => {
                compare_sequences(elem, &sorted(elem, x), &sorted(elem, y))
            }
            _ => fallback(a, b),
        },
        CqlType::Map(key, value) => match (a, b) {
            (CqlValue::Map(x), CqlValue::Map(y)) => compare_maps(key, value, x, y),
            _ => fallback(a, b),
        },
        CqlType::Tuple(elements) => match (a, b) {
            (CqlValue::Tuple(x), CqlValue::Tuple(y)) => {
                for (i, ety) in elements.iter().enumerate() {
                    let ord = compare(ety, nth(x, i), nth(y, i));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            }
            _ => fallback(a, b),
        },
        CqlType::Udt(udt) => match (a, b) {
            (CqlValue::Udt(x), CqlValue::Udt(y)) => {
                for field in udt.fields() {
                    let ord = compare(
                        &field.ty,
                        x.get(&field.name).unwrap_or(&CqlValue::Null),
                        y.get(&field.name).unwrap_or(&CqlValue::Null),
                    );
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            }
            _ => fallback(a, b),
        },
    }
}

/// Sort `values` in place by collation order.
pub fn sort_values(ty: &CqlType, values: &mut [CqlValue]) {
    values.sort_by(|a, b| compare(ty, a, b));
}

impl CqlType {
    /// Collation order under this descriptor as declared.
    pub fn compare(&self, a: &CqlValue, b: &CqlValue) -> Ordering {
        compare(self, a, b)
    }
}

fn nth(values: &[CqlValue], i: usize) -> &CqlValue {
    values.get(i).unwrap_or(&CqlValue::Null)
}

/// Sorted with collation-equal elements collapsed, as a set holds them.
fn sorted<'v>(ty: &CqlType, values: &'v [CqlValue]) -> Vec<&'v CqlValue> {
    let mut out: Vec<_> = values.iter().collect();
    out.sort_by(|a, b| compare(ty, a, b));
    out.dedup_by(|a, b| compare(ty, a, b) == Ordering::Equal);
    out
}

/// Entries sorted by key; of entries with equal keys the first one wins.
fn by_key<'e>(key: &CqlType, entries: &'e [(CqlValue, CqlValue)]) -> Vec<&'e (CqlValue, CqlValue)> {
    let mut out: Vec<_> = entries.iter().collect();
    out.sort_by(|a, b| compare(key, &a.0, &b.0));
    out.dedup_by(|later, kept| compare(key, &later.0, &kept.0) == Ordering::Equal);
    out
}

fn compare_sequences(ty: &CqlType, a: &[&CqlValue], b: &[&CqlValue]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = compare(ty, x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    let common = a.len().min(b.len());
    let has_value = |rest: &[&CqlValue]| rest.iter().any(|v| !v.is_null());
    if has_value(&b[common..]) {
        Ordering::Less
    } else if has_value(&a[common..]) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn compare_maps(
    key: &CqlType,
    value: &CqlType,
    x: &[(CqlValue, CqlValue)],
    y: &[(CqlValue, CqlValue)],
) -> Ordering {
    let x = by_key(key, x);
    let y = by_key(key, y);
    for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()).map(|(a, b)| (*a, *b)) {
        let ord = compare(key, kx, ky).then_with(|| compare(value, vx, vy));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

fn compare_primitive(kind: PrimitiveKind, a: &CqlValue, b: &CqlValue) -> Ordering {
    use CqlValue as V;
    match (a, b) {
        (V::Text(x) | V::Ascii(x), V::Text(y) | V::Ascii(y)) => x.as_bytes().cmp(y.as_bytes()),
        (V::Boolean(x), V::Boolean(y)) => x.cmp(y),
        (V::TinyInt(x), V::TinyInt(y)) => x.cmp(y),
        (V::SmallInt(x), V::SmallInt(y)) => x.cmp(y),
        (V::Int(x), V::Int(y)) => x.cmp(y),
        (V::BigInt(x), V::BigInt(y)) | (V::Timestamp(x), V::Timestamp(y)) | (V::Time(x), V::Time(y)) => {
            x.cmp(y)
        }
        (V::Float(x), V::Float(y)) => x.total_cmp(y),
        (V::Double(x), V::Double(y)) => x.total_cmp(y),
        (V::Date(x), V::Date(y)) => x.cmp(y),
        (V::Uuid(x), V::Uuid(y)) if kind == PrimitiveKind::Uuid => compare_uuid(x, y),
        (V::TimeUuid(x) | V::Uuid(x), V::TimeUuid(y) | V::Uuid(y)) => compare_time_uuid(x, y),
        (V::Inet(x), V::Inet(y)) => inet_octets(x).cmp(&inet_octets(y)),
        (V::Blob(x), V::Blob(y)) => x.cmp(y),
        (V::Varint(x), V::Varint(y)) => x.cmp(y),
        (V::Decimal(x), V::Decimal(y)) => x.numeric_cmp(y).then(x.scale.cmp(&y.scale)),
        (V::Empty, V::Empty) => Ordering::Equal,
        _ => fallback(a, b),
    }
}

/// Signed most-significant half, then signed least-significant half.
fn compare_uuid(a: &Uuid, b: &Uuid) -> Ordering {
    let (a_hi, a_lo) = a.as_u64_pair();
    let (b_hi, b_lo) = b.as_u64_pair();
    (a_hi as i64, a_lo as i64).cmp(&(b_hi as i64, b_lo as i64))
}

/// Embedded 60-bit timestamp, then raw bytes.
fn compare_time_uuid(a: &Uuid, b: &Uuid) -> Ordering {
    time_uuid_ticks(a)
        .cmp(&time_uuid_ticks(b))
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

pub(crate) fn time_uuid_ticks(u: &Uuid) -> u64 {
    let b = u.as_bytes();
    let low = u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    let mid = u64::from(u16::from_be_bytes([b[4], b[5]]));
    let high = u64::from(u16::from_be_bytes([b[6], b[7]]) & 0x0fff);
    (high << 48) | (mid << 32) | low
}

fn inet_octets(addr: &std::net::IpAddr) -> Vec<u8> {
    match addr {
        std::net::IpAddr::V4(v4) => v4.octets().to_vec(),
        std::net::IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Values whose shape does not match the type still need a total order.
fn fallback(a: &CqlValue, b: &CqlValue) -> Ordering {
    a.kind_name().cmp(b.kind_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Decimal, UdtValue};

    #[test]
    fn test_null_first() {
        let ty = CqlType::int();
        assert_eq!(compare(&ty, &CqlValue::Null, &CqlValue::Int(i32::MIN)), Ordering::Less);
        assert_eq!(compare(&ty, &CqlValue::Int(0), &CqlValue::Null), Ordering::Greater);
    }

    #[test]
    fn test_list_walks_by_index() {
        let ty = CqlType::list(CqlType::int());
        let short = CqlValue::List(vec![CqlValue::Int(9)]);
        let long = CqlValue::List(vec![CqlValue::Int(1), CqlValue::Int(2)]);
        assert_eq!(compare(&ty, &short, &long), Ordering::Greater);

        let prefix = CqlValue::List(vec![CqlValue::Int(1)]);
        assert_eq!(compare(&ty, &prefix, &long), Ordering::Less);
    }

    #[test]
    fn test_trailing_nulls_do_not_extend() {
        let ty = CqlType::tuple(vec![CqlType::int(), CqlType::text()]);
        let a = CqlValue::Tuple(vec![CqlValue::Int(1)]);
        let b = CqlValue::Tuple(vec![CqlValue::Int(1), CqlValue::Null]);
        assert_eq!(compare(&ty, &a, &b), Ordering::Equal);
        let c = CqlValue::Tuple(vec![CqlValue::Int(1), CqlValue::text("")]);
        assert_eq!(compare(&ty, &a, &c), Ordering::Less);
    }

    #[test]
    fn test_set_order_insensitive() {
        let ty = CqlType::set(CqlType::int());
        let a = CqlValue::Set(vec![CqlValue::Int(3), CqlValue::Int(1)]);
        let b = CqlValue::Set(vec![CqlValue::Int(1), CqlValue::Int(3)]);
        assert_eq!(compare(&ty, &a, &b), Ordering::Equal);
    }

    #[test]
    fn test_map_by_key_then_value() {
        let ty = CqlType::map(CqlType::int(), CqlType::text());
        let a = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::text("b"))]);
        let b = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::text("c"))]);
        let c = CqlValue::Map(vec![(CqlValue::Int(0), CqlValue::text("z"))]);
        assert_eq!(compare(&ty, &a, &b), Ordering::Less);
        assert_eq!(compare(&ty, &c, &a), Ordering::Less);
    }

    #[test]
    fn test_set_repeats_count_once() {
        let ty = CqlType::set(CqlType::int());
        let repeated = CqlValue::Set(vec![CqlValue::Int(2), CqlValue::Int(1), CqlValue::Int(2)]);
        let plain = CqlValue::Set(vec![CqlValue::Int(1), CqlValue::Int(2)]);
        assert_eq!(compare(&ty, &repeated, &plain), Ordering::Equal);
        assert_eq!(compare(&ty, &plain, &repeated), Ordering::Equal);
    }

    #[test]
    fn test_map_first_entry_per_key_wins() {
        let ty = CqlType::map(CqlType::int(), CqlType::int());
        let repeated = CqlValue::Map(vec![
            (CqlValue::Int(1), CqlValue::Int(10)),
            (CqlValue::Int(1), CqlValue::Int(99)),
        ]);
        let first = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::Int(10))]);
        assert_eq!(compare(&ty, &repeated, &first), Ordering::Equal);
        let second = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::Int(99))]);
        assert_eq!(compare(&ty, &repeated, &second), Ordering::Less);
    }

    #[test]
    fn test_udt_positional() {
        let ty = CqlType::udt("ks", "t")
            .with_field("a", CqlType::int())
            .with_field("b", CqlType::int())
            .build();
        let a: UdtValue = [("b".to_string(), CqlValue::Int(9))].into_iter().collect();
        let b: UdtValue = [("a".to_string(), CqlValue::Int(0))].into_iter().collect();
        // `a` is the first field, so a null `a` sorts first regardless of `b`.
        assert_eq!(
            compare(&ty, &CqlValue::Udt(a), &CqlValue::Udt(b)),
            Ordering::Less
        );
    }

    #[test]
    fn test_uuid_signed_halves() {
        let high = Uuid::from_u128(0x8000_0000_0000_0000_0000_0000_0000_0000);
        let low = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
        assert_eq!(
            compare(&CqlType::uuid(), &CqlValue::Uuid(high), &CqlValue::Uuid(low)),
            Ordering::Less
        );
    }

    #[test]
    fn test_timeuuid_by_timestamp() {
        // time_low is larger in `a`, but time_hi is larger in `b`.
        let a = Uuid::from_u128(0xffff_ffff_0000_1000_8000_0000_0000_0000);
        let b = Uuid::from_u128(0x0000_0000_0000_1001_8000_0000_0000_0000);
        assert_eq!(
            compare(&CqlType::timeuuid(), &CqlValue::TimeUuid(a), &CqlValue::TimeUuid(b)),
            Ordering::Less
        );
    }

    #[test]
    fn test_decimal_numeric() {
        let ty = CqlType::decimal();
        let a = CqlValue::Decimal(Decimal::new(15, 1));
        let b = CqlValue::Decimal(Decimal::new(2, 0));
        assert_eq!(compare(&ty, &a, &b), Ordering::Less);
        let c = CqlValue::Decimal(Decimal::new(150, 2));
        assert_ne!(compare(&ty, &a, &c), Ordering::Equal);
    }
}
