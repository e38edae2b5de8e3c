// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON rendering of logical values, for display and diagnostics.
//!
//! The mapping is lossy on purpose: varint and decimal become strings,
//! blobs become `0x`-prefixed hex, and maps with non-text keys become
//! arrays of `[key, value]` pairs.

use crate::compare::compare;
use crate::types::CqlType;
use crate::value::CqlValue;
use serde_json::{Map, Number, Value};
use std::fmt::Write as _;

/// Render a value without type information. Set and map entries keep
/// their in-memory order.
pub fn to_json(value: &CqlValue) -> Value {
    match value {
        CqlValue::Null => Value::Null,
        CqlValue::Ascii(s) | CqlValue::Text(s) => Value::String(s.clone()),
        CqlValue::Boolean(b) => Value::Bool(*b),
        CqlValue::TinyInt(v) => Value::from(*v),
        CqlValue::SmallInt(v) => Value::from(*v),
        CqlValue::Int(v) => Value::from(*v),
        CqlValue::BigInt(v) | CqlValue::Timestamp(v) | CqlValue::Time(v) => Value::from(*v),
        CqlValue::Date(v) => Value::from(*v),
        CqlValue::Float(v) => float(f64::from(*v)),
        CqlValue::Double(v) => float(*v),
        CqlValue::Uuid(u) | CqlValue::TimeUuid(u) => Value::String(u.hyphenated().to_string()),
        CqlValue::Inet(addr) => Value::String(addr.to_string()),
        CqlValue::Blob(bytes) => Value::String(hex(bytes)),
        CqlValue::Varint(v) => Value::String(v.to_string()),
        CqlValue::Decimal(d) => Value::String(d.to_string()),
        CqlValue::Empty => Value::String(String::new()),
        CqlValue::List(items) | CqlValue::Set(items) | CqlValue::Tuple(items) => {
            Value::Array(items.iter().map(to_json).collect())
        }
        CqlValue::Map(entries) => map_entries(entries.iter().map(|(k, v)| (k, v))),
        CqlValue::Udt(udt) => Value::Object(
            udt.iter()
                .map(|(name, v)| (name.to_string(), to_json(v)))
                .collect(),
        ),
    }
}

/// Render a value in canonical order: set elements and map entries sorted
/// by the type's comparator. Absent UDT fields are omitted.
pub fn to_json_typed(ty: &CqlType, value: &CqlValue) -> Value {
    match (ty.base(), value) {
        (CqlType::List(elem), CqlValue::List(items)) => {
            Value::Array(items.iter().map(|v| to_json_typed(elem, v)).collect())
        }
        (CqlType::Set(elem), CqlValue::Set(items)) => {
            let mut sorted: Vec<&CqlValue> = items.iter().collect();
            sorted.sort_by(|a, b| compare(elem, a, b));
            Value::Array(sorted.into_iter().map(|v| to_json_typed(elem, v)).collect())
        }
        (CqlType::Map(kty, vty), CqlValue::Map(entries)) => {
            let mut sorted: Vec<&(CqlValue, CqlValue)> = entries.iter().collect();
            sorted.sort_by(|a, b| compare(kty, &a.0, &b.0));
            let rendered: Vec<(Value, Value)> = sorted
                .into_iter()
                .map(|(k, v)| (to_json_typed(kty, k), to_json_typed(vty, v)))
                .collect();
            rendered_map(rendered)
        }
        (CqlType::Tuple(types), CqlValue::Tuple(items)) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| match types.get(i) {
                    Some(ety) => to_json_typed(ety, v),
                    None => to_json(v),
                })
                .collect(),
        ),
        (CqlType::Udt(udt), CqlValue::Udt(fields)) => {
            let mut out = Map::new();
            for field in udt.fields() {
                if let Some(v) = fields.get(&field.name) {
                    out.insert(field.name.clone(), to_json_typed(&field.ty, v));
                }
            }
            Value::Object(out)
        }
        _ => to_json(value),
    }
}

/// Lowercase hex with a `0x` prefix.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

fn float(v: f64) -> Value {
    Number::from_f64(v).map_or_else(|| Value::String(v.to_string()), Value::Number)
}

fn map_entries<'a>(entries: impl Iterator<Item = (&'a CqlValue, &'a CqlValue)>) -> Value {
    rendered_map(entries.map(|(k, v)| (to_json(k), to_json(v))).collect())
}

fn rendered_map(entries: Vec<(Value, Value)>) -> Value {
    if entries.iter().all(|(k, _)| k.is_string()) {
        Value::Object(
            entries
                .into_iter()
                .filter_map(|(k, v)| match k {
                    Value::String(s) => Some((s, v)),
                    _ => None,
                })
                .collect(),
        )
    } else {
        Value::Array(
            entries
                .into_iter()
                .map(|(k, v)| Value::Array(vec![k, v]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::UdtValue;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(to_json(&CqlValue::Int(5)), json!(5));
        assert_eq!(to_json(&CqlValue::text("x")), json!("x"));
        assert_eq!(to_json(&CqlValue::Blob(vec![0xde, 0xad])), json!("0xdead"));
        assert_eq!(to_json(&CqlValue::Double(f64::NAN)), json!("NaN"));
        assert_eq!(to_json(&CqlValue::Null), Value::Null);
    }

    #[test]
    fn test_map_with_int_keys_is_pair_array() {
        let value = CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::text("a"))]);
        assert_eq!(to_json(&value), json!([[1, "a"]]));
    }

    #[test]
    fn test_typed_sorts_sets_and_renders_udt() {
        let ty = CqlType::set(CqlType::int());
        let value = CqlValue::Set(vec![CqlValue::Int(3), CqlValue::Int(-1), CqlValue::Int(2)]);
        assert_eq!(to_json_typed(&ty, &value), json!([-1, 2, 3]));

        let udt = CqlType::udt("ks", "p")
            .with_field("z", CqlType::int())
            .with_field("a", CqlType::text())
            .build();
        let value = CqlValue::Udt(
            UdtValue::new()
                .with("a", CqlValue::text("x"))
                .with("z", CqlValue::Int(1)),
        );
        assert_eq!(to_json_typed(&udt, &value), json!({"z": 1, "a": "x"}));
    }
}
