// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection, tuple and UDT layouts.

use super::buffer::{ByteReader, ByteWriter};
use super::{Codec, Slot};
use crate::compare::compare;
use crate::error::{CodecError, Result};
use crate::types::{CqlType, UdtDescriptor};
use crate::value::{CqlValue, UdtValue};
use std::cmp::Ordering;
use std::collections::HashSet;

impl Codec<'_> {
    pub(super) fn encode_list(&self, elem: &CqlType, value: &CqlValue, w: &mut ByteWriter) -> Result<()> {
        let items = match value {
            CqlValue::List(items) => items,
            other => return Err(CodecError::mismatch("list", other.kind_name())),
        };
        w.write_count(items.len())?;
        for item in items {
            w.write_value(self.encode_element(elem, item)?.as_deref())?;
        }
        Ok(())
    }

    /// Elements go out in collation order, ties broken by encoded bytes;
    /// byte-identical duplicates are written once.
    pub(super) fn encode_set(&self, elem: &CqlType, value: &CqlValue, w: &mut ByteWriter) -> Result<()> {
        let items = match value {
            CqlValue::Set(items) => items,
            other => return Err(CodecError::mismatch("set", other.kind_name())),
        };
        let mut encoded = items
            .iter()
            .map(|item| -> Result<_> { Ok((item, self.encode_element(elem, item)?)) })
            .collect::<Result<Vec<_>>>()?;
        let order = self.resolve_type(elem)?;
        encoded.sort_by(|(a, a_bytes), (b, b_bytes)| by_value_then_bytes(&order, a, a_bytes, b, b_bytes));
        encoded.dedup_by(|(_, a), (_, b)| a == b);

        w.write_count(encoded.len())?;
        for (_, bytes) in &encoded {
            w.write_value(bytes.as_deref())?;
        }
        Ok(())
    }

    /// Entries go out sorted by key; later entries with a byte-identical key are dropped.
    pub(super) fn encode_map(
        &self,
        key: &CqlType,
        val: &CqlType,
        value: &CqlValue,
        w: &mut ByteWriter,
    ) -> Result<()> {
        let entries = match value {
            CqlValue::Map(entries) => entries,
            other => return Err(CodecError::mismatch("map", other.kind_name())),
        };
        let mut encoded = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            encoded.push((k, self.encode_element(key, k)?, self.encode_element(val, v)?));
        }
        let order = self.resolve_type(key)?;
        encoded.sort_by(|(a, a_bytes, _), (b, b_bytes, _)| by_value_then_bytes(&order, a, a_bytes, b, b_bytes));
        encoded.dedup_by(|(_, a, _), (_, b, _)| a == b);

        w.write_count(encoded.len())?;
        for (_, k, v) in &encoded {
            w.write_value(k.as_deref())?;
            w.write_value(v.as_deref())?;
        }
        Ok(())
    }

    pub(super) fn encode_tuple(
        &self,
        elements: &[CqlType],
        value: &CqlValue,
        w: &mut ByteWriter,
    ) -> Result<()> {
        let items = match value {
            CqlValue::Tuple(items) => items,
            other => return Err(CodecError::mismatch("tuple", other.kind_name())),
        };
        if items.len() > elements.len() {
            return Err(CodecError::SchemaMismatch {
                type_name: format!("tuple<{} elements>", elements.len()),
                expected: elements.len(),
                found: items.len(),
            });
        }
        for (i, ety) in elements.iter().enumerate() {
            let item = items.get(i).unwrap_or(&CqlValue::Null);
            w.write_value(self.encode_element(ety, item)?.as_deref())?;
        }
        Ok(())
    }

    pub(super) fn encode_udt(
        &self,
        declared: &UdtDescriptor,
        value: &CqlValue,
        frozen: bool,
        w: &mut ByteWriter,
    ) -> Result<()> {
        let fields = match value {
            CqlValue::Udt(fields) => fields,
            other => return Err(CodecError::mismatch(declared.qualified_name(), other.kind_name())),
        };
        let udt = self.resolve_udt(declared)?;
        if let Some((unknown, _)) = fields.iter().find(|(name, _)| udt.position(name).is_none()) {
            return Err(CodecError::mismatch(
                format!("a field of {}", udt.qualified_name()),
                format!("field '{}'", unknown),
            ));
        }
        if !frozen {
            w.write_count(udt.len())?;
        }
        for field in udt.fields() {
            let item = fields.get(&field.name).unwrap_or(&CqlValue::Null);
            w.write_value(self.encode_element(&field.ty, item)?.as_deref())?;
        }
        Ok(())
    }

    /// Shared by lists and sets. With `distinct`, a payload repeating an
    /// earlier one is dropped, as the encoder drops it.
    pub(super) fn decode_list(&self, elem: &CqlType, bytes: &[u8], distinct: bool) -> Result<Vec<CqlValue>> {
        let mut r = ByteReader::new(bytes);
        if !r.has_length_field() {
            return Ok(Vec::new());
        }
        let count = r.read_count()?;
        let mut items = Vec::with_capacity(count.min(r.remaining() / 4));
        let mut seen = HashSet::new();
        for i in 0..count {
            if !r.has_length_field() {
                log::trace!("collection truncated after {} of {} elements", i, count);
                return Ok(items);
            }
            let payload = r.read_value()?;
            let item = self.decode_element(elem, payload, Slot::Element)?;
            if distinct && !seen.insert(payload_key(payload, &item)) {
                log::trace!("repeated set element at index {} dropped", i);
                continue;
            }
            items.push(item);
        }
        expect_consumed(&r)?;
        Ok(items)
    }

    /// Of entries with byte-identical keys, the first one is kept.
    pub(super) fn decode_map(&self, key: &CqlType, val: &CqlType, bytes: &[u8]) -> Result<CqlValue> {
        let mut r = ByteReader::new(bytes);
        if !r.has_length_field() {
            return Ok(CqlValue::Map(Vec::new()));
        }
        let count = r.read_count()?;
        let mut entries = Vec::with_capacity(count.min(r.remaining() / 8));
        let mut seen = HashSet::new();
        for i in 0..count {
            if !r.has_length_field() {
                log::trace!("map truncated after {} of {} entries", i, count);
                return Ok(CqlValue::Map(entries));
            }
            let key_payload = r.read_value()?;
            let k = self.decode_element(key, key_payload, Slot::Element)?;
            if !r.has_length_field() {
                log::trace!("map truncated inside entry {} of {}", i, count);
                return Ok(CqlValue::Map(entries));
            }
            let v = self.decode_element(val, r.read_value()?, Slot::Element)?;
            if !seen.insert(payload_key(key_payload, &k)) {
                log::trace!("repeated map key at entry {} dropped", i);
                continue;
            }
            entries.push((k, v));
        }
        expect_consumed(&r)?;
        Ok(CqlValue::Map(entries))
    }

    /// Positions missing from a truncated buffer decode as null.
    pub(super) fn decode_tuple(&self, elements: &[CqlType], bytes: &[u8]) -> Result<CqlValue> {
        let mut r = ByteReader::new(bytes);
        let items = self.read_positional(elements.iter(), Slot::Position, &mut r)?;
        expect_consumed(&r)?;
        Ok(CqlValue::Tuple(items))
    }

    pub(super) fn decode_udt(&self, declared: &UdtDescriptor, bytes: &[u8], frozen: bool) -> Result<CqlValue> {
        let udt = self.resolve_udt(declared)?;
        let mut r = ByteReader::new(bytes);
        if !frozen && r.has_length_field() {
            let count = r.read_count()?;
            if count != udt.len() {
                log::debug!(
                    "{} declares {} fields, buffer carries {}",
                    udt.qualified_name(),
                    udt.len(),
                    count
                );
                return Err(CodecError::SchemaMismatch {
                    type_name: udt.qualified_name(),
                    expected: udt.len(),
                    found: count,
                });
            }
        }
        let items = self.read_positional(udt.fields().iter().map(|f| &f.ty), Slot::Element, &mut r)?;
        expect_consumed(&r)?;

        let mut out = UdtValue::new();
        for (field, item) in udt.fields().iter().zip(items) {
            out.set(field.name.clone(), item);
        }
        Ok(CqlValue::Udt(out))
    }

    fn read_positional<'t>(
        &self,
        types: impl ExactSizeIterator<Item = &'t CqlType>,
        slot: Slot,
        r: &mut ByteReader<'_>,
    ) -> Result<Vec<CqlValue>> {
        let total = types.len();
        let mut items = Vec::with_capacity(total);
        for (i, ty) in types.enumerate() {
            if !r.has_length_field() {
                if i > 0 || !r.is_empty() {
                    log::trace!("value truncated after {} of {} positions", i, total);
                }
                items.resize(total, CqlValue::Null);
                break;
            }
            items.push(self.decode_element(ty, r.read_value()?, slot)?);
        }
        Ok(items)
    }
}

/// Identity of a decoded payload for de-duplication; every null is the same.
fn payload_key<'b>(payload: Option<&'b [u8]>, decoded: &CqlValue) -> Option<&'b [u8]> {
    payload.filter(|_| !decoded.is_null())
}

fn by_value_then_bytes(
    ty: &CqlType,
    a: &CqlValue,
    a_bytes: &Option<Vec<u8>>,
    b: &CqlValue,
    b_bytes: &Option<Vec<u8>>,
) -> Ordering {
    compare(ty, a, b).then_with(|| a_bytes.cmp(b_bytes))
}

/// Fewer than a length field's worth of trailing bytes is the designed
/// early-stop case; a full unread length field is not.
fn expect_consumed(r: &ByteReader<'_>) -> Result<()> {
    if r.has_length_field() {
        Err(CodecError::malformed(format!(
            "{} trailing bytes at offset {}",
            r.remaining(),
            r.position()
        )))
    } else {
        Ok(())
    }
}
