// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compact binary form of type descriptors, for shipping a column's type
//! between processes.
//!
//! ```text
//! primitive : tag(1)                           (0x01..=0x13)
//! list/set  : tag(1) element
//! map       : tag(1) key value
//! tuple     : tag(1) count(4) element*
//! udt       : tag(1) str(keyspace) str(name) count(4) { str(field) type }*
//! frozen    : tag(1) inner
//! str       : len(4) utf-8 bytes
//! ```

use crate::codec::{ByteReader, ByteWriter};
use crate::config::MAX_TYPE_NESTING;
use crate::error::{CodecError, Result};
use crate::types::{CqlType, PrimitiveKind};

const TAG_LIST: u8 = 0x20;
const TAG_SET: u8 = 0x21;
const TAG_MAP: u8 = 0x22;
const TAG_TUPLE: u8 = 0x23;
const TAG_UDT: u8 = 0x24;
const TAG_FROZEN: u8 = 0x30;

fn primitive_tag(kind: PrimitiveKind) -> u8 {
    match kind {
        PrimitiveKind::Ascii => 0x01,
        PrimitiveKind::Text => 0x02,
        PrimitiveKind::Boolean => 0x03,
        PrimitiveKind::TinyInt => 0x04,
        PrimitiveKind::SmallInt => 0x05,
        PrimitiveKind::Int => 0x06,
        PrimitiveKind::BigInt => 0x07,
        PrimitiveKind::Float => 0x08,
        PrimitiveKind::Double => 0x09,
        PrimitiveKind::Timestamp => 0x0A,
        PrimitiveKind::Date => 0x0B,
        PrimitiveKind::Time => 0x0C,
        PrimitiveKind::Uuid => 0x0D,
        PrimitiveKind::TimeUuid => 0x0E,
        PrimitiveKind::Inet => 0x0F,
        PrimitiveKind::Blob => 0x10,
        PrimitiveKind::Varint => 0x11,
        PrimitiveKind::Decimal => 0x12,
        PrimitiveKind::Empty => 0x13,
    }
}

fn primitive_from_tag(tag: u8) -> Option<PrimitiveKind> {
    PrimitiveKind::ALL
        .into_iter()
        .find(|&kind| primitive_tag(kind) == tag)
}

/// Append the binary form of `ty`.
pub fn write_type(ty: &CqlType, w: &mut ByteWriter) -> Result<()> {
    match ty {
        CqlType::Primitive(kind) => w.write_u8(primitive_tag(*kind)),
        CqlType::List(elem) => {
            w.write_u8(TAG_LIST)?;
            write_type(elem, w)
        }
        CqlType::Set(elem) => {
            w.write_u8(TAG_SET)?;
            write_type(elem, w)
        }
        CqlType::Map(key, val) => {
            w.write_u8(TAG_MAP)?;
            write_type(key, w)?;
            write_type(val, w)
        }
        CqlType::Tuple(elements) => {
            w.write_u8(TAG_TUPLE)?;
            w.write_count(elements.len())?;
            elements.iter().try_for_each(|e| write_type(e, w))
        }
        CqlType::Udt(udt) => {
            w.write_u8(TAG_UDT)?;
            write_str(udt.keyspace(), w)?;
            write_str(udt.name(), w)?;
            w.write_count(udt.len())?;
            for field in udt.fields() {
                write_str(&field.name, w)?;
                write_type(&field.ty, w)?;
            }
            Ok(())
        }
        CqlType::Frozen(inner) => {
            w.write_u8(TAG_FROZEN)?;
            write_type(inner, w)
        }
    }
}

/// Read one type descriptor written by [`write_type`].
pub fn read_type(r: &mut ByteReader<'_>) -> Result<CqlType> {
    read_nested(r, 0)
}

/// Binary form of `ty` as a fresh buffer.
pub fn type_to_bytes(ty: &CqlType) -> Result<Vec<u8>> {
    let mut w = ByteWriter::new();
    write_type(ty, &mut w)?;
    Ok(w.into_bytes())
}

/// Decode a buffer holding exactly one type descriptor.
pub fn type_from_bytes(bytes: &[u8]) -> Result<CqlType> {
    let mut r = ByteReader::new(bytes);
    let ty = read_type(&mut r)?;
    if !r.is_empty() {
        return Err(CodecError::malformed(format!(
            "{} trailing bytes after type {}",
            r.remaining(),
            ty
        )));
    }
    Ok(ty)
}

fn read_nested(r: &mut ByteReader<'_>, depth: usize) -> Result<CqlType> {
    if depth > MAX_TYPE_NESTING {
        return Err(CodecError::malformed(format!(
            "type nesting deeper than {}",
            MAX_TYPE_NESTING
        )));
    }
    let tag = r.read_bytes(1)?[0];
    if let Some(kind) = primitive_from_tag(tag) {
        return Ok(CqlType::Primitive(kind));
    }
    let next = depth + 1;
    match tag {
        TAG_LIST => Ok(CqlType::list(read_nested(r, next)?)),
        TAG_SET => Ok(CqlType::set(read_nested(r, next)?)),
        TAG_MAP => {
            let key = read_nested(r, next)?;
            let val = read_nested(r, next)?;
            Ok(CqlType::map(key, val))
        }
        TAG_TUPLE => {
            let count = r.read_count()?;
            let elements = (0..count)
                .map(|_| read_nested(r, next))
                .collect::<Result<Vec<_>>>()?;
            Ok(CqlType::tuple(elements))
        }
        TAG_UDT => {
            let keyspace = read_str(r)?;
            let name = read_str(r)?;
            let count = r.read_count()?;
            let mut builder = CqlType::udt(keyspace, name);
            for _ in 0..count {
                let field = read_str(r)?;
                builder = builder.with_field(field, read_nested(r, next)?);
            }
            Ok(builder.build())
        }
        TAG_FROZEN => Ok(CqlType::frozen(read_nested(r, next)?)),
        other => Err(CodecError::malformed(format!("unknown type tag 0x{:02x}", other))),
    }
}

fn write_str(s: &str, w: &mut ByteWriter) -> Result<()> {
    w.write_value(Some(s.as_bytes()))
}

fn read_str(r: &mut ByteReader<'_>) -> Result<String> {
    let bytes = r
        .read_value()?
        .ok_or_else(|| CodecError::malformed("null string in type descriptor"))?;
    String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 {
        type_name: "type descriptor",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> CqlType {
        let inner = CqlType::udt("ks", "inner")
            .with_field("n", CqlType::varint())
            .build();
        CqlType::udt("ks", "outer")
            .with_field("id", CqlType::timeuuid())
            .with_field("inner", CqlType::frozen(inner))
            .with_field(
                "m",
                CqlType::map(
                    CqlType::text(),
                    CqlType::frozen(CqlType::list(CqlType::tuple(vec![
                        CqlType::int(),
                        CqlType::empty(),
                    ]))),
                ),
            )
            .build()
    }

    #[test]
    fn test_descriptor_round_trip() {
        let ty = CqlType::set(CqlType::frozen(nested()));
        let bytes = type_to_bytes(&ty).expect("write");
        assert_eq!(type_from_bytes(&bytes).expect("read"), ty);
    }

    #[test]
    fn test_every_primitive_tag_is_distinct() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(primitive_from_tag(primitive_tag(kind)), Some(kind));
        }
    }

    #[test]
    fn test_udt_layout() {
        let ty = CqlType::udt("k", "t").with_field("a", CqlType::int()).build();
        let bytes = type_to_bytes(&ty).expect("write");
        assert_eq!(
            bytes,
            vec![TAG_UDT, 0, 0, 0, 1, b'k', 0, 0, 0, 1, b't', 0, 0, 0, 1, 0, 0, 0, 1, b'a', 0x06]
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(type_from_bytes(&[]).is_err());
        assert!(type_from_bytes(&[0x7f]).is_err());
        assert!(type_from_bytes(&[TAG_LIST]).is_err());
        assert!(type_from_bytes(&[0x06, 0x06]).is_err());
        assert!(type_from_bytes(&vec![TAG_LIST; 1000]).is_err());
    }
}
