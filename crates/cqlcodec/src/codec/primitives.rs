// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf encodings.
//!
//! A primitive payload never carries its own length: the enclosing container
//! (or the cell, at top level) delimits it.

use super::buffer::ByteWriter;
use crate::config::{DATE_EPOCH_OFFSET, NANOS_PER_DAY};
use crate::error::{CodecError, Result};
use crate::types::PrimitiveKind;
use crate::value::{CqlValue, Decimal};
use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigInt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

pub(crate) fn encode_primitive(kind: PrimitiveKind, value: &CqlValue, w: &mut ByteWriter) -> Result<()> {
    match (kind, value) {
        (PrimitiveKind::Ascii, CqlValue::Ascii(s) | CqlValue::Text(s)) => {
            if !s.is_ascii() {
                return Err(CodecError::mismatch("ascii", format!("non-ASCII text {:?}", s)));
            }
            w.write_bytes(s.as_bytes());
        }
        (PrimitiveKind::Text, CqlValue::Text(s) | CqlValue::Ascii(s)) => w.write_bytes(s.as_bytes()),
        (PrimitiveKind::Boolean, CqlValue::Boolean(b)) => w.write_u8(u8::from(*b))?,
        (PrimitiveKind::TinyInt, CqlValue::TinyInt(v)) => w.write_i8(*v)?,
        (PrimitiveKind::SmallInt, CqlValue::SmallInt(v)) => w.write_i16(*v)?,
        (PrimitiveKind::Int, CqlValue::Int(v)) => w.write_i32(*v)?,
        (PrimitiveKind::BigInt, CqlValue::BigInt(v)) => w.write_i64(*v)?,
        (PrimitiveKind::Float, CqlValue::Float(v)) => w.write_f32(*v)?,
        (PrimitiveKind::Double, CqlValue::Double(v)) => w.write_f64(*v)?,
        (PrimitiveKind::Timestamp, CqlValue::Timestamp(ms)) => w.write_i64(*ms)?,
        (PrimitiveKind::Date, CqlValue::Date(days)) => {
            w.write_u32((*days as u32).wrapping_add(DATE_EPOCH_OFFSET))?
        }
        (PrimitiveKind::Time, CqlValue::Time(nanos)) => {
            check_time(*nanos)?;
            w.write_i64(*nanos)?
        }
        (PrimitiveKind::Uuid, CqlValue::Uuid(u)) => w.write_bytes(u.as_bytes()),
        (PrimitiveKind::TimeUuid, CqlValue::TimeUuid(u)) => {
            check_time_uuid(u)?;
            w.write_bytes(u.as_bytes())
        }
        (PrimitiveKind::Inet, CqlValue::Inet(IpAddr::V4(addr))) => w.write_bytes(&addr.octets()),
        (PrimitiveKind::Inet, CqlValue::Inet(IpAddr::V6(addr))) => w.write_bytes(&addr.octets()),
        (PrimitiveKind::Blob, CqlValue::Blob(bytes)) => w.write_bytes(bytes),
        (PrimitiveKind::Varint, CqlValue::Varint(v)) => w.write_bytes(&v.to_signed_bytes_be()),
        (PrimitiveKind::Decimal, CqlValue::Decimal(d)) => {
            w.write_i32(d.scale)?;
            w.write_bytes(&d.unscaled.to_signed_bytes_be());
        }
        (PrimitiveKind::Empty, CqlValue::Empty) => {}
        (kind, other) => return Err(CodecError::mismatch(kind.cql_name(), other.kind_name())),
    }
    Ok(())
}

pub(crate) fn decode_primitive(kind: PrimitiveKind, bytes: &[u8]) -> Result<CqlValue> {
    let value = match kind {
        PrimitiveKind::Ascii => {
            if !bytes.is_ascii() {
                return Err(CodecError::InvalidUtf8 { type_name: "ascii" });
            }
            CqlValue::Ascii(utf8(bytes, "ascii")?)
        }
        PrimitiveKind::Text => CqlValue::Text(utf8(bytes, "text")?),
        PrimitiveKind::Boolean => CqlValue::Boolean(fixed(kind, bytes)?[0] != 0),
        PrimitiveKind::TinyInt => CqlValue::TinyInt(fixed(kind, bytes)?[0] as i8),
        PrimitiveKind::SmallInt => CqlValue::SmallInt(BigEndian::read_i16(fixed(kind, bytes)?)),
        PrimitiveKind::Int => CqlValue::Int(BigEndian::read_i32(fixed(kind, bytes)?)),
        PrimitiveKind::BigInt => CqlValue::BigInt(BigEndian::read_i64(fixed(kind, bytes)?)),
        PrimitiveKind::Float => CqlValue::Float(BigEndian::read_f32(fixed(kind, bytes)?)),
        PrimitiveKind::Double => CqlValue::Double(BigEndian::read_f64(fixed(kind, bytes)?)),
        PrimitiveKind::Timestamp => {
            CqlValue::Timestamp(BigEndian::read_i64(fixed(kind, bytes)?))
        }
        PrimitiveKind::Date => {
            let raw = BigEndian::read_u32(fixed(kind, bytes)?);
            CqlValue::Date(raw.wrapping_sub(DATE_EPOCH_OFFSET) as i32)
        }
        PrimitiveKind::Time => {
            let nanos = BigEndian::read_i64(fixed(kind, bytes)?);
            check_time(nanos)?;
            CqlValue::Time(nanos)
        }
        PrimitiveKind::Uuid => CqlValue::Uuid(uuid_from(fixed(kind, bytes)?)?),
        PrimitiveKind::TimeUuid => {
            let u = uuid_from(fixed(kind, bytes)?)?;
            check_time_uuid(&u)?;
            CqlValue::TimeUuid(u)
        }
        PrimitiveKind::Inet => CqlValue::Inet(inet_from(bytes)?),
        PrimitiveKind::Blob => CqlValue::Blob(bytes.to_vec()),
        PrimitiveKind::Varint => {
            if bytes.is_empty() {
                return Err(CodecError::malformed("empty varint"));
            }
            CqlValue::Varint(BigInt::from_signed_bytes_be(bytes))
        }
        PrimitiveKind::Decimal => {
            if bytes.len() < 5 {
                return Err(CodecError::malformed(format!(
                    "decimal needs at least 5 bytes, have {}",
                    bytes.len()
                )));
            }
            let scale = BigEndian::read_i32(&bytes[..4]);
            CqlValue::Decimal(Decimal::new(BigInt::from_signed_bytes_be(&bytes[4..]), scale))
        }
        PrimitiveKind::Empty => {
            fixed(kind, bytes)?;
            CqlValue::Empty
        }
    };
    Ok(value)
}

/// Payload of exactly `kind.fixed_size()` bytes.
fn fixed(kind: PrimitiveKind, bytes: &[u8]) -> Result<&[u8]> {
    match kind.fixed_size() {
        Some(size) if bytes.len() == size => Ok(bytes),
        Some(size) => Err(CodecError::malformed(format!(
            "{} needs {} bytes, have {}",
            kind,
            size,
            bytes.len()
        ))),
        None => Ok(bytes),
    }
}

fn utf8(bytes: &[u8], type_name: &'static str) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { type_name })
}

fn uuid_from(bytes: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(bytes).map_err(|e| CodecError::malformed(e.to_string()))
}

fn inet_from(bytes: &[u8]) -> Result<IpAddr> {
    match bytes.len() {
        4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        n => Err(CodecError::malformed(format!("inet needs 4 or 16 bytes, have {}", n))),
    }
}

fn check_time(nanos: i64) -> Result<()> {
    if (0..NANOS_PER_DAY).contains(&nanos) {
        Ok(())
    } else {
        Err(CodecError::malformed(format!("time {} outside one day", nanos)))
    }
}

fn check_time_uuid(u: &Uuid) -> Result<()> {
    if u.get_version_num() == 1 {
        Ok(())
    } else {
        Err(CodecError::malformed(format!("{} is not a version 1 UUID", u)))
    }
}
