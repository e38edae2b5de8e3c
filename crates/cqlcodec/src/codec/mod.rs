// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary encoding of logical values.
//!
//! # Layouts
//!
//! ```text
//! list / set / map : count(4) { len(4) bytes }*          (map: key, value per entry)
//! tuple            :          { len(4) bytes }*          (one per declared position)
//! udt, multi-cell  : count(4) { len(4) bytes }*          (one per declared field)
//! udt, frozen      :          { len(4) bytes }*
//! ```
//!
//! Lengths and counts are big-endian `i32`; a negative length is a null
//! element. Anything nested inside another value uses its frozen layout.
//!
//! A zero length is absent too, except in tuple positions, where it is the
//! empty value of ascii, text, blob and empty. A payload of type `empty` is
//! always zero bytes long, so it reads back as `Empty` everywhere.

mod buffer;
mod composite;
mod primitives;

pub use buffer::{ByteReader, ByteWriter};

use crate::compare::compare;
use crate::error::{CodecError, Result};
use crate::registry::UdtRegistry;
use crate::types::{CqlType, PrimitiveKind, UdtDescriptor};
use crate::value::CqlValue;
use std::cmp::Ordering;
use std::sync::Arc;

/// Where an element payload sits, which decides how a zero length reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Collection element, map key or value, UDT field.
    Element,
    /// Tuple position.
    Position,
}

/// Serializer/deserializer bound to an authoritative UDT registry.
///
/// Holds no state besides the registry reference, so one codec can be
/// shared by any number of threads.
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    registry: &'a dyn UdtRegistry,
}

impl<'a> Codec<'a> {
    pub fn new(registry: &'a dyn UdtRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a dyn UdtRegistry {
        self.registry
    }

    /// Encode a top-level column value.
    pub fn serialize(&self, ty: &CqlType, value: &CqlValue) -> Result<Vec<u8>> {
        self.serialize_with(ty, value, false)
    }

    /// Encode a value; `nested` forces the frozen layout.
    pub fn serialize_with(&self, ty: &CqlType, value: &CqlValue, nested: bool) -> Result<Vec<u8>> {
        if value.is_null() {
            return Err(CodecError::mismatch(
                format!("a {} value", ty),
                "null (nulls only exist inside a container)",
            ));
        }
        let mut w = ByteWriter::new();
        self.encode(ty, value, nested, &mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode a top-level column value.
    pub fn deserialize(&self, ty: &CqlType, bytes: &[u8]) -> Result<CqlValue> {
        self.deserialize_with(ty, bytes, false)
    }

    /// Decode a value; `nested` selects the frozen layout.
    pub fn deserialize_with(&self, ty: &CqlType, bytes: &[u8], nested: bool) -> Result<CqlValue> {
        self.decode(ty, bytes, nested)
    }

    /// Registered descriptor for `udt`, the only trusted source of field order.
    pub fn resolve_udt(&self, udt: &UdtDescriptor) -> Result<Arc<UdtDescriptor>> {
        self.registry.lookup(udt.keyspace(), udt.name())
    }

    /// `ty` with every UDT, at any depth, replaced by its registered definition.
    pub fn resolve_type(&self, ty: &CqlType) -> Result<CqlType> {
        let resolved = match ty {
            CqlType::Primitive(_) => ty.clone(),
            CqlType::List(elem) => CqlType::list(self.resolve_type(elem)?),
            CqlType::Set(elem) => CqlType::set(self.resolve_type(elem)?),
            CqlType::Map(key, val) => CqlType::map(self.resolve_type(key)?, self.resolve_type(val)?),
            CqlType::Tuple(elements) => CqlType::tuple(
                elements
                    .iter()
                    .map(|e| self.resolve_type(e))
                    .collect::<Result<_>>()?,
            ),
            CqlType::Udt(declared) => {
                let udt = self.resolve_udt(declared)?;
                let mut builder = CqlType::udt(udt.keyspace(), udt.name());
                for field in udt.fields() {
                    builder = builder.with_field(field.name.clone(), self.resolve_type(&field.ty)?);
                }
                builder.build()
            }
            CqlType::Frozen(inner) => CqlType::frozen(self.resolve_type(inner)?),
        };
        Ok(resolved)
    }

    /// Collation order of two values, with UDT fields walked in registered order.
    pub fn compare(&self, ty: &CqlType, a: &CqlValue, b: &CqlValue) -> Result<Ordering> {
        Ok(compare(&self.resolve_type(ty)?, a, b))
    }

    pub(crate) fn encode(
        &self,
        ty: &CqlType,
        value: &CqlValue,
        frozen: bool,
        w: &mut ByteWriter,
    ) -> Result<()> {
        match ty {
            CqlType::Frozen(inner) => self.encode(inner, value, true, w),
            CqlType::Primitive(kind) => primitives::encode_primitive(*kind, value, w),
            CqlType::List(elem) => self.encode_list(elem, value, w),
            CqlType::Set(elem) => self.encode_set(elem, value, w),
            CqlType::Map(key, val) => self.encode_map(key, val, value, w),
            CqlType::Tuple(elements) => self.encode_tuple(elements, value, w),
            CqlType::Udt(udt) => self.encode_udt(udt, value, frozen, w),
        }
    }

    pub(crate) fn decode(&self, ty: &CqlType, bytes: &[u8], frozen: bool) -> Result<CqlValue> {
        match ty {
            CqlType::Frozen(inner) => self.decode(inner, bytes, true),
            CqlType::Primitive(kind) => primitives::decode_primitive(*kind, bytes),
            CqlType::List(elem) => self.decode_list(elem, bytes, false).map(CqlValue::List),
            CqlType::Set(elem) => self.decode_list(elem, bytes, true).map(CqlValue::Set),
            CqlType::Map(key, val) => self.decode_map(key, val, bytes),
            CqlType::Tuple(elements) => self.decode_tuple(elements, bytes),
            CqlType::Udt(udt) => self.decode_udt(udt, bytes, frozen),
        }
    }

    /// Frozen payload of one element, or `None` for null.
    pub(crate) fn encode_element(&self, ty: &CqlType, value: &CqlValue) -> Result<Option<Vec<u8>>> {
        if value.is_null() {
            return Ok(None);
        }
        let mut inner = ByteWriter::new();
        self.encode(ty, value, true, &mut inner)?;
        Ok(Some(inner.into_bytes()))
    }

    /// Decode one element payload found at `slot`.
    pub(crate) fn decode_element(&self, ty: &CqlType, payload: Option<&[u8]>, slot: Slot) -> Result<CqlValue> {
        let keeps_empty = |kind: PrimitiveKind| match slot {
            Slot::Position => kind.allows_empty(),
            Slot::Element => kind == PrimitiveKind::Empty,
        };
        match payload {
            None => Ok(CqlValue::Null),
            Some([]) if !ty.as_primitive().is_some_and(keeps_empty) => Ok(CqlValue::Null),
            Some(bytes) => self.decode(ty, bytes, true),
        }
    }
}

impl std::fmt::Debug for Codec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::value::UdtValue;

    fn ab_type() -> CqlType {
        CqlType::udt("ks", "ab")
            .with_field("a", CqlType::text())
            .with_field("b", CqlType::int())
            .build()
    }

    #[test]
    fn test_frozen_udt_scenario() {
        let ty = CqlType::frozen(ab_type());
        let registry = SchemaRegistry::new();
        registry.register_all(&ty);
        let codec = Codec::new(&registry);

        let full = CqlValue::Udt(
            UdtValue::new()
                .with("a", CqlValue::text("x"))
                .with("b", CqlValue::Int(5)),
        );
        let bytes = codec.serialize(&ty, &full).expect("serialize");
        assert_eq!(bytes, vec![0, 0, 0, 1, b'x', 0, 0, 0, 4, 0, 0, 0, 5]);
        assert_eq!(codec.deserialize(&ty, &bytes).expect("deserialize"), full);

        let partial = CqlValue::Udt(UdtValue::new().with("b", CqlValue::Int(5)));
        let bytes = codec.serialize(&ty, &partial).expect("serialize");
        let decoded = codec.deserialize(&ty, &bytes).expect("deserialize");
        let udt = decoded.as_udt().expect("udt");
        assert!(udt.is_null("a"));
        assert_eq!(udt.get("b"), Some(&CqlValue::Int(5)));
    }

    #[test]
    fn test_multi_cell_udt_has_count() {
        let ty = ab_type();
        let registry = SchemaRegistry::new();
        registry.register_all(&ty);
        let codec = Codec::new(&registry);

        let value = CqlValue::Udt(UdtValue::new().with("b", CqlValue::Int(1)));
        let bytes = codec.serialize(&ty, &value).expect("serialize");
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        assert_eq!(bytes.len(), 4 + 4 + 4 + 4);
        assert_eq!(codec.deserialize(&ty, &bytes).expect("deserialize"), value);
    }

    #[test]
    fn test_set_written_sorted() {
        let registry = SchemaRegistry::new();
        let codec = Codec::new(&registry);
        let ty = CqlType::set(CqlType::int());
        let value = CqlValue::Set(vec![CqlValue::Int(3), CqlValue::Int(1), CqlValue::Int(2)]);
        let bytes = codec.serialize(&ty, &value).expect("serialize");
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        let ints: Vec<i32> = bytes[4..]
            .chunks(8)
            .map(|c| i32::from_be_bytes([c[4], c[5], c[6], c[7]]))
            .collect();
        assert_eq!(ints, vec![1, 2, 3]);

        let decoded = codec.deserialize(&ty, &bytes).expect("deserialize");
        assert_eq!(
            decoded,
            CqlValue::Set(vec![CqlValue::Int(2), CqlValue::Int(3), CqlValue::Int(1)])
        );
    }

    #[test]
    fn test_unregistered_udt() {
        let registry = SchemaRegistry::new();
        let codec = Codec::new(&registry);
        let value = CqlValue::Udt(UdtValue::new());
        assert!(matches!(
            codec.serialize(&ab_type(), &value),
            Err(CodecError::TypeNotRegistered { .. })
        ));
    }

    #[test]
    fn test_compare_follows_registered_field_order() {
        let registered = ab_type();
        let stale = CqlType::udt("ks", "ab")
            .with_field("b", CqlType::int())
            .with_field("a", CqlType::text())
            .build();
        let registry = SchemaRegistry::new();
        registry.register_all(&registered);
        let codec = Codec::new(&registry);

        let first = CqlValue::Udt(UdtValue::new().with("a", CqlValue::text("a")).with("b", CqlValue::Int(9)));
        let second = CqlValue::Udt(UdtValue::new().with("a", CqlValue::text("b")).with("b", CqlValue::Int(1)));
        assert_eq!(registered.compare(&first, &second), Ordering::Less);
        assert_eq!(stale.compare(&first, &second), Ordering::Greater);
        assert_eq!(codec.compare(&stale, &first, &second).expect("compare"), Ordering::Less);
        let nested = CqlType::list(CqlType::frozen(stale));
        let (first, second) = (CqlValue::List(vec![first]), CqlValue::List(vec![second]));
        assert_eq!(codec.compare(&nested, &first, &second).expect("compare"), Ordering::Less);
    }

    #[test]
    fn test_compare_unregistered_udt() {
        let registry = SchemaRegistry::new();
        let codec = Codec::new(&registry);
        let value = CqlValue::Udt(UdtValue::new());
        assert!(matches!(
            codec.compare(&ab_type(), &value, &value),
            Err(CodecError::TypeNotRegistered { .. })
        ));
    }

    #[test]
    fn test_top_level_null_rejected() {
        let registry = SchemaRegistry::new();
        let codec = Codec::new(&registry);
        assert!(codec.serialize(&CqlType::int(), &CqlValue::Null).is_err());
    }
}
