// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Positional value holders for UDTs and tuples, as a client driver fills
//! them in before binding a statement.
//!
//! Each position holds the frozen payload of one field, so a holder
//! serializes straight to the frozen wire form.

use crate::codec::{ByteReader, ByteWriter, Codec, Slot};
use crate::error::{CodecError, Result};
use crate::types::CqlType;
use crate::value::CqlValue;

/// A container whose fields are set one position at a time.
pub trait SettableByIndex {
    /// Number of positions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared type at `position`.
    fn element_type(&self, position: usize) -> Option<&CqlType>;

    /// Store an encoded payload; `None` is null.
    fn set_bytes(&mut self, position: usize, payload: Option<Vec<u8>>) -> Result<()>;

    fn get_bytes(&self, position: usize) -> Option<&[u8]>;
}

/// Holder for one UDT or tuple value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedValue {
    ty: CqlType,
    types: Vec<CqlType>,
    cells: Vec<Option<Vec<u8>>>,
}

impl IndexedValue {
    /// Empty holder for a tuple or UDT type. UDT positions follow the
    /// registered field order.
    pub fn for_type(codec: &Codec<'_>, ty: &CqlType) -> Result<Self> {
        let (ty, types) = match ty.base() {
            CqlType::Tuple(elements) => (ty.base().clone(), elements.clone()),
            CqlType::Udt(declared) => {
                let udt = codec.resolve_udt(declared)?;
                let types = udt.fields().iter().map(|f| f.ty.clone()).collect();
                (CqlType::Udt(udt), types)
            }
            other => {
                return Err(CodecError::mismatch("a tuple or UDT type", other.cql_name()));
            }
        };
        let cells = vec![None; types.len()];
        Ok(Self { ty, types, cells })
    }

    /// The tuple or (registered) UDT type this holder was built for.
    pub fn ty(&self) -> &CqlType {
        &self.ty
    }

    /// Decoded value at `position`.
    pub fn get(&self, codec: &Codec<'_>, position: usize) -> Result<CqlValue> {
        let ty = self.types.get(position).ok_or_else(|| out_of_range(position, self.types.len()))?;
        let slot = match self.ty {
            CqlType::Tuple(_) => Slot::Position,
            _ => Slot::Element,
        };
        codec.decode_element(ty, self.cells[position].as_deref(), slot)
    }

    /// Frozen wire form: one length-prefixed payload per position.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        for cell in &self.cells {
            w.write_value(cell.as_deref())?;
        }
        Ok(w.into_bytes())
    }

    /// Holder over existing frozen bytes. Missing trailing positions are null.
    pub fn from_bytes(codec: &Codec<'_>, ty: &CqlType, bytes: &[u8]) -> Result<Self> {
        let mut holder = Self::for_type(codec, ty)?;
        let mut r = ByteReader::new(bytes);
        for position in 0..holder.cells.len() {
            if !r.has_length_field() {
                break;
            }
            holder.cells[position] = r.read_value()?.map(<[u8]>::to_vec);
        }
        if r.has_length_field() {
            return Err(CodecError::malformed(format!(
                "{} trailing bytes after {}",
                r.remaining(),
                holder.ty
            )));
        }
        Ok(holder)
    }

    /// Logical value of the whole holder.
    pub fn to_value(&self, codec: &Codec<'_>) -> Result<CqlValue> {
        codec.deserialize_with(&self.ty, &self.to_bytes()?, true)
    }
}

impl SettableByIndex for IndexedValue {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn element_type(&self, position: usize) -> Option<&CqlType> {
        self.types.get(position)
    }

    fn set_bytes(&mut self, position: usize, payload: Option<Vec<u8>>) -> Result<()> {
        let len = self.cells.len();
        let slot = self
            .cells
            .get_mut(position)
            .ok_or_else(|| out_of_range(position, len))?;
        *slot = payload;
        Ok(())
    }

    fn get_bytes(&self, position: usize) -> Option<&[u8]> {
        self.cells.get(position).and_then(|c| c.as_deref())
    }
}

fn out_of_range(position: usize, len: usize) -> CodecError {
    CodecError::mismatch(format!("a position below {}", len), position.to_string())
}

/// Encode `value` with the nested (frozen) rules for its position and
/// store it in `holder`.
pub fn set_inner_value(
    codec: &Codec<'_>,
    holder: &mut dyn SettableByIndex,
    position: usize,
    value: &CqlValue,
) -> Result<()> {
    let ty = holder
        .element_type(position)
        .ok_or_else(|| out_of_range(position, holder.len()))?
        .clone();
    let payload = codec.encode_element(&ty, value)?;
    holder.set_bytes(position, payload)
}

/// Build a holder from a logical UDT value. Absent fields stay null.
pub fn to_user_type_value(codec: &Codec<'_>, ty: &CqlType, value: &CqlValue) -> Result<IndexedValue> {
    let fields = match value {
        CqlValue::Udt(fields) => fields,
        other => return Err(CodecError::mismatch(ty.cql_name(), other.kind_name())),
    };
    let mut holder = IndexedValue::for_type(codec, ty)?;
    let udt = match holder.ty() {
        CqlType::Udt(udt) => udt.clone(),
        other => return Err(CodecError::mismatch("a UDT type", other.cql_name())),
    };
    if let Some((unknown, _)) = fields.iter().find(|(name, _)| udt.position(name).is_none()) {
        return Err(CodecError::mismatch(
            format!("a field of {}", udt.qualified_name()),
            format!("field '{}'", unknown),
        ));
    }
    for (position, field) in udt.fields().iter().enumerate() {
        let item = fields.get(&field.name).unwrap_or(&CqlValue::Null);
        set_inner_value(codec, &mut holder, position, item)?;
    }
    Ok(holder)
}

/// Build a holder from a logical tuple value. Missing positions stay null.
pub fn to_tuple_value(codec: &Codec<'_>, ty: &CqlType, value: &CqlValue) -> Result<IndexedValue> {
    let items = match value {
        CqlValue::Tuple(items) => items,
        other => return Err(CodecError::mismatch(ty.cql_name(), other.kind_name())),
    };
    let mut holder = IndexedValue::for_type(codec, ty)?;
    if items.len() > holder.len() {
        return Err(CodecError::SchemaMismatch {
            type_name: ty.cql_name(),
            expected: holder.len(),
            found: items.len(),
        });
    }
    for (position, item) in items.iter().enumerate() {
        set_inner_value(codec, &mut holder, position, item)?;
    }
    Ok(holder)
}
