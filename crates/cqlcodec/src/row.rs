// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between logical values and a generic tabular row.
//!
//! The engine side has a smaller value vocabulary than CQL, so some types
//! change shape on the way through:
//!
//! | CQL                | engine                         |
//! |--------------------|--------------------------------|
//! | uuid, timeuuid     | `String` (hyphenated)          |
//! | inet               | `Binary` (4 or 16 octets)      |
//! | timestamp (ms)     | `Timestamp` (µs)               |
//! | time (ns)          | `Long`                         |
//! | varint             | `Decimal` with scale 0         |
//! | list, set          | `Array` (arrays read back as sets for set columns) |
//! | tuple              | `Struct` with fields `_1`, `_2`, ... |
//! | udt                | `Struct` keyed by field name   |
//! | empty              | `Binary` of zero octets        |

use crate::error::{CodecError, Result};
use crate::types::{CqlType, PrimitiveKind, UdtDescriptor};
use crate::value::{CqlValue, Decimal, UdtValue};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use uuid::Uuid;

/// A value as the engine represents it.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineValue {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Decimal(Decimal),
    /// Days since the Unix epoch.
    Date(i32),
    /// Microseconds since the Unix epoch.
    Timestamp(i64),
    Array(Vec<EngineValue>),
    Map(Vec<(EngineValue, EngineValue)>),
    Struct(GenericRow),
}

impl EngineValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Read access to one engine row.
pub trait TabularRow {
    fn get(&self, position: usize) -> Option<&EngineValue>;

    fn size(&self) -> usize;

    /// Field names in positional order.
    fn field_names(&self) -> &[String];

    fn is_null(&self, position: usize) -> bool {
        self.get(position).map_or(true, EngineValue::is_null)
    }
}

/// Ordered field names with a name index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSchema {
    fields: Vec<String>,
    index: HashMap<String, usize>,
}

impl RowSchema {
    pub fn new(fields: Vec<String>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.clone(), i))
            .collect();
        Self { fields, index }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Row built by this crate; never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericRow {
    schema: Arc<RowSchema>,
    values: Vec<EngineValue>,
}

impl GenericRow {
    /// Fails when the value count differs from the schema width.
    pub fn new(schema: Arc<RowSchema>, values: Vec<EngineValue>) -> Result<Self> {
        if schema.len() != values.len() {
            return Err(CodecError::SchemaMismatch {
                type_name: "row".to_string(),
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[EngineValue] {
        &self.values
    }

    pub fn get_by_name(&self, name: &str) -> Option<&EngineValue> {
        self.schema.position(name).and_then(|i| self.values.get(i))
    }
}

impl TabularRow for GenericRow {
    fn get(&self, position: usize) -> Option<&EngineValue> {
        self.values.get(position)
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn field_names(&self) -> &[String] {
        self.schema.fields()
    }
}

// ---------------------------------------------------------------------------
// Logical -> engine
// ---------------------------------------------------------------------------

/// Convert one logical value to its engine form.
pub fn to_engine(ty: &CqlType, value: &CqlValue) -> Result<EngineValue> {
    if value.is_null() {
        return Ok(EngineValue::Null);
    }
    let out = match (ty, value) {
        (CqlType::Frozen(inner), _) => return to_engine(inner, value),
        (CqlType::Primitive(kind), _) => primitive_to_engine(*kind, value)?,
        (CqlType::List(elem), CqlValue::List(items)) | (CqlType::Set(elem), CqlValue::Set(items)) => {
            EngineValue::Array(
                items
                    .iter()
                    .map(|item| to_engine(elem, item))
                    .collect::<Result<_>>()?,
            )
        }
        (CqlType::Map(key, val), CqlValue::Map(entries)) => EngineValue::Map(
            entries
                .iter()
                .map(|(k, v)| -> Result<_> { Ok((to_engine(key, k)?, to_engine(val, v)?)) })
                .collect::<Result<_>>()?,
        ),
        (CqlType::Tuple(elements), CqlValue::Tuple(items)) => {
            let names = (1..=elements.len()).map(|i| format!("_{}", i)).collect();
            let values = elements
                .iter()
                .enumerate()
                .map(|(i, ety)| to_engine(ety, items.get(i).unwrap_or(&CqlValue::Null)))
                .collect::<Result<Vec<_>>>()?;
            EngineValue::Struct(GenericRow::new(Arc::new(RowSchema::new(names)), values)?)
        }
        (CqlType::Udt(udt), CqlValue::Udt(fields)) => {
            EngineValue::Struct(udt_to_struct(udt, fields)?)
        }
        (ty, other) => return Err(CodecError::mismatch(ty.cql_name(), other.kind_name())),
    };
    Ok(out)
}

fn udt_to_struct(udt: &UdtDescriptor, fields: &UdtValue) -> Result<GenericRow> {
    let names = udt.field_names().map(str::to_string).collect();
    let values = udt
        .fields()
        .iter()
        .map(|f| to_engine(&f.ty, fields.get(&f.name).unwrap_or(&CqlValue::Null)))
        .collect::<Result<Vec<_>>>()?;
    GenericRow::new(Arc::new(RowSchema::new(names)), values)
}

fn primitive_to_engine(kind: PrimitiveKind, value: &CqlValue) -> Result<EngineValue> {
    let out = match (kind, value) {
        (PrimitiveKind::Ascii | PrimitiveKind::Text, CqlValue::Ascii(s) | CqlValue::Text(s)) => {
            EngineValue::String(s.clone())
        }
        (PrimitiveKind::Boolean, CqlValue::Boolean(b)) => EngineValue::Boolean(*b),
        (PrimitiveKind::TinyInt, CqlValue::TinyInt(v)) => EngineValue::Byte(*v),
        (PrimitiveKind::SmallInt, CqlValue::SmallInt(v)) => EngineValue::Short(*v),
        (PrimitiveKind::Int, CqlValue::Int(v)) => EngineValue::Int(*v),
        (PrimitiveKind::BigInt, CqlValue::BigInt(v)) => EngineValue::Long(*v),
        (PrimitiveKind::Float, CqlValue::Float(v)) => EngineValue::Float(*v),
        (PrimitiveKind::Double, CqlValue::Double(v)) => EngineValue::Double(*v),
        (PrimitiveKind::Timestamp, CqlValue::Timestamp(ms)) => {
            let micros = ms
                .checked_mul(1000)
                .ok_or_else(|| CodecError::mismatch("timestamp within engine range", ms.to_string()))?;
            EngineValue::Timestamp(micros)
        }
        (PrimitiveKind::Date, CqlValue::Date(days)) => EngineValue::Date(*days),
        (PrimitiveKind::Time, CqlValue::Time(nanos)) => EngineValue::Long(*nanos),
        (PrimitiveKind::Uuid, CqlValue::Uuid(u)) | (PrimitiveKind::TimeUuid, CqlValue::TimeUuid(u)) => {
            EngineValue::String(u.hyphenated().to_string())
        }
        (PrimitiveKind::Inet, CqlValue::Inet(IpAddr::V4(a))) => EngineValue::Binary(a.octets().to_vec()),
        (PrimitiveKind::Inet, CqlValue::Inet(IpAddr::V6(a))) => EngineValue::Binary(a.octets().to_vec()),
        (PrimitiveKind::Blob, CqlValue::Blob(b)) => EngineValue::Binary(b.clone()),
        (PrimitiveKind::Varint, CqlValue::Varint(v)) => EngineValue::Decimal(Decimal::new(v.clone(), 0)),
        (PrimitiveKind::Decimal, CqlValue::Decimal(d)) => EngineValue::Decimal(d.clone()),
        (PrimitiveKind::Empty, CqlValue::Empty) => EngineValue::Binary(Vec::new()),
        (kind, other) => return Err(CodecError::mismatch(kind.cql_name(), other.kind_name())),
    };
    Ok(out)
}

// ---------------------------------------------------------------------------
// Engine -> logical
// ---------------------------------------------------------------------------

/// Convert one engine value back to its logical form.
pub fn from_engine(ty: &CqlType, value: &EngineValue) -> Result<CqlValue> {
    if let CqlType::Frozen(inner) = ty {
        return from_engine(inner, value);
    }
    if value.is_null() {
        return Ok(CqlValue::Null);
    }
    let out = match (ty, value) {
        (CqlType::Primitive(kind), _) => primitive_from_engine(*kind, value)?,
        (CqlType::List(elem), EngineValue::Array(items)) => CqlValue::List(
            items
                .iter()
                .map(|item| from_engine(elem, item))
                .collect::<Result<_>>()?,
        ),
        (CqlType::Set(elem), EngineValue::Array(items)) => {
            let mut out: Vec<CqlValue> = Vec::with_capacity(items.len());
            for item in items {
                let v = from_engine(elem, item)?;
                if !out.contains(&v) {
                    out.push(v);
                }
            }
            CqlValue::Set(out)
        }
        (CqlType::Map(key, val), EngineValue::Map(entries)) => CqlValue::Map(
            entries
                .iter()
                .map(|(k, v)| -> Result<_> { Ok((from_engine(key, k)?, from_engine(val, v)?)) })
                .collect::<Result<_>>()?,
        ),
        (CqlType::Tuple(elements), EngineValue::Struct(row)) => {
            if row.size() != elements.len() {
                return Err(CodecError::SchemaMismatch {
                    type_name: ty.cql_name(),
                    expected: elements.len(),
                    found: row.size(),
                });
            }
            CqlValue::Tuple(
                elements
                    .iter()
                    .zip(row.values())
                    .map(|(ety, v)| from_engine(ety, v))
                    .collect::<Result<_>>()?,
            )
        }
        (CqlType::Udt(udt), EngineValue::Struct(row)) => CqlValue::Udt(udt_from_struct(udt, row)?),
        (ty, other) => {
            return Err(CodecError::mismatch(
                ty.cql_name(),
                format!("engine {:?}", other),
            ))
        }
    };
    Ok(out)
}

/// Map struct fields onto the UDT by name; null fields are left absent.
fn udt_from_struct(udt: &UdtDescriptor, row: &dyn TabularRow) -> Result<UdtValue> {
    let mut out = UdtValue::new();
    for (i, name) in row.field_names().iter().enumerate() {
        let field = udt.field(name).ok_or_else(|| {
            CodecError::mismatch(
                format!("a field of {}", udt.qualified_name()),
                format!("field '{}'", name),
            )
        })?;
        if row.is_null(i) {
            continue;
        }
        if let Some(v) = row.get(i) {
            out.set(name.clone(), from_engine(&field.ty, v)?);
        }
    }
    Ok(out)
}

fn primitive_from_engine(kind: PrimitiveKind, value: &EngineValue) -> Result<CqlValue> {
    let out = match (kind, value) {
        (PrimitiveKind::Ascii, EngineValue::String(s)) => CqlValue::Ascii(s.clone()),
        (PrimitiveKind::Text, EngineValue::String(s)) => CqlValue::Text(s.clone()),
        (PrimitiveKind::Boolean, EngineValue::Boolean(b)) => CqlValue::Boolean(*b),
        (PrimitiveKind::TinyInt, EngineValue::Byte(v)) => CqlValue::TinyInt(*v),
        (PrimitiveKind::SmallInt, EngineValue::Short(v)) => CqlValue::SmallInt(*v),
        (PrimitiveKind::Int, EngineValue::Int(v)) => CqlValue::Int(*v),
        (PrimitiveKind::BigInt, EngineValue::Long(v)) => CqlValue::BigInt(*v),
        (PrimitiveKind::Float, EngineValue::Float(v)) => CqlValue::Float(*v),
        (PrimitiveKind::Double, EngineValue::Double(v)) => CqlValue::Double(*v),
        (PrimitiveKind::Timestamp, EngineValue::Timestamp(micros)) => {
            CqlValue::Timestamp(micros.div_euclid(1000))
        }
        (PrimitiveKind::Date, EngineValue::Date(days)) => CqlValue::Date(*days),
        (PrimitiveKind::Time, EngineValue::Long(nanos)) => CqlValue::Time(*nanos),
        (PrimitiveKind::Uuid, EngineValue::String(s)) => CqlValue::Uuid(parse_uuid(s)?),
        (PrimitiveKind::TimeUuid, EngineValue::String(s)) => CqlValue::TimeUuid(parse_uuid(s)?),
        (PrimitiveKind::Inet, EngineValue::Binary(octets)) => CqlValue::Inet(inet_from_octets(octets)?),
        (PrimitiveKind::Blob, EngineValue::Binary(b)) => CqlValue::Blob(b.clone()),
        (PrimitiveKind::Empty, EngineValue::Binary(b)) if b.is_empty() => CqlValue::Empty,
        (PrimitiveKind::Varint, EngineValue::Decimal(d)) if d.scale == 0 => {
            CqlValue::Varint(d.unscaled.clone())
        }
        (PrimitiveKind::Decimal, EngineValue::Decimal(d)) => CqlValue::Decimal(d.clone()),
        (kind, other) => {
            return Err(CodecError::mismatch(
                kind.cql_name(),
                format!("engine {:?}", other),
            ))
        }
    };
    Ok(out)
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| CodecError::mismatch("uuid string", format!("{:?}: {}", s, e)))
}

fn inet_from_octets(octets: &[u8]) -> Result<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Ok(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        return Ok(IpAddr::V6(Ipv6Addr::from(v6)));
    }
    Err(CodecError::mismatch(
        "4 or 16 address octets",
        format!("{} octets", octets.len()),
    ))
}

// ---------------------------------------------------------------------------
// Whole rows
// ---------------------------------------------------------------------------

/// Build an engine row from positional logical values.
pub fn to_row(columns: &[(String, CqlType)], values: &[CqlValue]) -> Result<GenericRow> {
    if columns.len() != values.len() {
        return Err(CodecError::SchemaMismatch {
            type_name: "row".to_string(),
            expected: columns.len(),
            found: values.len(),
        });
    }
    let names = columns.iter().map(|(name, _)| name.clone()).collect();
    let converted = columns
        .iter()
        .zip(values)
        .map(|((_, ty), v)| to_engine(ty, v))
        .collect::<Result<Vec<_>>>()?;
    GenericRow::new(Arc::new(RowSchema::new(names)), converted)
}

/// Read positional logical values out of an engine row.
pub fn from_row(types: &[CqlType], row: &dyn TabularRow) -> Result<Vec<CqlValue>> {
    if row.size() != types.len() {
        return Err(CodecError::SchemaMismatch {
            type_name: "row".to_string(),
            expected: types.len(),
            found: row.size(),
        });
    }
    types
        .iter()
        .enumerate()
        .map(|(i, ty)| match row.get(i) {
            Some(v) => from_engine(ty, v),
            None => Ok(CqlValue::Null),
        })
        .collect()
}

impl GenericRow {
    /// Convenience for `from_row` on this row.
    pub fn to_values(&self, types: &[CqlType]) -> Result<Vec<CqlValue>> {
        from_row(types, self)
    }
}
