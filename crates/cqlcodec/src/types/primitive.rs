// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf type kinds.

use crate::error::{CodecError, Result};

/// Primitive (leaf) CQL types.
///
/// `varchar` is an alias of `text` and parses to [`PrimitiveKind::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Ascii,
    Text,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Timestamp,
    Date,
    Time,
    Uuid,
    TimeUuid,
    Inet,
    Blob,
    Varint,
    Decimal,
    Empty,
}

/// Known CQL primitives this crate has no codec for.
const UNSUPPORTED: &[&str] = &["counter", "duration"];

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 19] = [
        Self::Ascii,
        Self::Text,
        Self::Boolean,
        Self::TinyInt,
        Self::SmallInt,
        Self::Int,
        Self::BigInt,
        Self::Float,
        Self::Double,
        Self::Timestamp,
        Self::Date,
        Self::Time,
        Self::Uuid,
        Self::TimeUuid,
        Self::Inet,
        Self::Blob,
        Self::Varint,
        Self::Decimal,
        Self::Empty,
    ];

    /// Resolve a (case-insensitive) CQL primitive name.
    ///
    /// Returns `Ok(None)` when the name is not a primitive at all, and
    /// `UnsupportedType` for primitives without a codec.
    pub fn from_name(name: &str) -> Result<Option<Self>> {
        let lower = name.to_ascii_lowercase();
        let kind = match lower.as_str() {
            "ascii" => Self::Ascii,
            "text" | "varchar" => Self::Text,
            "boolean" => Self::Boolean,
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "int" => Self::Int,
            "bigint" => Self::BigInt,
            "float" => Self::Float,
            "double" => Self::Double,
            "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "time" => Self::Time,
            "uuid" => Self::Uuid,
            "timeuuid" => Self::TimeUuid,
            "inet" => Self::Inet,
            "blob" => Self::Blob,
            "varint" => Self::Varint,
            "decimal" => Self::Decimal,
            "empty" => Self::Empty,
            other if UNSUPPORTED.contains(&other) => {
                return Err(CodecError::UnsupportedType(other.to_string()))
            }
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }

    pub fn cql_name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Uuid => "uuid",
            Self::TimeUuid => "timeuuid",
            Self::Inet => "inet",
            Self::Blob => "blob",
            Self::Varint => "varint",
            Self::Decimal => "decimal",
            Self::Empty => "empty",
        }
    }

    /// Encoded size in bytes, or `None` for variable-width kinds.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Boolean | Self::TinyInt => Some(1),
            Self::SmallInt => Some(2),
            Self::Int | Self::Float | Self::Date => Some(4),
            Self::BigInt | Self::Double | Self::Timestamp | Self::Time => Some(8),
            Self::Uuid | Self::TimeUuid => Some(16),
            Self::Empty => Some(0),
            Self::Ascii | Self::Text | Self::Inet | Self::Blob | Self::Varint | Self::Decimal => {
                None
            }
        }
    }

    /// Whether a zero-length payload is a valid (non-null) value.
    pub fn allows_empty(&self) -> bool {
        matches!(self, Self::Ascii | Self::Text | Self::Blob | Self::Empty)
    }

    /// Whether the encoding sorts byte-lexicographically in the same order
    /// as [`crate::compare::compare`].
    pub fn is_byte_order_comparable(&self) -> bool {
        matches!(
            self,
            Self::Ascii | Self::Text | Self::Blob | Self::Boolean | Self::Date | Self::Empty
        )
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cql_name())
    }
}
