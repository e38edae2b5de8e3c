// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The CQL type algebra.

use super::udt::{quote_identifier, UdtBuilder, UdtDescriptor};
use super::PrimitiveKind;
use std::fmt;
use std::sync::Arc;

/// A declared column type.
///
/// Collections and UDTs are multi-cell unless wrapped in [`CqlType::Frozen`].
/// Tuples are always serialized in their frozen form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CqlType {
    Primitive(PrimitiveKind),
    List(Box<CqlType>),
    Set(Box<CqlType>),
    Map(Box<CqlType>, Box<CqlType>),
    Tuple(Vec<CqlType>),
    Udt(Arc<UdtDescriptor>),
    Frozen(Box<CqlType>),
}

/// Physical layout a type uses at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLayout {
    /// A leaf value.
    Simple,
    /// One self-delimited blob.
    Frozen,
    /// Count-prefixed sequence of independently addressable cells.
    MultiCell,
}

macro_rules! primitive_ctors {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name() -> Self {
                Self::Primitive(PrimitiveKind::$kind)
            }
        )*
    };
}

impl CqlType {
    primitive_ctors! {
        ascii => Ascii,
        text => Text,
        varchar => Text,
        boolean => Boolean,
        tinyint => TinyInt,
        smallint => SmallInt,
        int => Int,
        bigint => BigInt,
        float => Float,
        double => Double,
        timestamp => Timestamp,
        date => Date,
        time => Time,
        uuid => Uuid,
        timeuuid => TimeUuid,
        inet => Inet,
        blob => Blob,
        varint => Varint,
        decimal => Decimal,
        empty => Empty,
    }

    pub fn list(element: CqlType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: CqlType) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn map(key: CqlType, value: CqlType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn tuple(elements: Vec<CqlType>) -> Self {
        Self::Tuple(elements)
    }

    /// Start building a UDT in `keyspace`.
    pub fn udt(keyspace: impl Into<String>, name: impl Into<String>) -> UdtBuilder {
        UdtBuilder::new(keyspace, name)
    }

    /// Wrap in the frozen modifier. Freezing twice is a no-op.
    pub fn frozen(inner: CqlType) -> Self {
        match inner {
            frozen @ Self::Frozen(_) => frozen,
            other => Self::Frozen(Box::new(other)),
        }
    }

    pub fn freeze(self) -> Self {
        Self::frozen(self)
    }

    /// Strip a top-level frozen modifier.
    pub fn unfreeze(self) -> Self {
        match self {
            Self::Frozen(inner) => *inner,
            other => other,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen(_))
    }

    /// The type with any frozen wrappers removed.
    pub fn base(&self) -> &CqlType {
        match self {
            Self::Frozen(inner) => inner.base(),
            other => other,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.base() {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_udt(&self) -> Option<&Arc<UdtDescriptor>> {
        match self.base() {
            Self::Udt(udt) => Some(udt),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.base(), Self::List(_) | Self::Set(_) | Self::Map(..))
    }

    /// Top-level multi-cell: an unfrozen collection or UDT.
    pub fn is_multi_cell(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(..) | Self::Udt(_))
    }

    /// Layout at a position; nested values always use their frozen form.
    pub fn cell_layout(&self, nested: bool) -> CellLayout {
        if self.as_primitive().is_some() {
            CellLayout::Simple
        } else if !nested && self.is_multi_cell() {
            CellLayout::MultiCell
        } else {
            CellLayout::Frozen
        }
    }

    /// The variant of this type with the requested cell layout.
    pub fn with_multi_cell(&self, multi_cell: bool) -> CqlType {
        if self.as_primitive().is_some() || matches!(self.base(), Self::Tuple(_)) {
            return self.clone();
        }
        if multi_cell {
            self.base().clone()
        } else {
            Self::frozen(self.clone())
        }
    }

    /// Direct child types, in declaration order.
    pub fn children(&self) -> Vec<&CqlType> {
        match self {
            Self::Primitive(_) => Vec::new(),
            Self::List(e) | Self::Set(e) | Self::Frozen(e) => vec![e],
            Self::Map(k, v) => vec![k, v],
            Self::Tuple(elements) => elements.iter().collect(),
            Self::Udt(udt) => udt.fields().iter().map(|f| &f.ty).collect(),
        }
    }

    /// Every UDT reachable from this type, including itself, dependencies first.
    pub fn udts(&self) -> Vec<Arc<UdtDescriptor>> {
        let mut out = Vec::new();
        self.collect_udts(&mut out);
        out
    }

    fn collect_udts(&self, out: &mut Vec<Arc<UdtDescriptor>>) {
        for child in self.children() {
            child.collect_udts(out);
        }
        if let Self::Udt(udt) = self {
            if !out.iter().any(|known| known == udt) {
                out.push(Arc::clone(udt));
            }
        }
    }

    /// CQL spelling, e.g. `frozen<map<int, text>>`.
    pub fn cql_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.cql_name().to_string(),
            Self::List(e) => format!("list<{}>", e.cql_name()),
            Self::Set(e) => format!("set<{}>", e.cql_name()),
            Self::Map(k, v) => format!("map<{}, {}>", k.cql_name(), v.cql_name()),
            Self::Tuple(elements) => format!(
                "tuple<{}>",
                elements
                    .iter()
                    .map(CqlType::cql_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Udt(udt) => quote_identifier(udt.name()),
            Self::Frozen(inner) => format!("frozen<{}>", inner.cql_name()),
        }
    }
}

impl From<PrimitiveKind> for CqlType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cql_name())
    }
}
