// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logical values: the decoded, Rust-native form of an instance of a [`CqlType`].
//!
//! [`CqlType`]: crate::types::CqlType

use num_bigint::{BigInt, Sign};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// A logical value of any CQL type.
///
/// Sets and maps compare order-insensitively and as mathematical sets: a
/// repeated set element counts once, and of map entries sharing a key only
/// the first counts. Floats compare by their IEEE total order so that
/// decoded NaN/-0.0 still equal their source.
#[derive(Debug, Clone)]
pub enum CqlValue {
    // Primitives
    Ascii(String),
    Text(String),
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    /// Days since the Unix epoch.
    Date(i32),
    /// Nanoseconds since midnight.
    Time(i64),
    Uuid(Uuid),
    TimeUuid(Uuid),
    Inet(IpAddr),
    Blob(Vec<u8>),
    Varint(BigInt),
    Decimal(Decimal),
    Empty,

    // Composites
    List(Vec<CqlValue>),
    /// Unordered; element order carries no meaning.
    Set(Vec<CqlValue>),
    /// Unordered key/value pairs with distinct keys.
    Map(Vec<(CqlValue, CqlValue)>),
    /// Positional; any element may be `Null`.
    Tuple(Vec<CqlValue>),
    Udt(UdtValue),

    Null,
}

impl CqlValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn ascii(s: impl Into<String>) -> Self {
        Self::Ascii(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short variant name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Ascii(_) => "ascii",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::TinyInt(_) => "tinyint",
            Self::SmallInt(_) => "smallint",
            Self::Int(_) => "int",
            Self::BigInt(_) => "bigint",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Uuid(_) => "uuid",
            Self::TimeUuid(_) => "timeuuid",
            Self::Inet(_) => "inet",
            Self::Blob(_) => "blob",
            Self::Varint(_) => "varint",
            Self::Decimal(_) => "decimal",
            Self::Empty => "empty",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Tuple(_) => "tuple",
            Self::Udt(_) => "udt",
            Self::Null => "null",
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) | Self::Ascii(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a list, set or tuple.
    pub fn as_elements(&self) -> Option<&[CqlValue]> {
        match self {
            Self::List(v) | Self::Set(v) | Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_udt(&self) -> Option<&UdtValue> {
        match self {
            Self::Udt(v) => Some(v),
            _ => None,
        }
    }

    /// Number of elements/entries for collections.
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Self::List(v) | Self::Set(v) => Some(v.len()),
            Self::Map(m) => Some(m.len()),
            _ => None,
        }
    }
}

impl PartialEq for CqlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ascii(a), Self::Ascii(b)) | (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::TinyInt(a), Self::TinyInt(b)) => a == b,
            (Self::SmallInt(a), Self::SmallInt(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b))
            | (Self::Timestamp(a), Self::Timestamp(b))
            | (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b) == Ordering::Equal,
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b) == Ordering::Equal,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) | (Self::TimeUuid(a), Self::TimeUuid(b)) => a == b,
            (Self::Inet(a), Self::Inet(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::Varint(a), Self::Varint(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Empty, Self::Empty) | (Self::Null, Self::Null) => true,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => {
                a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                let (a, b) = (first_per_key(a), first_per_key(b));
                a.len() == b.len()
                    && a.iter().all(|entry| b.contains(entry))
                    && b.iter().all(|entry| a.contains(entry))
            }
            (Self::Udt(a), Self::Udt(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CqlValue {}

/// Map entries with later repeats of a key dropped.
fn first_per_key(entries: &[(CqlValue, CqlValue)]) -> Vec<&(CqlValue, CqlValue)> {
    let mut out: Vec<&(CqlValue, CqlValue)> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !out.iter().any(|kept| kept.0 == entry.0) {
            out.push(entry);
        }
    }
    out
}

impl From<bool> for CqlValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i8> for CqlValue {
    fn from(v: i8) -> Self {
        Self::TinyInt(v)
    }
}

impl From<i16> for CqlValue {
    fn from(v: i16) -> Self {
        Self::SmallInt(v)
    }
}

impl From<i32> for CqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for CqlValue {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<f32> for CqlValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for CqlValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for CqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Uuid> for CqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<IpAddr> for CqlValue {
    fn from(v: IpAddr) -> Self {
        Self::Inet(v)
    }
}

impl<T: Into<CqlValue>> From<Option<T>> for CqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Arbitrary-precision decimal: `unscaled * 10^-scale`.
///
/// Equality is structural (`1.0 != 1.00`); numeric order lives in
/// [`Decimal::numeric_cmp`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub unscaled: BigInt,
    pub scale: i32,
}

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Compare by numeric value, ignoring representation scale.
    pub fn numeric_cmp(&self, other: &Self) -> Ordering {
        let sign = self.unscaled.sign();
        match sign.cmp(&other.unscaled.sign()) {
            Ordering::Equal if sign != Sign::NoSign => {}
            ord => return ord,
        }
        // Order of magnitude first, so the rescale below stays within the digit count.
        let magnitude = self.exponent().cmp(&other.exponent());
        if magnitude != Ordering::Equal {
            return if sign == Sign::Minus {
                magnitude.reverse()
            } else {
                magnitude
            };
        }
        let (a, b) = match self.scale.cmp(&other.scale) {
            Ordering::Equal => return self.unscaled.cmp(&other.unscaled),
            Ordering::Less => {
                let shift = (i64::from(other.scale) - i64::from(self.scale)) as u32;
                (&self.unscaled * BigInt::from(10).pow(shift), other.unscaled.clone())
            }
            Ordering::Greater => {
                let shift = (i64::from(self.scale) - i64::from(other.scale)) as u32;
                (self.unscaled.clone(), &other.unscaled * BigInt::from(10).pow(shift))
            }
        };
        a.cmp(&b)
    }

    fn exponent(&self) -> i64 {
        self.unscaled.magnitude().to_string().len() as i64 - i64::from(self.scale)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}", self.unscaled, zeros);
        }
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.sign() == Sign::Minus {
            "-"
        } else {
            ""
        };
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

/// Logical value of a user-defined type: field name to value.
///
/// Absent and null fields are the same thing here: setting a field to
/// [`CqlValue::Null`] removes it, so a null never appears as an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UdtValue {
    fields: BTreeMap<String, CqlValue>,
}

impl UdtValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; `Null` clears it.
    pub fn set(&mut self, name: impl Into<String>, value: CqlValue) {
        let name = name.into();
        if value.is_null() {
            self.fields.remove(&name);
        } else {
            self.fields.insert(name, value);
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: CqlValue) -> Self {
        self.set(name, value);
        self
    }

    /// Field value, `None` when absent/null.
    pub fn get(&self, name: &str) -> Option<&CqlValue> {
        self.fields.get(name)
    }

    pub fn is_null(&self, name: &str) -> bool {
        !self.fields.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<CqlValue> {
        self.fields.remove(name)
    }

    /// Number of non-null fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, CqlValue)> for UdtValue {
    fn from_iter<I: IntoIterator<Item = (K, CqlValue)>>(iter: I) -> Self {
        let mut value = Self::new();
        for (name, v) in iter {
            value.set(name, v);
        }
        value
    }
}
