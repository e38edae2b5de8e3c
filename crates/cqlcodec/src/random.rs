// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Random well-typed values for property tests.
//!
//! Every collection at every depth gets at least `min_collection_size`
//! elements (distinct ones, for sets and map keys, as far as the element
//! domain allows). Every UDT field and tuple position is populated.

use crate::config::{CodecConfig, MIN_RANDOM_TEXT_LEN, NANOS_PER_DAY};
use crate::types::{CqlType, PrimitiveKind};
use crate::value::{CqlValue, Decimal, UdtValue};
use num_bigint::BigInt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// Attempts per requested distinct element before giving up on a small domain.
const ATTEMPTS_PER_ELEMENT: usize = 16;

/// Random value generator.
#[derive(Debug, Clone)]
pub struct RandomValues {
    rng: fastrand::Rng,
    config: CodecConfig,
}

impl RandomValues {
    pub fn new(config: CodecConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng, config }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(CodecConfig::builder().seed(seed).build())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Value of `ty` with the configured minimum collection size.
    pub fn value(&mut self, ty: &CqlType) -> CqlValue {
        let min = self.config.min_collection_size;
        self.value_with_min(ty, min)
    }

    pub fn value_with_min(&mut self, ty: &CqlType, min: usize) -> CqlValue {
        match ty {
            CqlType::Frozen(inner) => self.value_with_min(inner, min),
            CqlType::Primitive(kind) => self.primitive(*kind),
            CqlType::List(elem) => {
                let size = self.collection_size(min);
                CqlValue::List((0..size).map(|_| self.value_with_min(elem, min)).collect())
            }
            CqlType::Set(elem) => {
                let size = self.collection_size(min);
                CqlValue::Set(self.distinct(size, |values| values.value_with_min(elem, min)))
            }
            CqlType::Map(key, val) => {
                let size = self.collection_size(min);
                let keys = self.distinct(size, |values| values.value_with_min(key, min));
                CqlValue::Map(
                    keys.into_iter()
                        .map(|k| (k, self.value_with_min(val, min)))
                        .collect(),
                )
            }
            CqlType::Tuple(elements) => CqlValue::Tuple(
                elements
                    .iter()
                    .map(|ety| self.value_with_min(ety, min))
                    .collect(),
            ),
            CqlType::Udt(udt) => {
                let mut out = UdtValue::new();
                for field in udt.fields() {
                    let v = self.value_with_min(&field.ty, min);
                    out.set(field.name.clone(), v);
                }
                CqlValue::Udt(out)
            }
        }
    }

    pub fn primitive(&mut self, kind: PrimitiveKind) -> CqlValue {
        match kind {
            PrimitiveKind::Ascii => CqlValue::Ascii(self.text()),
            PrimitiveKind::Text => CqlValue::Text(self.text()),
            PrimitiveKind::Boolean => CqlValue::Boolean(self.rng.bool()),
            PrimitiveKind::TinyInt => CqlValue::TinyInt(self.rng.i8(..)),
            PrimitiveKind::SmallInt => CqlValue::SmallInt(self.rng.i16(..)),
            PrimitiveKind::Int => CqlValue::Int(self.rng.i32(..)),
            PrimitiveKind::BigInt => CqlValue::BigInt(self.rng.i64(..)),
            PrimitiveKind::Float => CqlValue::Float((self.rng.f32() - 0.5) * 1.0e6),
            PrimitiveKind::Double => CqlValue::Double((self.rng.f64() - 0.5) * 1.0e12),
            // Roughly year 1653 to 2287.
            PrimitiveKind::Timestamp => {
                CqlValue::Timestamp(self.rng.i64(-10_000_000_000_000..10_000_000_000_000))
            }
            PrimitiveKind::Date => CqlValue::Date(self.rng.i32(..)),
            PrimitiveKind::Time => CqlValue::Time(self.rng.i64(0..NANOS_PER_DAY)),
            PrimitiveKind::Uuid => {
                let mut bytes = [0u8; 16];
                self.rng.fill(&mut bytes);
                CqlValue::Uuid(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }
            PrimitiveKind::TimeUuid => CqlValue::TimeUuid(self.time_uuid()),
            PrimitiveKind::Inet => {
                let addr = if self.rng.bool() {
                    IpAddr::V4(Ipv4Addr::from(self.rng.u32(..)))
                } else {
                    IpAddr::V6(Ipv6Addr::from(self.rng.u128(..)))
                };
                CqlValue::Inet(addr)
            }
            PrimitiveKind::Blob => {
                let len = self.text_len();
                let mut bytes = vec![0u8; len];
                self.rng.fill(&mut bytes);
                CqlValue::Blob(bytes)
            }
            PrimitiveKind::Varint => CqlValue::Varint(BigInt::from(self.rng.i128(..))),
            PrimitiveKind::Decimal => CqlValue::Decimal(Decimal::new(
                BigInt::from(self.rng.i64(..)),
                self.rng.i32(-10..=10),
            )),
            PrimitiveKind::Empty => CqlValue::Empty,
        }
    }

    fn collection_size(&mut self, min: usize) -> usize {
        min + self.rng.usize(0..=self.config.max_extra_elements)
    }

    fn text_len(&mut self) -> usize {
        let max = self.config.max_text_len.max(MIN_RANDOM_TEXT_LEN);
        self.rng.usize(MIN_RANDOM_TEXT_LEN..=max)
    }

    fn text(&mut self) -> String {
        let len = self.text_len();
        (0..len).map(|_| self.rng.alphanumeric()).collect()
    }

    /// Version 1 UUID with random timestamp, clock sequence and node.
    fn time_uuid(&mut self) -> Uuid {
        let ticks = self.rng.u64(..(1u64 << 60));
        let clock_seq = self.rng.u16(..(1u16 << 14));
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&(ticks as u32).to_be_bytes());
        bytes[4..6].copy_from_slice(&((ticks >> 32) as u16).to_be_bytes());
        bytes[6..8].copy_from_slice(&((((ticks >> 48) as u16) & 0x0fff) | 0x1000).to_be_bytes());
        bytes[8] = ((clock_seq >> 8) as u8 & 0x3f) | 0x80;
        bytes[9] = clock_seq as u8;
        self.rng.fill(&mut bytes[10..]);
        Uuid::from_bytes(bytes)
    }

    /// Up to `size` pairwise-distinct values; stops early when the domain is exhausted.
    fn distinct(&mut self, size: usize, mut make: impl FnMut(&mut Self) -> CqlValue) -> Vec<CqlValue> {
        let mut out: Vec<CqlValue> = Vec::with_capacity(size);
        let mut attempts = size * ATTEMPTS_PER_ELEMENT + ATTEMPTS_PER_ELEMENT;
        while out.len() < size && attempts > 0 {
            attempts -= 1;
            let candidate = make(self);
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

impl Default for RandomValues {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl CqlType {
    /// Random value of this type with every collection holding at least
    /// `min_collection_size` elements.
    pub fn random_value(&self, min_collection_size: usize) -> CqlValue {
        RandomValues::default().value_with_min(self, min_collection_size)
    }
}
