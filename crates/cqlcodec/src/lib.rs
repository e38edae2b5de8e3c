// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # cqlcodec - type-driven binary codec for the CQL data model
//!
//! Given a [`CqlType`] describing a column's declared type, this crate
//! serializes and deserializes logical values ([`CqlValue`]) to and from the
//! database's storage/wire encoding, orders values with the database's
//! collation rules, converts values to and from a generic tabular row, and
//! synthesizes random well-typed values for property tests.
//!
//! ## Quick Start
//!
//! ```rust
//! use cqlcodec::{Codec, CqlType, CqlValue, SchemaRegistry, UdtValue};
//!
//! let address = CqlType::udt("shop", "address")
//!     .with_field("street", CqlType::text())
//!     .with_field("number", CqlType::int())
//!     .build();
//! let column = CqlType::frozen(address.clone());
//!
//! // UDT field order always comes from the registry.
//! let registry = SchemaRegistry::new();
//! registry.register_all(&column);
//!
//! let mut value = UdtValue::new();
//! value.set("street", CqlValue::text("Main"));
//! value.set("number", CqlValue::Int(5));
//! let value = CqlValue::Udt(value);
//!
//! let codec = Codec::new(&registry);
//! let bytes = codec.serialize(&column, &value).unwrap();
//! assert_eq!(codec.deserialize(&column, &bytes).unwrap(), value);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |   CqlType (Primitive | List | Set | Map | Tuple | Udt | Frozen)  |
//! +------------------------------------------------------------------+
//! |  Codec (serialize / deserialize) -> UdtRegistry (field order)    |
//! |  compare  |  RandomValues  |  row bridge  |  IndexedValue        |
//! +------------------------------------------------------------------+
//! |   ByteReader / ByteWriter (big-endian length fields)             |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - type descriptors, UDT builder, type-name parser
//! - [`codec`] - primitive, collection, tuple and UDT wire layouts
//! - [`compare`] - collation order over logical values
//! - [`random`] - random value generator
//! - [`row`] - tabular row bridge
//! - [`driver`] - settable-by-index value holders
//! - [`registry`] - authoritative UDT registry
//! - [`schema`] - table schema helper for end-to-end tests
//! - [`type_io`] - binary form of type descriptors
//! - [`json`] - JSON rendering of logical values

pub mod codec;
pub mod compare;
pub mod config;
pub mod driver;
pub mod error;
pub mod json;
pub mod random;
pub mod registry;
pub mod row;
pub mod schema;
pub mod type_io;
pub mod types;
pub mod value;

pub use codec::{ByteReader, ByteWriter, Codec};
pub use config::{CodecConfig, CodecConfigBuilder};
pub use driver::{set_inner_value, to_tuple_value, to_user_type_value, IndexedValue, SettableByIndex};
pub use error::{CodecError, Result};
pub use random::RandomValues;
pub use registry::{SchemaRegistry, UdtDefinition, UdtRegistry};
pub use row::{EngineValue, GenericRow, RowSchema, TabularRow};
pub use schema::{Column, ColumnKind, SortOrder, TableSchema, TableSchemaBuilder, TestRow};
pub use type_io::{read_type, type_from_bytes, type_to_bytes, write_type};
pub use types::{parse_type, CellLayout, CqlType, PrimitiveKind, UdtBuilder, UdtDescriptor, UdtField};
pub use value::{CqlValue, Decimal, UdtValue};
