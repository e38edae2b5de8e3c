// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for declared CQL column types.
//!
//! A [`CqlType`] is immutable once built and may be shared freely between
//! threads. UDTs are built with [`UdtBuilder`]:
//!
//! ```rust
//! use cqlcodec::CqlType;
//!
//! let address = CqlType::udt("shop", "address")
//!     .with_field("street", CqlType::text())
//!     .with_field("zip", CqlType::int())
//!     .build();
//! assert_eq!(address.as_udt().map(|u| u.position("zip")), Some(Some(1)));
//! assert_eq!(CqlType::frozen(address).cql_name(), "frozen<address>");
//! ```

mod descriptor;
mod parse;
mod primitive;
mod udt;

pub use descriptor::{CellLayout, CqlType};
pub use parse::parse_type;
pub use primitive::PrimitiveKind;
pub use udt::{UdtBuilder, UdtDescriptor, UdtField};
pub(crate) use udt::quote_identifier;
