// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by every codec operation.
//!
//! Failures are local to a single call: composite operations are
//! all-or-nothing and nothing here is retried.

use thiserror::Error;

/// Errors for serialize, deserialize, conversion and schema operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Buffer too short, or a length field inconsistent with the remaining bytes.
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// Declared field/element count disagrees with the descriptor's arity.
    #[error("Schema mismatch for {type_name}: expected {expected} fields, found {found}")]
    SchemaMismatch {
        type_name: String,
        expected: usize,
        found: usize,
    },

    /// Authoritative lookup for a user-defined type failed.
    #[error("UDT '{keyspace}.{name}' not registered")]
    TypeNotRegistered { keyspace: String, name: String },

    /// The requested type has no codec implementation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A logical value does not match the shape of its declared type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid UTF-8 in {type_name} value")]
    InvalidUtf8 { type_name: &'static str },

    /// Type-name grammar error.
    #[error("Cannot parse type '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "config-loaders")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CodecError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedValue(msg.into())
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn not_registered(keyspace: &str, name: &str) -> Self {
        Self::TypeNotRegistered {
            keyspace: keyspace.to_string(),
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
