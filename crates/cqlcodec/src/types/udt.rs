// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! User-defined type descriptors and their fluent builder.

use super::CqlType;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One declared field of a UDT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtField {
    pub name: String,
    pub ty: CqlType,
}

impl UdtField {
    pub fn new(name: impl Into<String>, ty: CqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A named, ordered record type.
///
/// Field order is the construction order and is what goes on the wire.
/// The name index is built once in [`UdtBuilder::build`].
#[derive(Debug, Clone)]
pub struct UdtDescriptor {
    keyspace: String,
    name: String,
    fields: Vec<UdtField>,
    index: HashMap<String, usize>,
}

impl UdtDescriptor {
    pub(crate) fn new(keyspace: String, name: String, fields: Vec<UdtField>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            keyspace,
            name,
            fields,
            index,
        }
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `keyspace.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.name)
    }

    pub fn fields(&self) -> &[UdtField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&UdtField> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn field_at(&self, position: usize) -> Option<&UdtField> {
        self.fields.get(position)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// `CREATE TYPE ks.name (a text, b frozen<other>);`
    pub fn create_stmt(&self) -> String {
        let body = self
            .fields
            .iter()
            .map(|f| format!("{} {}", quote_identifier(&f.name), f.ty.cql_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TYPE {}.{} ({});",
            quote_identifier(&self.keyspace),
            quote_identifier(&self.name),
            body
        )
    }
}

impl PartialEq for UdtDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.keyspace == other.keyspace && self.name == other.name && self.fields == other.fields
    }
}

impl Eq for UdtDescriptor {}

impl Hash for UdtDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyspace.hash(state);
        self.name.hash(state);
        self.fields.hash(state);
    }
}

/// Builder for UDT descriptors, created by [`CqlType::udt`].
#[derive(Debug)]
pub struct UdtBuilder {
    keyspace: String,
    name: String,
    fields: Vec<UdtField>,
}

impl UdtBuilder {
    pub(crate) fn new(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field. Re-declaring a name replaces its type in place.
    pub fn with_field(mut self, name: impl Into<String>, ty: CqlType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.fields.push(UdtField::new(name, ty)),
        }
        self
    }

    /// Multi-cell UDT type; wrap with [`CqlType::frozen`] for the frozen form.
    pub fn build(self) -> CqlType {
        CqlType::Udt(Arc::new(self.build_descriptor()))
    }

    pub fn build_descriptor(self) -> UdtDescriptor {
        UdtDescriptor::new(self.keyspace, self.name, self.fields)
    }
}

/// Quote an identifier unless it is a plain lower-case CQL name.
pub(crate) fn quote_identifier(ident: &str) -> String {
    let mut chars = ident.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}
