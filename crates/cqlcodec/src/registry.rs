// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Authoritative UDT registry.
//!
//! The codec never trusts a caller-supplied field order for a UDT: it asks a
//! [`UdtRegistry`] for the registered descriptor on every (de)serialize.
//! [`SchemaRegistry`] is the in-memory implementation; tests may substitute
//! their own.

use crate::error::{CodecError, Result};
use crate::types::{parse_type, CqlType, UdtBuilder, UdtDescriptor};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Read-only lookup of UDT definitions by keyspace and name.
pub trait UdtRegistry: Send + Sync {
    /// Registered descriptor, or `TypeNotRegistered`.
    fn lookup(&self, keyspace: &str, name: &str) -> Result<Arc<UdtDescriptor>>;
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

/// Serializable UDT definition with fields stored as CQL type names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdtDefinition {
    pub keyspace: String,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub cql_type: String,
}

impl From<&UdtDescriptor> for UdtDefinition {
    fn from(udt: &UdtDescriptor) -> Self {
        Self {
            keyspace: udt.keyspace().to_string(),
            name: udt.name().to_string(),
            fields: udt
                .fields()
                .iter()
                .map(|f| FieldDefinition {
                    name: f.name.clone(),
                    cql_type: f.ty.cql_name(),
                })
                .collect(),
        }
    }
}

impl UdtDefinition {
    /// Resolve field types against `registry`.
    pub fn resolve(&self, registry: &dyn UdtRegistry) -> Result<UdtDescriptor> {
        let mut builder = UdtBuilder::new(self.keyspace.clone(), self.name.clone());
        for field in &self.fields {
            let ty = parse_type(&field.cql_type, &self.keyspace, registry)?;
            builder = builder.with_field(field.name.clone(), ty);
        }
        Ok(builder.build_descriptor())
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// Concurrent in-memory registry keyed by `(keyspace, name)`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: DashMap<(String, String), Arc<UdtDescriptor>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) one UDT. Returns the previous definition, if any.
    pub fn register(&self, udt: Arc<UdtDescriptor>) -> Option<Arc<UdtDescriptor>> {
        let key = (udt.keyspace().to_string(), udt.name().to_string());
        log::debug!("registering UDT {} ({} fields)", udt.qualified_name(), udt.len());
        self.types.insert(key, udt)
    }

    /// Register every UDT reachable from `ty`. Returns how many were visited.
    pub fn register_all(&self, ty: &CqlType) -> usize {
        let udts = ty.udts();
        for udt in &udts {
            self.register(Arc::clone(udt));
        }
        udts.len()
    }

    pub fn get(&self, keyspace: &str, name: &str) -> Option<Arc<UdtDescriptor>> {
        self.types
            .get(&(keyspace.to_string(), name.to_string()))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, keyspace: &str, name: &str) -> bool {
        self.types
            .contains_key(&(keyspace.to_string(), name.to_string()))
    }

    pub fn remove(&self, keyspace: &str, name: &str) -> Option<Arc<UdtDescriptor>> {
        self.types
            .remove(&(keyspace.to_string(), name.to_string()))
            .map(|(_, udt)| udt)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All definitions, sorted by qualified name.
    pub fn definitions(&self) -> Vec<UdtDefinition> {
        let mut defs: Vec<UdtDefinition> = self
            .types
            .iter()
            .map(|entry| UdtDefinition::from(entry.value().as_ref()))
            .collect();
        defs.sort_by(|a, b| (&a.keyspace, &a.name).cmp(&(&b.keyspace, &b.name)));
        defs
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.definitions())?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Register definitions in dependency order, whatever order they are listed in.
    pub fn load_definitions(&self, defs: Vec<UdtDefinition>) -> Result<usize> {
        let total = defs.len();
        let mut pending = defs;
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            let mut last_missing = None;
            for def in pending {
                match def.resolve(self) {
                    Ok(udt) => {
                        self.register(Arc::new(udt));
                    }
                    Err(err @ CodecError::TypeNotRegistered { .. }) => {
                        last_missing = Some(err);
                        deferred.push(def);
                    }
                    Err(err) => return Err(err),
                }
            }
            if deferred.len() == before {
                if let Some(err) = last_missing {
                    return Err(err);
                }
            }
            pending = deferred;
        }
        Ok(total)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let registry = Self::new();
        let defs: Vec<UdtDefinition> = serde_json::from_str(text)?;
        registry.load_definitions(defs)?;
        Ok(registry)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl UdtRegistry for SchemaRegistry {
    fn lookup(&self, keyspace: &str, name: &str) -> Result<Arc<UdtDescriptor>> {
        self.get(keyspace, name).ok_or_else(|| {
            log::debug!("UDT {}.{} not registered", keyspace, name);
            CodecError::not_registered(keyspace, name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> CqlType {
        let point = CqlType::udt("geo", "point")
            .with_field("x", CqlType::double())
            .with_field("y", CqlType::double())
            .build();
        CqlType::udt("geo", "segment")
            .with_field("from", CqlType::frozen(point.clone()))
            .with_field("to", CqlType::frozen(point))
            .with_field("label", CqlType::text())
            .build()
    }

    #[test]
    fn test_register_all_and_lookup() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.register_all(&nested()), 2);
        assert_eq!(registry.len(), 2);
        let point = registry.lookup("geo", "point").expect("registered");
        assert_eq!(point.len(), 2);
        assert!(matches!(
            registry.lookup("geo", "nope"),
            Err(CodecError::TypeNotRegistered { .. })
        ));
    }

    #[test]
    fn test_register_replaces() {
        let registry = SchemaRegistry::new();
        let v1 = CqlType::udt("ks", "t").with_field("a", CqlType::int()).build();
        let v2 = CqlType::udt("ks", "t")
            .with_field("a", CqlType::int())
            .with_field("b", CqlType::text())
            .build();
        registry.register_all(&v1);
        registry.register_all(&v2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ks", "t").map(|u| u.len()).ok(), Some(2));
    }

    #[test]
    fn test_json_roundtrip_any_order() {
        let registry = SchemaRegistry::new();
        registry.register_all(&nested());

        // Put the dependent type first; loading must still succeed.
        let mut defs = registry.definitions();
        defs.reverse();
        let json = serde_json::to_string(&defs).expect("serialize");

        let loaded = SchemaRegistry::from_json_str(&json).expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.lookup("geo", "segment").ok(),
            registry.lookup("geo", "segment").ok()
        );
    }

    #[test]
    fn test_missing_dependency_fails() {
        let json = r#"[{"keyspace":"ks","name":"a","fields":[{"name":"b","type":"frozen<b>"}]}]"#;
        assert!(matches!(
            SchemaRegistry::from_json_str(json),
            Err(CodecError::TypeNotRegistered { .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("udts.json");
        let registry = SchemaRegistry::new();
        registry.register_all(&nested());
        registry.save(&path).expect("save");

        let loaded = SchemaRegistry::load(&path).expect("load");
        assert_eq!(loaded.definitions(), registry.definitions());
    }
}
