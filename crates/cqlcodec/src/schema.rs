// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table schemas for test fixtures: DDL/DML statements, random rows and
//! the round trip through the codec and the tabular row bridge.
//!
//! ```rust
//! use cqlcodec::{CqlType, RandomValues, SortOrder, TableSchema};
//!
//! let schema = TableSchema::builder()
//!     .keyspace("shop")
//!     .table("orders")
//!     .partition_key("id", CqlType::uuid())
//!     .clustering_key("placed", CqlType::timestamp(), SortOrder::Desc)
//!     .column("total", CqlType::decimal())
//!     .build()
//!     .expect("schema");
//! assert_eq!(
//!     schema.create_stmt(),
//!     "CREATE TABLE shop.orders (id uuid, placed timestamp, total decimal, \
//!      PRIMARY KEY((id), placed)) WITH CLUSTERING ORDER BY (placed DESC);"
//! );
//! let rows = schema.random_rows(&mut RandomValues::with_seed(1), 3, 1);
//! assert!(rows[0].is_tombstone());
//! ```

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::json::to_json_typed;
use crate::random::RandomValues;
use crate::row::{from_row, to_row, GenericRow, TabularRow};
use crate::types::{quote_identifier, CqlType, UdtDescriptor};
use crate::value::CqlValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Clustering order of one clustering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        })
    }
}

/// Role of a column in the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    PartitionKey,
    ClusteringKey(SortOrder),
    Static,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: CqlType,
    pub kind: ColumnKind,
    pub position: usize,
}

impl Column {
    pub fn is_key(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::PartitionKey | ColumnKind::ClusteringKey(_)
        )
    }

    fn is_value(&self) -> bool {
        self.kind == ColumnKind::Regular
    }
}

/// An immutable table layout. Columns are ordered partition keys first,
/// then clustering keys, then static and regular columns sorted by name.
#[derive(Debug, Clone)]
pub struct TableSchema {
    keyspace: String,
    table: String,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    insert_fields: Option<Vec<String>>,
    delete_conditions: Option<Vec<String>>,
}

impl TableSchema {
    pub fn builder() -> TableSchemaBuilder {
        TableSchemaBuilder::default()
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn partition_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::PartitionKey)
    }

    pub fn clustering_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, ColumnKind::ClusteringKey(_)))
    }

    pub fn types(&self) -> Vec<CqlType> {
        self.columns.iter().map(|c| c.ty.clone()).collect()
    }

    fn qualified_table(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.keyspace),
            quote_identifier(&self.table)
        )
    }

    /// Every UDT used by any column, dependencies first.
    pub fn udts(&self) -> Vec<Arc<UdtDescriptor>> {
        let mut out: Vec<Arc<UdtDescriptor>> = Vec::new();
        for column in &self.columns {
            for udt in column.ty.udts() {
                if !out.contains(&udt) {
                    out.push(udt);
                }
            }
        }
        out
    }

    /// `CREATE TYPE` statements for [`udts`](Self::udts), in creation order.
    pub fn create_type_stmts(&self) -> Vec<String> {
        self.udts().iter().map(|udt| udt.create_stmt()).collect()
    }

    pub fn create_stmt(&self) -> String {
        let mut stmt = format!("CREATE TABLE {} (", self.qualified_table());
        for column in &self.columns {
            stmt.push_str(&quote_identifier(&column.name));
            stmt.push(' ');
            stmt.push_str(&column.ty.cql_name());
            if column.kind == ColumnKind::Static {
                stmt.push_str(" static");
            }
            stmt.push_str(", ");
        }

        let pks: Vec<String> = self
            .partition_keys()
            .map(|c| quote_identifier(&c.name))
            .collect();
        stmt.push_str("PRIMARY KEY((");
        stmt.push_str(&pks.join(", "));
        stmt.push(')');
        for ck in self.clustering_keys() {
            stmt.push_str(", ");
            stmt.push_str(&quote_identifier(&ck.name));
        }
        stmt.push_str("))");

        let orders: Vec<String> = self
            .clustering_keys()
            .filter_map(|c| match c.kind {
                ColumnKind::ClusteringKey(order) => {
                    Some(format!("{} {}", quote_identifier(&c.name), order))
                }
                _ => None,
            })
            .collect();
        if !orders.is_empty() {
            stmt.push_str(" WITH CLUSTERING ORDER BY (");
            stmt.push_str(&orders.join(", "));
            stmt.push(')');
        }
        stmt.push(';');
        stmt
    }

    /// Parameterized insert over all columns, or the configured subset.
    pub fn insert_stmt(&self) -> String {
        let fields: Vec<String> = match &self.insert_fields {
            Some(fields) => fields.iter().map(|f| quote_identifier(f)).collect(),
            None => self
                .columns
                .iter()
                .map(|c| quote_identifier(&c.name))
                .collect(),
        };
        let markers = vec!["?"; fields.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.qualified_table(),
            fields.join(", "),
            markers
        )
    }

    /// Parameterized delete by primary key, or by the configured conditions.
    /// Custom conditions carry their own operator, e.g. `"ck >"`.
    pub fn delete_stmt(&self) -> String {
        let conditions: Vec<String> = match &self.delete_conditions {
            Some(conditions) => conditions.iter().map(|c| format!("{} ?", c)).collect(),
            None => self
                .columns
                .iter()
                .filter(|c| c.is_key())
                .map(|c| format!("{} = ?", quote_identifier(&c.name)))
                .collect(),
        };
        format!(
            "DELETE FROM {} WHERE {};",
            self.qualified_table(),
            conditions.join(" AND ")
        )
    }

    pub fn random_row(&self, values: &mut RandomValues) -> TestRow<'_> {
        let row = self
            .columns
            .iter()
            .map(|c| values.value(&c.ty))
            .collect();
        TestRow::from_values(self, row)
    }

    /// `n` random rows; the first `tombstones` of them have every regular
    /// column nulled out.
    pub fn random_rows(&self, values: &mut RandomValues, n: usize, tombstones: usize) -> Vec<TestRow<'_>> {
        (0..n)
            .map(|i| {
                let mut row = self.random_row(values);
                if i < tombstones {
                    for column in self.columns.iter().filter(|c| c.is_value()) {
                        row.values[column.position] = CqlValue::Null;
                    }
                }
                row
            })
            .collect()
    }

    /// A row from positional values; missing trailing values are null.
    pub fn row(&self, values: Vec<CqlValue>) -> Result<TestRow<'_>> {
        if values.len() > self.columns.len() {
            return Err(CodecError::SchemaMismatch {
                type_name: self.qualified_table(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        Ok(TestRow::from_values(self, values))
    }

    /// Convert an engine row back into a test row.
    pub fn from_tabular(&self, row: &dyn TabularRow) -> Result<TestRow<'_>> {
        let values = from_row(&self.types(), row)?;
        Ok(TestRow::from_values(self, values))
    }

    /// Decode one serialized cell per column; `None` is a null cell.
    pub fn decode_row(&self, codec: &Codec<'_>, cells: &[Option<Vec<u8>>]) -> Result<TestRow<'_>> {
        if cells.len() != self.columns.len() {
            return Err(CodecError::SchemaMismatch {
                type_name: self.qualified_table(),
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        let values = self
            .columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| match cell {
                Some(bytes) => codec.deserialize(&column.ty, bytes),
                None => Ok(CqlValue::Null),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TestRow::from_values(self, values))
    }
}

/// Fluent construction of a [`TableSchema`].
#[derive(Debug, Default)]
pub struct TableSchemaBuilder {
    keyspace: Option<String>,
    table: Option<String>,
    partition_keys: Vec<(String, CqlType)>,
    clustering_keys: Vec<(String, CqlType, SortOrder)>,
    columns: Vec<(String, CqlType, ColumnKind)>,
    insert_fields: Option<Vec<String>>,
    delete_conditions: Option<Vec<String>>,
}

impl TableSchemaBuilder {
    pub fn keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn partition_key(mut self, name: impl Into<String>, ty: CqlType) -> Self {
        self.partition_keys.push((name.into(), ty));
        self
    }

    pub fn clustering_key(mut self, name: impl Into<String>, ty: CqlType, order: SortOrder) -> Self {
        self.clustering_keys.push((name.into(), ty, order));
        self
    }

    pub fn static_column(mut self, name: impl Into<String>, ty: CqlType) -> Self {
        self.columns.push((name.into(), ty, ColumnKind::Static));
        self
    }

    pub fn column(mut self, name: impl Into<String>, ty: CqlType) -> Self {
        self.columns.push((name.into(), ty, ColumnKind::Regular));
        self
    }

    pub fn insert_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn delete_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delete_conditions = Some(conditions.into_iter().map(Into::into).collect());
        self
    }

    /// Fails without a partition key or when a column name repeats.
    pub fn build(self) -> Result<TableSchema> {
        if self.partition_keys.is_empty() {
            return Err(CodecError::mismatch(
                "at least one partition key",
                "none",
            ));
        }

        let mut regular = self.columns;
        regular.sort_by(|a, b| a.0.cmp(&b.0));

        let ordered = self
            .partition_keys
            .into_iter()
            .map(|(name, ty)| (name, ty, ColumnKind::PartitionKey))
            .chain(
                self.clustering_keys
                    .into_iter()
                    .map(|(name, ty, order)| (name, ty, ColumnKind::ClusteringKey(order))),
            )
            .chain(regular);

        let mut columns = Vec::new();
        let mut index = HashMap::new();
        for (position, (name, ty, kind)) in ordered.enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(CodecError::mismatch("unique column names", format!("duplicate '{}'", name)));
            }
            columns.push(Column {
                name,
                ty,
                kind,
                position,
            });
        }

        let suffix = || format!("{:016x}", fastrand::u64(..));
        let keyspace = self.keyspace.unwrap_or_else(|| format!("keyspace_{}", suffix()));
        let table = self.table.unwrap_or_else(|| format!("table_{}", suffix()));
        log::debug!("table schema {}.{} with {} columns", keyspace, table, columns.len());

        Ok(TableSchema {
            keyspace,
            table,
            columns,
            index,
            insert_fields: self.insert_fields,
            delete_conditions: self.delete_conditions,
        })
    }
}

/// One row of a [`TableSchema`], values by column position.
#[derive(Debug, Clone)]
pub struct TestRow<'s> {
    schema: &'s TableSchema,
    values: Vec<CqlValue>,
}

impl<'s> TestRow<'s> {
    fn from_values(schema: &'s TableSchema, mut values: Vec<CqlValue>) -> Self {
        values.resize(schema.columns.len(), CqlValue::Null);
        Self { schema, values }
    }

    pub fn schema(&self) -> &'s TableSchema {
        self.schema
    }

    pub fn values(&self) -> &[CqlValue] {
        &self.values
    }

    pub fn get(&self, position: usize) -> Option<&CqlValue> {
        self.values.get(position)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&CqlValue> {
        self.schema.position(name).and_then(|i| self.values.get(i))
    }

    /// Copy of this row with `name` replaced.
    pub fn with(&self, name: &str, value: CqlValue) -> Result<Self> {
        let position = self
            .schema
            .position(name)
            .ok_or_else(|| CodecError::mismatch("a column of the table", format!("'{}'", name)))?;
        Ok(self.with_at(position, value))
    }

    /// Copy of this row with the value at `position` replaced; out of range is ignored.
    pub fn with_at(&self, position: usize, value: CqlValue) -> Self {
        let mut copy = self.clone();
        if let Some(slot) = copy.values.get_mut(position) {
            *slot = value;
        }
        copy
    }

    /// True when every regular column is null.
    pub fn is_tombstone(&self) -> bool {
        self.schema
            .columns
            .iter()
            .filter(|c| c.is_value())
            .all(|c| self.values[c.position].is_null())
    }

    /// Primary key rendered as `pk1:pk2:ck1:`, each value in canonical JSON.
    pub fn key(&self) -> String {
        self.schema
            .columns
            .iter()
            .filter(|c| c.is_key())
            .map(|c| format!("{}:", to_json_typed(&c.ty, &self.values[c.position])))
            .collect()
    }

    /// Bridge to the engine's row representation.
    pub fn to_tabular(&self) -> Result<GenericRow> {
        let columns: Vec<(String, CqlType)> = self
            .schema
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.ty.clone()))
            .collect();
        to_row(&columns, &self.values)
    }

    /// Serialize each column; null cells become `None`.
    pub fn encode(&self, codec: &Codec<'_>) -> Result<Vec<Option<Vec<u8>>>> {
        self.schema
            .columns
            .iter()
            .zip(&self.values)
            .map(|(column, value)| {
                if value.is_null() {
                    Ok(None)
                } else {
                    codec.serialize(&column.ty, value).map(Some)
                }
            })
            .collect()
    }
}

impl PartialEq for TestRow<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl fmt::Display for TestRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TestRow{")?;
        for (i, column) in self.schema.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={}",
                column.name,
                to_json_typed(&column.ty, &self.values[column.position])
            )?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::value::UdtValue;

    fn address() -> CqlType {
        CqlType::udt("shop", "address")
            .with_field("street", CqlType::text())
            .with_field("zip", CqlType::int())
            .build()
    }

    fn schema() -> TableSchema {
        TableSchema::builder()
            .keyspace("shop")
            .table("customers")
            .partition_key("id", CqlType::int())
            .partition_key("region", CqlType::text())
            .clustering_key("since", CqlType::date(), SortOrder::Desc)
            .column("tags", CqlType::set(CqlType::text()))
            .static_column("country", CqlType::text())
            .column("address", address())
            .build()
            .expect("schema")
    }

    #[test]
    fn test_requires_partition_key() {
        let result = TableSchema::builder().column("a", CqlType::int()).build();
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = TableSchema::builder()
            .partition_key("a", CqlType::int())
            .column("a", CqlType::text())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_positions_keys_then_sorted_columns() {
        let schema = schema();
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "region", "since", "address", "country", "tags"]);
        assert_eq!(schema.position("tags"), Some(5));
    }

    #[test]
    fn test_default_names_generated() {
        let schema = TableSchema::builder()
            .partition_key("a", CqlType::int())
            .build()
            .expect("schema");
        assert!(schema.keyspace().starts_with("keyspace_"));
        assert!(schema.table().starts_with("table_"));
    }

    #[test]
    fn test_statements() {
        let schema = schema();
        assert_eq!(
            schema.create_stmt(),
            "CREATE TABLE shop.customers (id int, region text, since date, \
             address address, country text static, tags set<text>, \
             PRIMARY KEY((id, region), since)) WITH CLUSTERING ORDER BY (since DESC);"
        );
        assert_eq!(
            schema.insert_stmt(),
            "INSERT INTO shop.customers (id, region, since, address, country, tags) \
             VALUES (?, ?, ?, ?, ?, ?);"
        );
        assert_eq!(
            schema.delete_stmt(),
            "DELETE FROM shop.customers WHERE id = ? AND region = ? AND since = ?;"
        );
        assert_eq!(
            schema.create_type_stmts(),
            vec!["CREATE TYPE shop.address (street text, zip int);".to_string()]
        );
    }

    #[test]
    fn test_custom_insert_and_delete() {
        let schema = TableSchema::builder()
            .keyspace("ks")
            .table("t")
            .partition_key("pk", CqlType::int())
            .clustering_key("ck", CqlType::int(), SortOrder::Asc)
            .column("v", CqlType::text())
            .insert_fields(["pk", "ck"])
            .delete_conditions(["pk =", "ck >"])
            .build()
            .expect("schema");
        assert_eq!(schema.insert_stmt(), "INSERT INTO ks.t (pk, ck) VALUES (?, ?);");
        assert_eq!(schema.delete_stmt(), "DELETE FROM ks.t WHERE pk = ? AND ck > ?;");
    }

    #[test]
    fn test_tombstones_come_first() {
        let schema = schema();
        let mut values = RandomValues::with_seed(3);
        let rows = schema.random_rows(&mut values, 4, 2);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_tombstone());
        assert!(rows[1].is_tombstone());
        assert!(!rows[2].is_tombstone());
        // Static columns survive a row tombstone.
        assert!(!rows[0].get_by_name("country").expect("country").is_null());
    }

    #[test]
    fn test_with_and_key() {
        let schema = schema();
        let row = schema
            .row(vec![CqlValue::Int(7), CqlValue::text("eu"), CqlValue::Date(3)])
            .expect("row");
        assert!(row.is_tombstone());
        assert_eq!(row.key(), "7:\"eu\":3:");

        let updated = row.with("country", CqlValue::text("fr")).expect("with");
        assert_eq!(updated.get_by_name("country"), Some(&CqlValue::text("fr")));
        assert!(row.get_by_name("country").expect("country").is_null());
        assert!(row.with("missing", CqlValue::Int(1)).is_err());
    }

    #[test]
    fn test_codec_and_bridge_round_trip() {
        let schema = schema();
        let registry = SchemaRegistry::new();
        for column in schema.columns() {
            registry.register_all(&column.ty);
        }
        let codec = Codec::new(&registry);

        let row = schema
            .row(vec![
                CqlValue::Int(1),
                CqlValue::text("us"),
                CqlValue::Date(-5),
                CqlValue::Udt(UdtValue::new().with("zip", CqlValue::Int(94110))),
                CqlValue::Null,
                CqlValue::Set(vec![CqlValue::text("b"), CqlValue::text("a")]),
            ])
            .expect("row");

        let cells = row.encode(&codec).expect("encode");
        assert!(cells[4].is_none());
        let decoded = schema.decode_row(&codec, &cells).expect("decode");
        assert_eq!(decoded, row);

        let tabular = row.to_tabular().expect("to tabular");
        let back = schema.from_tabular(&tabular).expect("from tabular");
        assert_eq!(back, row);
    }
}
