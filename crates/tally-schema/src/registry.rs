use std::collections::HashMap;

use serde::Deserialize;

use crate::descriptor::TableDescriptor;
use crate::error::{SchemaError, SchemaResult};

/// Immutable map from table name to [`TableDescriptor`].
///
/// Built once through [`SchemaBuilder`] (or one of the constructors) and
/// then shared read-only, typically behind an `Arc`. Declaration order is
/// preserved so bootstrap creates tables deterministically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: Vec<TableDescriptor>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a registry from already-constructed descriptors.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TableDescriptor>,
    ) -> SchemaResult<Self> {
        let mut tables = Vec::new();
        let mut index = HashMap::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            if index.contains_key(&descriptor.name) {
                return Err(SchemaError::DuplicateTable(descriptor.name));
            }
            index.insert(descriptor.name.clone(), tables.len());
            tables.push(descriptor);
        }
        Ok(Self { tables, index })
    }

    /// Parse a registry from a TOML document of the form:
    ///
    /// ```toml
    /// [[tables]]
    /// name = "UserTable"
    /// key_arity = 1
    /// ```
    pub fn from_toml_str(source: &str) -> SchemaResult<Self> {
        #[derive(Deserialize)]
        struct SchemaDocument {
            #[serde(default)]
            tables: Vec<TableDescriptor>,
        }

        let document: SchemaDocument =
            toml::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::from_descriptors(document.tables)
    }

    /// Number of leading key columns for `table`.
    pub fn key_arity(&self, table: &str) -> SchemaResult<usize> {
        self.descriptor(table).map(|d| d.key_arity)
    }

    pub fn descriptor(&self, table: &str) -> SchemaResult<&TableDescriptor> {
        self.index
            .get(table)
            .map(|&i| &self.tables[i])
            .ok_or_else(|| SchemaError::UnknownTable(table.to_string()))
    }

    pub fn contains(&self, table: &str) -> bool {
        self.index.contains_key(table)
    }

    /// All descriptors in declaration order.
    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Incremental builder for a [`SchemaRegistry`].
#[derive(Default, Debug)]
pub struct SchemaBuilder {
    tables: Vec<TableDescriptor>,
}

impl SchemaBuilder {
    pub fn table(mut self, name: impl Into<String>, key_arity: usize) -> Self {
        self.tables.push(TableDescriptor {
            name: name.into(),
            key_arity,
        });
        self
    }

    /// Validate every declaration and freeze the registry.
    pub fn build(self) -> SchemaResult<SchemaRegistry> {
        let registry = SchemaRegistry::from_descriptors(self.tables)?;
        tracing::debug!(tables = registry.len(), "schema registry built");
        Ok(registry)
    }
}
