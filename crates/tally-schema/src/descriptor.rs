use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

/// Largest key arity a table may declare.
pub const MAX_KEY_ARITY: usize = 4;

/// Schema entry naming a table and its fixed key-column count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub key_arity: usize,
}

impl TableDescriptor {
    /// Create a descriptor, validating the name and arity.
    pub fn new(name: impl Into<String>, key_arity: usize) -> SchemaResult<Self> {
        let descriptor = Self {
            name: name.into(),
            key_arity,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if !(1..=MAX_KEY_ARITY).contains(&self.key_arity) {
            return Err(SchemaError::InvalidArity {
                table: self.name.clone(),
                arity: self.key_arity,
                max: MAX_KEY_ARITY,
            });
        }
        Ok(())
    }

    /// Total column count: the key columns plus the value column.
    pub fn column_count(&self) -> usize {
        self.key_arity + 1
    }
}
