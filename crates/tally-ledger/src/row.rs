use serde::{Deserialize, Serialize};

/// Storage type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Bytes,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
        }
    }
}

/// One column of a table layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    /// Key columns form the row's identity.
    pub key: bool,
}

impl ColumnDefinition {
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::String,
            key: true,
        }
    }

    pub fn value(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            key: false,
        }
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    String(String),
    Bytes(Vec<u8>),
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::String(_) => ColumnType::String,
            Self::Bytes(_) => ColumnType::Bytes,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::String(_) => None,
        }
    }
}

/// An ordered sequence of cells matching a table's column layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<Column>,
}

impl Row {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build the `[key..., value]` row shape used by keyed tables.
    pub fn keyed<S: AsRef<str>>(keys: &[S], value: Vec<u8>) -> Self {
        let mut columns: Vec<Column> = keys
            .iter()
            .map(|k| Column::String(k.as_ref().to_string()))
            .collect();
        columns.push(Column::Bytes(value));
        Self { columns }
    }

    /// The last column, when it holds bytes.
    pub fn value(&self) -> Option<&[u8]> {
        self.columns.last().and_then(Column::as_bytes)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
