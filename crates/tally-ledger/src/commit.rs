use serde::{Deserialize, Serialize};

use crate::row::{ColumnDefinition, Row};

/// One state change proposed by an invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    CreateTable {
        table: String,
        columns: Vec<ColumnDefinition>,
    },
    DeleteTable {
        table: String,
    },
    InsertRow {
        table: String,
        row: Row,
    },
    ReplaceRow {
        table: String,
        row: Row,
    },
    DeleteRow {
        table: String,
        keys: Vec<String>,
    },
    PutState {
        key: String,
        value: Vec<u8>,
    },
}

impl Mutation {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create-table",
            Self::DeleteTable { .. } => "delete-table",
            Self::InsertRow { .. } => "insert-row",
            Self::ReplaceRow { .. } => "replace-row",
            Self::DeleteRow { .. } => "delete-row",
            Self::PutState { .. } => "put-state",
        }
    }

    /// The table this mutation touches, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::CreateTable { table, .. }
            | Self::DeleteTable { table }
            | Self::InsertRow { table, .. }
            | Self::ReplaceRow { table, .. }
            | Self::DeleteRow { table, .. } => Some(table),
            Self::PutState { .. } => None,
        }
    }
}

/// The write set of one committed invocation.
///
/// `seq` counts commits from 1 and is what replay checks ordering against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub seq: u64,
    pub mutations: Vec<Mutation>,
}
