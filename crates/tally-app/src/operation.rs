use std::str::FromStr;

use crate::error::AppError;

/// Whether an operation may write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Runs in a committed invocation.
    Invoke,
    /// Read-only.
    Query,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoke => write!(f, "invoke"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Every operation the router accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    PostUser,
    UpdateUser,
    DeleteUser,
    PostItem,
    GetUser,
    GetItem,
    GetUserListByCat,
    GetItemListByCat,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Self::PostUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::PostItem,
        Self::GetUser,
        Self::GetItem,
        Self::GetUserListByCat,
        Self::GetItemListByCat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PostUser => "PostUser",
            Self::UpdateUser => "UpdateUser",
            Self::DeleteUser => "DeleteUser",
            Self::PostItem => "PostItem",
            Self::GetUser => "GetUser",
            Self::GetItem => "GetItem",
            Self::GetUserListByCat => "GetUserListByCat",
            Self::GetItemListByCat => "GetItemListByCat",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Self::PostUser | Self::UpdateUser | Self::DeleteUser | Self::PostItem => Mode::Invoke,
            Self::GetUser | Self::GetItem | Self::GetUserListByCat | Self::GetItemListByCat => {
                Mode::Query
            }
        }
    }

    /// Parse a name and require it to belong to `mode`.
    pub fn resolve(name: &str, mode: Mode) -> Result<Self, AppError> {
        let operation: Self = name.parse()?;
        if operation.mode() != mode {
            return Err(AppError::WrongMode {
                operation: operation.name().to_string(),
                expected: operation.mode(),
            });
        }
        Ok(operation)
    }
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| AppError::UnknownOperation(s.to_string()))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
