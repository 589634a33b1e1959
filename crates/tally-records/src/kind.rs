use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// The closed set of record kinds, named by the `RecType` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    /// An inventory item (artwork).
    #[serde(rename = "ARTINV")]
    ArtInv,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "BID")]
    Bid,
    /// A request to put an item up for auction.
    #[serde(rename = "AUCREQ")]
    AucReq,
    /// A post-auction transaction.
    #[serde(rename = "POSTTRAN")]
    PostTran,
    #[serde(rename = "OPENAUC")]
    OpenAuc,
    #[serde(rename = "CLAUC")]
    ClAuc,
    /// Ownership transfer.
    #[serde(rename = "XFER")]
    Xfer,
    /// Ownership verification.
    #[serde(rename = "VERIFY")]
    Verify,
}

impl RecordKind {
    pub const ALL: [RecordKind; 9] = [
        Self::ArtInv,
        Self::User,
        Self::Bid,
        Self::AucReq,
        Self::PostTran,
        Self::OpenAuc,
        Self::ClAuc,
        Self::Xfer,
        Self::Verify,
    ];

    /// The discriminator string written into `RecType`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArtInv => "ARTINV",
            Self::User => "USER",
            Self::Bid => "BID",
            Self::AucReq => "AUCREQ",
            Self::PostTran => "POSTTRAN",
            Self::OpenAuc => "OPENAUC",
            Self::ClAuc => "CLAUC",
            Self::Xfer => "XFER",
            Self::Verify => "VERIFY",
        }
    }

    /// The first argument that names a known kind, if any.
    ///
    /// An invocation whose arguments name no kind at all is rejected before
    /// any handler runs.
    pub fn find_in<S: AsRef<str>>(args: &[S]) -> Option<RecordKind> {
        args.iter().find_map(|arg| arg.as_ref().parse().ok())
    }
}

impl FromStr for RecordKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RecordError::UnknownRecordKind(Some(s.to_string())))
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
