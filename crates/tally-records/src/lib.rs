//! Record kinds and the type dispatcher for Tally.
//!
//! Every value stored in a Tally table is a JSON object whose `RecType`
//! field names one of a closed set of [`RecordKind`]s. The
//! [`TypeDispatcher`] reads that discriminator first, then decodes the
//! payload into the kind's shape, so a typed read never hands back bytes
//! that do not match what their tag claims.

pub mod dispatch;
pub mod error;
pub mod kind;
pub mod record;

pub use dispatch::{TypeDispatcher, REC_TYPE_FIELD};
pub use error::{RecordError, RecordResult};
pub use kind::RecordKind;
pub use record::{
    AuctionRequest, BidRecord, ItemRecord, ItemTransaction, Record, TransferRecord, UserRecord,
    VerifyRecord,
};
