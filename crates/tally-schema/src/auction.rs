//! The table layout of the item auction application.
//!
//! Category tables lead with a fixed epoch column (e.g. `"2017"`) so that a
//! prefix scan on `[epoch]` or `[epoch, category]` returns a whole group.

use crate::registry::SchemaRegistry;

/// Key: UserID
pub const USER_TABLE: &str = "UserTable";
/// Key: epoch, UserType, UserID
pub const USER_CAT_TABLE: &str = "UserCatTable";
/// Key: ItemID
pub const ITEM_TABLE: &str = "ItemTable";
/// Key: epoch, ItemSubject, ItemID
pub const ITEM_CAT_TABLE: &str = "ItemCatTable";
/// Key: ItemID, Status, AuctionHouseID, date-time
pub const ITEM_HISTORY_TABLE: &str = "ItemHistoryTable";
/// Key: AuctionID
pub const AUCTION_TABLE: &str = "AuctionTable";
/// Key: Year, AuctionID
pub const AUC_INIT_TABLE: &str = "AucInitTable";
/// Key: Year, AuctionID
pub const AUC_OPEN_TABLE: &str = "AucOpenTable";
/// Key: AuctionID, BidNo
pub const BID_TABLE: &str = "BidTable";
/// Key: AuctionID, ItemID
pub const TRANS_TABLE: &str = "TransTable";

impl SchemaRegistry {
    /// The default schema: every table of the auction application.
    pub fn auction() -> Self {
        Self::builder()
            .table(USER_TABLE, 1)
            .table(USER_CAT_TABLE, 3)
            .table(ITEM_TABLE, 1)
            .table(ITEM_CAT_TABLE, 3)
            .table(ITEM_HISTORY_TABLE, 4)
            .table(AUCTION_TABLE, 1)
            .table(AUC_INIT_TABLE, 2)
            .table(AUC_OPEN_TABLE, 2)
            .table(BID_TABLE, 2)
            .table(TRANS_TABLE, 2)
            .build()
            .expect("auction schema is statically valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auction_schema_arities() {
        let registry = SchemaRegistry::auction();
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.key_arity(USER_TABLE).unwrap(), 1);
        assert_eq!(registry.key_arity(USER_CAT_TABLE).unwrap(), 3);
        assert_eq!(registry.key_arity(ITEM_CAT_TABLE).unwrap(), 3);
        assert_eq!(registry.key_arity(ITEM_HISTORY_TABLE).unwrap(), 4);
        assert_eq!(registry.key_arity(AUC_INIT_TABLE).unwrap(), 2);
        assert_eq!(registry.key_arity(BID_TABLE).unwrap(), 2);
    }
}
