use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};
use crate::kind::RecordKind;

// Field names follow the auction application's JSON, so most structs need
// explicit renames where PascalCase would produce `Id` instead of `ID`.

// ---------------------------------------------------------------------------
// Users and items
// ---------------------------------------------------------------------------

/// A participant: auction house, bank, trader, shipper or appraiser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub rec_type: RecordKind,
    pub name: String,
    /// `AH`, `BK`, `TR`, `SH` or `AP`; used as the category key.
    pub user_type: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub bank: String,
    pub account_no: String,
    pub routing_no: String,
}

/// An inventory item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemRecord {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    pub rec_type: RecordKind,
    pub item_desc: String,
    pub item_detail: String,
    pub item_date: String,
    pub item_type: String,
    /// Used as the category key.
    pub item_subject: String,
    pub item_media: String,
    pub item_size: String,
    #[serde(rename = "ItemPicFN")]
    pub item_pic_fn: String,
    pub item_base_price: String,
    #[serde(rename = "CurrentOwnerID")]
    pub current_owner_id: String,
}

// ---------------------------------------------------------------------------
// Auctions
// ---------------------------------------------------------------------------

/// An auction in any of its phases (`AUCREQ`, `OPENAUC`, `CLAUC`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuctionRequest {
    #[serde(rename = "AuctionID")]
    pub auction_id: String,
    pub rec_type: RecordKind,
    #[serde(rename = "ItemID")]
    pub item_id: String,
    #[serde(rename = "AuctionHouseID")]
    pub auction_house_id: String,
    #[serde(rename = "SellerID")]
    pub seller_id: String,
    pub request_date: String,
    pub reserve_price: String,
    pub buy_it_now_price: String,
    pub status: String,
    pub open_date: String,
    pub close_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BidRecord {
    #[serde(rename = "AuctionID")]
    pub auction_id: String,
    pub rec_type: RecordKind,
    pub bid_no: String,
    #[serde(rename = "ItemID")]
    pub item_id: String,
    #[serde(rename = "BuyerID")]
    pub buyer_id: String,
    pub bid_price: String,
    pub bid_time: String,
}

/// Settlement of a closed auction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemTransaction {
    #[serde(rename = "AuctionID")]
    pub auction_id: String,
    pub rec_type: RecordKind,
    #[serde(rename = "ItemID")]
    pub item_id: String,
    pub trans_type: String,
    pub user_id: String,
    pub trans_date: String,
    pub hammer_time: String,
    pub hammer_price: String,
    pub details: String,
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransferRecord {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    pub rec_type: RecordKind,
    #[serde(rename = "CurrentOwnerID")]
    pub current_owner_id: String,
    #[serde(rename = "NewOwnerID")]
    pub new_owner_id: String,
    pub transfer_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyRecord {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    pub rec_type: RecordKind,
    #[serde(rename = "CurrentOwnerID")]
    pub current_owner_id: String,
    pub verified_by: String,
    pub verify_date: String,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A decoded record of any kind.
///
/// Serializes as the bare shape, so `to_bytes` reproduces the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    User(UserRecord),
    Item(ItemRecord),
    Auction(AuctionRequest),
    Bid(BidRecord),
    Transaction(ItemTransaction),
    Transfer(TransferRecord),
    Verify(VerifyRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::User(r) => r.rec_type,
            Self::Item(r) => r.rec_type,
            Self::Auction(r) => r.rec_type,
            Self::Bid(r) => r.rec_type,
            Self::Transaction(r) => r.rec_type,
            Self::Transfer(r) => r.rec_type,
            Self::Verify(r) => r.rec_type,
        }
    }

    /// JSON payload suitable for a table's value column.
    pub fn to_bytes(&self) -> RecordResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RecordError::Encode(e.to_string()))
    }
}

impl From<UserRecord> for Record {
    fn from(r: UserRecord) -> Self {
        Self::User(r)
    }
}

impl From<ItemRecord> for Record {
    fn from(r: ItemRecord) -> Self {
        Self::Item(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            user_id: "100".into(),
            rec_type: RecordKind::User,
            name: "Ashley Hart".into(),
            user_type: "TR".into(),
            address: "One Copley Parkway, #216, Morrisville, NC 27560".into(),
            phone: "9198063535".into(),
            email: "ashley@itpeople.com".into(),
            bank: "SUNTRUST".into(),
            account_no: "00017102345".into(),
            routing_no: "0234678".into(),
        }
    }

    #[test]
    fn user_wire_names() {
        let json: serde_json::Value = serde_json::to_value(user()).unwrap();
        assert_eq!(json["UserID"], "100");
        assert_eq!(json["RecType"], "USER");
        assert_eq!(json["AccountNo"], "00017102345");
        assert!(json.get("UserId").is_none());
    }

    #[test]
    fn item_wire_names() {
        let item = ItemRecord {
            item_id: "1000".into(),
            rec_type: RecordKind::ArtInv,
            item_desc: "Flowers".into(),
            item_detail: "Oil on canvas".into(),
            item_date: "1887".into(),
            item_type: "Original".into(),
            item_subject: "Landscape".into(),
            item_media: "Oil".into(),
            item_size: "20 x 30 in".into(),
            item_pic_fn: "flowers.jpg".into(),
            item_base_price: "10000".into(),
            current_owner_id: "100".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["ItemPicFN"], "flowers.jpg");
        assert_eq!(json["CurrentOwnerID"], "100");
        assert_eq!(Record::from(item).kind(), RecordKind::ArtInv);
    }

    #[test]
    fn transaction_keeps_user_id_spelling() {
        let tx = ItemTransaction {
            auction_id: "1".into(),
            rec_type: RecordKind::PostTran,
            item_id: "1000".into(),
            trans_type: "SALE".into(),
            user_id: "200".into(),
            trans_date: "2017-01-02".into(),
            hammer_time: "2017-01-02 10:00".into(),
            hammer_price: "12000".into(),
            details: "sold".into(),
        };
        let json = serde_json::to_value(tx).unwrap();
        assert_eq!(json["UserId"], "200");
    }

    #[test]
    fn record_serializes_as_bare_shape() {
        let record = Record::from(user());
        let bytes = record.to_bytes().unwrap();
        let direct = serde_json::to_vec(&user()).unwrap();
        assert_eq!(bytes, direct);
        assert_eq!(record.kind(), RecordKind::User);
    }
}
