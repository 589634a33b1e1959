use tally_ledger::TableLedger;
use tally_records::{ItemRecord, Record, RecordKind};
use tally_schema::auction::{ITEM_CAT_TABLE, ITEM_TABLE};
use tally_store::StoreResult;
use tracing::info;

use super::{first_arg, json_array, require_integer, require_kind, require_len, Handlers};
use crate::error::{AppError, AppResult};
use crate::operation::Operation;

const ITEM_FIELDS: usize = 12;

impl Handlers {
    /// `ItemTable[ItemID]` and `ItemCatTable[epoch, ItemSubject, ItemID]`.
    pub(super) fn post_item(&self, ledger: &mut dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let item = item_from_args(Operation::PostItem, args)?;
        let bytes = Record::from(item.clone()).to_bytes()?;

        self.store.insert(ledger, ITEM_TABLE, &[&item.item_id], bytes.clone())?;
        let category = [
            self.category_epoch.as_str(),
            item.item_subject.as_str(),
            item.item_id.as_str(),
        ];
        self.store.insert(ledger, ITEM_CAT_TABLE, &category, bytes.clone())?;

        info!(item_id = %item.item_id, subject = %item.item_subject, "item posted");
        Ok(bytes)
    }

    pub(super) fn get_item(&self, ledger: &dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let item_id = first_arg(Operation::GetItem, args)?;
        let stored = self.store.get_record(ledger, ITEM_TABLE, &[item_id])?;
        expect_item(stored.kind)?;
        Ok(stored.bytes)
    }

    /// All items of the epoch, or only those of one `ItemSubject`.
    pub(super) fn get_item_list_by_cat(&self, ledger: &dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let mut prefix = vec![self.category_epoch.as_str()];
        prefix.extend(args.first().map(String::as_str));

        let items = self
            .store
            .scan_records(ledger, ITEM_CAT_TABLE, prefix.as_slice())?
            .collect::<StoreResult<Vec<_>>>()?;
        for item in &items {
            expect_item(item.kind)?;
        }
        json_array(&items)
    }
}

fn item_from_args(operation: Operation, args: &[String]) -> AppResult<ItemRecord> {
    require_len(operation, args, ITEM_FIELDS)?;
    require_integer(operation, "ItemID", &args[0])?;
    let rec_type = require_kind(operation, &args[1], RecordKind::ArtInv)?;
    Ok(ItemRecord {
        item_id: args[0].clone(),
        rec_type,
        item_desc: args[2].clone(),
        item_detail: args[3].clone(),
        item_date: args[4].clone(),
        item_type: args[5].clone(),
        item_subject: args[6].clone(),
        item_media: args[7].clone(),
        item_size: args[8].clone(),
        item_pic_fn: args[9].clone(),
        item_base_price: args[10].clone(),
        current_owner_id: args[11].clone(),
    })
}

fn expect_item(kind: RecordKind) -> AppResult<()> {
    if kind != RecordKind::ArtInv {
        return Err(AppError::UnexpectedKind {
            expected: RecordKind::ArtInv,
            found: kind,
        });
    }
    Ok(())
}
