use tally_ledger::TableLedger;
use tally_records::{Record, RecordKind, UserRecord};
use tally_schema::auction::{USER_CAT_TABLE, USER_TABLE};
use tally_store::StoreResult;
use tracing::info;

use super::{first_arg, json_array, require_integer, require_kind, require_len, Handlers};
use crate::error::{AppError, AppResult};
use crate::operation::Operation;

const USER_FIELDS: usize = 10;

impl Handlers {
    /// `UserTable[UserID]` and `UserCatTable[epoch, UserType, UserID]`.
    pub(super) fn post_user(&self, ledger: &mut dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let user = user_from_args(Operation::PostUser, args)?;
        let bytes = Record::from(user.clone()).to_bytes()?;

        self.store.insert(ledger, USER_TABLE, &[&user.user_id], bytes.clone())?;
        self.store
            .insert(ledger, USER_CAT_TABLE, &self.user_category_key(&user), bytes.clone())?;

        info!(user_id = %user.user_id, user_type = %user.user_type, "user posted");
        Ok(bytes)
    }

    /// Replace both rows. A changed `UserType` moves the category row.
    pub(super) fn update_user(&self, ledger: &mut dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let user = user_from_args(Operation::UpdateUser, args)?;
        let previous = self.stored_user(&*ledger, &user.user_id)?;
        let bytes = Record::from(user.clone()).to_bytes()?;

        self.store.replace(ledger, USER_TABLE, &[&user.user_id], bytes.clone())?;
        let category = self.user_category_key(&user);
        if previous.user_type == user.user_type {
            self.store
                .replace(ledger, USER_CAT_TABLE, &category, bytes.clone())?;
        } else {
            self.store
                .delete(ledger, USER_CAT_TABLE, &self.user_category_key(&previous))?;
            self.store.insert(ledger, USER_CAT_TABLE, &category, bytes.clone())?;
        }

        info!(user_id = %user.user_id, "user updated");
        Ok(bytes)
    }

    /// Remove both rows; the category key comes from the stored record.
    pub(super) fn delete_user(&self, ledger: &mut dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let user_id = first_arg(Operation::DeleteUser, args)?;
        require_integer(Operation::DeleteUser, "UserID", user_id)?;
        let stored = self.store.get_record(&*ledger, USER_TABLE, &[user_id])?;
        let user = as_user(stored.record)?;

        self.store.delete(ledger, USER_TABLE, &[user_id])?;
        self.store
            .delete(ledger, USER_CAT_TABLE, &self.user_category_key(&user))?;

        info!(user_id, "user deleted");
        Ok(stored.bytes)
    }

    pub(super) fn get_user(&self, ledger: &dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let user_id = first_arg(Operation::GetUser, args)?;
        let stored = self.store.get_record(ledger, USER_TABLE, &[user_id])?;
        expect_user(stored.kind)?;
        Ok(stored.bytes)
    }

    /// All users of the epoch, or only those of one `UserType`.
    pub(super) fn get_user_list_by_cat(&self, ledger: &dyn TableLedger, args: &[String]) -> AppResult<Vec<u8>> {
        let mut prefix = vec![self.category_epoch.as_str()];
        prefix.extend(args.first().map(String::as_str));

        let users = self
            .store
            .scan_records(ledger, USER_CAT_TABLE, prefix.as_slice())?
            .collect::<StoreResult<Vec<_>>>()?;
        for user in &users {
            expect_user(user.kind)?;
        }
        json_array(&users)
    }

    fn stored_user(&self, ledger: &dyn TableLedger, user_id: &str) -> AppResult<UserRecord> {
        let stored = self.store.get_record(ledger, USER_TABLE, &[user_id])?;
        as_user(stored.record)
    }

    fn user_category_key<'a>(&'a self, user: &'a UserRecord) -> [&'a str; 3] {
        [&self.category_epoch, &user.user_type, &user.user_id]
    }
}

fn user_from_args(operation: Operation, args: &[String]) -> AppResult<UserRecord> {
    require_len(operation, args, USER_FIELDS)?;
    require_integer(operation, "UserID", &args[0])?;
    let rec_type = require_kind(operation, &args[1], RecordKind::User)?;
    Ok(UserRecord {
        user_id: args[0].clone(),
        rec_type,
        name: args[2].clone(),
        user_type: args[3].clone(),
        address: args[4].clone(),
        phone: args[5].clone(),
        email: args[6].clone(),
        bank: args[7].clone(),
        account_no: args[8].clone(),
        routing_no: args[9].clone(),
    })
}

fn expect_user(kind: RecordKind) -> AppResult<()> {
    if kind != RecordKind::User {
        return Err(AppError::UnexpectedKind {
            expected: RecordKind::User,
            found: kind,
        });
    }
    Ok(())
}

fn as_user(record: Record) -> AppResult<UserRecord> {
    match record {
        Record::User(user) => Ok(user),
        other => Err(AppError::UnexpectedKind {
            expected: RecordKind::User,
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::user_args;
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;
    use tally_ledger::InMemoryLedger;
    use tally_schema::SchemaRegistry;
    use tally_store::{RecordStore, StoreError, StoreErrorKind};

    fn handlers() -> Handlers {
        Handlers::new(RecordStore::new(Arc::new(SchemaRegistry::auction())), "2017")
    }

    fn ready(handlers: &Handlers) -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        let mut inv = ledger.begin().unwrap();
        crate::bootstrap::bootstrap(handlers.store(), &mut inv).unwrap();
        inv.commit().unwrap();
        ledger
    }

    fn arg(s: &str) -> Vec<String> {
        vec![s.to_string()]
    }

    #[test]
    fn post_writes_both_tables() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        let bytes = h.post_user(&mut inv, &user_args("100", "TR")).unwrap();

        assert_eq!(h.store.get(&inv, USER_TABLE, &["100"]).unwrap(), bytes.as_slice());
        assert_eq!(
            h.store.get(&inv, USER_CAT_TABLE, &["2017", "TR", "100"]).unwrap(),
            bytes.as_slice()
        );
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["RecType"], "USER");
        assert_eq!(json["Name"], "Ashley Hart");
    }

    #[test]
    fn post_validates_arguments() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();

        let args = user_args("100", "TR");
        assert!(matches!(
            h.post_user(&mut inv, &args[..9]),
            Err(AppError::BadArguments { .. })
        ));

        let err = h.post_user(&mut inv, &user_args("abc", "TR")).unwrap_err();
        assert!(err.to_string().contains("UserID should be an integer"));

        let mut wrong_kind = user_args("100", "TR");
        wrong_kind[1] = "BID".into();
        assert!(h.post_user(&mut inv, &wrong_kind).is_err());
        assert!(inv.is_read_only());
    }

    #[test]
    fn duplicate_post_fails() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        h.post_user(&mut inv, &user_args("100", "TR")).unwrap();
        let err = h.post_user(&mut inv, &user_args("100", "TR")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(ref e) if e.kind() == StoreErrorKind::DuplicateKey
        ));
    }

    #[test]
    fn get_returns_stored_payload() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        let bytes = h.post_user(&mut inv, &user_args("100", "TR")).unwrap();
        assert_eq!(h.get_user(&inv, &arg("100")).unwrap(), bytes);
        assert!(matches!(
            h.get_user(&inv, &arg("101")),
            Err(AppError::Store(StoreError::NotFound { .. }))
        ));
    }

    #[test]
    fn update_moves_category_row() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        h.post_user(&mut inv, &user_args("100", "TR")).unwrap();
        h.update_user(&mut inv, &user_args("100", "AH")).unwrap();

        assert!(!h.store.exists(&inv, USER_CAT_TABLE, &["2017", "TR", "100"]).unwrap());
        assert!(h.store.exists(&inv, USER_CAT_TABLE, &["2017", "AH", "100"]).unwrap());
        let json: Value =
            serde_json::from_slice(&h.get_user(&inv, &arg("100")).unwrap()).unwrap();
        assert_eq!(json["UserType"], "AH");
    }

    #[test]
    fn update_in_place_and_missing_user() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        assert!(h.update_user(&mut inv, &user_args("100", "TR")).is_err());

        h.post_user(&mut inv, &user_args("100", "TR")).unwrap();
        let mut changed = user_args("100", "TR");
        changed[2] = "Ashley Hart-Jones".into();
        h.update_user(&mut inv, &changed).unwrap();
        let listed: Value =
            serde_json::from_slice(&h.get_user_list_by_cat(&inv, &arg("TR")).unwrap()).unwrap();
        assert_eq!(listed[0]["Name"], "Ashley Hart-Jones");
    }

    #[test]
    fn delete_removes_both_rows() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        h.post_user(&mut inv, &user_args("100", "BK")).unwrap();
        h.delete_user(&mut inv, &[String::from("100"), String::from("USER")])
            .unwrap();
        assert!(!h.store.exists(&inv, USER_TABLE, &["100"]).unwrap());
        assert!(!h.store.exists(&inv, USER_CAT_TABLE, &["2017", "BK", "100"]).unwrap());
        assert!(h.delete_user(&mut inv, &arg("100")).is_err());
    }

    #[test]
    fn list_by_category() {
        let h = handlers();
        let ledger = ready(&h);
        let mut inv = ledger.begin().unwrap();
        for (id, ty) in [("1", "TR"), ("2", "AH"), ("3", "TR")] {
            h.post_user(&mut inv, &user_args(id, ty)).unwrap();
        }
        let traders: Value =
            serde_json::from_slice(&h.get_user_list_by_cat(&inv, &arg("TR")).unwrap()).unwrap();
        let ids: Vec<&str> = traders
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["UserID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        let everyone: Value =
            serde_json::from_slice(&h.get_user_list_by_cat(&inv, &[]).unwrap()).unwrap();
        assert_eq!(everyone.as_array().unwrap().len(), 3);

        let nobody = h.get_user_list_by_cat(&inv, &arg("SH")).unwrap();
        assert_eq!(nobody, b"[]");
    }
}
