//! Local stand-ins for the engine's external collaborators.
//!
//! The directory is a JSON file of account creation times; the ledger
//! journals transfer requests into the state database instead of moving
//! real tokens. Together they make every CLI run reproducible.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use vouch_core::error::VouchError;
use vouch_core::types::{AccountId, Symbol, Timestamp, TokenAmount};
use vouch_engine::{AccountDirectory, TokenLedger};
use vouch_store::{ReferralStore, TransferRecord};

// ── JsonDirectory ────────────────────────────────────────────────────────────

/// Account-age oracle backed by a JSON map of name → creation timestamp.
pub struct JsonDirectory {
    path: PathBuf,
    accounts: Mutex<BTreeMap<String, Timestamp>>,
}

impl JsonDirectory {
    pub fn load(path: PathBuf) -> anyhow::Result<Self> {
        let accounts = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, accounts: Mutex::new(accounts) })
    }

    pub fn insert(&self, account: AccountId, created_at: Timestamp) -> anyhow::Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts.insert(account.as_str().to_string(), created_at);
        std::fs::write(&self.path, serde_json::to_string_pretty(&*accounts)?)?;
        Ok(())
    }
}

impl AccountDirectory for &JsonDirectory {
    fn account_exists(&self, account: &AccountId) -> bool {
        self.accounts.lock().unwrap().contains_key(account.as_str())
    }

    fn creation_time(&self, account: &AccountId) -> Result<Timestamp, VouchError> {
        self.accounts
            .lock()
            .unwrap()
            .get(account.as_str())
            .copied()
            .ok_or_else(|| VouchError::UnknownAccount(account.to_string()))
    }
}

// ── JournalLedger ────────────────────────────────────────────────────────────

/// Token ledger that appends transfer requests to the store's journal.
pub struct JournalLedger {
    store: Arc<ReferralStore>,
    now: Timestamp,
}

impl JournalLedger {
    pub fn new(store: Arc<ReferralStore>, now: Timestamp) -> Self {
        Self { store, now }
    }
}

impl TokenLedger for JournalLedger {
    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
        symbol: &Symbol,
        memo: &str,
    ) -> Result<(), VouchError> {
        self.store.append_transfer(&TransferRecord {
            from: from.clone(),
            to: to.clone(),
            amount,
            symbol: symbol.to_string(),
            memo: memo.to_string(),
            at: self.now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn directory_persists_across_loads() {
        let path = std::env::temp_dir().join("vouch_cli_test_directory.json");
        let _ = std::fs::remove_file(&path);

        let dir = JsonDirectory::load(path.clone()).unwrap();
        dir.insert(acct("alice"), 123).unwrap();

        let reloaded = JsonDirectory::load(path).unwrap();
        assert!((&reloaded).account_exists(&acct("alice")));
        assert_eq!((&reloaded).creation_time(&acct("alice")).unwrap(), 123);
        assert!(!(&reloaded).account_exists(&acct("bob")));
    }

    #[test]
    fn journal_ledger_records_transfer() {
        let dir = std::env::temp_dir().join("vouch_cli_test_journal");
        let _ = std::fs::remove_dir_all(&dir);
        let store = Arc::new(ReferralStore::open(&dir).unwrap());

        let ledger = JournalLedger::new(store.clone(), 777);
        ledger
            .transfer(
                &acct("vouch"),
                &acct("alice"),
                30_000,
                &Symbol::new("VOUCH", 4).unwrap(),
                "referral reward for 3 points (position 1)",
            )
            .unwrap();

        let journal = store.transfers().unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].to, acct("alice"));
        assert_eq!(journal[0].at, 777);
    }
}
