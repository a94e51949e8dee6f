//! In-memory store backends.
//!
//! These are the single-process equivalents of the original service's
//! `Map` caches: unbounded, never expired, and lost on restart. Suitable
//! for tests and single-instance deployments only — after a restart a
//! previously verified task will pass the idempotence check again and the
//! contract's own state has to reject the duplicate write.

use std::collections::HashMap;
use std::sync::Mutex;

use taskgate_types::{TaskId, TwitterUserId, WalletAddress};

use crate::linkage::LinkageStore;
use crate::verification::{VerificationRecord, VerificationStore};
use crate::StoreError;

/// In-memory `(wallet, task) -> record` map behind a mutex.
#[derive(Default)]
pub struct MemoryVerificationStore {
    records: Mutex<HashMap<(WalletAddress, TaskId), VerificationRecord>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VerificationStore for MemoryVerificationStore {
    fn get(
        &self,
        wallet: &WalletAddress,
        task: TaskId,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(&(wallet.clone(), task)).cloned())
    }

    fn put(
        &self,
        wallet: &WalletAddress,
        task: TaskId,
        record: VerificationRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.insert((wallet.clone(), task), record);
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }
}

/// In-memory `twitter user -> wallet` map behind a mutex.
#[derive(Default)]
pub struct MemoryLinkageStore {
    linkages: Mutex<HashMap<TwitterUserId, WalletAddress>>,
}

impl MemoryLinkageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkageStore for MemoryLinkageStore {
    fn get(&self, user_id: &TwitterUserId) -> Result<Option<WalletAddress>, StoreError> {
        let linkages = self.linkages.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(linkages.get(user_id).cloned())
    }

    fn put(&self, user_id: &TwitterUserId, wallet: WalletAddress) -> Result<(), StoreError> {
        let mut linkages = self.linkages.lock().map_err(|_| StoreError::Poisoned)?;
        linkages.insert(user_id.clone(), wallet);
        Ok(())
    }

    fn remove(&self, user_id: &TwitterUserId) -> Result<Option<WalletAddress>, StoreError> {
        let mut linkages = self.linkages.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(linkages.remove(user_id))
    }

    fn len(&self) -> Result<usize, StoreError> {
        let linkages = self.linkages.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(linkages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(byte: u8) -> WalletAddress {
        WalletAddress::parse(&format!("0x{}", hex_str(byte))).unwrap()
    }

    fn hex_str(byte: u8) -> String {
        format!("{byte:02x}").repeat(20)
    }

    fn record(tx: &str) -> VerificationRecord {
        VerificationRecord {
            verified: true,
            tx_hash: tx.to_string(),
            verified_at_secs: 1_700_000_000,
        }
    }

    #[test]
    fn new_verification_store_is_empty() {
        let store = MemoryVerificationStore::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.get(&wallet(1), TaskId(1)).unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryVerificationStore::new();
        store.put(&wallet(1), TaskId(42), record("0xdead")).unwrap();

        let found = store.get(&wallet(1), TaskId(42)).unwrap().unwrap();
        assert!(found.verified);
        assert_eq!(found.tx_hash, "0xdead");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn records_are_keyed_by_wallet_and_task() {
        let store = MemoryVerificationStore::new();
        store.put(&wallet(1), TaskId(1), record("0xaa")).unwrap();

        assert!(store.get(&wallet(1), TaskId(2)).unwrap().is_none());
        assert!(store.get(&wallet(2), TaskId(1)).unwrap().is_none());
        assert!(store.get(&wallet(1), TaskId(1)).unwrap().is_some());
    }

    #[test]
    fn put_replaces_existing_record() {
        let store = MemoryVerificationStore::new();
        store.put(&wallet(1), TaskId(1), record("0xaa")).unwrap();
        store.put(&wallet(1), TaskId(1), record("0xbb")).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(
            store.get(&wallet(1), TaskId(1)).unwrap().unwrap().tx_hash,
            "0xbb"
        );
    }

    #[test]
    fn linkage_put_get_remove() {
        let store = MemoryLinkageStore::new();
        let user = TwitterUserId::new("100");

        assert!(store.get(&user).unwrap().is_none());
        store.put(&user, wallet(7)).unwrap();
        assert_eq!(store.get(&user).unwrap(), Some(wallet(7)));
        assert_eq!(store.len().unwrap(), 1);

        assert_eq!(store.remove(&user).unwrap(), Some(wallet(7)));
        assert!(store.get(&user).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn relinking_replaces_the_wallet() {
        let store = MemoryLinkageStore::new();
        let user = TwitterUserId::new("100");
        store.put(&user, wallet(1)).unwrap();
        store.put(&user, wallet(2)).unwrap();
        assert_eq!(store.get(&user).unwrap(), Some(wallet(2)));
        assert_eq!(store.len().unwrap(), 1);
    }
}
