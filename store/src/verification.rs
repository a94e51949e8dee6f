//! Idempotence records: one successful verification per (wallet, task).

use serde::{Deserialize, Serialize};

use taskgate_types::{TaskId, WalletAddress};

use crate::StoreError;

/// Record of a completed verification, written only after the on-chain
/// marker transaction confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Always true for stored records; kept explicit because the wire
    /// contract exposes it.
    pub verified: bool,
    /// Hash of the confirmed `markTaskAsVerified` transaction.
    pub tx_hash: String,
    /// Unix seconds at which the record was written.
    pub verified_at_secs: u64,
}

/// Trait for storing per-(wallet, task) verification outcomes.
///
/// The intended invariant is at most one successful verification per pair.
/// A backend enforces it only within its own lifetime and scope — the
/// rewards contract remains the ultimate source of truth.
pub trait VerificationStore: Send + Sync {
    /// Fetch the record for a (wallet, task) pair, if one exists.
    fn get(
        &self,
        wallet: &WalletAddress,
        task: TaskId,
    ) -> Result<Option<VerificationRecord>, StoreError>;

    /// Persist the record for a (wallet, task) pair, replacing any previous one.
    fn put(
        &self,
        wallet: &WalletAddress,
        task: TaskId,
        record: VerificationRecord,
    ) -> Result<(), StoreError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
