//! Twitter-identity linkage records.
//!
//! Farcaster linkage is resolved live from custody/verified addresses, but
//! Twitter has no on-protocol wallet association, so a linkage record is
//! established once via the proof-tweet flow and consulted on every
//! subsequent Twitter verification.

use taskgate_types::{TwitterUserId, WalletAddress};

use crate::StoreError;

/// Trait for storing `twitter user id -> wallet` associations.
pub trait LinkageStore: Send + Sync {
    /// Wallet linked to a Twitter user, if any.
    fn get(&self, user_id: &TwitterUserId) -> Result<Option<WalletAddress>, StoreError>;

    /// Create or replace the linkage for a Twitter user.
    fn put(&self, user_id: &TwitterUserId, wallet: WalletAddress) -> Result<(), StoreError>;

    /// Remove a linkage. Returns the previous wallet, if any.
    fn remove(&self, user_id: &TwitterUserId) -> Result<Option<WalletAddress>, StoreError>;

    /// Number of stored linkages.
    fn len(&self) -> Result<usize, StoreError>;
}
