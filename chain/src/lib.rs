//! On-chain side of verification: marking tasks complete on the rewards
//! contract from the privileged verifier wallet.

pub mod error;
pub mod marker;

pub use error::ChainError;
pub use marker::{EvmTaskMarker, MarkReceipt, MarkerConfig};
