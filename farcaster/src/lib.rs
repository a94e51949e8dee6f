//! Farcaster action verification via the Neynar REST API.
//!
//! One boolean-ish question per task action: did this fid follow, like,
//! recast, quote, or reply to the target? Answers come from capped
//! cursor-following scans of Neynar's collection endpoints, so every check
//! can also come back [`ScanOutcome::Inconclusive`] when the action sits
//! beyond the scanned window.
//!
//! [`ScanOutcome::Inconclusive`]: taskgate_types::ScanOutcome

pub mod client;
pub mod error;
pub mod types;

pub use client::{NeynarClient, ReactionKind};
pub use error::NeynarError;
pub use types::NeynarUser;
