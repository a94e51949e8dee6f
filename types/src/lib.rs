//! Fundamental types for the taskgate verification oracle.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: wallet addresses, task and social identifiers, the supported
//! platforms, and the outcome of a capped remote-collection scan.

pub mod action;
pub mod address;
pub mod error;
pub mod ids;
pub mod outcome;

pub use action::Platform;
pub use address::WalletAddress;
pub use error::TypeError;
pub use ids::{Fid, TaskId, TwitterUserId};
pub use outcome::{ScanOutcome, ScanWindow};
