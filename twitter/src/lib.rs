//! Twitter (X) action verification via the Twitter API v2.
//!
//! Mirrors the Farcaster adapter: one capped cursor-following scan per
//! action, plus the proof-tweet lookup that backs the manual
//! wallet-to-account linking flow.

pub mod client;
pub mod error;
pub mod types;

pub use client::TwitterClient;
pub use error::TwitterError;
