//! Abstract storage traits for taskgate's shared mutable state.
//!
//! The original service held its dedup cache and Twitter linkage map in
//! process memory, so a restart or a second instance silently dropped both
//! guarantees. Every backend (in-memory for tests and single-instance
//! deployments, an external cache for anything else) implements these
//! traits; the rest of the workspace depends only on the traits.

pub mod error;
pub mod linkage;
pub mod memory;
pub mod verification;

pub use error::StoreError;
pub use linkage::LinkageStore;
pub use memory::{MemoryLinkageStore, MemoryVerificationStore};
pub use verification::{VerificationRecord, VerificationStore};
