//! Shared utilities for the taskgate workspace.

pub mod logging;
pub mod time;

pub use logging::{init_tracing, init_tracing_with};
pub use time::unix_timestamp_secs;
