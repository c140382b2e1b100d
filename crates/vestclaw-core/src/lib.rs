//! # VestClaw Core
//!
//! Shared foundation for the VestClaw workspace: the account/lock-request
//! types, the error taxonomy, and the configuration system.
//!
//! Nothing here touches tokens or schedules — the ledger itself lives in
//! `vestclaw-ledger`, the batch tooling in `vestclaw-batch`.

pub mod config;
pub mod error;
pub mod types;

pub use config::VestClawConfig;
pub use error::{Result, VestClawError};
pub use types::{AccountId, LockRequest};
