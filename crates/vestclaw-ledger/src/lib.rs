//! # VestClaw Ledger
//!
//! The vesting-schedule ledger: per-beneficiary lock groups, lock-time
//! validation, and claim settlement against an external token-transfer
//! collaborator.
//!
//! ## Architecture
//! ```text
//! Ledger (schedule store)
//!   ├── AccountId → BeneficiaryLedger (Arc<Mutex<…>> per account)
//!   │     └── Vec<LockGroup> — append-only, settlement cursor per group
//!   ├── lock / lock_batch — validate, then append (all-or-nothing)
//!   └── queries — group_count, group, next_unlock_at, pending_reward*
//!
//! ClaimEngine
//!   └── claim(account, now) — compute eligible amount under the
//!       account lock, pay via TokenTransfer, advance cursors
//! ```
//!
//! Time is supplied by callers as Unix seconds; nothing here polls a
//! clock or runs in the background. Persistence is the host's concern.

pub mod engine;
pub mod schedule;
pub mod store;
pub mod transfer;

pub use engine::ClaimEngine;
pub use schedule::{BeneficiaryLedger, LockGroup};
pub use store::{Ledger, validate_request};
pub use transfer::{TokenTransfer, TransferError};
