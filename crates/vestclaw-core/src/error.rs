//! Error taxonomy for the whole workspace.
//!
//! Lock-time and claim-time failures are non-retryable with the same
//! inputs; a failed operation leaves the ledger untouched, so retries
//! (if any) are the caller's problem.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, VestClawError>;

/// Every failure the ledger and its tooling can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VestClawError {
    /// Lock target is the all-zero account.
    #[error("zero address")]
    ZeroAddress,

    /// `unlock_at` and `amounts` disagree in length.
    #[error("wrong array length: {unlocks} unlock times vs {amounts} amounts")]
    ArrayLengthMismatch { unlocks: usize, amounts: usize },

    /// Lock request with empty schedule arrays.
    #[error("zero array length")]
    EmptyArray,

    /// Unlock times not strictly increasing within a group.
    #[error("timeline violation: unlock times must be strictly increasing")]
    TimelineViolation,

    /// An unlock time falls before the ledger's genesis floor.
    #[error("early unlock: {unlock_at} is before the genesis floor {floor}")]
    EarlyUnlock { unlock_at: u64, floor: u64 },

    /// Indexed query past the end of a beneficiary's group list.
    #[error("lock group index {index} out of range (account has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Claim found nothing newly unlocked.
    #[error("zero claim")]
    ZeroClaim,

    /// Committed-total accounting would exceed u64.
    #[error("amount overflow: committed total would exceed u64")]
    Overflow,

    /// The transfer collaborator rejected or failed the payout.
    #[error("settlement failed: {0}")]
    SettlementFailed(String),

    /// Invalid account identifier in input data.
    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    /// Configuration load/parse problem.
    #[error("config error: {0}")]
    Config(String),

    /// Batch file I/O or parse problem.
    #[error("batch file error: {0}")]
    BatchFile(String),
}
