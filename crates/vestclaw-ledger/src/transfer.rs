//! Token-transfer collaborator boundary.
//!
//! The ledger never moves tokens itself; the claim engine hands the
//! settled total to an implementation of [`TokenTransfer`] (an SPL/ERC20
//! bridge, an RPC client, a test double). Any non-success is fatal to
//! the claim in flight.

use async_trait::async_trait;
use thiserror::Error;

use vestclaw_core::types::AccountId;

/// Why a transfer did not happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer rejected: {0}")]
    Rejected(String),
    #[error("transfer timed out")]
    Timeout,
}

/// Moves tokens out of the authority-funded pool.
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    /// Transfer `amount` tokens to `to`. This is the one I/O boundary
    /// inside a claim; implementations should enforce their own timeout
    /// and report it as [`TransferError::Timeout`].
    async fn transfer_out(&self, to: &AccountId, amount: u64) -> Result<(), TransferError>;
}
