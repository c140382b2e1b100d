//! Claim engine — computes what a beneficiary can take, pays it out
//! exactly once, and advances the settlement cursors.

use std::sync::Arc;

use vestclaw_core::error::{Result, VestClawError};
use vestclaw_core::types::AccountId;

use crate::store::Ledger;
use crate::transfer::TokenTransfer;

/// Walks a beneficiary's lock groups and settles everything unlocked
/// at claim time through the transfer collaborator.
pub struct ClaimEngine {
    ledger: Arc<Ledger>,
    transfer: Arc<dyn TokenTransfer>,
}

impl ClaimEngine {
    pub fn new(ledger: Arc<Ledger>, transfer: Arc<dyn TokenTransfer>) -> Self {
        Self { ledger, transfer }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Claim everything unlocked for `account` at `now`.
    ///
    /// Holds the account's lock for the whole operation, so settlement
    /// computation, the transfer call, and the cursor advance form one
    /// linearizable step: a racing claim waits and then finds nothing
    /// left. Cursors move only after the collaborator confirms — a
    /// failed transfer surfaces [`VestClawError::SettlementFailed`]
    /// with the ledger untouched, and the caller may retry.
    ///
    /// Returns the amount paid; claiming with nothing newly unlocked
    /// fails with [`VestClawError::ZeroClaim`].
    pub async fn claim(&self, account: AccountId, now: u64) -> Result<u64> {
        let Some(entry) = self.ledger.entry(&account).await else {
            return Err(VestClawError::ZeroClaim);
        };
        let mut ledger = entry.lock().await;

        let mut total: u64 = 0;
        let mut cuts = Vec::with_capacity(ledger.groups().len());
        for group in ledger.groups() {
            let cut = group.settle_cut(now);
            // Safe to add unchecked: all accepted amounts sum below
            // u64::MAX (committed-total accounting at lock time).
            total += group.amounts()[group.settled_count()..cut].iter().sum::<u64>();
            cuts.push(cut);
        }

        if total == 0 {
            return Err(VestClawError::ZeroClaim);
        }

        self.transfer
            .transfer_out(&account, total)
            .await
            .map_err(|e| {
                tracing::warn!("⚠️ Transfer of {total} to {account} failed: {e}");
                VestClawError::SettlementFailed(e.to_string())
            })?;

        for (group, cut) in ledger.groups_mut().iter_mut().zip(cuts) {
            group.advance_to(cut);
        }

        tracing::info!("💸 Claimed {total} for {account}");
        Ok(total)
    }
}
