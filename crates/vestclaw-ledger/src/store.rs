//! Schedule store — owns every beneficiary ledger and enforces the
//! lock-time validation rules.
//!
//! One `Arc<Mutex<BeneficiaryLedger>>` per account: operations on
//! distinct accounts never block each other, operations on the same
//! account are linearizable. The outer `RwLock` only guards the map
//! itself (entry creation), never schedule data.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use vestclaw_core::error::{Result, VestClawError};
use vestclaw_core::types::{AccountId, LockRequest};

use crate::schedule::{BeneficiaryLedger, LockGroup};

/// Validate one lock request against the early-unlock `floor`.
///
/// Checks run in a fixed order, each with its own error kind:
/// zero address, array length mismatch, empty arrays, non-increasing
/// timeline, unlock before the floor. Returns the request's amount sum
/// (checked) so callers can account for committed totals.
pub fn validate_request(req: &LockRequest, floor: u64) -> Result<u64> {
    if req.account.is_zero() {
        return Err(VestClawError::ZeroAddress);
    }
    if req.unlock_at.len() != req.amounts.len() {
        return Err(VestClawError::ArrayLengthMismatch {
            unlocks: req.unlock_at.len(),
            amounts: req.amounts.len(),
        });
    }
    if req.unlock_at.is_empty() {
        return Err(VestClawError::EmptyArray);
    }
    if req.unlock_at.windows(2).any(|w| w[1] <= w[0]) {
        return Err(VestClawError::TimelineViolation);
    }
    for &t in &req.unlock_at {
        if t < floor {
            return Err(VestClawError::EarlyUnlock {
                unlock_at: t,
                floor,
            });
        }
    }
    let mut sum: u64 = 0;
    for &a in &req.amounts {
        sum = sum.checked_add(a).ok_or(VestClawError::Overflow)?;
    }
    Ok(sum)
}

/// The vesting-schedule ledger for a single token.
///
/// Owns all schedule state exclusively: groups are appended only via
/// [`Ledger::lock`] / [`Ledger::lock_batch`], cursors advance only via
/// the claim engine. Multiple instances coexist freely (nothing is
/// process-global), which the tests lean on.
pub struct Ledger {
    /// Deployment epoch — the floor for early-unlock validation.
    genesis: u64,
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<BeneficiaryLedger>>>>,
    /// Cumulative tokens this ledger has committed to lock. Reconciled
    /// against the authority-funded pool by the environment; tracked
    /// here with checked math so no stored sum can exceed u64.
    committed: Mutex<u64>,
}

impl Ledger {
    /// Create a ledger with the given genesis timestamp (Unix seconds).
    pub fn new(genesis: u64) -> Self {
        Self {
            genesis,
            accounts: RwLock::new(HashMap::new()),
            committed: Mutex::new(0),
        }
    }

    pub fn genesis(&self) -> u64 {
        self.genesis
    }

    /// Cumulative tokens committed across all accepted locks.
    pub async fn total_committed(&self) -> u64 {
        *self.committed.lock().await
    }

    /// Lock a schedule for one beneficiary.
    pub async fn lock(
        &self,
        account: AccountId,
        unlock_at: Vec<u64>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        let req = LockRequest::new(account, unlock_at, amounts);
        self.lock_batch(std::slice::from_ref(&req)).await
    }

    /// Apply a batch of lock requests, all-or-nothing.
    ///
    /// Every request is validated — and the committed-total headroom
    /// reserved — before any group is appended. Past that point nothing
    /// can fail, so a rejected batch leaves every account's group count
    /// untouched and an accepted batch appends every group.
    pub async fn lock_batch(&self, requests: &[LockRequest]) -> Result<()> {
        let mut batch_total: u64 = 0;
        for req in requests {
            let sum = validate_request(req, self.genesis)?;
            batch_total = batch_total
                .checked_add(sum)
                .ok_or(VestClawError::Overflow)?;
        }

        {
            let mut committed = self.committed.lock().await;
            *committed = committed
                .checked_add(batch_total)
                .ok_or(VestClawError::Overflow)?;
        }

        for req in requests {
            let entry = self.entry_or_create(&req.account).await;
            let mut ledger = entry.lock().await;
            ledger.push(LockGroup::new(req.unlock_at.clone(), req.amounts.clone()));
            tracing::debug!(
                "🔒 Lock group #{} appended for {} ({} entries)",
                ledger.groups().len() - 1,
                req.account,
                req.unlock_at.len()
            );
        }

        tracing::info!(
            "🔒 Locked {} request(s), {} token(s) committed",
            requests.len(),
            batch_total
        );
        Ok(())
    }

    /// Number of lock groups for an account (0 if never locked).
    pub async fn group_count(&self, account: &AccountId) -> usize {
        match self.entry(account).await {
            Some(entry) => entry.lock().await.groups().len(),
            None => 0,
        }
    }

    /// Snapshot of one group's arrays: `(amounts, unlock_at)`.
    pub async fn group(&self, account: &AccountId, index: usize) -> Result<(Vec<u64>, Vec<u64>)> {
        let entry = self
            .entry(account)
            .await
            .ok_or(VestClawError::IndexOutOfRange { index, len: 0 })?;
        let ledger = entry.lock().await;
        let group = ledger
            .groups()
            .get(index)
            .ok_or(VestClawError::IndexOutOfRange {
                index,
                len: ledger.groups().len(),
            })?;
        Ok((group.amounts().to_vec(), group.unlock_at().to_vec()))
    }

    /// The next unsettled unlock timestamp of the group at `index`.
    /// Returns the 0 sentinel when the group is fully settled, the
    /// index is out of range, or the account has never locked.
    pub async fn next_unlock_at(&self, account: &AccountId, index: usize) -> u64 {
        let Some(entry) = self.entry(account).await else {
            return 0;
        };
        let ledger = entry.lock().await;
        ledger
            .groups()
            .get(index)
            .map(|g| g.next_unlock_at())
            .unwrap_or(0)
    }

    /// Total claimable-but-unclaimed for an account at `now`.
    pub async fn pending_reward(&self, account: &AccountId, now: u64) -> u64 {
        match self.entry(account).await {
            Some(entry) => entry.lock().await.pending_at(now),
            None => 0,
        }
    }

    /// Like [`Ledger::pending_reward`], restricted to groups with index
    /// in the half-open range `[from, to)` (clamped to the group count).
    pub async fn pending_reward_in_range(
        &self,
        account: &AccountId,
        now: u64,
        from: usize,
        to: usize,
    ) -> u64 {
        let Some(entry) = self.entry(account).await else {
            return 0;
        };
        let ledger = entry.lock().await;
        let groups = ledger.groups();
        let to = to.min(groups.len());
        if from >= to {
            return 0;
        }
        groups[from..to].iter().map(|g| g.pending_at(now)).sum()
    }

    /// Shared handle to an account's ledger, if it exists.
    pub(crate) async fn entry(
        &self,
        account: &AccountId,
    ) -> Option<Arc<Mutex<BeneficiaryLedger>>> {
        self.accounts.read().await.get(account).cloned()
    }

    async fn entry_or_create(&self, account: &AccountId) -> Arc<Mutex<BeneficiaryLedger>> {
        let mut accounts = self.accounts.write().await;
        accounts
            .entry(*account)
            .or_insert_with(|| Arc::new(Mutex::new(BeneficiaryLedger::default())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: u64 = 1_626_652_800;

    fn acct(n: u8) -> AccountId {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        AccountId::from_bytes(bytes)
    }

    fn req(n: u8, unlock_at: Vec<u64>, amounts: Vec<u64>) -> LockRequest {
        LockRequest::new(acct(n), unlock_at, amounts)
    }

    #[tokio::test]
    async fn lock_appends_one_group_with_input_arrays() {
        let ledger = Ledger::new(GENESIS);
        ledger
            .lock(acct(1), vec![GENESIS + 1000], vec![1000])
            .await
            .unwrap();

        assert_eq!(ledger.group_count(&acct(1)).await, 1);
        let (amounts, unlocks) = ledger.group(&acct(1), 0).await.unwrap();
        assert_eq!(amounts, vec![1000]);
        assert_eq!(unlocks, vec![GENESIS + 1000]);
        assert_eq!(ledger.next_unlock_at(&acct(1), 0).await, GENESIS + 1000);
        assert_eq!(ledger.pending_reward(&acct(1), GENESIS).await, 0);
        assert_eq!(ledger.total_committed().await, 1000);
    }

    #[tokio::test]
    async fn repeated_locks_preserve_history() {
        let ledger = Ledger::new(GENESIS);
        for i in 0..3u64 {
            ledger
                .lock(acct(1), vec![GENESIS + 100 + i], vec![10 + i])
                .await
                .unwrap();
        }
        assert_eq!(ledger.group_count(&acct(1)).await, 3);
        // Insertion order is observable by index.
        let (amounts, _) = ledger.group(&acct(1), 2).await.unwrap();
        assert_eq!(amounts, vec![12]);
    }

    #[tokio::test]
    async fn zero_address_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger
            .lock(AccountId::ZERO, vec![GENESIS + 1], vec![1])
            .await
            .unwrap_err();
        assert_eq!(err, VestClawError::ZeroAddress);
    }

    #[tokio::test]
    async fn mismatched_lengths_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger
            .lock(acct(1), vec![GENESIS + 2000], vec![1500, 2500])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VestClawError::ArrayLengthMismatch {
                unlocks: 1,
                amounts: 2
            }
        );
        assert_eq!(ledger.group_count(&acct(1)).await, 0);
    }

    #[tokio::test]
    async fn empty_arrays_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger.lock(acct(1), vec![], vec![]).await.unwrap_err();
        assert_eq!(err, VestClawError::EmptyArray);
    }

    #[tokio::test]
    async fn decreasing_timeline_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger
            .lock(
                acct(1),
                vec![GENESIS + 2000, GENESIS + 1000],
                vec![1500, 2500],
            )
            .await
            .unwrap_err();
        assert_eq!(err, VestClawError::TimelineViolation);
        assert_eq!(ledger.group_count(&acct(1)).await, 0);
    }

    #[tokio::test]
    async fn duplicate_timestamps_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger
            .lock(acct(1), vec![GENESIS + 500, GENESIS + 500], vec![1, 2])
            .await
            .unwrap_err();
        assert_eq!(err, VestClawError::TimelineViolation);
    }

    #[tokio::test]
    async fn unlock_before_genesis_rejected() {
        let ledger = Ledger::new(GENESIS);
        let err = ledger
            .lock(
                acct(1),
                vec![GENESIS - 2000, GENESIS + 1000],
                vec![1500, 2500],
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VestClawError::EarlyUnlock {
                unlock_at: GENESIS - 2000,
                floor: GENESIS
            }
        );
        assert_eq!(ledger.group_count(&acct(1)).await, 0);
    }

    #[tokio::test]
    async fn unlock_exactly_at_genesis_accepted() {
        let ledger = Ledger::new(GENESIS);
        ledger.lock(acct(1), vec![GENESIS], vec![500]).await.unwrap();
        assert_eq!(ledger.pending_reward(&acct(1), GENESIS).await, 500);
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let ledger = Ledger::new(GENESIS);
        let batch = vec![
            req(2, vec![GENESIS + 1000, GENESIS + 2000], vec![1500, 2500]),
            req(3, vec![GENESIS + 1500], vec![2000]),
            // invalid: decreasing timeline
            req(4, vec![GENESIS + 2000, GENESIS + 1000], vec![1, 2]),
        ];
        let err = ledger.lock_batch(&batch).await.unwrap_err();
        assert_eq!(err, VestClawError::TimelineViolation);

        // No account gained a group, nothing was committed.
        for n in 2..=4 {
            assert_eq!(ledger.group_count(&acct(n)).await, 0);
        }
        assert_eq!(ledger.total_committed().await, 0);
    }

    #[tokio::test]
    async fn batch_applies_every_request() {
        let ledger = Ledger::new(GENESIS);
        let batch = vec![
            req(2, vec![GENESIS + 1000, GENESIS + 2000], vec![1500, 2500]),
            req(2, vec![GENESIS + 500], vec![1000]),
            req(2, vec![GENESIS], vec![500]),
            req(3, vec![GENESIS + 1500, GENESIS + 3000], vec![2000, 2000]),
            req(4, vec![GENESIS], vec![500]),
        ];
        ledger.lock_batch(&batch).await.unwrap();

        assert_eq!(ledger.group_count(&acct(2)).await, 3);
        assert_eq!(ledger.next_unlock_at(&acct(2), 0).await, GENESIS + 1000);
        assert_eq!(ledger.next_unlock_at(&acct(2), 1).await, GENESIS + 500);
        assert_eq!(ledger.pending_reward(&acct(2), GENESIS).await, 500);
        assert_eq!(ledger.pending_reward(&acct(3), GENESIS).await, 0);
        assert_eq!(ledger.pending_reward(&acct(4), GENESIS).await, 500);
        assert_eq!(ledger.total_committed().await, 10_000);
    }

    #[tokio::test]
    async fn committed_total_overflow_rejected() {
        let ledger = Ledger::new(GENESIS);
        ledger
            .lock(acct(1), vec![GENESIS + 1], vec![u64::MAX])
            .await
            .unwrap();
        let err = ledger
            .lock(acct(2), vec![GENESIS + 1], vec![1])
            .await
            .unwrap_err();
        assert_eq!(err, VestClawError::Overflow);
        assert_eq!(ledger.group_count(&acct(2)).await, 0);
    }

    #[tokio::test]
    async fn group_index_out_of_range() {
        let ledger = Ledger::new(GENESIS);
        // Unknown account reports an empty ledger.
        assert_eq!(
            ledger.group(&acct(9), 0).await.unwrap_err(),
            VestClawError::IndexOutOfRange { index: 0, len: 0 }
        );

        ledger.lock(acct(1), vec![GENESIS + 1], vec![1]).await.unwrap();
        assert_eq!(
            ledger.group(&acct(1), 1).await.unwrap_err(),
            VestClawError::IndexOutOfRange { index: 1, len: 1 }
        );
        assert_eq!(ledger.next_unlock_at(&acct(1), 1).await, 0);
    }

    #[tokio::test]
    async fn pending_reward_in_range_is_half_open() {
        let ledger = Ledger::new(GENESIS);
        let now = GENESIS + 10_000; // everything below is unlocked
        let batch = vec![
            req(1, vec![GENESIS], vec![500]),
            req(1, vec![GENESIS + 500, GENESIS + 1000], vec![1500, 2500]),
            req(1, vec![GENESIS + 1500], vec![3000]),
        ];
        ledger.lock_batch(&batch).await.unwrap();

        // [0, 2) — first two groups only, third excluded even though eligible.
        assert_eq!(
            ledger.pending_reward_in_range(&acct(1), now, 0, 2).await,
            4500
        );
        // Upper bound exclusive: [2, 3) is just the third group.
        assert_eq!(
            ledger.pending_reward_in_range(&acct(1), now, 2, 3).await,
            3000
        );
        // Lower bound inclusive: [0, 1) is just the first group.
        assert_eq!(
            ledger.pending_reward_in_range(&acct(1), now, 0, 1).await,
            500
        );
        // Out-of-range bounds clamp / empty ranges are zero.
        assert_eq!(
            ledger.pending_reward_in_range(&acct(1), now, 0, 99).await,
            7500
        );
        assert_eq!(ledger.pending_reward_in_range(&acct(1), now, 2, 2).await, 0);
        assert_eq!(ledger.pending_reward_in_range(&acct(1), now, 5, 9).await, 0);
    }

    #[tokio::test]
    async fn validate_request_order_of_checks() {
        // Zero address wins over the (also wrong) array shape.
        let r = LockRequest::new(AccountId::ZERO, vec![], vec![1]);
        assert_eq!(
            validate_request(&r, 0).unwrap_err(),
            VestClawError::ZeroAddress
        );
        // Length mismatch is reported before emptiness.
        let r = req(1, vec![], vec![1]);
        assert_eq!(
            validate_request(&r, 0).unwrap_err(),
            VestClawError::ArrayLengthMismatch {
                unlocks: 0,
                amounts: 1
            }
        );
    }
}
