//! Lock groups and per-beneficiary ledgers — the core data model.

/// One unlock schedule created by a single lock operation.
///
/// `unlock_at` is strictly increasing and positionally paired with
/// `amounts` (`amounts[i]` releases at `unlock_at[i]`); both are
/// non-empty. Entries settle strictly in time order, so a single
/// cursor (`settled`) replaces per-entry paid flags: everything before
/// the cursor has been paid, everything at or after it has not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockGroup {
    unlock_at: Vec<u64>,
    amounts: Vec<u64>,
    /// Count of leading entries already paid out. Monotonic:
    /// 0 (created) → partial → len (fully settled, terminal).
    settled: usize,
}

impl LockGroup {
    /// Build a group from validated arrays (see `store::validate_request`).
    pub(crate) fn new(unlock_at: Vec<u64>, amounts: Vec<u64>) -> Self {
        debug_assert_eq!(unlock_at.len(), amounts.len());
        debug_assert!(!unlock_at.is_empty());
        debug_assert!(unlock_at.windows(2).all(|w| w[0] < w[1]));
        Self {
            unlock_at,
            amounts,
            settled: 0,
        }
    }

    /// Number of schedule entries.
    pub fn len(&self) -> usize {
        self.unlock_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlock_at.is_empty()
    }

    pub fn unlock_at(&self) -> &[u64] {
        &self.unlock_at
    }

    pub fn amounts(&self) -> &[u64] {
        &self.amounts
    }

    /// How many leading entries have been paid out.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    pub fn is_fully_settled(&self) -> bool {
        self.settled == self.unlock_at.len()
    }

    /// The next unsettled unlock timestamp, or 0 if fully settled.
    pub fn next_unlock_at(&self) -> u64 {
        self.unlock_at.get(self.settled).copied().unwrap_or(0)
    }

    /// Cursor position after settling everything unlocked at `now`.
    ///
    /// Timestamps are strictly increasing, so a binary search over the
    /// whole array lands at the first entry still in the future; the
    /// result can never fall behind the current cursor.
    pub fn settle_cut(&self, now: u64) -> usize {
        self.unlock_at.partition_point(|&t| t <= now).max(self.settled)
    }

    /// Unlocked-but-unpaid total at `now`.
    ///
    /// Plain summation is safe: the store caps the sum of all accepted
    /// amounts at u64::MAX via its committed-total accounting.
    pub fn pending_at(&self, now: u64) -> u64 {
        self.amounts[self.settled..self.settle_cut(now)].iter().sum()
    }

    /// Advance the settlement cursor. Only the claim engine calls this,
    /// and only after the transfer collaborator confirmed payment.
    pub(crate) fn advance_to(&mut self, cut: usize) {
        debug_assert!(cut >= self.settled && cut <= self.unlock_at.len());
        self.settled = cut;
    }
}

/// All lock groups for one beneficiary, in creation order.
///
/// Created implicitly on the first successful lock, never deleted;
/// groups are only appended and their cursors only advance. Insertion
/// order is observable through the indexed queries.
#[derive(Debug, Default, Clone)]
pub struct BeneficiaryLedger {
    groups: Vec<LockGroup>,
}

impl BeneficiaryLedger {
    pub fn groups(&self) -> &[LockGroup] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [LockGroup] {
        &mut self.groups
    }

    pub(crate) fn push(&mut self, group: LockGroup) {
        self.groups.push(group);
    }

    /// Total claimable-but-unclaimed across all groups at `now`.
    pub fn pending_at(&self, now: u64) -> u64 {
        self.groups.iter().map(|g| g.pending_at(now)).sum()
    }
}
