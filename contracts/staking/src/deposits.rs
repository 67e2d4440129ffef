use soroban_sdk::contracttype;

use crate::ledger::StakerRecord;

// ── Types ───────────────────────────────────────────────────────────────────

/// A deposit that does not yet count towards the staked balance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedDeposit {
    /// Tokens actually received by the contract for this deposit.
    pub amount: i128,
    /// Ledger timestamp from which the amount counts as staked.
    pub unlock_time: u64,
}

/// One slot of a staker's deposit queue.
///
/// Slots are cleared in place once their amount has been rolled into the
/// staked balance, so indices stay stable for the lifetime of the record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DepositSlot {
    Empty,
    Locked(LockedDeposit),
}

// ── Queue operations ────────────────────────────────────────────────────────

/// Amount held by `slot` if it is eligible to move into the staked balance.
pub fn maturable_amount(slot: &DepositSlot, now: u64) -> Option<i128> {
    match slot {
        DepositSlot::Locked(deposit) if now >= deposit.unlock_time => Some(deposit.amount),
        _ => None,
    }
}

/// Sum of every maturable deposit. Does not touch the record.
pub fn unlocked_amount(record: &StakerRecord, now: u64) -> i128 {
    record
        .deposits
        .iter()
        .filter_map(|slot| maturable_amount(&slot, now))
        .fold(0i128, |total, amount| total.saturating_add(amount))
}

/// Sum of every slot not yet rolled in, matured or not.
pub fn locked_amount(record: &StakerRecord) -> i128 {
    record
        .deposits
        .iter()
        .filter_map(|slot| match slot {
            DepositSlot::Locked(deposit) => Some(deposit.amount),
            DepositSlot::Empty => None,
        })
        .fold(0i128, |total, amount| total.saturating_add(amount))
}

/// Moves every maturable deposit into `record.staked` and clears its slot.
///
/// Returns the amount rolled in. Running it again with no new maturities
/// returns zero and leaves the record untouched.
pub fn roll_matured(record: &mut StakerRecord, now: u64) -> i128 {
    let mut rolled = 0i128;
    for index in 0..record.deposits.len() {
        let Some(slot) = record.deposits.get(index) else {
            continue;
        };
        if let Some(amount) = maturable_amount(&slot, now) {
            rolled = rolled.saturating_add(amount);
            record.deposits.set(index, DepositSlot::Empty);
        }
    }
    record.staked = record.staked.saturating_add(rolled);
    rolled
}

/// Appends a new locked deposit to the end of the queue.
pub fn push(record: &mut StakerRecord, amount: i128, unlock_time: u64) {
    record
        .deposits
        .push_back(DepositSlot::Locked(LockedDeposit {
            amount,
            unlock_time,
        }));
}

/// `true` while at least one slot has not been rolled in yet.
pub fn has_locked(record: &StakerRecord) -> bool {
    record
        .deposits
        .iter()
        .any(|slot| matches!(slot, DepositSlot::Locked(_)))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
