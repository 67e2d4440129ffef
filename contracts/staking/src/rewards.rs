use soroban_sdk::{log, Env};

use crate::{conditions, deposits, ledger::StakerRecord};

// ── Checked arithmetic ──────────────────────────────────────────────────────

/// Reward for one condition segment:
///
/// ```text
/// reward = elapsed × balance × numerator / time_unit / denominator
/// ```
///
/// Returns `None` when the product overflows `i128` or a divisor is zero.
/// Both divisions truncate; the remainder is dropped for good.
pub fn segment_reward(
    elapsed: u64,
    balance: i128,
    numerator: i128,
    denominator: i128,
    time_unit: u64,
) -> Option<i128> {
    let product = i128::from(elapsed)
        .checked_mul(balance)?
        .checked_mul(numerator)?;
    product
        .checked_div(i128::from(time_unit))?
        .checked_div(denominator)
}

/// Adds `increment` to `total`, keeping `total` unchanged when the increment
/// is missing or the sum would overflow.
pub fn accumulate(total: i128, increment: Option<i128>) -> i128 {
    increment
        .and_then(|value| total.checked_add(value))
        .unwrap_or(total)
}

/// Fixed-point round trip `total × 10^decimals / 10^decimals`.
///
/// Skipped (returns `total` as-is) when the scale or the product overflows.
pub fn normalize_decimals(total: i128, decimals: u32) -> i128 {
    let Some(scale) = 10i128.checked_pow(decimals) else {
        return total;
    };
    match total.checked_mul(scale) {
        Some(scaled) => scaled / scale,
        None => total,
    }
}

// ── Accrual engine ──────────────────────────────────────────────────────────

/// Rewards earned by `record` between its accrual cursor and `now`.
///
/// Replays every condition from `last_update_condition_id` through the open
/// one. Each segment is priced with the tier the staker's current effective
/// balance (staked plus maturable deposits) selects in that condition, even
/// for segments that lie in the past. A segment whose arithmetic overflows
/// contributes nothing; the remaining segments are still priced.
///
/// Does not mutate the record; folding the result in and moving the cursor
/// is the caller's job.
pub fn accrue(env: &Env, record: &StakerRecord, now: u64, decimals: u32) -> i128 {
    let unlocked = deposits::unlocked_amount(record, now);
    let balance = record.staked.saturating_add(unlocked);

    let first = record.last_update_condition_id;
    let open = conditions::current_id(env);

    let mut total = 0i128;
    for id in first..=open {
        let Some(condition) = conditions::get(env, id) else {
            continue;
        };

        let tier = conditions::select_tier(&condition.tiers, balance);
        let start = if id == first {
            record.last_update_time
        } else {
            condition.start_time
        };
        let end = if id == open { now } else { condition.end_time };
        let elapsed = end.saturating_sub(start);

        let numerator = condition.tiers.numerators.get(tier).unwrap_or(0);
        let denominator = condition.tiers.denominators.get(tier).unwrap_or(0);
        let reward = segment_reward(elapsed, balance, numerator, denominator, condition.time_unit);
        if reward.is_none() {
            log!(env, "reward segment saturated", id, elapsed);
        }
        total = accumulate(total, reward);
    }

    normalize_decimals(total, decimals)
}

/// Claimable rewards as of `now`, without touching storage.
pub fn available(env: &Env, record: &StakerRecord, now: u64, decimals: u32) -> i128 {
    if record.staked == 0 && deposits::unlocked_amount(record, now) == 0 {
        return record.unclaimed_rewards;
    }
    record
        .unclaimed_rewards
        .saturating_add(accrue(env, record, now, decimals))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
