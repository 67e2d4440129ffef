use soroban_sdk::{contracttype, symbol_short, Env, Symbol, Vec};

use crate::ContractError;

// ── Storage keys ────────────────────────────────────────────────────────────

/// Number of conditions ever opened (instance storage).
const COND_COUNT: Symbol = symbol_short!("COND_CNT");
/// Per-condition entries use the tuple key `(COND, id)` in persistent storage.
const COND: Symbol = symbol_short!("COND");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Types ───────────────────────────────────────────────────────────────────

/// Balance brackets and the reward ratio that applies to each of them.
///
/// Tier `t` pays `numerators[t] / denominators[t]` reward units per staked
/// unit per `time_unit` once the staker's balance reaches `thresholds[t]`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTiers {
    pub thresholds: Vec<i128>,
    pub numerators: Vec<i128>,
    pub denominators: Vec<i128>,
}

/// A rate regime in effect over `[start_time, end_time)`.
///
/// `end_time == 0` marks the open condition. Only that condition is ever
/// rewritten, and only to set its `end_time` once.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Condition {
    pub time_unit: u64,
    pub start_time: u64,
    pub end_time: u64,
    pub tiers: RewardTiers,
}

// ── Validation ──────────────────────────────────────────────────────────────

/// Checks a tier table before it can back a condition.
pub fn validate_tiers(tiers: &RewardTiers) -> Result<(), ContractError> {
    let len = tiers.thresholds.len();
    if tiers.numerators.len() != len || tiers.denominators.len() != len {
        return Err(ContractError::TierLengthMismatch);
    }
    if len == 0 {
        return Err(ContractError::InvalidTierTable);
    }

    let mut previous: Option<i128> = None;
    for t in 0..len {
        let threshold = tiers.thresholds.get(t).unwrap_or(0);
        let numerator = tiers.numerators.get(t).unwrap_or(0);
        let denominator = tiers.denominators.get(t).unwrap_or(0);

        if denominator <= 0 || numerator < 0 || threshold < 0 {
            return Err(ContractError::InvalidTierTable);
        }
        if previous.is_some_and(|p| threshold < p) {
            return Err(ContractError::InvalidTierTable);
        }
        previous = Some(threshold);
    }
    Ok(())
}

// ── Tier selection ──────────────────────────────────────────────────────────

/// Highest tier whose threshold `balance` reaches, or tier 0 when none does.
pub fn select_tier(tiers: &RewardTiers, balance: i128) -> u32 {
    let len = tiers.thresholds.len();
    for t in (0..len).rev() {
        if tiers.thresholds.get(t).is_some_and(|threshold| balance >= threshold) {
            return t;
        }
    }
    0
}

// ── Timeline storage ────────────────────────────────────────────────────────

fn condition_key(id: u32) -> (Symbol, u32) {
    (COND, id)
}

/// Number of conditions opened so far.
pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&COND_COUNT).unwrap_or(0)
}

/// Id of the open condition. Only meaningful once `initialize` has opened
/// condition 0.
pub fn current_id(env: &Env) -> u32 {
    count(env).saturating_sub(1)
}

/// Load condition `id`.
pub fn get(env: &Env, id: u32) -> Option<Condition> {
    let key = condition_key(id);
    let condition: Option<Condition> = env.storage().persistent().get(&key);
    if condition.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    condition
}

/// The open condition.
pub fn current(env: &Env) -> Result<Condition, ContractError> {
    get(env, current_id(env)).ok_or(ContractError::NotInitialized)
}

fn store(env: &Env, id: u32, condition: &Condition) {
    let key = condition_key(id);
    env.storage().persistent().set(&key, condition);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Close the open condition at `now` and open a new one starting at `now`.
///
/// Returns the id of the new condition.
pub fn append(
    env: &Env,
    time_unit: u64,
    tiers: RewardTiers,
    now: u64,
) -> Result<u32, ContractError> {
    if time_unit == 0 {
        return Err(ContractError::InvalidTimeUnit);
    }
    validate_tiers(&tiers)?;

    let next_id = count(env);
    if next_id > 0 {
        let open_id = next_id - 1;
        let mut open = get(env, open_id).ok_or(ContractError::NotInitialized)?;
        open.end_time = now;
        store(env, open_id, &open);
    }

    store(
        env,
        next_id,
        &Condition {
            time_unit,
            start_time: now,
            end_time: 0,
            tiers,
        },
    );
    env.storage()
        .instance()
        .set(&COND_COUNT, &next_id.saturating_add(1));

    Ok(next_id)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
