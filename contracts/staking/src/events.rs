#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::{circuit_breaker::PauseScope, conditions::RewardTiers};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub time_unit: u64,
    pub tiers: RewardTiers,
    pub min_stake: i128,
    pub lock_period: u64,
    pub timestamp: u64,
}

/// Fired when a deposit is recorded. `amount` is what the contract received.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub unlock_time: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeUnitSetEvent {
    pub old_time_unit: u64,
    pub new_time_unit: u64,
    pub condition_id: u32,
    pub timestamp: u64,
}

/// Fired when the tier table changes; carries both full tables.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTiersSetEvent {
    pub old_tiers: RewardTiers,
    pub new_tiers: RewardTiers,
    pub condition_id: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinStakeSetEvent {
    pub old_min_stake: i128,
    pub new_min_stake: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockPeriodSetEvent {
    pub old_period: u64,
    pub new_period: u64,
    pub timestamp: u64,
}

/// Fired when reward tokens enter or leave the claimable float.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardFloatEvent {
    pub admin: Address,
    pub amount: i128,
    pub new_balance: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub caller: Address,
    pub scope: PauseScope,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    reward_token: Address,
    time_unit: u64,
    tiers: RewardTiers,
    min_stake: i128,
    lock_period: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            reward_token,
            time_unit,
            tiers,
            min_stake,
            lock_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, unlock_time: u64) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            unlock_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), staker.clone()),
        RewardClaimedEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_time_unit_set(env: &Env, old_time_unit: u64, new_time_unit: u64, condition_id: u32) {
    env.events().publish(
        (symbol_short!("TU_SET"),),
        TimeUnitSetEvent {
            old_time_unit,
            new_time_unit,
            condition_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_tiers_set(
    env: &Env,
    old_tiers: RewardTiers,
    new_tiers: RewardTiers,
    condition_id: u32,
) {
    env.events().publish(
        (symbol_short!("TIER_SET"),),
        RewardTiersSetEvent {
            old_tiers,
            new_tiers,
            condition_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_min_stake_set(env: &Env, old_min_stake: i128, new_min_stake: i128) {
    env.events().publish(
        (symbol_short!("MIN_SET"),),
        MinStakeSetEvent {
            old_min_stake,
            new_min_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_lock_period_set(env: &Env, old_period: u64, new_period: u64) {
    env.events().publish(
        (symbol_short!("LOCK_SET"),),
        LockPeriodSetEvent {
            old_period,
            new_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_deposited(env: &Env, admin: Address, amount: i128, new_balance: i128) {
    env.events().publish(
        (symbol_short!("RWD_DEP"), admin.clone()),
        RewardFloatEvent {
            admin,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_withdrawn(env: &Env, admin: Address, amount: i128, new_balance: i128) {
    env.events().publish(
        (symbol_short!("RWD_WD"), admin.clone()),
        RewardFloatEvent {
            admin,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, caller: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("PAUSED"), caller.clone()),
        PauseEvent {
            caller,
            scope,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_resumed(env: &Env, caller: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("RESUMED"), caller.clone()),
        PauseEvent {
            caller,
            scope,
            timestamp: env.ledger().timestamp(),
        },
    );
}
