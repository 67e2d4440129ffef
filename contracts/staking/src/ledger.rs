use soroban_sdk::{
    contracttype, symbol_short, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

use crate::{conditions, deposits, deposits::DepositSlot, rewards};

// ── Storage key constants ───────────────────────────────────────────────────

const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const REWARD_BALANCE: Symbol = symbol_short!("RWD_BAL");
const TOTAL_PAID: Symbol = symbol_short!("TOT_PAID");
const LIFETIME_STAKERS: Symbol = symbol_short!("STK_EVER");

// Per-staker persistent storage uses the tuple key (STAKER, address).
const STAKER: Symbol = symbol_short!("STAKER");

// Registry: slot count in instance storage, plus two persistent indexes
// (STK_AT, slot) -> address and (STK_POS, address) -> slot.
const REGISTRY_COUNT: Symbol = symbol_short!("STK_CNT");
const REGISTRY_AT: Symbol = symbol_short!("STK_AT");
const REGISTRY_POS: Symbol = symbol_short!("STK_POS");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Types ───────────────────────────────────────────────────────────────────

/// Everything the ledger knows about one staker.
///
/// - `staked`: rewards-bearing balance; deposits not yet rolled in are
///   excluded.
/// - `unclaimed_rewards`: rewards settled but not yet paid out.
/// - `total_earned`: lifetime rewards paid out.
/// - `last_update_time`, `last_update_condition_id`: the accrual cursor.
///   Rewards have been folded into `unclaimed_rewards` up to this point.
/// - `deposits`: the locked deposit queue, cleared slots included.
/// - `has_staked_before`: set on the first stake so the lifetime staker count
///   is bumped once.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerRecord {
    pub staked: i128,
    pub unclaimed_rewards: i128,
    pub total_earned: i128,
    pub last_update_time: u64,
    pub last_update_condition_id: u32,
    pub deposits: Vec<DepositSlot>,
    pub has_staked_before: bool,
}

impl StakerRecord {
    pub fn new(env: &Env) -> Self {
        Self {
            staked: 0,
            unclaimed_rewards: 0,
            total_earned: 0,
            last_update_time: 0,
            last_update_condition_id: 0,
            deposits: Vec::new(env),
            has_staked_before: false,
        }
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

/// Persistent read that refreshes the entry's TTL on a hit.
fn read_persistent<K, V>(env: &Env, key: &K) -> Option<V>
where
    K: IntoVal<Env, Val>,
    V: TryFromVal<Env, Val>,
{
    let value: Option<V> = env.storage().persistent().get(key);
    if value.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    value
}

fn write_persistent<K, V>(env: &Env, key: &K, value: &V)
where
    K: IntoVal<Env, Val>,
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn staker_key(staker: &Address) -> (Symbol, Address) {
    (STAKER, staker.clone())
}

pub fn load(env: &Env, staker: &Address) -> Option<StakerRecord> {
    read_persistent(env, &staker_key(staker))
}

pub fn save(env: &Env, staker: &Address, record: &StakerRecord) {
    write_persistent(env, &staker_key(staker), record);
}

/// A record is active while it has a staked balance or unrolled deposits.
/// Active records are exactly the ones listed in the registry.
pub fn is_active(record: &StakerRecord) -> bool {
    record.staked > 0 || deposits::has_locked(record)
}

/// Move the accrual cursor to `now` in the open condition.
pub fn advance_cursor(env: &Env, record: &mut StakerRecord, now: u64) {
    record.last_update_time = now;
    record.last_update_condition_id = conditions::current_id(env);
}

/// Roll matured deposits, fold everything accrued since the cursor into
/// `unclaimed_rewards`, and move the cursor to `now`.
pub fn settle(env: &Env, record: &mut StakerRecord, now: u64, decimals: u32) {
    deposits::roll_matured(record, now);
    let accrued = rewards::accrue(env, record, now, decimals);
    record.unclaimed_rewards = record.unclaimed_rewards.saturating_add(accrued);
    advance_cursor(env, record, now);
}

// ── Registry ────────────────────────────────────────────────────────────────

fn slot_key(slot: u32) -> (Symbol, u32) {
    (REGISTRY_AT, slot)
}

fn position_key(staker: &Address) -> (Symbol, Address) {
    (REGISTRY_POS, staker.clone())
}

pub fn staker_count(env: &Env) -> u32 {
    env.storage().instance().get(&REGISTRY_COUNT).unwrap_or(0)
}

/// Registry slot held by `staker`, if registered.
pub fn position_of(env: &Env, staker: &Address) -> Option<u32> {
    read_persistent(env, &position_key(staker))
}

/// Addresses of every active staker. Order carries no meaning.
pub fn stakers(env: &Env) -> Vec<Address> {
    let mut list = Vec::new(env);
    for slot in 0..staker_count(env) {
        if let Some(staker) = read_persistent::<_, Address>(env, &slot_key(slot)) {
            list.push_back(staker);
        }
    }
    list
}

pub fn register(env: &Env, staker: &Address) {
    if position_of(env, staker).is_some() {
        return;
    }
    let slot = staker_count(env);
    write_persistent(env, &slot_key(slot), staker);
    write_persistent(env, &position_key(staker), &slot);
    env.storage()
        .instance()
        .set(&REGISTRY_COUNT, &slot.saturating_add(1));
}

/// Swap-with-last removal. Touches at most four entries.
pub fn unregister(env: &Env, staker: &Address) {
    let Some(slot) = position_of(env, staker) else {
        return;
    };
    let last = staker_count(env).saturating_sub(1);

    if slot != last {
        if let Some(moved) = read_persistent::<_, Address>(env, &slot_key(last)) {
            write_persistent(env, &slot_key(slot), &moved);
            write_persistent(env, &position_key(&moved), &slot);
        }
    }
    env.storage().persistent().remove(&slot_key(last));
    env.storage().persistent().remove(&position_key(staker));
    env.storage().instance().set(&REGISTRY_COUNT, &last);
}

// ── Global counters ─────────────────────────────────────────────────────────

fn read_i128(env: &Env, key: &Symbol) -> i128 {
    env.storage().instance().get(key).unwrap_or(0)
}

/// Stake tokens held by the ledger, locked deposits included.
pub fn total_staked(env: &Env) -> i128 {
    read_i128(env, &TOTAL_STAKED)
}

pub fn set_total_staked(env: &Env, amount: i128) {
    env.storage().instance().set(&TOTAL_STAKED, &amount);
}

/// Reward tokens available to pay claims.
pub fn reward_balance(env: &Env) -> i128 {
    read_i128(env, &REWARD_BALANCE)
}

pub fn set_reward_balance(env: &Env, amount: i128) {
    env.storage().instance().set(&REWARD_BALANCE, &amount);
}

pub fn total_rewards_paid(env: &Env) -> i128 {
    read_i128(env, &TOTAL_PAID)
}

pub fn set_total_rewards_paid(env: &Env, amount: i128) {
    env.storage().instance().set(&TOTAL_PAID, &amount);
}

/// Distinct addresses that have ever staked.
pub fn lifetime_staker_count(env: &Env) -> u64 {
    env.storage().instance().get(&LIFETIME_STAKERS).unwrap_or(0)
}

pub fn bump_lifetime_staker_count(env: &Env) {
    let next = lifetime_staker_count(env).saturating_add(1);
    env.storage().instance().set(&LIFETIME_STAKERS, &next);
}
