#![no_std]

pub mod circuit_breaker;
pub mod conditions;
pub mod deposits;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod rewards;

use common::admin_tiers::{self, AdminTier};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec,
};

use circuit_breaker::{PauseScope, CLAIM_OP, STAKE_OP, WITHDRAW_OP};
use conditions::{Condition, RewardTiers};
use deposits::DepositSlot;
use ledger::StakerRecord;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const STAKE_DECIMALS: Symbol = symbol_short!("STK_DEC");
const MIN_STAKE: Symbol = symbol_short!("MIN_STK");
const LOCK_PERIOD: Symbol = symbol_short!("LOCK_PER");

const INSTANCE_TTL_THRESHOLD: u32 = 5_184_000;
const INSTANCE_TTL_EXTEND_TO: u32 = 10_368_000;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    BelowMinimumStake = 6,
    InvalidTimeUnit = 7,
    TimeUnitUnchanged = 8,
    TierLengthMismatch = 9,
    InvalidTierTable = 10,
    NoRewards = 11,
    InsufficientRewardBalance = 12,
    TransferFailed = 13,
    Reentrant = 14,
    Paused = 15,
    TokensIdentical = 16,
    ConditionNotFound = 17,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of a staker's position returned by `get_stake_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeInfo {
    /// Rewards-bearing balance, excluding deposits not yet rolled in.
    pub staked: i128,
    /// Deposits not yet rolled in, matured or not.
    pub locked: i128,
    /// Claimable right now.
    pub rewards: i128,
    /// Lifetime rewards paid out.
    pub total_earned: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct TieredStakingContract;

#[contractimpl]
impl TieredStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger and open condition 0.
    ///
    /// * `stake_token`  – SAC address of the token users stake.
    /// * `reward_token` – SAC address of the token rewards are paid in.
    /// * `time_unit`    – seconds over which tier rates are expressed.
    /// * `tiers`        – initial balance brackets and their rates.
    /// * `min_stake`    – smallest amount a single `stake` call accepts.
    /// * `lock_period`  – seconds a deposit stays locked before it counts.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        time_unit: u64,
        tiers: RewardTiers,
        min_stake: i128,
        lock_period: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if min_stake < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        conditions::append(&env, time_unit, tiers.clone(), now)?;

        let decimals = token::Client::new(&env, &stake_token).decimals();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&STAKE_DECIMALS, &decimals);
        env.storage().instance().set(&MIN_STAKE, &min_stake);
        env.storage().instance().set(&LOCK_PERIOD, &lock_period);
        // Counters and the registry start empty; readers default absent keys.

        admin_tiers::bootstrap(&env, &admin);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(
            &env,
            admin,
            stake_token,
            reward_token,
            time_unit,
            tiers,
            min_stake,
            lock_period,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens as a new locked deposit.
    ///
    /// Rewards owed on the existing balance are settled first, so the new
    /// deposit never earns for time before it existed. The recorded amount is
    /// what the contract's balance actually grew by.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        circuit_breaker::require_not_paused(&env, &STAKE_OP)?;
        Self::extend_instance_ttl(&env);
        staker.require_auth();

        guard::non_reentrant(&env, || Self::record_stake(&env, &staker, amount))
    }

    /// Withdraw `amount` from the staked balance.
    ///
    /// Only rolled-in (matured) funds can leave; locked deposits stay put.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        circuit_breaker::require_not_paused(&env, &WITHDRAW_OP)?;
        Self::extend_instance_ttl(&env);
        staker.require_auth();

        guard::non_reentrant(&env, || Self::record_withdrawal(&env, &staker, amount))
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has earned so far.
    ///
    /// Fails with `NoRewards` when nothing is owed and with
    /// `InsufficientRewardBalance` when the reward float cannot cover it.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        circuit_breaker::require_not_paused(&env, &CLAIM_OP)?;
        Self::extend_instance_ttl(&env);
        staker.require_auth();

        guard::non_reentrant(&env, || Self::record_claim(&env, &staker))
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the staker's position with rewards accrued up to now.
    pub fn get_stake_info(env: Env, staker: Address) -> StakeInfo {
        let Some(record) = ledger::load(&env, &staker) else {
            return StakeInfo {
                staked: 0,
                locked: 0,
                rewards: 0,
                total_earned: 0,
            };
        };
        let now = env.ledger().timestamp();
        StakeInfo {
            staked: record.staked,
            locked: deposits::locked_amount(&record),
            rewards: rewards::available(&env, &record, now, Self::stake_decimals(&env)),
            total_earned: record.total_earned,
        }
    }

    /// Return the staker's deposit queue, cleared slots included.
    pub fn get_locked_deposits(env: Env, staker: Address) -> Vec<DepositSlot> {
        ledger::load(&env, &staker)
            .map(|record| record.deposits)
            .unwrap_or(Vec::new(&env))
    }

    /// Return how much of the staker's queue has matured but not rolled in.
    pub fn get_unlocked_amount(env: Env, staker: Address) -> i128 {
        ledger::load(&env, &staker)
            .map(|record| deposits::unlocked_amount(&record, env.ledger().timestamp()))
            .unwrap_or(0)
    }

    pub fn get_time_unit(env: Env) -> Result<u64, ContractError> {
        Ok(conditions::current(&env)?.time_unit)
    }

    pub fn get_reward_tiers(env: Env) -> Result<RewardTiers, ContractError> {
        Ok(conditions::current(&env)?.tiers)
    }

    pub fn get_condition(env: Env, condition_id: u32) -> Result<Condition, ContractError> {
        conditions::get(&env, condition_id).ok_or(ContractError::ConditionNotFound)
    }

    pub fn get_current_condition_id(env: Env) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        Ok(conditions::current_id(&env))
    }

    /// Return the reward tokens available to pay claims.
    pub fn get_reward_token_balance(env: Env) -> i128 {
        ledger::reward_balance(&env)
    }

    pub fn get_total_rewards_paid(env: Env) -> i128 {
        ledger::total_rewards_paid(&env)
    }

    /// Return the stake tokens held by the ledger, locked deposits included.
    pub fn get_total_staked(env: Env) -> i128 {
        ledger::total_staked(&env)
    }

    /// Return the number of stakers with a balance or a pending deposit.
    pub fn get_staker_count(env: Env) -> u32 {
        ledger::staker_count(&env)
    }

    /// Return the number of distinct addresses that have ever staked.
    pub fn get_lifetime_staker_count(env: Env) -> u64 {
        ledger::lifetime_staker_count(&env)
    }

    pub fn get_stakers(env: Env) -> Vec<Address> {
        ledger::stakers(&env)
    }

    pub fn get_min_stake(env: Env) -> i128 {
        env.storage().instance().get(&MIN_STAKE).unwrap_or(0)
    }

    /// Return the lock applied to new deposits, in seconds.
    pub fn get_lock_period(env: Env) -> u64 {
        env.storage().instance().get(&LOCK_PERIOD).unwrap_or(0)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_paused(env: Env, scope: PauseScope) -> bool {
        circuit_breaker::is_paused(&env, &scope)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Change the period tier rates are expressed over.
    ///
    /// Closes the open condition and opens a new one with the same tiers, so
    /// time already elapsed keeps being priced at the old unit.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_time_unit(env: Env, caller: Address, time_unit: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if time_unit == 0 {
            return Err(ContractError::InvalidTimeUnit);
        }
        let open = conditions::current(&env)?;
        if open.time_unit == time_unit {
            return Err(ContractError::TimeUnitUnchanged);
        }

        let now = env.ledger().timestamp();
        let condition_id = conditions::append(&env, time_unit, open.tiers, now)?;

        events::publish_time_unit_set(&env, open.time_unit, time_unit, condition_id);

        Ok(())
    }

    /// Replace the tier table from now on.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_reward_tiers(
        env: Env,
        caller: Address,
        tiers: RewardTiers,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        conditions::validate_tiers(&tiers)?;
        let open = conditions::current(&env)?;

        let now = env.ledger().timestamp();
        let condition_id = conditions::append(&env, open.time_unit, tiers.clone(), now)?;

        events::publish_reward_tiers_set(&env, open.tiers, tiers, condition_id);

        Ok(())
    }

    /// Requires at least `ContractAdmin` tier.
    pub fn set_min_stake(env: Env, caller: Address, min_stake: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if min_stake < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let old = Self::get_min_stake(env.clone());
        env.storage().instance().set(&MIN_STAKE, &min_stake);

        events::publish_min_stake_set(&env, old, min_stake);

        Ok(())
    }

    /// Update the deposit lock period (affects only *future* deposits).
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn set_lock_period(
        env: Env,
        caller: Address,
        new_period: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        let old = Self::get_lock_period(env.clone());
        env.storage().instance().set(&LOCK_PERIOD, &new_period);

        events::publish_lock_period_set(&env, old, new_period);

        Ok(())
    }

    /// Top up the reward float from `caller`'s reward-token balance.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn deposit_reward_tokens(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        guard::non_reentrant(&env, || {
            let reward_token = Self::reward_token(&env)?;
            let received = Self::pull(&env, &reward_token, &caller, amount)?;

            let new_balance = ledger::reward_balance(&env).saturating_add(received);
            ledger::set_reward_balance(&env, new_balance);

            events::publish_rewards_deposited(&env, caller.clone(), received, new_balance);
            Ok(received)
        })
    }

    /// Take reward tokens back out of the float.
    ///
    /// Requires at least `ContractAdmin` tier.
    pub fn withdraw_reward_tokens(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin_tier(&env, &caller, &AdminTier::ContractAdmin)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        guard::non_reentrant(&env, || {
            let balance = ledger::reward_balance(&env);
            if amount > balance {
                return Err(ContractError::InsufficientRewardBalance);
            }
            let new_balance = balance - amount;
            ledger::set_reward_balance(&env, new_balance);

            let reward_token = Self::reward_token(&env)?;
            Self::send(&env, &reward_token, &caller, amount)?;

            events::publish_rewards_withdrawn(&env, caller.clone(), amount, new_balance);
            Ok(())
        })
    }

    // ── Circuit breaker ──────────────────────────────────────────────────────

    /// Halt user operations in `scope`. Requires at least `OperatorAdmin`.
    pub fn pause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        circuit_breaker::pause(&env, &caller, scope)
    }

    /// Lift a halt on `scope`. Requires at least `OperatorAdmin`.
    pub fn resume(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        circuit_breaker::resume(&env, &caller, scope)
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Promotes or assigns a target address to the specified admin tier.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Removes the admin tier from the target address entirely.
    ///
    /// Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Returns the admin tier of the given address, if any.
    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::tier_of(&env, &admin)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

impl TieredStakingContract {
    fn record_stake(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if amount < Self::get_min_stake(env.clone()) {
            return Err(ContractError::BelowMinimumStake);
        }

        let now = env.ledger().timestamp();
        let mut record = ledger::load(env, staker).unwrap_or_else(|| StakerRecord::new(env));

        // 1. Settle the existing position, or open a fresh one.
        if ledger::is_active(&record) {
            ledger::settle(env, &mut record, now, Self::stake_decimals(env));
        } else {
            if !record.has_staked_before {
                record.has_staked_before = true;
                ledger::bump_lifetime_staker_count(env);
            }
            ledger::register(env, staker);
            ledger::advance_cursor(env, &mut record, now);
        }

        // 2. Pull tokens and measure what actually arrived.
        let stake_token = Self::stake_token(env)?;
        let received = Self::pull(env, &stake_token, staker, amount)?;
        if received <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // 3. Queue the deposit behind the lock.
        let unlock_time = now.saturating_add(Self::get_lock_period(env.clone()));
        deposits::push(&mut record, received, unlock_time);
        ledger::save(env, staker, &record);
        ledger::set_total_staked(env, ledger::total_staked(env).saturating_add(received));

        events::publish_staked(env, staker.clone(), received, unlock_time);

        Ok(())
    }

    fn record_withdrawal(env: &Env, staker: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        let mut record = ledger::load(env, staker).ok_or(ContractError::InsufficientBalance)?;

        // 1. Roll matured deposits and settle rewards on the pre-withdrawal balance.
        ledger::settle(env, &mut record, now, Self::stake_decimals(env));

        // 2. Only rolled-in funds can leave.
        if amount > record.staked {
            return Err(ContractError::InsufficientBalance);
        }
        record.staked = record.staked.saturating_sub(amount);

        if !ledger::is_active(&record) {
            ledger::unregister(env, staker);
        }
        ledger::save(env, staker, &record);
        ledger::set_total_staked(env, ledger::total_staked(env).saturating_sub(amount));

        // 3. Return tokens to the staker.
        let stake_token = Self::stake_token(env)?;
        Self::send(env, &stake_token, staker, amount)?;

        events::publish_withdrawn(env, staker.clone(), amount);

        Ok(())
    }

    fn record_claim(env: &Env, staker: &Address) -> Result<i128, ContractError> {
        let now = env.ledger().timestamp();
        let mut record = ledger::load(env, staker).ok_or(ContractError::NoRewards)?;

        // 1. Everything owed up to now.
        let accrued = rewards::accrue(env, &record, now, Self::stake_decimals(env));
        let due = record.unclaimed_rewards.saturating_add(accrued);
        if due <= 0 {
            return Err(ContractError::NoRewards);
        }
        let float = ledger::reward_balance(env);
        if due > float {
            return Err(ContractError::InsufficientRewardBalance);
        }

        // 2. Reset the position before paying out.
        deposits::roll_matured(&mut record, now);
        record.unclaimed_rewards = 0;
        ledger::advance_cursor(env, &mut record, now);
        record.total_earned = record.total_earned.saturating_add(due);
        ledger::save(env, staker, &record);

        ledger::set_reward_balance(env, float - due);
        ledger::set_total_rewards_paid(
            env,
            ledger::total_rewards_paid(env).saturating_add(due),
        );

        // 3. Transfer reward tokens to the staker.
        let reward_token = Self::reward_token(env)?;
        Self::send(env, &reward_token, staker, due)?;

        events::publish_reward_claimed(env, staker.clone(), due);

        Ok(due)
    }

    /// Keep the contract instance, and with it every counter, live.
    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` does not hold at least `min_tier`.
    fn require_admin_tier(
        env: &Env,
        caller: &Address,
        min_tier: &AdminTier,
    ) -> Result<(), ContractError> {
        if !admin_tiers::has_tier(env, caller, min_tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn stake_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn stake_decimals(env: &Env) -> u32 {
        env.storage().instance().get(&STAKE_DECIMALS).unwrap_or(0)
    }

    /// Move `amount` of `token` from `from` into the contract and return the
    /// contract's observed balance increase.
    fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<i128, ContractError> {
        let client = token::Client::new(env, token);
        let this = env.current_contract_address();

        if client.balance(from) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let before = client.balance(&this);
        match client.try_transfer(from, &this, &amount) {
            Ok(Ok(())) => {}
            _ => return Err(ContractError::TransferFailed),
        }
        let after = client.balance(&this);

        Ok(after.saturating_sub(before))
    }

    /// Pay `amount` of `token` from the contract to `to`.
    fn send(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        let client = token::Client::new(env, token);
        match client.try_transfer(&env.current_contract_address(), to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_conditions;

#[cfg(test)]
mod test_fee_token;
