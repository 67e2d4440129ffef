use common::admin_tiers::{self, AdminTier};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{events, ContractError};

// ── Types ─────────────────────────────────────────────────────

/// What a pause applies to.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PauseScope {
    /// Every user operation.
    Global,
    /// A single operation, named by one of the `*_OP` symbols below.
    Function(Symbol),
}

pub const STAKE_OP: Symbol = symbol_short!("STAKE");
pub const WITHDRAW_OP: Symbol = symbol_short!("WITHDRAW");
pub const CLAIM_OP: Symbol = symbol_short!("CLAIM");

// ── Storage Keys ─────────────────────────────────────────────

fn global_pause_key() -> Symbol {
    symbol_short!("P_GLOB")
}

fn function_pause_key(func: &Symbol) -> (Symbol, Symbol) {
    (symbol_short!("P_FUNC"), func.clone())
}

// ── Checks ───────────────────────────────────────────────────

pub fn is_paused(env: &Env, scope: &PauseScope) -> bool {
    let global = env
        .storage()
        .instance()
        .get(&global_pause_key())
        .unwrap_or(false);
    match scope {
        PauseScope::Global => global,
        PauseScope::Function(func) => {
            global
                || env
                    .storage()
                    .instance()
                    .get(&function_pause_key(func))
                    .unwrap_or(false)
        }
    }
}

/// Fails with `Paused` if `operation` or the whole contract is halted.
pub fn require_not_paused(env: &Env, operation: &Symbol) -> Result<(), ContractError> {
    if is_paused(env, &PauseScope::Function(operation.clone())) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

// ── Switches ─────────────────────────────────────────────────

fn set_paused(
    env: &Env,
    caller: &Address,
    scope: &PauseScope,
    paused: bool,
) -> Result<(), ContractError> {
    if !admin_tiers::has_tier(env, caller, &AdminTier::OperatorAdmin) {
        return Err(ContractError::Unauthorized);
    }
    match scope {
        PauseScope::Global => env.storage().instance().set(&global_pause_key(), &paused),
        PauseScope::Function(func) => env
            .storage()
            .instance()
            .set(&function_pause_key(func), &paused),
    }
    Ok(())
}

/// Halts `scope`. Requires at least `OperatorAdmin`.
pub fn pause(env: &Env, caller: &Address, scope: PauseScope) -> Result<(), ContractError> {
    set_paused(env, caller, &scope, true)?;
    events::publish_paused(env, caller.clone(), scope);
    Ok(())
}

/// Lifts a halt on `scope`. Requires at least `OperatorAdmin`.
pub fn resume(env: &Env, caller: &Address, scope: PauseScope) -> Result<(), ContractError> {
    set_paused(env, caller, &scope, false)?;
    events::publish_resumed(env, caller.clone(), scope);
    Ok(())
}
