use soroban_sdk::{symbol_short, Env, Symbol};

use crate::ContractError;

const ENTERED: Symbol = symbol_short!("ENTERED");

pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().get(&ENTERED).unwrap_or(false)
}

/// Marks the ledger as busy. Fails if an operation is already in flight.
pub fn enter(env: &Env) -> Result<(), ContractError> {
    if is_entered(env) {
        return Err(ContractError::Reentrant);
    }
    env.storage().instance().set(&ENTERED, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}

/// Runs `body` with the reentrancy flag held.
///
/// The flag is released whether `body` succeeds or fails; a trap rolls the
/// whole invocation back, flag included.
pub fn non_reentrant<T>(
    env: &Env,
    body: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    enter(env)?;
    let result = body();
    exit(env);
    result
}
