extern crate std;

use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, MuxedAddress,
};

use crate::{
    deposits::{DepositSlot, LockedDeposit},
    test::tier_table,
    ContractError, TieredStakingContract, TieredStakingContractClient,
};

// ── A token that skims 10% off every transfer ────────────────────────────────

#[contracttype]
#[derive(Clone)]
enum FeeTokenKey {
    Balance(Address),
    Frozen,
    Reenter(Address),
}

#[contract]
pub struct FeeToken;

#[contractimpl]
impl FeeToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&FeeTokenKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .instance()
            .get(&FeeTokenKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn decimals(_env: Env) -> u32 {
        7
    }

    /// Makes every later transfer panic.
    pub fn freeze(env: Env) {
        env.storage().instance().set(&FeeTokenKey::Frozen, &true);
    }

    /// Makes every later transfer call back into `ledger.stake` first.
    pub fn reenter(env: Env, ledger: Address) {
        env.storage()
            .instance()
            .set(&FeeTokenKey::Reenter(ledger.clone()), &ledger);
    }

    pub fn transfer(env: Env, from: Address, to: MuxedAddress, amount: i128) {
        from.require_auth();
        if env
            .storage()
            .instance()
            .get(&FeeTokenKey::Frozen)
            .unwrap_or(false)
        {
            panic!("token frozen");
        }

        let to = to.address();
        if let Some(ledger) = env
            .storage()
            .instance()
            .get::<_, Address>(&FeeTokenKey::Reenter(to.clone()))
        {
            TieredStakingContractClient::new(&env, &ledger).stake(&from, &1);
        }

        let fee = amount / 10;
        let from_balance = Self::balance(env.clone(), from.clone());
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&FeeTokenKey::Balance(from), &(from_balance - amount));
        env.storage()
            .instance()
            .set(&FeeTokenKey::Balance(to), &(to_balance + amount - fee));
    }
}

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (
    Env,
    TieredStakingContractClient<'static>,
    FeeTokenClient<'static>,
    Address,
) {
    let env = Env::default();
    env.mock_all_auths();

    let fee_token = FeeTokenClient::new(&env, &env.register(FeeToken, ()));
    let reward_token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(TieredStakingContract, ());
    let client = TieredStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &fee_token.address,
        &reward_token.address(),
        &1,
        &tier_table(&env, &[0], &[1], &[10]),
        &1,
        &0,
    );

    StellarAssetClient::new(&env, &reward_token.address()).mint(&admin, &1_000_000);
    client.deposit_reward_tokens(&admin, &1_000_000);

    (env, client, fee_token, contract_id)
}

// ── Observed amounts ─────────────────────────────────────────────────────────

#[test]
fn test_stake_records_what_arrived() {
    let (env, client, fee_token, contract_id) = setup();
    let staker = Address::generate(&env);
    fee_token.mint(&staker, &1_000);

    client.stake(&staker, &1_000);

    assert_eq!(fee_token.balance(&contract_id), 900);
    assert_eq!(client.get_total_staked(), 900);
    assert_eq!(client.get_stake_info(&staker).locked, 900);
    assert_eq!(
        client.get_locked_deposits(&staker).get(0),
        Some(DepositSlot::Locked(LockedDeposit {
            amount: 900,
            unlock_time: 0,
        }))
    );
}

#[test]
fn test_rewards_accrue_on_received_amount() {
    let (env, client, fee_token, _) = setup();
    let staker = Address::generate(&env);
    fee_token.mint(&staker, &1_000);

    client.stake(&staker, &1_000);

    // 10 × 900 × 1/10
    env.ledger().set_timestamp(10);
    assert_eq!(client.get_stake_info(&staker).rewards, 900);
}

#[test]
fn test_ledger_total_matches_holdings_through_withdraw() {
    let (env, client, fee_token, contract_id) = setup();
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    fee_token.mint(&alice, &1_000);
    fee_token.mint(&bob, &500);

    client.stake(&alice, &1_000);
    client.stake(&bob, &500);
    assert_eq!(client.get_total_staked(), 1_350);
    assert_eq!(fee_token.balance(&contract_id), 1_350);

    env.ledger().set_timestamp(5);
    client.withdraw(&alice, &900);

    assert_eq!(client.get_total_staked(), 450);
    assert_eq!(fee_token.balance(&contract_id), 450);
    // The outbound fee is the token's business; the ledger sent 900.
    assert_eq!(fee_token.balance(&alice), 810);
}

// ── Misbehaving tokens ───────────────────────────────────────────────────────

#[test]
fn test_failed_transfer_reverts_stake() {
    let (env, client, fee_token, _) = setup();
    let staker = Address::generate(&env);
    fee_token.mint(&staker, &1_000);
    fee_token.freeze();

    match client.try_stake(&staker, &1_000) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TransferFailed),
        _ => unreachable!("Expected TransferFailed error"),
    }
    assert_eq!(client.get_total_staked(), 0);
    assert_eq!(client.get_staker_count(), 0);
    assert_eq!(client.get_lifetime_staker_count(), 0);
    assert_eq!(fee_token.balance(&staker), 1_000);
}

#[test]
fn test_token_callback_into_ledger_fails_transfer() {
    let (env, client, fee_token, contract_id) = setup();
    let staker = Address::generate(&env);
    fee_token.mint(&staker, &1_000);
    fee_token.reenter(&contract_id);

    // The host refuses the nested call, so the transfer itself fails.
    match client.try_stake(&staker, &100) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TransferFailed),
        _ => unreachable!("Expected TransferFailed error"),
    }
    assert_eq!(client.get_staker_count(), 0);
    assert_eq!(client.get_total_staked(), 0);
    assert!(client.get_locked_deposits(&staker).is_empty());
    assert_eq!(TokenClient::new(&env, &fee_token.address).balance(&staker), 1_000);
}
