extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

use crate::{
    conditions::Condition, test::tier_table, ContractError, TieredStakingContract,
    TieredStakingContractClient,
};

fn setup() -> (Env, TieredStakingContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let stake_token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let client = TieredStakingContractClient::new(&env, &env.register(TieredStakingContract, ()));
    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &stake_token.address(),
        &reward_token.address(),
        &1,
        &tier_table(&env, &[0], &[1], &[1]),
        &0,
        &0,
    );

    StellarAssetClient::new(&env, &reward_token.address()).mint(&admin, &1_000_000_000);
    client.deposit_reward_tokens(&admin, &1_000_000_000);

    (env, client, admin, stake_token.address())
}

// ── Timeline shape ───────────────────────────────────────────────────────────

#[test]
fn test_initialize_opens_condition_zero() {
    let (env, client, _admin, _) = setup();

    assert_eq!(
        client.get_condition(&0),
        Condition {
            time_unit: 1,
            start_time: 1_000,
            end_time: 0,
            tiers: tier_table(&env, &[0], &[1], &[1]),
        }
    );
}

#[test]
fn test_each_change_closes_previous_and_opens_next() {
    let (env, client, admin, _) = setup();

    env.ledger().set_timestamp(1_100);
    client.set_time_unit(&admin, &10);

    env.ledger().set_timestamp(1_250);
    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[3], &[1]));

    assert_eq!(client.get_current_condition_id(), 2);

    let first = client.get_condition(&0);
    let second = client.get_condition(&1);
    let third = client.get_condition(&2);

    assert_eq!((first.start_time, first.end_time), (1_000, 1_100));
    assert_eq!((second.start_time, second.end_time), (1_100, 1_250));
    assert_eq!((third.start_time, third.end_time), (1_250, 0));

    // A tier change carries the time unit forward and vice versa.
    assert_eq!(second.tiers, first.tiers);
    assert_eq!(third.time_unit, 10);
}

#[test]
fn test_consecutive_conditions_are_contiguous() {
    let (env, client, admin, _) = setup();

    for (offset, numerator) in [(10u64, 2i128), (20, 3), (35, 4), (60, 5)] {
        env.ledger().set_timestamp(1_000 + offset);
        client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[numerator], &[1]));
    }

    let open = client.get_current_condition_id();
    for id in 0..open {
        let closed = client.get_condition(&id);
        let next = client.get_condition(&(id + 1));
        assert_eq!(closed.end_time, next.start_time);
        assert!(closed.start_time <= closed.end_time);
    }
    assert_eq!(client.get_condition(&open).end_time, 0);
}

#[test]
fn test_same_timestamp_change_yields_empty_condition() {
    let (env, client, admin, stake_token) = setup();
    let staker = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&staker, &10);
    client.stake(&staker, &10);

    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[5], &[1]));
    let empty = client.get_condition(&0);
    assert_eq!(empty.start_time, empty.end_time);

    // Only the new rate applies: 20 × 10 × 5
    env.ledger().set_timestamp(1_020);
    assert_eq!(client.get_stake_info(&staker).rewards, 1_000);
}

#[test]
fn test_unknown_condition_fails() {
    let (_env, client, _admin, _) = setup();

    match client.try_get_condition(&7) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ConditionNotFound),
        _ => unreachable!("Expected ConditionNotFound error"),
    }
}

#[test]
fn test_rejected_change_leaves_timeline_untouched() {
    let (env, client, admin, _) = setup();

    env.ledger().set_timestamp(1_500);
    let _ = client.try_set_reward_tiers(&admin, &tier_table(&env, &[0], &[1], &[0]));
    let _ = client.try_set_time_unit(&admin, &1);

    assert_eq!(client.get_current_condition_id(), 0);
    assert_eq!(client.get_condition(&0).end_time, 0);
}

// ── Accrual across the timeline ──────────────────────────────────────────────

#[test]
fn test_late_claim_replays_every_condition() {
    let (env, client, admin, stake_token) = setup();
    let staker = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&staker, &4);
    client.stake(&staker, &4);

    // rates 1, 2 and 3 per unit per second for 10 seconds each
    env.ledger().set_timestamp(1_010);
    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[2], &[1]));
    env.ledger().set_timestamp(1_020);
    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[3], &[1]));
    env.ledger().set_timestamp(1_030);

    // 4 × (10 + 20 + 30)
    assert_eq!(client.claim_rewards(&staker), 240);
}

#[test]
fn test_cursor_moves_into_newer_conditions() {
    let (env, client, admin, stake_token) = setup();
    let staker = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&staker, &10);
    client.stake(&staker, &10);

    env.ledger().set_timestamp(1_010);
    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[2], &[1]));

    // 10 × 10 × 1 + 5 × 10 × 2
    env.ledger().set_timestamp(1_015);
    assert_eq!(client.claim_rewards(&staker), 200);

    env.ledger().set_timestamp(1_020);
    client.set_reward_tiers(&admin, &tier_table(&env, &[0], &[4], &[1]));

    // Only the tail of condition 1 and the head of condition 2 remain:
    // 5 × 10 × 2 + 10 × 10 × 4
    env.ledger().set_timestamp(1_030);
    assert_eq!(client.claim_rewards(&staker), 500);
    assert_eq!(client.get_stake_info(&staker).total_earned, 700);
}
