use soroban_sdk::{contracttype, Address, Env, Vec};

// ── Storage ──────────────────────────────────────────────────────────────────

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone)]
enum TierKey {
    /// Tier held by a single address (persistent).
    Holder(Address),
    /// Every address currently holding a tier (persistent).
    Roster,
}

// ── Admin Tier Enum ──────────────────────────────────────────────────────────

/// Admin hierarchy for the staking ledger.
///
/// - `SuperAdmin`    – everything below, plus promoting and demoting admins.
/// - `ContractAdmin` – ledger configuration: time unit, reward tiers,
///                     minimum stake, lock period and the reward float.
/// - `OperatorAdmin` – pausing and resuming user operations only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    OperatorAdmin = 1,
    ContractAdmin = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    fn rank(&self) -> u32 {
        match self {
            AdminTier::OperatorAdmin => 1,
            AdminTier::ContractAdmin => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn covers(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

// ── Lookups ──────────────────────────────────────────────────────────────────

/// Tier held by `holder`, if any. Refreshes the entry's TTL on a hit.
pub fn tier_of(env: &Env, holder: &Address) -> Option<AdminTier> {
    let key = TierKey::Holder(holder.clone());
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    tier
}

/// `true` when `caller` holds `min_tier` or anything above it.
pub fn has_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    tier_of(env, caller).is_some_and(|tier| tier.covers(min_tier))
}

/// Every address that currently holds a tier, in promotion order.
pub fn roster(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&TierKey::Roster)
        .unwrap_or(Vec::new(env))
}

// ── Mutations ────────────────────────────────────────────────────────────────

fn assign(env: &Env, holder: &Address, tier: AdminTier) {
    let key = TierKey::Holder(holder.clone());
    env.storage().persistent().set(&key, &tier);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let mut holders = roster(env);
    if !holders.contains(holder) {
        holders.push_back(holder.clone());
        env.storage().persistent().set(&TierKey::Roster, &holders);
    }
}

/// Seeds the roster with its first `SuperAdmin`. Called once from the
/// contract's `initialize`.
pub fn bootstrap(env: &Env, admin: &Address) {
    assign(env, admin, AdminTier::SuperAdmin);
}

/// Assigns `tier` to `target`, replacing any tier it already held.
///
/// The caller must already be authenticated. Returns `false` without touching
/// storage when `caller` is not a `SuperAdmin`.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    assign(env, target, tier);
    true
}

/// Strips every tier from `target`.
///
/// Returns `false` without touching storage when `caller` is not a
/// `SuperAdmin`.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    env.storage()
        .persistent()
        .remove(&TierKey::Holder(target.clone()));

    let mut holders = roster(env);
    if let Some(index) = holders.first_index_of(target) {
        holders.remove(index);
        env.storage().persistent().set(&TierKey::Roster, &holders);
    }
    true
}
