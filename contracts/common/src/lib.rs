//! Shared access-control helpers for the staking contract suite.
//!
//! [`admin_tiers`] implements the three-level admin roster that gates every
//! administrative entry point. Contracts authenticate the caller with
//! `require_auth()` first and then ask the roster whether the caller holds a
//! sufficient tier; the roster itself never reverts.

#![no_std]

pub mod admin_tiers;

pub use admin_tiers::AdminTier;
