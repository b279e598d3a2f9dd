//! Preference Pool Partitioning
//!
//! Splits the user set into pools keyed by the unordered
//! `{gender, seeking_gender}` pair so that pairs the preference gate would
//! reject are mostly never scored, bounding the O(n²) pair space. The key
//! is unordered so that complementary seekers coincide: a male user seeking
//! female and a female user seeking male share one pool.
//!
//! # Heuristic, Not a Filter
//!
//! Partitioning can under-merge: two users who would pass the pairwise gate
//! can land in different pools when their preference strings are asymmetric
//! (e.g. one lists multiple genders). The gate in the compatibility
//! calculator remains the source of truth and still runs for every pair
//! inside a pool.
//!
//! # Determinism
//!
//! Pools are returned in sorted-key order and preserve the input order of
//! their members, so a sorted input roster yields a fully deterministic
//! pool layout.

use crate::core::survey::UserProfile;
use std::collections::BTreeMap;

/// Pool key shared by all users without a specific gender preference
pub const ANY_POOL_KEY: &str = "any";

/// The pool key for one user.
///
/// Unrestricted seekers share the `"any"` pool. Users with a specific
/// preference key on the unordered `{gender, seeking_gender}` pair,
/// lowercased and joined in lexicographic order, so two users whose gender
/// and preference mirror each other produce the same key.
pub fn pool_key(user: &UserProfile) -> String {
    if user.seeks_any() {
        return ANY_POOL_KEY.to_string();
    }
    let gender = user
        .gender
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let seeking = user
        .seeking_gender
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if gender <= seeking {
        format!("{}_{}", gender, seeking)
    } else {
        format!("{}_{}", seeking, gender)
    }
}

/// Partition users into preference pools.
pub fn partition_by_preference(users: Vec<UserProfile>) -> Vec<Vec<UserProfile>> {
    let mut pools: BTreeMap<String, Vec<UserProfile>> = BTreeMap::new();
    for user in users {
        pools.entry(pool_key(&user)).or_default().push(user);
    }
    pools.into_values().collect()
}
