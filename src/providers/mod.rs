//! Collaborator Contracts for the CUPID Engine
//!
//! The engine's only boundary with the surrounding system is a set of
//! in-process traits: a roster source, a crush-relationship lookup, a match
//! store, and a campaign-config source. HTTP, auth, and persistence schema
//! all live behind these seams.
//!
//! In-memory implementations back the CLI, tests, and benchmarks; a real
//! deployment implements the same traits over its database layer.
//!
//! # Error Convention
//!
//! Provider methods return `Result<T, String>`: the engine does not care
//! about collaborator error taxonomies, only the message to log or wrap.

use crate::core::compatibility::{MUTUAL_CRUSH_BONUS, NO_CRUSH_BONUS, ONE_WAY_CRUSH_BONUS};
use crate::core::config::CampaignConfig;
use crate::core::engine::MatchRecord;
use crate::core::survey::UserProfile;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Campaign-level counters written back after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total_participants: usize,
    pub total_matches_generated: usize,
}

/// Source of eligible users for a campaign.
///
/// Implementations must apply the eligibility rules (survey completed,
/// account active, at least one response in the campaign) before returning.
pub trait RosterProvider: Send + Sync {
    /// All eligible users with their survey responses embedded.
    fn eligible_users(&self, campaign_id: &str) -> Result<Vec<UserProfile>, String>;
}

/// Lookup for crush relationships between two users in a campaign.
pub trait CrushLookup: Send + Sync {
    /// The multiplicative score bonus for this pair: 1.20 for a mutual
    /// crush, 1.10 for a one-way crush, 1.0 otherwise.
    ///
    /// Must be symmetric in the two user ids; the engine relies on this for
    /// score symmetry.
    fn crush_bonus(&self, user1_id: &str, user2_id: &str, campaign_id: &str)
        -> Result<f64, String>;
}

/// Persistence sink for match records and campaign statistics.
pub trait MatchStore: Send + Sync {
    /// Remove all existing matches for a campaign before a rebuild.
    fn clear_matches(&self, campaign_id: &str) -> Result<(), String>;

    /// Persist one assigned match.
    fn create_match(&self, record: &MatchRecord) -> Result<(), String>;

    /// Write campaign-level counters after a run.
    fn update_campaign_stats(&self, campaign_id: &str, stats: &CampaignStats)
        -> Result<(), String>;
}

/// Source of per-campaign matching configuration.
pub trait ConfigProvider: Send + Sync {
    /// The campaign's configuration. Failures downgrade to defaults in the
    /// engine rather than failing the run.
    fn campaign_config(&self, campaign_id: &str) -> Result<CampaignConfig, String>;
}

// ==========================================
// In-Memory Implementations
// ==========================================

/// In-memory roster keyed by campaign id.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    campaigns: HashMap<String, Vec<UserProfile>>,
}

impl InMemoryRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster with one pre-populated campaign.
    pub fn with_campaign(campaign_id: &str, users: Vec<UserProfile>) -> Self {
        let mut roster = Self::new();
        roster.insert_campaign(campaign_id, users);
        roster
    }

    /// Add or replace a campaign's users.
    pub fn insert_campaign(&mut self, campaign_id: &str, users: Vec<UserProfile>) {
        self.campaigns.insert(campaign_id.to_string(), users);
    }
}

impl RosterProvider for InMemoryRoster {
    fn eligible_users(&self, campaign_id: &str) -> Result<Vec<UserProfile>, String> {
        Ok(self
            .campaigns
            .get(campaign_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory directed crush facts.
///
/// A crush is the directed fact "user A listed user B in campaign C"; the
/// bonus lookup checks both directions, which makes it symmetric by
/// construction.
#[derive(Debug, Default)]
pub struct InMemoryCrushes {
    directed: Mutex<HashSet<(String, String, String)>>,
}

impl InMemoryCrushes {
    /// Empty crush table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` listed `to` as a crush in `campaign_id`.
    pub fn add_crush(&self, from: &str, to: &str, campaign_id: &str) {
        self.directed.lock().unwrap().insert((
            from.to_string(),
            to.to_string(),
            campaign_id.to_string(),
        ));
    }
}

impl CrushLookup for InMemoryCrushes {
    fn crush_bonus(
        &self,
        user1_id: &str,
        user2_id: &str,
        campaign_id: &str,
    ) -> Result<f64, String> {
        let directed = self.directed.lock().unwrap();
        let forward = directed.contains(&(
            user1_id.to_string(),
            user2_id.to_string(),
            campaign_id.to_string(),
        ));
        let backward = directed.contains(&(
            user2_id.to_string(),
            user1_id.to_string(),
            campaign_id.to_string(),
        ));
        Ok(match (forward, backward) {
            (true, true) => MUTUAL_CRUSH_BONUS,
            (true, false) | (false, true) => ONE_WAY_CRUSH_BONUS,
            (false, false) => NO_CRUSH_BONUS,
        })
    }
}

/// In-memory match store with interior mutability, for tests and tooling.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: Mutex<HashMap<String, Vec<MatchRecord>>>,
    stats: Mutex<HashMap<String, CampaignStats>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted matches for a campaign, in creation order.
    pub fn matches_for(&self, campaign_id: &str) -> Vec<MatchRecord> {
        self.matches
            .lock()
            .unwrap()
            .get(campaign_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The last stats written for a campaign.
    pub fn stats_for(&self, campaign_id: &str) -> Option<CampaignStats> {
        self.stats.lock().unwrap().get(campaign_id).copied()
    }
}

impl MatchStore for InMemoryStore {
    fn clear_matches(&self, campaign_id: &str) -> Result<(), String> {
        self.matches.lock().unwrap().remove(campaign_id);
        Ok(())
    }

    fn create_match(&self, record: &MatchRecord) -> Result<(), String> {
        self.matches
            .lock()
            .unwrap()
            .entry(record.campaign_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn update_campaign_stats(
        &self,
        campaign_id: &str,
        stats: &CampaignStats,
    ) -> Result<(), String> {
        self.stats
            .lock()
            .unwrap()
            .insert(campaign_id.to_string(), *stats);
        Ok(())
    }
}

/// Config provider that serves one fixed configuration for every campaign.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    config: CampaignConfig,
}

impl StaticConfig {
    /// Provider serving the given configuration.
    pub fn new(config: CampaignConfig) -> Self {
        Self { config }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self::new(CampaignConfig::default())
    }
}

impl ConfigProvider for StaticConfig {
    fn campaign_config(&self, _campaign_id: &str) -> Result<CampaignConfig, String> {
        Ok(self.config.clone())
    }
}
