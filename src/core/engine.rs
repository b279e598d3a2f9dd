//! Greedy Match Assignment Engine
//!
//! Orchestrates a full match-generation run for a campaign: load the
//! eligible roster, partition into preference pools, score every in-pool
//! pair, then greedily assign matches from the highest score down while
//! respecting a per-user match cap and a minimum-score floor.
//!
//! # Greedy, Not Optimal
//!
//! This is a greedy approximation of maximum-weight b-matching (each user
//! has capacity `matches_per_user`, not 1). High-scoring pairs are locked
//! in first and never reconsidered; no augmenting-path exchange is
//! performed. The design trades optimality for simplicity and speed.
//!
//! # Determinism
//!
//! Given identical roster, crush, and configuration inputs, a re-run
//! produces the identical assignment set: users are sorted by id before
//! pooling, pools are iterated in sorted-key order, and pairs sort by score
//! descending with ties broken ascending by `(user1_id, user2_id)`.
//!
//! # Concurrency
//!
//! A run is a single synchronous batch. The clear-then-rebuild pattern is
//! unsafe under concurrent runs for the same campaign; the surrounding
//! system must serialize runs per campaign (advisory lock or an
//! in-progress flag). The greedy pass mutates per-user counters and must
//! stay sequential, which holding them by exclusive ownership makes plain.

use crate::core::compatibility::{
    calculate_compatibility, meets_preferences, CategoryBreakdown, MatchScore,
};
use crate::core::config::CampaignConfig;
use crate::core::pools::partition_by_preference;
use crate::core::survey::UserProfile;
use crate::events::{EventBus, MatchEvent};
use crate::providers::{CampaignStats, ConfigProvider, CrushLookup, MatchStore, RosterProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Hard safety cap on total matches created in one run
pub const MAX_TOTAL_MATCHES: usize = 10_000;

/// Coarse quality label derived solely from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Perfect,
    Excellent,
    Great,
    Good,
    Fair,
}

impl MatchTier {
    /// The tier for a compatibility score.
    ///
    /// Scores below the assignment threshold still tier as `Fair`; such
    /// pairs only surface when a mutual crush bypasses the floor.
    pub fn for_score(score: f64) -> Self {
        if score >= 95.0 {
            MatchTier::Perfect
        } else if score >= 85.0 {
            MatchTier::Excellent
        } else if score >= 75.0 {
            MatchTier::Great
        } else if score >= 65.0 {
            MatchTier::Good
        } else {
            MatchTier::Fair
        }
    }

    /// The lowercase label for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Perfect => "perfect",
            MatchTier::Excellent => "excellent",
            MatchTier::Great => "great",
            MatchTier::Good => "good",
            MatchTier::Fair => "fair",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assigned match, handed to the store for persistence.
///
/// `user1_id` < `user2_id` always holds: pairs are generated in canonical
/// order over an id-sorted roster, so a pair appears at most once per run
/// and never pairs a user with themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub campaign_id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub compatibility_score: f64,
    pub match_tier: MatchTier,
    /// Per-category score breakdown at assignment time
    pub breakdown: CategoryBreakdown,
    /// 1-based ordinal of this match among user1's matches
    pub rank_for_user1: usize,
    /// 1-based ordinal of this match among user2's matches
    pub rank_for_user2: usize,
    pub is_mutual_crush: bool,
}

/// Result of a match-generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Matches successfully persisted
    pub matches_created: usize,
    /// Eligible users considered
    pub total_users: usize,
}

/// Errors during match generation.
///
/// Only collaborator (infrastructure) failures surface here. Data problems
/// inside scoring all resolve to neutral fallbacks, and a failed write of a
/// single match record is logged and skipped rather than escalated.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A collaborator call failed (roster load, match clear, stats update)
    Provider {
        /// Error message from the collaborator
        message: String,
    },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Provider { message } => {
                write!(f, "Provider error: {}", message)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// A scored, not-yet-assigned pair inside one pool.
struct ScoredPair {
    user1: usize,
    user2: usize,
    score: MatchScore,
}

/// The match-generation engine.
///
/// Holds the four collaborator contracts and an optional event bus. All
/// scoring is pure; the collaborators are only touched at the run
/// boundaries (roster load, crush lookups, record writes, stats update).
pub struct MatchEngine {
    roster: Arc<dyn RosterProvider>,
    crushes: Arc<dyn CrushLookup>,
    store: Arc<dyn MatchStore>,
    config: Arc<dyn ConfigProvider>,
    bus: Option<EventBus>,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("has_event_bus", &self.bus.is_some())
            .finish()
    }
}

impl MatchEngine {
    /// Create an engine over the given collaborators.
    pub fn new(
        roster: Arc<dyn RosterProvider>,
        crushes: Arc<dyn CrushLookup>,
        store: Arc<dyn MatchStore>,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            roster,
            crushes,
            store,
            config,
            bus: None,
        }
    }

    /// Attach an event bus for observability.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    fn emit(&self, event: MatchEvent) {
        if let Some(bus) = &self.bus {
            bus.emit(event);
        }
    }

    /// The campaign's configuration, falling back to defaults.
    ///
    /// A missing or unreadable configuration is a warning, never a run
    /// failure.
    fn campaign_config(&self, campaign_id: &str) -> CampaignConfig {
        match self.config.campaign_config(campaign_id) {
            Ok(config) => config,
            Err(message) => {
                warn!(
                    campaign_id = %campaign_id,
                    error = %message,
                    "Campaign config unavailable, using defaults"
                );
                CampaignConfig::default()
            }
        }
    }

    /// Score a single pair, including the crush-bonus lookup.
    ///
    /// The preference gate runs first; a gated pair scores 0 without ever
    /// touching the crush lookup, so a lookup failure cannot abort a run on
    /// behalf of a pair that could never be assigned.
    pub fn score_pair(
        &self,
        campaign_id: &str,
        user1: &UserProfile,
        user2: &UserProfile,
        config: &CampaignConfig,
    ) -> Result<MatchScore, GenerationError> {
        if !meets_preferences(user1, user2) {
            return Ok(MatchScore::incompatible());
        }
        let bonus = self
            .crushes
            .crush_bonus(&user1.id, &user2.id, campaign_id)
            .map_err(|message| GenerationError::Provider { message })?;
        Ok(calculate_compatibility(user1, user2, bonus, config))
    }

    /// Run a full match generation for a campaign.
    ///
    /// Clears the campaign's previous matches, then scores and greedily
    /// assigns new ones. Re-running with identical inputs reproduces the
    /// identical assignment set (the run is idempotent in intent, not
    /// incremental).
    ///
    /// Fewer than two eligible users short-circuits with zero matches and
    /// no error; prior matches are left untouched in that case.
    pub fn generate_all_matches(
        &self,
        campaign_id: &str,
    ) -> Result<GenerationSummary, GenerationError> {
        let started = Instant::now();
        let config = self.campaign_config(campaign_id);

        let mut users = self
            .roster
            .eligible_users(campaign_id)
            .map_err(|message| GenerationError::Provider { message })?;
        let total_users = users.len();
        info!(
            campaign_id = %campaign_id,
            total_users = total_users,
            "Starting match generation"
        );
        self.emit(MatchEvent::generation_started(campaign_id, total_users));

        if total_users < 2 {
            info!(
                campaign_id = %campaign_id,
                total_users = total_users,
                "Not enough eligible users, skipping run"
            );
            let summary = GenerationSummary {
                matches_created: 0,
                total_users,
            };
            self.emit(MatchEvent::generation_completed(
                campaign_id,
                total_users,
                0,
                started.elapsed().as_millis() as u64,
            ));
            return Ok(summary);
        }

        // Canonical ordering: id-sorted roster makes pair iteration (i < j)
        // and the greedy tie-break reproducible across runs.
        users.sort_by(|a, b| a.id.cmp(&b.id));

        self.store
            .clear_matches(campaign_id)
            .map_err(|message| GenerationError::Provider { message })?;
        debug!(campaign_id = %campaign_id, "Cleared existing matches");

        let mut matches_created = 0;
        let mut match_counts: HashMap<String, usize> = HashMap::new();

        for pool in partition_by_preference(users) {
            if matches_created >= MAX_TOTAL_MATCHES {
                warn!(
                    campaign_id = %campaign_id,
                    cap = MAX_TOTAL_MATCHES,
                    "Total match cap reached, skipping remaining pools"
                );
                break;
            }
            debug!(pool_size = pool.len(), "Processing preference pool");

            let mut scored: Vec<ScoredPair> = Vec::new();
            for i in 0..pool.len() {
                for j in (i + 1)..pool.len() {
                    let score = self.score_pair(campaign_id, &pool[i], &pool[j], &config)?;
                    scored.push(ScoredPair {
                        user1: i,
                        user2: j,
                        score,
                    });
                }
            }
            let pairs_scored = scored.len();

            // Score descending; ties broken by ascending id pair for
            // reproducible greedy order.
            scored.sort_by(|a, b| {
                b.score
                    .score
                    .partial_cmp(&a.score.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| pool[a.user1].id.cmp(&pool[b.user1].id))
                    .then_with(|| pool[a.user2].id.cmp(&pool[b.user2].id))
            });

            let mut pool_assigned = 0;
            for pair in scored {
                if matches_created >= MAX_TOTAL_MATCHES {
                    break;
                }
                let user1 = &pool[pair.user1];
                let user2 = &pool[pair.user2];

                let count1 = *match_counts.get(&user1.id).unwrap_or(&0);
                let count2 = *match_counts.get(&user2.id).unwrap_or(&0);
                if count1 >= config.matches_per_user || count2 >= config.matches_per_user {
                    continue;
                }
                if pair.score.score < config.minimum_threshold && !pair.score.is_mutual_crush {
                    continue;
                }

                let record = MatchRecord {
                    campaign_id: campaign_id.to_string(),
                    user1_id: user1.id.clone(),
                    user2_id: user2.id.clone(),
                    compatibility_score: pair.score.score,
                    match_tier: MatchTier::for_score(pair.score.score),
                    breakdown: pair.score.breakdown,
                    rank_for_user1: count1 + 1,
                    rank_for_user2: count2 + 1,
                    is_mutual_crush: pair.score.is_mutual_crush,
                };

                // A failed write skips this pair only; thousands of
                // independent assignments should survive one bad row.
                if let Err(message) = self.store.create_match(&record) {
                    warn!(
                        user1 = %record.user1_id,
                        user2 = %record.user2_id,
                        error = %message,
                        "Failed to persist match, skipping pair"
                    );
                    self.emit(MatchEvent::match_skipped(
                        campaign_id,
                        &record.user1_id,
                        &record.user2_id,
                        &message,
                    ));
                    continue;
                }

                matches_created += 1;
                pool_assigned += 1;
                match_counts.insert(user1.id.clone(), count1 + 1);
                match_counts.insert(user2.id.clone(), count2 + 1);

                debug!(
                    user1 = %record.user1_id,
                    user2 = %record.user2_id,
                    score = record.compatibility_score,
                    tier = %record.match_tier,
                    "Created match"
                );
                self.emit(MatchEvent::match_assigned(&record));
            }

            self.emit(MatchEvent::pool_processed(
                campaign_id,
                pool.len(),
                pairs_scored,
                pool_assigned,
            ));
        }

        self.store
            .update_campaign_stats(
                campaign_id,
                &CampaignStats {
                    total_participants: total_users,
                    total_matches_generated: matches_created,
                },
            )
            .map_err(|message| GenerationError::Provider { message })?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            campaign_id = %campaign_id,
            matches_created = matches_created,
            total_users = total_users,
            elapsed_ms = elapsed_ms,
            "Match generation complete"
        );
        self.emit(MatchEvent::generation_completed(
            campaign_id,
            total_users,
            matches_created,
            elapsed_ms,
        ));

        Ok(GenerationSummary {
            matches_created,
            total_users,
        })
    }
}
