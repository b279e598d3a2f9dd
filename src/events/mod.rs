//! Event-Driven Observability for the CUPID Engine
//!
//! Structured events for monitoring match generation: run boundaries, pool
//! progress, assignments, and skipped writes.
//!
//! # Architecture
//!
//! Events are emitted via an `EventBus` which uses a broadcast channel.
//! Multiple observers can subscribe to receive all events:
//!
//! ```text
//! Match Engine → EventBus → [LoggingObserver, MetricsObserver, ...]
//! ```

pub mod bus;
pub mod observers;

use crate::core::engine::MatchRecord;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// All events emitted during match generation.
///
/// Events are tagged with their type for JSON serialization and carry
/// millisecond timestamps for latency tracking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// A match-generation run began
    GenerationStarted {
        campaign_id: String,
        /// Eligible users loaded for the run
        total_users: usize,
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// All pairs in one preference pool were scored and greedily assigned
    PoolProcessed {
        campaign_id: String,
        /// Users in the pool
        pool_size: usize,
        /// Unordered pairs scored
        pairs_scored: usize,
        /// Matches assigned from this pool
        matches_assigned: usize,
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// A match was assigned and persisted
    MatchAssigned {
        campaign_id: String,
        user1_id: String,
        user2_id: String,
        /// Final compatibility score
        score: f64,
        /// Tier label derived from the score
        tier: String,
        is_mutual_crush: bool,
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// A pair passed assignment checks but its store write failed
    MatchSkipped {
        campaign_id: String,
        user1_id: String,
        user2_id: String,
        /// Store error message
        reason: String,
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// A match-generation run finished
    GenerationCompleted {
        campaign_id: String,
        total_users: usize,
        matches_created: usize,
        /// Wall-clock duration of the run
        elapsed_ms: u64,
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },
}

impl MatchEvent {
    /// Create a GenerationStarted event
    pub fn generation_started(campaign_id: &str, total_users: usize) -> Self {
        Self::GenerationStarted {
            campaign_id: campaign_id.to_string(),
            total_users,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a PoolProcessed event
    pub fn pool_processed(
        campaign_id: &str,
        pool_size: usize,
        pairs_scored: usize,
        matches_assigned: usize,
    ) -> Self {
        Self::PoolProcessed {
            campaign_id: campaign_id.to_string(),
            pool_size,
            pairs_scored,
            matches_assigned,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a MatchAssigned event from a persisted record
    pub fn match_assigned(record: &MatchRecord) -> Self {
        Self::MatchAssigned {
            campaign_id: record.campaign_id.clone(),
            user1_id: record.user1_id.clone(),
            user2_id: record.user2_id.clone(),
            score: record.compatibility_score,
            tier: record.match_tier.as_str().to_string(),
            is_mutual_crush: record.is_mutual_crush,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a MatchSkipped event
    pub fn match_skipped(campaign_id: &str, user1_id: &str, user2_id: &str, reason: &str) -> Self {
        Self::MatchSkipped {
            campaign_id: campaign_id.to_string(),
            user1_id: user1_id.to_string(),
            user2_id: user2_id.to_string(),
            reason: reason.to_string(),
            timestamp: SystemTime::now(),
        }
    }

    /// Create a GenerationCompleted event
    pub fn generation_completed(
        campaign_id: &str,
        total_users: usize,
        matches_created: usize,
        elapsed_ms: u64,
    ) -> Self {
        Self::GenerationCompleted {
            campaign_id: campaign_id.to_string(),
            total_users,
            matches_created,
            elapsed_ms,
            timestamp: SystemTime::now(),
        }
    }
}

/// Serialize SystemTime as milliseconds since the Unix epoch
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}

// Re-exports
pub use bus::EventBus;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_round_trip() {
        let event = MatchEvent::generation_started("c1", 42);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"GenerationStarted\""));
        let back: MatchEvent = serde_json::from_str(&json).unwrap();
        match back {
            MatchEvent::GenerationStarted {
                campaign_id,
                total_users,
                ..
            } => {
                assert_eq!(campaign_id, "c1");
                assert_eq!(total_users, 42);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_match_skipped_carries_reason() {
        let event = MatchEvent::match_skipped("c1", "a", "b", "row conflict");
        match event {
            MatchEvent::MatchSkipped { reason, .. } => assert_eq!(reason, "row conflict"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
