//! Logging Observer for the CUPID Engine
//!
//! Provides structured logging for all match-generation events using the
//! `tracing` crate. Events are logged at appropriate levels:
//! - INFO: GenerationStarted, GenerationCompleted
//! - WARN: MatchSkipped
//! - DEBUG: PoolProcessed, MatchAssigned (high-volume)

use crate::events::{EventBus, MatchEvent};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Observer that logs match-generation events using tracing
///
/// Maps events to appropriate log levels:
/// - `GenerationStarted/Completed` → INFO (run boundaries)
/// - `MatchSkipped` → WARN (persistence problems)
/// - `PoolProcessed` → DEBUG (progress)
/// - `MatchAssigned` → DEBUG (high-volume)
pub struct LoggingObserver {
    receiver: broadcast::Receiver<MatchEvent>,
}

impl LoggingObserver {
    /// Create a new logging observer subscribed to the event bus
    pub fn new(bus: &EventBus) -> Self {
        Self {
            receiver: bus.subscribe(),
        }
    }

    /// Run the observer, logging events until the channel closes
    ///
    /// This should be spawned as a tokio task:
    /// ```rust,ignore
    /// tokio::spawn(observer.run());
    /// ```
    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => Self::log_event(&event),
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("EventBus closed, logging observer stopping");
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        skipped = count,
                        "Logging observer lagged, skipped {} events", count
                    );
                }
            }
        }
    }

    /// Log a single event at the appropriate level
    pub fn log_event(event: &MatchEvent) {
        match event {
            MatchEvent::GenerationStarted {
                campaign_id,
                total_users,
                ..
            } => {
                info!(
                    campaign_id = %campaign_id,
                    total_users = total_users,
                    "Generation started"
                );
            }

            MatchEvent::PoolProcessed {
                campaign_id,
                pool_size,
                pairs_scored,
                matches_assigned,
                ..
            } => {
                debug!(
                    campaign_id = %campaign_id,
                    pool_size = pool_size,
                    pairs_scored = pairs_scored,
                    matches_assigned = matches_assigned,
                    "Pool processed"
                );
            }

            MatchEvent::MatchAssigned {
                user1_id,
                user2_id,
                score,
                tier,
                is_mutual_crush,
                ..
            } => {
                debug!(
                    user1 = %user1_id,
                    user2 = %user2_id,
                    score = score,
                    tier = %tier,
                    mutual_crush = is_mutual_crush,
                    "Match assigned"
                );
            }

            MatchEvent::MatchSkipped {
                user1_id,
                user2_id,
                reason,
                ..
            } => {
                warn!(
                    user1 = %user1_id,
                    user2 = %user2_id,
                    reason = %reason,
                    "Match skipped"
                );
            }

            MatchEvent::GenerationCompleted {
                campaign_id,
                total_users,
                matches_created,
                elapsed_ms,
                ..
            } => {
                info!(
                    campaign_id = %campaign_id,
                    total_users = total_users,
                    matches_created = matches_created,
                    elapsed_ms = elapsed_ms,
                    "Generation completed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_handles_all_variants() {
        // Smoke test: none of the arms panic
        LoggingObserver::log_event(&MatchEvent::generation_started("c1", 10));
        LoggingObserver::log_event(&MatchEvent::pool_processed("c1", 10, 45, 7));
        LoggingObserver::log_event(&MatchEvent::match_skipped("c1", "a", "b", "row conflict"));
        LoggingObserver::log_event(&MatchEvent::generation_completed("c1", 10, 7, 12));
    }

    #[tokio::test]
    async fn test_observer_subscribes() {
        let bus = EventBus::with_default_capacity();
        let _observer = LoggingObserver::new(&bus);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
