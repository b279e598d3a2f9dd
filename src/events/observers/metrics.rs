//! Metrics Observer for the CUPID Engine
//!
//! Tracks Prometheus-compatible metrics for monitoring:
//! - Counters: runs, matches by tier, skipped writes
//! - Gauges: users and pairs seen in the last run, run duration

use crate::events::{EventBus, MatchEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Metrics collected from match-generation events
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Generation runs started
    pub runs_started: u64,
    /// Generation runs completed
    pub runs_completed: u64,
    /// Total matches assigned, by tier label
    pub matches_by_tier: HashMap<String, u64>,
    /// Total matches assigned across all runs
    pub matches_total: u64,
    /// Mutual-crush matches assigned
    pub mutual_crush_matches: u64,
    /// Pairs skipped because their store write failed
    pub skipped_writes: u64,
    /// Pairs scored across all pools
    pub pairs_scored_total: u64,
    /// Users in the most recent run
    pub last_run_users: usize,
    /// Duration of the most recent run in milliseconds
    pub last_run_elapsed_ms: u64,
}

impl Metrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assigned match
    pub fn record_match(&mut self, tier: &str, is_mutual_crush: bool) {
        *self.matches_by_tier.entry(tier.to_string()).or_insert(0) += 1;
        self.matches_total += 1;
        if is_mutual_crush {
            self.mutual_crush_matches += 1;
        }
    }

    /// Average matches created per completed run
    pub fn avg_matches_per_run(&self) -> f64 {
        if self.runs_completed == 0 {
            0.0
        } else {
            self.matches_total as f64 / self.runs_completed as f64
        }
    }

    /// Format metrics as Prometheus text format
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP cupid_runs_started_total Generation runs started\n");
        output.push_str("# TYPE cupid_runs_started_total counter\n");
        output.push_str(&format!("cupid_runs_started_total {}\n", self.runs_started));

        output.push_str("# HELP cupid_runs_completed_total Generation runs completed\n");
        output.push_str("# TYPE cupid_runs_completed_total counter\n");
        output.push_str(&format!(
            "cupid_runs_completed_total {}\n",
            self.runs_completed
        ));

        output.push_str("# HELP cupid_matches_total Matches assigned\n");
        output.push_str("# TYPE cupid_matches_total counter\n");
        for (tier, count) in &self.matches_by_tier {
            output.push_str(&format!(
                "cupid_matches_total{{tier=\"{}\"}} {}\n",
                tier, count
            ));
        }

        output.push_str("# HELP cupid_mutual_crush_matches_total Mutual-crush matches assigned\n");
        output.push_str("# TYPE cupid_mutual_crush_matches_total counter\n");
        output.push_str(&format!(
            "cupid_mutual_crush_matches_total {}\n",
            self.mutual_crush_matches
        ));

        output.push_str("# HELP cupid_skipped_writes_total Match writes that failed\n");
        output.push_str("# TYPE cupid_skipped_writes_total counter\n");
        output.push_str(&format!(
            "cupid_skipped_writes_total {}\n",
            self.skipped_writes
        ));

        output.push_str("# HELP cupid_pairs_scored_total Pairs scored\n");
        output.push_str("# TYPE cupid_pairs_scored_total counter\n");
        output.push_str(&format!(
            "cupid_pairs_scored_total {}\n",
            self.pairs_scored_total
        ));

        output.push_str("# HELP cupid_last_run_users Users in the most recent run\n");
        output.push_str("# TYPE cupid_last_run_users gauge\n");
        output.push_str(&format!("cupid_last_run_users {}\n", self.last_run_users));

        output.push_str("# HELP cupid_last_run_elapsed_ms Duration of the most recent run\n");
        output.push_str("# TYPE cupid_last_run_elapsed_ms gauge\n");
        output.push_str(&format!(
            "cupid_last_run_elapsed_ms {}\n",
            self.last_run_elapsed_ms
        ));

        output
    }

    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut output = String::new();

        output.push_str("=== CUPID Metrics Report ===\n\n");
        output.push_str(&format!(
            "Runs: started={}, completed={}\n",
            self.runs_started, self.runs_completed
        ));

        output.push_str("\nMatches by tier:\n");
        for (tier, count) in &self.matches_by_tier {
            output.push_str(&format!("  {}: {}\n", tier, count));
        }

        output.push_str(&format!(
            "\nTotals: matches={}, mutual_crush={}, skipped_writes={}, pairs_scored={}\n",
            self.matches_total,
            self.mutual_crush_matches,
            self.skipped_writes,
            self.pairs_scored_total
        ));

        output.push_str(&format!(
            "Last run: users={}, elapsed={}ms, avg_matches/run={:.1}\n",
            self.last_run_users,
            self.last_run_elapsed_ms,
            self.avg_matches_per_run()
        ));

        output
    }
}

/// Observer that collects metrics from match-generation events
pub struct MetricsObserver {
    receiver: broadcast::Receiver<MatchEvent>,
    metrics: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer subscribed to the event bus
    pub fn new(bus: &EventBus) -> Self {
        Self {
            receiver: bus.subscribe(),
            metrics: Arc::new(Mutex::new(Metrics::new())),
        }
    }

    /// Get a handle to the metrics for reading
    pub fn metrics(&self) -> Arc<Mutex<Metrics>> {
        Arc::clone(&self.metrics)
    }

    /// Run the observer, collecting metrics until the channel closes
    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => self.process_event(&event),
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    }

    /// Process a single event and update metrics
    fn process_event(&self, event: &MatchEvent) {
        let mut metrics = self.metrics.lock().unwrap();
        match event {
            MatchEvent::GenerationStarted { total_users, .. } => {
                metrics.runs_started += 1;
                metrics.last_run_users = *total_users;
            }
            MatchEvent::PoolProcessed { pairs_scored, .. } => {
                metrics.pairs_scored_total += *pairs_scored as u64;
            }
            MatchEvent::MatchAssigned {
                tier,
                is_mutual_crush,
                ..
            } => {
                metrics.record_match(tier, *is_mutual_crush);
            }
            MatchEvent::MatchSkipped { .. } => {
                metrics.skipped_writes += 1;
            }
            MatchEvent::GenerationCompleted { elapsed_ms, .. } => {
                metrics.runs_completed += 1;
                metrics.last_run_elapsed_ms = *elapsed_ms;
            }
        }
    }
}
