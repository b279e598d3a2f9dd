//! CUPID - Compatibility Scoring & Match Assignment Engine
//!
//! CUPID scores pairwise compatibility between survey participants and
//! greedily assigns ranked matches for a campaign:
//!
//! - **Similarity primitives**: Gaussian, inverse-distance, exact-match,
//!   and Jaccard comparisons over individual answers
//! - **Category scoring**: weighted-average similarity per compatibility
//!   dimension (demographics, personality, values, lifestyle, interests)
//! - **Gate-first pairwise scoring**: stated gender preferences veto a pair
//!   before any survey content is examined
//! - **Greedy b-matching**: highest-scoring pairs are assigned first under
//!   a per-user match cap and a minimum-score floor
//!
//! # Key Insight
//!
//! Absence of data is never a penalty: unanswered categories score a
//! neutral 50, so the score distribution centers well above zero and a
//! score of exactly 0 always means a preference mismatch.
//!
//! # Quick Start
//!
//! ```rust
//! use cupid::core::{CampaignConfig, MatchEngine, UserProfile};
//! use cupid::providers::{InMemoryCrushes, InMemoryRoster, InMemoryStore, StaticConfig};
//! use std::sync::Arc;
//!
//! let users = vec![
//!     UserProfile {
//!         id: "alice".to_string(),
//!         gender: Some("female".to_string()),
//!         seeking_gender: Some("any".to_string()),
//!         program: None,
//!         year_level: None,
//!         responses: vec![],
//!     },
//!     UserProfile {
//!         id: "blake".to_string(),
//!         gender: Some("male".to_string()),
//!         seeking_gender: Some("any".to_string()),
//!         program: None,
//!         year_level: None,
//!         responses: vec![],
//!     },
//! ];
//!
//! let store = Arc::new(InMemoryStore::new());
//! let engine = MatchEngine::new(
//!     Arc::new(InMemoryRoster::with_campaign("spring-2026", users)),
//!     Arc::new(InMemoryCrushes::new()),
//!     store.clone(),
//!     Arc::new(StaticConfig::new(CampaignConfig::default())),
//! );
//!
//! let summary = engine.generate_all_matches("spring-2026").unwrap();
//! assert_eq!(summary.total_users, 2);
//! assert_eq!(summary.matches_created, store.matches_for("spring-2026").len());
//! ```

pub mod core;
pub mod events;
pub mod providers;

// Re-export commonly used items at crate root
pub use core::{
    calculate_compatibility, CampaignConfig, GenerationSummary, MatchEngine, MatchRecord,
    MatchScore, MatchTier, UserProfile,
};
pub use events::observers::{LoggingObserver, MetricsObserver};
pub use events::{EventBus, MatchEvent};
