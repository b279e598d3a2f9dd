//! Core CUPID algorithms
//!
//! This module contains the scoring and assignment pipeline:
//! - `similarity`: pure comparison primitives and per-response dispatch
//! - `survey`: survey questions, responses, and user profiles
//! - `grouping`: category normalization and response grouping
//! - `category`: weighted-average category scoring
//! - `config`: campaign configuration with documented defaults
//! - `compatibility`: pairwise compatibility calculation
//! - `pools`: preference pool partitioning
//! - `engine`: greedy match assignment over the full roster

pub mod category;
pub mod compatibility;
pub mod config;
pub mod engine;
pub mod grouping;
pub mod pools;
pub mod similarity;
pub mod survey;

pub use category::{category_score, NEUTRAL_CATEGORY_SCORE};
pub use compatibility::{
    calculate_compatibility, meets_preferences, CategoryBreakdown, MatchScore,
    MUTUAL_CRUSH_BONUS, NO_CRUSH_BONUS, ONE_WAY_CRUSH_BONUS,
};
pub use config::{CampaignConfig, CategoryWeights};
pub use engine::{
    GenerationError, GenerationSummary, MatchEngine, MatchRecord, MatchTier, MAX_TOTAL_MATCHES,
};
pub use grouping::{group_responses, map_category, Category, GroupedResponses, MappedCategory};
pub use pools::{partition_by_preference, pool_key, ANY_POOL_KEY};
pub use similarity::{
    exact_match, gaussian_similarity, inverse_distance, jaccard_similarity, response_similarity,
    DEFAULT_DISTANCE_MAX, DEFAULT_GAUSSIAN_TOLERANCE, NEUTRAL_SIMILARITY,
};
pub use survey::{QuestionType, SurveyQuestion, SurveyResponse, UserProfile};
