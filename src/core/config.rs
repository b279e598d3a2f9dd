//! Campaign Configuration for the CUPID Engine
//!
//! A single configuration object sourced once per run and threaded
//! explicitly through scoring and assignment, so the category weights have
//! exactly one source of truth.
//!
//! # Defaults
//!
//! The documented defaults (weights 0.10/0.30/0.25/0.20/0.15, seven matches
//! per user, minimum score 50) apply whenever the surrounding system has no
//! campaign-specific configuration or supplies an unreadable one.
//! Configuration problems downgrade to defaults rather than failing a run.

use crate::core::grouping::Category;
use serde::{Deserialize, Serialize};

/// Weights for combining the five canonical category scores.
///
/// By convention the weights sum to 1.0; this is not enforced, so a
/// configuration that deliberately over- or under-weights the total is
/// honored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "defaults::demographics")]
    pub demographics: f64,
    #[serde(default = "defaults::personality")]
    pub personality: f64,
    #[serde(default = "defaults::values")]
    pub values: f64,
    #[serde(default = "defaults::lifestyle")]
    pub lifestyle: f64,
    #[serde(default = "defaults::interests")]
    pub interests: f64,
}

mod defaults {
    pub fn demographics() -> f64 {
        0.10
    }
    pub fn personality() -> f64 {
        0.30
    }
    pub fn values() -> f64 {
        0.25
    }
    pub fn lifestyle() -> f64 {
        0.20
    }
    pub fn interests() -> f64 {
        0.15
    }
    pub fn matches_per_user() -> usize {
        7
    }
    pub fn minimum_threshold() -> f64 {
        50.0
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            demographics: defaults::demographics(),
            personality: defaults::personality(),
            values: defaults::values(),
            lifestyle: defaults::lifestyle(),
            interests: defaults::interests(),
        }
    }
}

impl CategoryWeights {
    /// The weight for one canonical category.
    pub fn weight_for(&self, category: Category) -> f64 {
        match category {
            Category::Demographics => self.demographics,
            Category::Personality => self.personality,
            Category::Values => self.values,
            Category::Lifestyle => self.lifestyle,
            Category::Interests => self.interests,
        }
    }

    /// Sum of all five weights.
    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.weight_for(*c)).sum()
    }
}

/// Per-campaign matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Category weights for the pairwise score
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Maximum number of matches assigned to any one user
    #[serde(default = "defaults::matches_per_user")]
    pub matches_per_user: usize,
    /// Minimum pair score for assignment; mutual crushes bypass this floor
    #[serde(default = "defaults::minimum_threshold")]
    pub minimum_threshold: f64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            matches_per_user: defaults::matches_per_user(),
            minimum_threshold: defaults::minimum_threshold(),
        }
    }
}

impl CampaignConfig {
    /// Config with custom category weights.
    pub fn with_weights(mut self, weights: CategoryWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Config with a custom per-user match cap.
    pub fn with_matches_per_user(mut self, cap: usize) -> Self {
        self.matches_per_user = cap;
        self
    }

    /// Config with a custom minimum-score floor.
    pub fn with_minimum_threshold(mut self, threshold: f64) -> Self {
        self.minimum_threshold = threshold;
        self
    }
}
