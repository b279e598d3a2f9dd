//! Pairwise Compatibility Calculation
//!
//! Combines category scores, campaign weights, crush bonuses, and small
//! affinity bonuses into a single 0-100 compatibility score with a
//! per-category breakdown.
//!
//! # Gate First
//!
//! Stated gender preferences are a hard veto checked before any survey
//! content is examined. A gated pair scores exactly 0 with an all-zero
//! breakdown; no other code path can produce 0, so a zero score always
//! means "preference mismatch", never "merely dissimilar". Dissimilar but
//! compatible pairs settle around the neutral 50, which is what the
//! assignment threshold is calibrated against.
//!
//! # Symmetry
//!
//! `calculate_compatibility(a, b, ...)` equals
//! `calculate_compatibility(b, a, ...)` for both score and breakdown,
//! provided the crush bonus supplied by the caller is itself symmetric.

use crate::core::category::category_score;
use crate::core::config::CampaignConfig;
use crate::core::grouping::{group_responses, Category};
use crate::core::survey::UserProfile;
use serde::{Deserialize, Serialize};

/// Multiplicative score factor for a mutual crush
pub const MUTUAL_CRUSH_BONUS: f64 = 1.20;

/// Multiplicative score factor for a one-way crush
pub const ONE_WAY_CRUSH_BONUS: f64 = 1.10;

/// Factor meaning no crush relationship exists
pub const NO_CRUSH_BONUS: f64 = 1.0;

/// Per-category scores (each 0-100, rounded to whole numbers).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub demographics: f64,
    pub personality: f64,
    pub values: f64,
    pub lifestyle: f64,
    pub interests: f64,
}

impl CategoryBreakdown {
    /// The breakdown value for one canonical category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Demographics => self.demographics,
            Category::Personality => self.personality,
            Category::Values => self.values,
            Category::Lifestyle => self.lifestyle,
            Category::Interests => self.interests,
        }
    }

    fn set(&mut self, category: Category, value: f64) {
        match category {
            Category::Demographics => self.demographics = value,
            Category::Personality => self.personality = value,
            Category::Values => self.values = value,
            Category::Lifestyle => self.lifestyle = value,
            Category::Interests => self.interests = value,
        }
    }
}

/// The computed compatibility of one pair, produced fresh per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Final compatibility score, 0-100, rounded to two decimals
    pub score: f64,
    /// Per-category scores before weighting
    pub breakdown: CategoryBreakdown,
    /// Both users listed each other as a crush
    pub is_mutual_crush: bool,
    /// At least one user listed the other as a crush
    pub has_crush: bool,
}

impl MatchScore {
    /// The score returned for a preference-gated pair.
    pub fn incompatible() -> Self {
        Self {
            score: 0.0,
            breakdown: CategoryBreakdown::default(),
            is_mutual_crush: false,
            has_crush: false,
        }
    }
}

/// Whether `other`'s gender satisfies `seeker`'s stated preference.
///
/// An absent, empty, or "any" preference accepts everyone. A specific
/// preference is a case-insensitive comma-separated list; a user with no
/// stated gender fails every specific preference.
fn accepts(seeker: &UserProfile, other: &UserProfile) -> bool {
    if seeker.seeks_any() {
        return true;
    }
    let Some(seeking) = seeker.seeking_gender.as_deref() else {
        return true;
    };
    let Some(gender) = other.gender.as_deref() else {
        return false;
    };
    let gender = gender.trim().to_lowercase();
    if gender.is_empty() {
        return false;
    }
    seeking
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .any(|preference| preference == gender)
}

/// Whether two users pass each other's gender-preference gate.
pub fn meets_preferences(user1: &UserProfile, user2: &UserProfile) -> bool {
    accepts(user1, user2) && accepts(user2, user1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the compatibility score for one pair of users.
///
/// `crush_bonus` is the multiplicative factor from the crush lookup (1.0,
/// 1.10, or 1.20); the caller is responsible for querying it symmetrically.
///
/// Steps:
/// 1. preference gate (hard veto, returns exactly 0)
/// 2. group responses and score the five canonical categories
/// 3. weighted sum with the campaign's category weights
/// 4. multiplicative crush bonus
/// 5. affinity bonuses: +2 same program, +1 year levels within one
/// 6. cap at 100, round score to two decimals and breakdown to integers
pub fn calculate_compatibility(
    user1: &UserProfile,
    user2: &UserProfile,
    crush_bonus: f64,
    config: &CampaignConfig,
) -> MatchScore {
    if !meets_preferences(user1, user2) {
        return MatchScore::incompatible();
    }

    let grouped1 = group_responses(&user1.responses);
    let grouped2 = group_responses(&user2.responses);

    let mut breakdown = CategoryBreakdown::default();
    let mut score = 0.0;
    for category in Category::ALL {
        let raw = category_score(
            grouped1.canonical(category),
            grouped2.canonical(category),
            category,
        );
        score += raw * config.weights.weight_for(category);
        breakdown.set(category, raw.round());
    }

    let mut is_mutual_crush = false;
    let mut has_crush = false;
    if crush_bonus > NO_CRUSH_BONUS {
        score *= crush_bonus;
        is_mutual_crush = crush_bonus >= MUTUAL_CRUSH_BONUS;
        has_crush = true;
    }

    match (user1.program.as_deref(), user2.program.as_deref()) {
        (Some(p1), Some(p2)) if !p1.is_empty() && p1 == p2 => score += 2.0,
        _ => {}
    }
    if let (Some(y1), Some(y2)) = (user1.year_level, user2.year_level) {
        if (y1 - y2).abs() <= 1 {
            score += 1.0;
        }
    }

    MatchScore {
        score: round2(score.min(100.0)),
        breakdown,
        is_mutual_crush,
        has_crush,
    }
}
