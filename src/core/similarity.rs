//! Similarity Primitives for the CUPID Engine
//!
//! Pure, stateless comparison functions over a single pair of answered
//! values, each returning a similarity in [0.0, 1.0]:
//!
//! - `gaussian_similarity`: smooth decay with distance, for answers where
//!   closeness matters more than exact equality
//! - `inverse_distance`: linear decay with distance, for lifestyle scales
//! - `exact_match`: binary equality, for multiple-choice answers
//! - `jaccard_similarity`: set overlap, for multi-select answers
//!
//! `response_similarity` dispatches a pair of survey responses to the right
//! primitive based on answer type and category.
//!
//! # Neutral Fallback
//!
//! Missing or malformed answer data never produces an error here. Every
//! undefined comparison resolves to `NEUTRAL_SIMILARITY` (0.5) so sparse
//! data neither rewards nor penalizes a pair.

use crate::core::grouping::Category;
use crate::core::survey::{QuestionType, SurveyResponse};
use std::collections::HashSet;

/// Similarity assigned when a comparison is undefined (missing answers,
/// unsupported answer types)
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Default tolerance for `gaussian_similarity`
pub const DEFAULT_GAUSSIAN_TOLERANCE: f64 = 1.5;

/// Default maximum distance for `inverse_distance`
pub const DEFAULT_DISTANCE_MAX: f64 = 10.0;

/// Gaussian similarity between two numeric answers.
///
/// Computes `exp(-(v1 - v2)² / (2 · tolerance²))`. Symmetric, equals 1.0
/// when the values coincide, decays smoothly with distance, and never
/// reaches 0. `tolerance` must be positive.
///
/// # Examples
///
/// ```
/// use cupid::core::similarity::gaussian_similarity;
///
/// assert_eq!(gaussian_similarity(5.0, 5.0, 1.5), 1.0);
/// assert!(gaussian_similarity(1.0, 9.0, 1.5) < 0.01);
/// ```
pub fn gaussian_similarity(v1: f64, v2: f64, tolerance: f64) -> f64 {
    let diff = (v1 - v2).abs();
    (-(diff * diff) / (2.0 * tolerance * tolerance)).exp()
}

/// Inverse-distance similarity between two optional numeric answers.
///
/// Computes `1 - |v1 - v2| / max`, clamped to [0.0, 1.0]. Gaps larger than
/// `max` therefore score 0 rather than going negative. Returns
/// `NEUTRAL_SIMILARITY` when either value is missing.
pub fn inverse_distance(v1: Option<f64>, v2: Option<f64>, max: f64) -> f64 {
    let (Some(a), Some(b)) = (v1, v2) else {
        return NEUTRAL_SIMILARITY;
    };
    (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
}

/// Exact-match similarity between two text answers.
///
/// Returns 1.0 if the strings are equal (two empty strings are equal),
/// otherwise 0.0.
pub fn exact_match(a: &str, b: &str) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// Jaccard similarity between two tag sets: `|intersection| / |union|`.
///
/// Duplicates within an input are ignored. Returns 0.0 when either input
/// is empty.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Compare two responses to the same question within a category.
///
/// Dispatch rules:
/// - scale/ranking in personality or values → `gaussian_similarity` with
///   the default tolerance (closeness matters, smooth decay)
/// - scale/ranking elsewhere → `inverse_distance` with the default maximum
/// - multiple choice → `exact_match` on answer text (missing text compares
///   as the empty string)
/// - everything else → `NEUTRAL_SIMILARITY`
pub fn response_similarity(r1: &SurveyResponse, r2: &SurveyResponse, category: Category) -> f64 {
    match r1.answer_type {
        QuestionType::Scale | QuestionType::Ranking => {
            let (Some(v1), Some(v2)) = (r1.answer_value, r2.answer_value) else {
                return NEUTRAL_SIMILARITY;
            };
            if matches!(category, Category::Personality | Category::Values) {
                gaussian_similarity(v1, v2, DEFAULT_GAUSSIAN_TOLERANCE)
            } else {
                inverse_distance(Some(v1), Some(v2), DEFAULT_DISTANCE_MAX)
            }
        }
        QuestionType::MultipleChoice => exact_match(
            r1.answer_text.as_deref().unwrap_or(""),
            r2.answer_text.as_deref().unwrap_or(""),
        ),
        _ => NEUTRAL_SIMILARITY,
    }
}
