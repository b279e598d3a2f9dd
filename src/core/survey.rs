//! Survey Data Model for the CUPID Engine
//!
//! Defines the records the engine consumes from the surrounding system:
//! survey questions, the answers users gave, and the user profiles those
//! answers hang off. Persistence (how these rows are stored and loaded)
//! belongs to the roster provider, not to this module.
//!
//! # Answer Semantics
//!
//! A response carries either a numeric `answer_value` (scale/ranking
//! questions) or a textual `answer_text` (choice questions). A response with
//! neither present is treated as "no answer" and contributes nothing to a
//! pair's similarity.

use serde::{Deserialize, Serialize};

/// The kind of survey question, which determines how answers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Single selection from a fixed option list; compared by exact match
    MultipleChoice,
    /// Numeric scale (e.g. 1-10); compared by numeric closeness
    Scale,
    /// Free text; no similarity defined, scores neutral
    Text,
    /// Numeric rank; compared like a scale answer
    Ranking,
    /// Multiple selections; currently scores neutral (set-overlap
    /// comparison is not wired into the dispatch)
    MultipleSelect,
}

/// A survey question as seen by the scoring engine.
///
/// Questions are immutable once answers reference them within a scoring run.
/// The `category` is the free-text label from the source survey; it is
/// normalized into a canonical category by the grouping module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// Unique question identifier
    pub id: String,
    /// Source category label (e.g. "core_values", "fun", "academic")
    pub category: String,
    /// How answers to this question are compared
    pub question_type: QuestionType,
    /// Scoring weight; caps this question's influence within its category
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Position of the question within the survey
    #[serde(default)]
    pub order_index: u32,
}

fn default_weight() -> f64 {
    1.0
}

impl SurveyQuestion {
    /// The weight used during scoring.
    ///
    /// Non-finite or non-positive weights fall back to 1.0 so a malformed
    /// question can never zero out or invert a category score.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            1.0
        }
    }
}

/// One user's answer to one question within one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// The question this response answers
    pub question_id: String,
    /// Numeric answer for scale/ranking questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_value: Option<f64>,
    /// Text answer for choice questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    /// Mirrors the question's type at answer time
    pub answer_type: QuestionType,
    /// The question record, embedded so scoring needs no further lookups
    pub question: SurveyQuestion,
}

impl SurveyResponse {
    /// Whether this response carries any answer at all.
    pub fn has_answer(&self) -> bool {
        self.answer_value.is_some() || self.answer_text.is_some()
    }
}

/// A user profile as consumed by the scoring engine.
///
/// Eligibility (survey completed, account active, at least one response in
/// the campaign) is enforced by the roster provider; the engine assumes
/// every profile it receives is eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: String,
    /// Self-reported gender, if provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Comma-separated list of acceptable genders; "any" or empty means
    /// no restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeking_gender: Option<String>,
    /// Academic program, used for a small affinity bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Year of study, used for a small affinity bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_level: Option<i32>,
    /// This user's survey responses for the campaign being scored
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
}

impl UserProfile {
    /// Whether this user has no gender restriction on who they match with.
    pub fn seeks_any(&self) -> bool {
        match self.seeking_gender.as_deref().map(str::trim) {
            None => true,
            Some(s) => s.is_empty() || s.eq_ignore_ascii_case("any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(weight: f64) -> SurveyQuestion {
        SurveyQuestion {
            id: "q1".to_string(),
            category: "personality".to_string(),
            question_type: QuestionType::Scale,
            weight,
            order_index: 0,
        }
    }

    #[test]
    fn test_effective_weight_passes_through_positive() {
        assert_eq!(question(2.5).effective_weight(), 2.5);
    }

    #[test]
    fn test_effective_weight_defaults_on_zero() {
        assert_eq!(question(0.0).effective_weight(), 1.0);
    }

    #[test]
    fn test_effective_weight_defaults_on_negative() {
        assert_eq!(question(-3.0).effective_weight(), 1.0);
    }

    #[test]
    fn test_effective_weight_defaults_on_nan() {
        assert_eq!(question(f64::NAN).effective_weight(), 1.0);
    }

    #[test]
    fn test_has_answer() {
        let mut r = SurveyResponse {
            question_id: "q1".to_string(),
            answer_value: None,
            answer_text: None,
            answer_type: QuestionType::Scale,
            question: question(1.0),
        };
        assert!(!r.has_answer());
        r.answer_value = Some(5.0);
        assert!(r.has_answer());
        r.answer_value = None;
        r.answer_text = Some("blue".to_string());
        assert!(r.has_answer());
    }

    #[test]
    fn test_seeks_any_variants() {
        let mut user = UserProfile {
            id: "u1".to_string(),
            gender: Some("Male".to_string()),
            seeking_gender: None,
            program: None,
            year_level: None,
            responses: vec![],
        };
        assert!(user.seeks_any());
        user.seeking_gender = Some("any".to_string());
        assert!(user.seeks_any());
        user.seeking_gender = Some("Any".to_string());
        assert!(user.seeks_any());
        user.seeking_gender = Some("  ".to_string());
        assert!(user.seeks_any());
        user.seeking_gender = Some("female".to_string());
        assert!(!user.seeks_any());
    }

    #[test]
    fn test_question_weight_default_on_deserialize() {
        let q: SurveyQuestion =
            serde_json::from_str(r#"{"id":"q1","category":"fun","question_type":"scale"}"#)
                .unwrap();
        assert_eq!(q.weight, 1.0);
        assert_eq!(q.order_index, 0);
    }
}
