//! Category Scoring
//!
//! Scores one canonical category for a pair of users: responses are paired
//! by question id, each pair is compared by the similarity dispatch, and the
//! results are combined as a weighted average scaled to 0-100.
//!
//! # Sparsity Rules
//!
//! Absence of data never penalizes a pair:
//! - either side has no responses in the category → neutral 50
//! - a question answered by only one side is skipped, not scored
//! - no questions matched at all → neutral 50

use crate::core::grouping::Category;
use crate::core::similarity::response_similarity;
use crate::core::survey::SurveyResponse;

/// Score assigned to a category with no usable data on one or both sides
pub const NEUTRAL_CATEGORY_SCORE: f64 = 50.0;

/// Weighted-average similarity for one category, in [0, 100].
///
/// For every response of `a`, the matching response of `b` (same question
/// id) is located; unmatched responses are ignored. Each matched pair
/// contributes its similarity weighted by the question's effective weight.
pub fn category_score(
    a: &[&SurveyResponse],
    b: &[&SurveyResponse],
    category: Category,
) -> f64 {
    if a.is_empty() || b.is_empty() {
        return NEUTRAL_CATEGORY_SCORE;
    }

    let mut total_similarity = 0.0;
    let mut weight_sum = 0.0;

    for r1 in a {
        let Some(r2) = b.iter().find(|r| r.question_id == r1.question_id) else {
            continue;
        };
        let weight = r1.question.effective_weight();
        total_similarity += response_similarity(r1, r2, category) * weight;
        weight_sum += weight;
    }

    if weight_sum > 0.0 {
        (total_similarity / weight_sum) * 100.0
    } else {
        NEUTRAL_CATEGORY_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::survey::{QuestionType, SurveyQuestion};

    fn scale_response(question_id: &str, value: f64, weight: f64) -> SurveyResponse {
        SurveyResponse {
            question_id: question_id.to_string(),
            answer_value: Some(value),
            answer_text: None,
            answer_type: QuestionType::Scale,
            question: SurveyQuestion {
                id: question_id.to_string(),
                category: "personality".to_string(),
                question_type: QuestionType::Scale,
                weight,
                order_index: 0,
            },
        }
    }

    fn refs(responses: &[SurveyResponse]) -> Vec<&SurveyResponse> {
        responses.iter().collect()
    }

    #[test]
    fn test_empty_either_side_is_neutral() {
        let a = [scale_response("q1", 5.0, 1.0)];
        let a_refs = refs(&a);
        assert_eq!(
            category_score(&a_refs, &[], Category::Personality),
            NEUTRAL_CATEGORY_SCORE
        );
        assert_eq!(
            category_score(&[], &a_refs, Category::Personality),
            NEUTRAL_CATEGORY_SCORE
        );
    }

    #[test]
    fn test_identical_answers_score_100() {
        let a = [scale_response("q1", 5.0, 1.0), scale_response("q2", 3.0, 1.0)];
        let b = [scale_response("q1", 5.0, 1.0), scale_response("q2", 3.0, 1.0)];
        let score = category_score(&refs(&a), &refs(&b), Category::Personality);
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlapping_questions_is_neutral() {
        let a = [scale_response("q1", 5.0, 1.0)];
        let b = [scale_response("q9", 5.0, 1.0)];
        assert_eq!(
            category_score(&refs(&a), &refs(&b), Category::Personality),
            NEUTRAL_CATEGORY_SCORE
        );
    }

    #[test]
    fn test_asymmetric_extra_answers_ignored() {
        // b answered an extra question a never saw; it must not change the score
        let a = [scale_response("q1", 5.0, 1.0)];
        let b_small = [scale_response("q1", 5.0, 1.0)];
        let b_large = [scale_response("q1", 5.0, 1.0), scale_response("q2", 1.0, 1.0)];
        assert_eq!(
            category_score(&refs(&a), &refs(&b_small), Category::Personality),
            category_score(&refs(&a), &refs(&b_large), Category::Personality)
        );
    }

    #[test]
    fn test_weighted_average_respects_question_weight() {
        // q1 identical (similarity 1.0, weight 3), q2 far apart (weight 1).
        // The heavy identical question should dominate.
        let a = [scale_response("q1", 5.0, 3.0), scale_response("q2", 1.0, 1.0)];
        let b = [scale_response("q1", 5.0, 3.0), scale_response("q2", 9.0, 1.0)];
        let weighted = category_score(&refs(&a), &refs(&b), Category::Personality);

        let a_eq = [scale_response("q1", 5.0, 1.0), scale_response("q2", 1.0, 1.0)];
        let b_eq = [scale_response("q1", 5.0, 1.0), scale_response("q2", 9.0, 1.0)];
        let unweighted = category_score(&refs(&a_eq), &refs(&b_eq), Category::Personality);

        assert!(weighted > unweighted);
    }

    #[test]
    fn test_score_within_bounds() {
        let a = [scale_response("q1", 1.0, 1.0), scale_response("q2", 10.0, 2.0)];
        let b = [scale_response("q1", 10.0, 1.0), scale_response("q2", 1.0, 2.0)];
        let score = category_score(&refs(&a), &refs(&b), Category::Lifestyle);
        assert!((0.0..=100.0).contains(&score));
    }
}
