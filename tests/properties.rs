//! Property-based tests for the CUPID engine
//!
//! These tests validate scoring invariants using proptest.

use cupid::core::{
    calculate_compatibility, gaussian_similarity, inverse_distance, jaccard_similarity,
    CampaignConfig, MatchEngine, QuestionType, SurveyQuestion, SurveyResponse, UserProfile,
    MUTUAL_CRUSH_BONUS, NO_CRUSH_BONUS, ONE_WAY_CRUSH_BONUS,
};
use cupid::providers::{InMemoryCrushes, InMemoryRoster, InMemoryStore, StaticConfig};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn scale_response(question_id: &str, category: &str, value: f64) -> SurveyResponse {
    SurveyResponse {
        question_id: question_id.to_string(),
        answer_value: Some(value),
        answer_text: None,
        answer_type: QuestionType::Scale,
        question: SurveyQuestion {
            id: question_id.to_string(),
            category: category.to_string(),
            question_type: QuestionType::Scale,
            weight: 1.0,
            order_index: 0,
        },
    }
}

const CATEGORIES: [&str; 5] = ["demographics", "personality", "core_values", "lifestyle", "fun"];

type UserData = (Vec<(usize, f64)>, &'static str, &'static str, Option<i32>);

/// Strategy: the raw ingredients of one user profile — a random subset of
/// answers on a shared question bank, gender, preference, year level
fn arb_user_data() -> impl Strategy<Value = UserData> {
    (
        proptest::collection::vec((0usize..10, 1.0f64..10.0), 0..8),
        prop_oneof![Just("male"), Just("female"), Just("nonbinary")],
        prop_oneof![Just("any"), Just("male"), Just("female"), Just("male,female")],
        proptest::option::of(0i32..6),
    )
}

fn build_user(id: usize, (answers, gender, seeking, year_level): UserData) -> UserProfile {
    let mut responses = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (question_index, value) in answers {
        if !seen.insert(question_index) {
            continue;
        }
        responses.push(scale_response(
            &format!("q{}", question_index),
            CATEGORIES[question_index % CATEGORIES.len()],
            value,
        ));
    }
    UserProfile {
        id: format!("u{:03}", id),
        gender: Some(gender.to_string()),
        seeking_gender: Some(seeking.to_string()),
        program: None,
        year_level,
        responses,
    }
}

fn arb_user(id: usize) -> impl Strategy<Value = UserProfile> {
    arb_user_data().prop_map(move |data| build_user(id, data))
}

fn arb_roster(max: usize) -> impl Strategy<Value = Vec<UserProfile>> {
    proptest::collection::vec(arb_user_data(), 2..=max).prop_map(|all| {
        all.into_iter()
            .enumerate()
            .map(|(id, data)| build_user(id, data))
            .collect()
    })
}

fn run_generation(
    users: Vec<UserProfile>,
    config: CampaignConfig,
) -> (cupid::core::GenerationSummary, Vec<cupid::core::MatchRecord>) {
    let store = Arc::new(InMemoryStore::new());
    let engine = MatchEngine::new(
        Arc::new(InMemoryRoster::with_campaign("c1", users)),
        Arc::new(InMemoryCrushes::new()),
        Arc::clone(&store) as Arc<dyn cupid::providers::MatchStore>,
        Arc::new(StaticConfig::new(config)),
    );
    let summary = engine.generate_all_matches("c1").unwrap();
    (summary, store.matches_for("c1"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: over the survey's 0-10 answer domain, gaussian similarity
    /// stays in (0, 1] and peaks at equality. Gaps far beyond the answer
    /// domain underflow f64 to exactly 0, so the strict lower bound only
    /// holds on the domain.
    #[test]
    fn prop_gaussian_bounds(v1 in 0.0f64..=10.0, v2 in 0.0f64..=10.0) {
        let similarity = gaussian_similarity(v1, v2, 1.5);
        prop_assert!(similarity > 0.0 && similarity <= 1.0);
        prop_assert!(similarity <= gaussian_similarity(v1, v1, 1.5));
    }

    /// Property: gaussian similarity strictly decreases as the gap grows
    #[test]
    fn prop_gaussian_monotonic_in_distance(
        base in -50.0f64..50.0,
        gap in 0.1f64..20.0,
        extra in 0.1f64..20.0
    ) {
        let near = gaussian_similarity(base, base + gap, 1.5);
        let far = gaussian_similarity(base, base + gap + extra, 1.5);
        prop_assert!(far < near);
    }

    /// Property: inverse distance is clamped to [0, 1]
    #[test]
    fn prop_inverse_distance_clamped(v1 in -1000.0f64..1000.0, v2 in -1000.0f64..1000.0) {
        let similarity = inverse_distance(Some(v1), Some(v2), 10.0);
        prop_assert!((0.0..=1.0).contains(&similarity));
    }

    /// Property: jaccard similarity is symmetric and bounded
    #[test]
    fn prop_jaccard_symmetric_and_bounded(
        a in proptest::collection::vec("[a-e]{1,2}", 0..6),
        b in proptest::collection::vec("[a-e]{1,2}", 0..6)
    ) {
        let ab = jaccard_similarity(&a, &b);
        let ba = jaccard_similarity(&b, &a);
        prop_assert_eq!(ab, ba);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    /// Property: pairwise compatibility is symmetric in its arguments
    #[test]
    fn prop_compatibility_symmetric(
        a in arb_user(1),
        b in arb_user(2),
        bonus in prop_oneof![Just(NO_CRUSH_BONUS), Just(ONE_WAY_CRUSH_BONUS), Just(MUTUAL_CRUSH_BONUS)]
    ) {
        let config = CampaignConfig::default();
        let ab = calculate_compatibility(&a, &b, bonus, &config);
        let ba = calculate_compatibility(&b, &a, bonus, &config);
        prop_assert_eq!(ab, ba);
    }

    /// Property: the final score never leaves [0, 100], bonuses included
    #[test]
    fn prop_score_within_bounds(
        a in arb_user(1),
        b in arb_user(2),
        bonus in prop_oneof![Just(NO_CRUSH_BONUS), Just(ONE_WAY_CRUSH_BONUS), Just(MUTUAL_CRUSH_BONUS)]
    ) {
        let score = calculate_compatibility(&a, &b, bonus, &CampaignConfig::default());
        prop_assert!((0.0..=100.0).contains(&score.score));
        for value in [
            score.breakdown.demographics,
            score.breakdown.personality,
            score.breakdown.values,
            score.breakdown.lifestyle,
            score.breakdown.interests,
        ] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    /// Property: a non-gated pair never scores exactly 0
    ///
    /// Score 0 is reserved for preference mismatches; dissimilar pairs
    /// settle near the neutral 50 instead.
    #[test]
    fn prop_zero_reserved_for_gate(a in arb_user(1), b in arb_user(2)) {
        let score = calculate_compatibility(&a, &b, NO_CRUSH_BONUS, &CampaignConfig::default());
        if cupid::core::meets_preferences(&a, &b) {
            prop_assert!(score.score > 0.0);
        } else {
            prop_assert_eq!(score.score, 0.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: no user exceeds the per-user match cap
    #[test]
    fn prop_assignment_respects_cap(users in arb_roster(12), cap in 1usize..4) {
        let (_, matches) = run_generation(
            users,
            CampaignConfig::default().with_matches_per_user(cap),
        );
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &matches {
            *counts.entry(record.user1_id.as_str()).or_insert(0) += 1;
            *counts.entry(record.user2_id.as_str()).or_insert(0) += 1;
        }
        for (user_id, count) in counts {
            prop_assert!(count <= cap, "user {} assigned {} > cap {}", user_id, count, cap);
        }
    }

    /// Property: the engine never pairs a user with themselves, never
    /// repeats a pair, and orders ids within a record
    #[test]
    fn prop_no_self_match_no_duplicates(users in arb_roster(12)) {
        let (_, matches) = run_generation(users, CampaignConfig::default());
        let mut seen = std::collections::HashSet::new();
        for record in &matches {
            prop_assert!(record.user1_id != record.user2_id);
            prop_assert!(record.user1_id < record.user2_id);
            prop_assert!(seen.insert((record.user1_id.clone(), record.user2_id.clone())));
        }
    }

    /// Property: every assigned match meets the minimum threshold (mutual
    /// crushes aside, and none exist in this roster)
    #[test]
    fn prop_assigned_scores_meet_threshold(users in arb_roster(10)) {
        let (_, matches) = run_generation(users, CampaignConfig::default());
        for record in &matches {
            prop_assert!(record.compatibility_score >= 50.0);
        }
    }

    /// Property: identical input reproduces the identical assignment set
    #[test]
    fn prop_idempotent_rerun(users in arb_roster(10)) {
        let (summary1, matches1) = run_generation(users.clone(), CampaignConfig::default());
        let (summary2, matches2) = run_generation(users, CampaignConfig::default());
        prop_assert_eq!(summary1, summary2);
        prop_assert_eq!(matches1, matches2);
    }
}
