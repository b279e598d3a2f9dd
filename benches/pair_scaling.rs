//! Pair-Scaling Benchmark for the CUPID Engine
//!
//! Validates that full-run cost scales with the O(n²) in-pool pair space by
//! generating matches over synthetic rosters of increasing size.
//!
//! # Usage
//!
//! ```bash
//! cargo bench --bench pair_scaling
//! ```

use cupid::core::{
    CampaignConfig, MatchEngine, QuestionType, SurveyQuestion, SurveyResponse, UserProfile,
};
use cupid::providers::{InMemoryCrushes, InMemoryRoster, InMemoryStore, MatchStore, StaticConfig};
use std::sync::Arc;
use std::time::Instant;

const CATEGORIES: [&str; 5] = [
    "demographics",
    "personality",
    "core_values",
    "lifestyle",
    "fun",
];

/// Build a synthetic roster with deterministic pseudo-random answers
fn synthetic_roster(size: usize, questions_per_user: usize) -> Vec<UserProfile> {
    (0..size)
        .map(|i| {
            let responses = (0..questions_per_user)
                .map(|q| {
                    // Cheap LCG keeps the roster reproducible without a rand dep
                    let value = ((i * 31 + q * 17) % 10) as f64 + 1.0;
                    SurveyResponse {
                        question_id: format!("q{}", q),
                        answer_value: Some(value),
                        answer_text: None,
                        answer_type: QuestionType::Scale,
                        question: SurveyQuestion {
                            id: format!("q{}", q),
                            category: CATEGORIES[q % CATEGORIES.len()].to_string(),
                            question_type: QuestionType::Scale,
                            weight: 1.0,
                            order_index: q as u32,
                        },
                    }
                })
                .collect();
            UserProfile {
                id: format!("u{:05}", i),
                gender: Some(if i % 2 == 0 { "male" } else { "female" }.to_string()),
                seeking_gender: Some("any".to_string()),
                program: None,
                year_level: Some((i % 5) as i32 + 1),
                responses,
            }
        })
        .collect()
}

struct BenchmarkResult {
    users: usize,
    pairs: usize,
    matches_created: usize,
    elapsed_ms: u128,
}

fn run_generation(size: usize) -> BenchmarkResult {
    let users = synthetic_roster(size, 15);
    let store = Arc::new(InMemoryStore::new());
    let engine = MatchEngine::new(
        Arc::new(InMemoryRoster::with_campaign("bench", users)),
        Arc::new(InMemoryCrushes::new()),
        Arc::clone(&store) as Arc<dyn MatchStore>,
        Arc::new(StaticConfig::new(CampaignConfig::default())),
    );

    let start = Instant::now();
    let summary = engine.generate_all_matches("bench").unwrap();
    let elapsed_ms = start.elapsed().as_millis();

    BenchmarkResult {
        users: size,
        pairs: size * (size - 1) / 2,
        matches_created: summary.matches_created,
        elapsed_ms,
    }
}

fn main() {
    let sizes = [50, 100, 200, 400, 800];
    println!("=== CUPID Pair-Scaling Benchmark ===\n");
    println!(
        "{:>8} {:>10} {:>10} {:>12}",
        "users", "pairs", "matches", "elapsed_ms"
    );

    let mut results = Vec::new();
    for size in sizes {
        let result = run_generation(size);
        println!(
            "{:>8} {:>10} {:>10} {:>12}",
            result.users, result.pairs, result.matches_created, result.elapsed_ms
        );
        results.push(result);
    }

    let json_results: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "users": r.users,
                "pairs": r.pairs,
                "matches_created": r.matches_created,
                "elapsed_ms": r.elapsed_ms,
            })
        })
        .collect();

    let output = serde_json::json!({
        "model": "O(n^2) per pool",
        "results": json_results,
    });

    println!("\n=== JSON Output ===\n");
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
