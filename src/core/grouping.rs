//! Category Normalization and Response Grouping
//!
//! Survey sources label questions with free-text categories ("core_values",
//! "fun", "academic", ...). Scoring works over a fixed taxonomy of five
//! canonical categories. This module owns the mapping table and groups a
//! user's flat response list into per-category buckets.
//!
//! # Unmapped Categories
//!
//! A label outside the mapping table is preserved as its own bucket rather
//! than silently dropped. The weighted aggregator only reads the five
//! canonical buckets, so unmapped categories carry no score, but they remain
//! visible to callers that want to audit their survey data.

use crate::core::survey::SurveyResponse;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five canonical compatibility dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Demographics,
    Personality,
    Values,
    Lifestyle,
    Interests,
}

impl Category {
    /// All canonical categories, in breakdown order.
    pub const ALL: [Category; 5] = [
        Category::Demographics,
        Category::Personality,
        Category::Values,
        Category::Lifestyle,
        Category::Interests,
    ];

    /// The canonical lowercase label for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Demographics => "demographics",
            Category::Personality => "personality",
            Category::Values => "values",
            Category::Lifestyle => "lifestyle",
            Category::Interests => "interests",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of normalizing a source category label.
///
/// Tagging the miss case keeps unmapped labels from masquerading as
/// canonical categories anywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedCategory {
    /// The label maps onto one of the five canonical categories
    Canonical(Category),
    /// Unknown label, preserved verbatim (lowercased)
    Unmapped(String),
}

/// Normalize a source category label into the canonical taxonomy.
///
/// Matching is case-insensitive. The table covers the labels the original
/// survey banks use; anything else comes back as `Unmapped`.
pub fn map_category(label: &str) -> MappedCategory {
    match label.trim().to_lowercase().as_str() {
        "demographics" => MappedCategory::Canonical(Category::Demographics),
        "personality" => MappedCategory::Canonical(Category::Personality),
        "values" | "core_values" => MappedCategory::Canonical(Category::Values),
        "lifestyle" => MappedCategory::Canonical(Category::Lifestyle),
        "interests" | "fun" | "academic" => MappedCategory::Canonical(Category::Interests),
        other => MappedCategory::Unmapped(other.to_string()),
    }
}

/// A user's responses grouped by canonical category.
///
/// The five canonical buckets are fixed struct fields; unmapped source
/// categories land in `unmapped`, keyed by their lowercased label.
#[derive(Debug, Default)]
pub struct GroupedResponses<'a> {
    pub demographics: Vec<&'a SurveyResponse>,
    pub personality: Vec<&'a SurveyResponse>,
    pub values: Vec<&'a SurveyResponse>,
    pub lifestyle: Vec<&'a SurveyResponse>,
    pub interests: Vec<&'a SurveyResponse>,
    /// Buckets for source categories outside the canonical taxonomy
    pub unmapped: HashMap<String, Vec<&'a SurveyResponse>>,
}

impl<'a> GroupedResponses<'a> {
    /// The bucket for a canonical category.
    pub fn canonical(&self, category: Category) -> &[&'a SurveyResponse] {
        match category {
            Category::Demographics => &self.demographics,
            Category::Personality => &self.personality,
            Category::Values => &self.values,
            Category::Lifestyle => &self.lifestyle,
            Category::Interests => &self.interests,
        }
    }

    fn canonical_mut(&mut self, category: Category) -> &mut Vec<&'a SurveyResponse> {
        match category {
            Category::Demographics => &mut self.demographics,
            Category::Personality => &mut self.personality,
            Category::Values => &mut self.values,
            Category::Lifestyle => &mut self.lifestyle,
            Category::Interests => &mut self.interests,
        }
    }
}

/// Group a user's responses by their question's (normalized) category.
pub fn group_responses(responses: &[SurveyResponse]) -> GroupedResponses<'_> {
    let mut grouped = GroupedResponses::default();
    for response in responses {
        match map_category(&response.question.category) {
            MappedCategory::Canonical(category) => {
                grouped.canonical_mut(category).push(response);
            }
            MappedCategory::Unmapped(label) => {
                grouped.unmapped.entry(label).or_default().push(response);
            }
        }
    }
    grouped
}
