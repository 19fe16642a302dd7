use serde::{Deserialize, Serialize};

use super::domain::{Category, ScoreBreakdown};

const NEEDS_ATTENTION_BELOW: u8 = 60;
const ALL_HEALTHY_FROM: u8 = 70;

/// Plain-language rationale for an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanations {
    pub why_this_changed: Vec<String>,
    pub main_factor: String,
    pub improvement: String,
}

fn rationale(category: Category) -> &'static str {
    match category {
        Category::MentalHealth => "Your stress or academic pressure is elevated",
        Category::Lifestyle => "Your sleep routine needs improvement",
        Category::DigitalWellbeing => "Screen time is higher than recommended",
        Category::PhysicalHealth => "Physical activity could be increased",
    }
}

fn suggestion(category: Category) -> &'static str {
    match category {
        Category::MentalHealth => {
            "Try stress management techniques like meditation or talking to a counselor"
        }
        Category::Lifestyle => "Focus on getting 7-9 hours of sleep each night",
        Category::DigitalWellbeing => "Reduce screen time by setting daily limits",
        Category::PhysicalHealth => "Aim for 30 minutes of physical activity most days",
    }
}

fn needs_attention(breakdown: &ScoreBreakdown) -> impl Iterator<Item = Category> + '_ {
    Category::ALL
        .into_iter()
        .filter(|category| breakdown.score_for(*category) < NEEDS_ATTENTION_BELOW)
}

/// Lowest-scoring category; ties go to the earliest in declaration order.
pub fn main_factor(breakdown: &ScoreBreakdown) -> Option<Category> {
    let mut lowest = Category::MentalHealth;
    for category in Category::ALL.into_iter().skip(1) {
        if breakdown.score_for(category) < breakdown.score_for(lowest) {
            lowest = category;
        }
    }

    if breakdown.score_for(lowest) >= ALL_HEALTHY_FROM {
        None
    } else {
        Some(lowest)
    }
}

pub fn explain(breakdown: &ScoreBreakdown) -> Explanations {
    let mut why_this_changed: Vec<String> = needs_attention(breakdown)
        .map(|category| rationale(category).to_string())
        .collect();
    if why_this_changed.is_empty() {
        why_this_changed.push("You're maintaining healthy habits across all areas!".to_string());
    }

    let main_factor = match main_factor(breakdown) {
        Some(category) => format!("{} needs attention", category.label()),
        None => "All areas are healthy!".to_string(),
    };

    let improvement = needs_attention(breakdown)
        .next()
        .map(suggestion)
        .unwrap_or("Keep maintaining your healthy habits!")
        .to_string();

    Explanations {
        why_this_changed,
        main_factor,
        improvement,
    }
}
