use serde::{Deserialize, Serialize};

use super::domain::{Category, CategoryScore, ScoreBreakdown, ScoreColor, ScoreLevel};

/// Convex weights combining the four category scores into the wellbeing index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub mental_health: f64,
    pub lifestyle: f64,
    pub digital_wellbeing: f64,
    pub physical_health: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            mental_health: 0.35,
            lifestyle: 0.25,
            digital_wellbeing: 0.20,
            physical_health: 0.20,
        }
    }
}

impl CategoryWeights {
    pub fn weight_for(&self, category: Category) -> f64 {
        match category {
            Category::MentalHealth => self.mental_health,
            Category::Lifestyle => self.lifestyle,
            Category::DigitalWellbeing => self.digital_wellbeing,
            Category::PhysicalHealth => self.physical_health,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|category| self.weight_for(*category))
            .sum()
    }

    /// Unrounded weighted sum of the category scores.
    pub fn weighted(&self, breakdown: &ScoreBreakdown) -> f64 {
        Category::ALL
            .iter()
            .map(|category| f64::from(breakdown.score_for(*category)) * self.weight_for(*category))
            .sum()
    }
}

/// Cut-offs shared by every category score and the aggregate index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBands {
    pub healthy_from: f64,
    pub caution_from: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            healthy_from: 70.0,
            caution_from: 40.0,
        }
    }
}

impl ScoreBands {
    pub fn classify(&self, score: f64) -> (ScoreColor, ScoreLevel) {
        if score >= self.healthy_from {
            (ScoreColor::Green, ScoreLevel::Healthy)
        } else if score >= self.caution_from {
            (ScoreColor::Yellow, ScoreLevel::Caution)
        } else {
            (ScoreColor::Red, ScoreLevel::NeedsAttention)
        }
    }

    /// Clamps a raw deduction total into `[0, 100]` and classifies the clamped value.
    pub(crate) fn category_score(&self, raw: i32, factors: Vec<String>) -> CategoryScore {
        let score = raw.clamp(0, 100) as u8;
        let (color, level) = self.classify(f64::from(score));

        CategoryScore {
            score,
            color,
            level,
            factors,
        }
    }
}

/// Immutable tuning handed to [`super::RiskEngine`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    pub bands: ScoreBands,
}
