//! Scoring engine: category scores, weighted index, trend, persona and explanations.

mod aggregate;
mod config;
pub mod domain;
mod explanations;
mod persona;
pub mod scoring;
mod trend;

#[cfg(test)]
mod tests;

pub use aggregate::{wellbeing_index, WellbeingIndex};
pub use config::{CategoryWeights, ScoreBands, ScoringConfig};
pub use domain::{
    Category, CategoryScore, DailyRecord, Mood, ScoreBreakdown, ScoreColor, ScoreLevel,
};
pub use explanations::{explain, main_factor, Explanations};
pub use persona::{classify, detect_persona, PersonaKind, PersonaResult};
pub use trend::{detect_trend, Trend, TrendDirection};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stateless engine; the only state is the immutable scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: ScoringConfig,
}

impl RiskEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Derives a full assessment from today's record and an immutable history snapshot
    /// (oldest first, not including `record`).
    pub fn assess(
        &self,
        record: &DailyRecord,
        history: &[DailyRecord],
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let bands = &self.config.bands;
        let mental_health = scoring::mental_health(record, history, bands);
        let lifestyle = scoring::lifestyle(record, history, bands);
        let digital_wellbeing = scoring::digital_wellbeing(record, history, bands);
        let physical_health = scoring::physical_health(record, history, bands);

        let breakdown = ScoreBreakdown {
            mental_health: mental_health.score,
            lifestyle: lifestyle.score,
            digital_wellbeing: digital_wellbeing.score,
            physical_health: physical_health.score,
        };

        RiskAssessment {
            wellbeing_index: wellbeing_index(breakdown, &self.config.weights, bands),
            trend: detect_trend(history),
            persona: detect_persona(record),
            explanations: explain(&breakdown),
            mental_health,
            lifestyle,
            digital_wellbeing,
            physical_health,
            timestamp: now,
        }
    }
}

/// Derived snapshot of one evaluation; recomputed on every check-in, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub mental_health: CategoryScore,
    pub lifestyle: CategoryScore,
    pub digital_wellbeing: CategoryScore,
    pub physical_health: CategoryScore,
    pub wellbeing_index: WellbeingIndex,
    pub trend: Trend,
    pub persona: PersonaResult,
    pub explanations: Explanations,
    pub timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn category(&self, category: Category) -> &CategoryScore {
        match category {
            Category::MentalHealth => &self.mental_health,
            Category::Lifestyle => &self.lifestyle,
            Category::DigitalWellbeing => &self.digital_wellbeing,
            Category::PhysicalHealth => &self.physical_health,
        }
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        self.wellbeing_index.breakdown
    }

    /// Copy of `record` stamped with this assessment's index, ready to append to history.
    pub fn history_entry(&self, record: &DailyRecord) -> DailyRecord {
        DailyRecord {
            wellbeing_index: Some(self.wellbeing_index.score),
            ..record.clone()
        }
    }
}
