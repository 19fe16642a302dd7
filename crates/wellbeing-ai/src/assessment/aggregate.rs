use serde::{Deserialize, Serialize};

use super::config::{CategoryWeights, ScoreBands};
use super::domain::{ScoreBreakdown, ScoreColor, ScoreLevel};

/// Weighted aggregate of the four category scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellbeingIndex {
    pub score: u8,
    pub color: ScoreColor,
    pub level: ScoreLevel,
    pub breakdown: ScoreBreakdown,
}

/// The displayed score is rounded, but the band is taken from the unrounded value so that
/// e.g. 69.6 stays yellow even though it displays as 70.
pub fn wellbeing_index(
    breakdown: ScoreBreakdown,
    weights: &CategoryWeights,
    bands: &ScoreBands,
) -> WellbeingIndex {
    let weighted = weights.weighted(&breakdown);
    let (color, level) = bands.classify(weighted);

    WellbeingIndex {
        score: weighted.round().clamp(0.0, 100.0) as u8,
        color,
        level,
        breakdown,
    }
}
