use serde::{Deserialize, Serialize};

use super::domain::DailyRecord;

const WINDOW: usize = 3;
const SIGNIFICANT_CHANGE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
}

impl TrendDirection {
    pub const fn indicator(self) -> char {
        match self {
            TrendDirection::Improving => '↑',
            TrendDirection::Worsening => '↓',
            TrendDirection::Stable => '→',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change: i32,
    pub indicator: char,
}

impl Trend {
    fn new(direction: TrendDirection, change: i32) -> Self {
        Self {
            direction,
            change,
            indicator: direction.indicator(),
        }
    }

    pub fn stable() -> Self {
        Self::new(TrendDirection::Stable, 0)
    }
}

/// Cheap wellness proxy used only for trend comparison; deliberately not the weighted index.
pub(crate) fn wellness_proxy(entry: &DailyRecord) -> f64 {
    100.0 - 5.0 * f64::from(entry.stress()) - 5.0 * (8.0 - entry.sleep())
        - 3.0 * (entry.screen() - 4.0)
        + 3.0 * f64::from(entry.activity_days())
}

/// Compares the last three entries with the three before them.
pub fn detect_trend(history: &[DailyRecord]) -> Trend {
    if history.len() < WINDOW * 2 {
        return Trend::stable();
    }

    let len = history.len();
    let previous = &history[len - WINDOW * 2..len - WINDOW];
    let recent = &history[len - WINDOW..];

    let average = |entries: &[DailyRecord]| {
        entries.iter().map(wellness_proxy).sum::<f64>() / entries.len() as f64
    };
    let change = average(recent) - average(previous);

    let direction = if change > SIGNIFICANT_CHANGE {
        TrendDirection::Improving
    } else if change < -SIGNIFICANT_CHANGE {
        TrendDirection::Worsening
    } else {
        TrendDirection::Stable
    };

    // Halves round toward positive infinity, so -2.5 reports as -2.
    Trend::new(direction, (change + 0.5).floor() as i32)
}
