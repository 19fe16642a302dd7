//! Per-category scoring. Each category starts at 100, applies independent deductions and is
//! clamped into `[0, 100]`; factors are reported from the same threshold crossings.

use super::config::ScoreBands;
use super::domain::{CategoryScore, DailyRecord, Mood};

const BASE_SCORE: i32 = 100;
const TRAILING_WINDOW: usize = 7;
const DEFAULT_MOOD_PENALTY: i32 = Mood::Okay.penalty();

pub(crate) fn trailing(history: &[DailyRecord], count: usize) -> &[DailyRecord] {
    &history[history.len().saturating_sub(count)..]
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64
}

pub fn mental_health(
    record: &DailyRecord,
    history: &[DailyRecord],
    bands: &ScoreBands,
) -> CategoryScore {
    let stress = record.stress();
    let pressure = record.pressure();
    let mut score = BASE_SCORE;

    score -= 15 * (i32::from(stress) - 1);
    score -= 10 * (i32::from(pressure) - 1);
    score -= record
        .mood
        .map(Mood::penalty)
        .unwrap_or(DEFAULT_MOOD_PENALTY);

    if history.len() > 3 {
        let recent: Vec<f64> = trailing(history, TRAILING_WINDOW)
            .iter()
            .map(|entry| f64::from(entry.stress()))
            .collect();
        if mean(&recent) >= 4.0 {
            score -= 10;
        }
    }

    let mut factors = Vec::new();
    if stress >= 4 {
        factors.push("High stress level".to_string());
    }
    if pressure >= 4 {
        factors.push("High academic pressure".to_string());
    }
    if record.mood.is_some_and(Mood::is_negative) {
        factors.push("Negative mood".to_string());
    }

    bands.category_score(score, factors)
}

pub fn lifestyle(
    record: &DailyRecord,
    history: &[DailyRecord],
    bands: &ScoreBands,
) -> CategoryScore {
    let sleep = record.sleep();
    let mut score = BASE_SCORE;

    if sleep < 6.0 {
        score -= 30;
    } else if sleep < 7.0 {
        score -= 15;
    } else if sleep > 9.0 {
        score -= 10;
    }

    if history.len() >= TRAILING_WINDOW {
        let nights: Vec<f64> = trailing(history, TRAILING_WINDOW)
            .iter()
            .map(DailyRecord::sleep)
            .collect();
        let average = mean(&nights);

        if population_variance(&nights, average) > 2.0 {
            score -= 10;
        }
        if average < 6.5 {
            score -= 15;
        }
    }

    let mut factors = Vec::new();
    if sleep < 6.0 {
        factors.push("Severe sleep deprivation".to_string());
    } else if sleep < 7.0 {
        factors.push("Insufficient sleep".to_string());
    }
    if sleep > 9.0 {
        factors.push("Excessive sleep".to_string());
    }

    bands.category_score(score, factors)
}

pub fn digital_wellbeing(
    record: &DailyRecord,
    history: &[DailyRecord],
    bands: &ScoreBands,
) -> CategoryScore {
    let screen = record.screen();
    let mut score = BASE_SCORE;

    let (deduction, factor) = if screen > 8.0 {
        (40, Some("Excessive screen time"))
    } else if screen > 6.0 {
        (25, Some("High screen time"))
    } else if screen > 4.0 {
        (10, Some("Moderate screen time"))
    } else {
        (0, None)
    };
    score -= deduction;

    if history.len() >= TRAILING_WINDOW {
        let usage: Vec<f64> = trailing(history, TRAILING_WINDOW)
            .iter()
            .map(DailyRecord::screen)
            .collect();

        if mean(&usage) > 6.0 {
            score -= 15;
        }

        let earliest = mean(&usage[..3]);
        let latest = mean(&usage[usage.len() - 3..]);
        if latest > earliest + 1.0 {
            score -= 10;
        }
    }

    let factors = factor.map(str::to_string).into_iter().collect();
    bands.category_score(score, factors)
}

pub fn physical_health(
    record: &DailyRecord,
    history: &[DailyRecord],
    bands: &ScoreBands,
) -> CategoryScore {
    let active_days = record.activity_days();
    let mut score = BASE_SCORE;

    let (deduction, factor) = match active_days {
        0 => (40, Some("No physical activity")),
        1..=2 => (25, Some("Low physical activity")),
        3..=4 => (10, Some("Moderate physical activity")),
        _ => (0, None),
    };
    score -= deduction;

    if history.len() >= TRAILING_WINDOW {
        let activity: Vec<f64> = trailing(history, TRAILING_WINDOW)
            .iter()
            .map(|entry| f64::from(entry.activity_days()))
            .collect();
        if mean(&activity) < 2.0 {
            score -= 15;
        }
    }

    let factors = factor.map(str::to_string).into_iter().collect();
    bands.category_score(score, factors)
}
