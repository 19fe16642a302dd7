use chrono::{DateTime, TimeZone, Utc};

use crate::assessment::{DailyRecord, Mood, RiskEngine, ScoreBands, ScoringConfig};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn bands() -> ScoreBands {
    ScoreBands::default()
}

pub(super) fn engine() -> RiskEngine {
    RiskEngine::new(ScoringConfig::default())
}

pub(super) fn calm_record() -> DailyRecord {
    DailyRecord {
        stress_level: Some(1),
        academic_pressure: Some(1),
        mood: Some(Mood::Amazing),
        sleep_hours: Some(8.0),
        screen_time: Some(2.0),
        physical_activity: Some(5),
        ..DailyRecord::default()
    }
}

pub(super) fn with_stress(stress: u8) -> DailyRecord {
    DailyRecord {
        stress_level: Some(stress),
        ..DailyRecord::default()
    }
}

pub(super) fn with_sleep(hours: f64) -> DailyRecord {
    DailyRecord {
        sleep_hours: Some(hours),
        ..DailyRecord::default()
    }
}

pub(super) fn with_screen(hours: f64) -> DailyRecord {
    DailyRecord {
        screen_time: Some(hours),
        ..DailyRecord::default()
    }
}

pub(super) fn with_activity(days: u32) -> DailyRecord {
    DailyRecord {
        physical_activity: Some(days),
        ..DailyRecord::default()
    }
}

pub(super) fn crisis_record() -> DailyRecord {
    DailyRecord {
        stress_level: Some(5),
        academic_pressure: Some(5),
        mood: Some(Mood::Stressed),
        sleep_hours: Some(4.0),
        screen_time: Some(10.0),
        physical_activity: Some(0),
        ..DailyRecord::default()
    }
}
