use std::fmt;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub const NEUTRAL_STRESS_LEVEL: u8 = 3;
pub const NEUTRAL_ACADEMIC_PRESSURE: u8 = 3;
pub const NEUTRAL_SLEEP_HOURS: f64 = 7.0;
pub const NEUTRAL_SCREEN_TIME: f64 = 4.0;
pub const NEUTRAL_ACTIVITY_DAYS: u32 = 3;

/// Self-reported mood for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Amazing,
    Happy,
    Okay,
    Sad,
    Stressed,
    #[serde(other)]
    Unknown,
}

impl Mood {
    /// Deduction applied to the mental health score. Unset and unknown moods are scored as `okay`.
    pub const fn penalty(self) -> i32 {
        match self {
            Mood::Amazing => 0,
            Mood::Happy => 5,
            Mood::Okay | Mood::Unknown => 15,
            Mood::Sad => 30,
            Mood::Stressed => 40,
        }
    }

    pub const fn is_negative(self) -> bool {
        matches!(self, Mood::Sad | Mood::Stressed)
    }
}

/// One day's self-report. Every metric is optional; absent or out-of-range values read as the
/// neutral defaults so missing data never lowers a score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub stress_level: Option<u8>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub academic_pressure: Option<u8>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sleep_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub screen_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub physical_activity: Option<u32>,
    /// Index computed when this entry was assessed, echoed back for streak and trend checks.
    #[serde(default, deserialize_with = "lenient_number")]
    pub wellbeing_index: Option<u8>,
    #[serde(default)]
    pub exercise_logged: bool,
}

impl DailyRecord {
    pub fn stress(&self) -> u8 {
        self.stress_level
            .filter(|level| (1..=5).contains(level))
            .unwrap_or(NEUTRAL_STRESS_LEVEL)
    }

    pub fn pressure(&self) -> u8 {
        self.academic_pressure
            .filter(|level| (1..=5).contains(level))
            .unwrap_or(NEUTRAL_ACADEMIC_PRESSURE)
    }

    pub fn sleep(&self) -> f64 {
        self.sleep_hours
            .filter(|hours| hours.is_finite() && *hours >= 0.0)
            .unwrap_or(NEUTRAL_SLEEP_HOURS)
    }

    pub fn screen(&self) -> f64 {
        self.screen_time
            .filter(|hours| hours.is_finite() && *hours >= 0.0)
            .unwrap_or(NEUTRAL_SCREEN_TIME)
    }

    pub fn activity_days(&self) -> u32 {
        self.physical_activity.unwrap_or(NEUTRAL_ACTIVITY_DAYS)
    }
}

/// Numeric metric that may arrive as a number or as text. Values that do not fit the target
/// type read as `None` so the neutral defaults apply.
pub(crate) trait LenientNumber: Sized {
    fn from_f64(value: f64) -> Option<Self>;

    fn from_text(raw: &str) -> Option<Self> {
        raw.trim().parse::<f64>().ok().and_then(Self::from_f64)
    }
}

impl LenientNumber for f64 {
    fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(value)
    }
}

fn whole_number(value: f64, max: f64) -> Option<f64> {
    (value.is_finite() && value.fract() == 0.0 && (0.0..=max).contains(&value)).then_some(value)
}

impl LenientNumber for u8 {
    fn from_f64(value: f64) -> Option<Self> {
        whole_number(value, f64::from(u8::MAX)).map(|value| value as u8)
    }
}

impl LenientNumber for u32 {
    fn from_f64(value: f64) -> Option<Self> {
        whole_number(value, f64::from(u32::MAX)).map(|value| value as u32)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: LenientNumber,
{
    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(value) => T::from_f64(value),
        RawNumber::Text(raw) => T::from_text(&raw),
        RawNumber::Other(_) => None,
    })
}

/// The four scored dimensions, in declaration order. Tie-breaking and first-match scans rely
/// on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MentalHealth,
    Lifestyle,
    DigitalWellbeing,
    PhysicalHealth,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::MentalHealth,
        Category::Lifestyle,
        Category::DigitalWellbeing,
        Category::PhysicalHealth,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::MentalHealth => "Mental Health",
            Category::Lifestyle => "Lifestyle",
            Category::DigitalWellbeing => "Digital Wellbeing",
            Category::PhysicalHealth => "Physical Health",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLevel {
    Healthy,
    Caution,
    NeedsAttention,
}

impl ScoreLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreLevel::Healthy => "Healthy",
            ScoreLevel::Caution => "Caution",
            ScoreLevel::NeedsAttention => "Needs Attention",
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single 0-100 category score with its traffic-light classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u8,
    pub color: ScoreColor,
    pub level: ScoreLevel,
    pub factors: Vec<String>,
}

/// Raw category scores, exposed alongside the index for explanations and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mental_health: u8,
    pub lifestyle: u8,
    pub digital_wellbeing: u8,
    pub physical_health: u8,
}

impl ScoreBreakdown {
    pub const fn score_for(&self, category: Category) -> u8 {
        match category {
            Category::MentalHealth => self.mental_health,
            Category::Lifestyle => self.lifestyle,
            Category::DigitalWellbeing => self.digital_wellbeing,
            Category::PhysicalHealth => self.physical_health,
        }
    }
}
