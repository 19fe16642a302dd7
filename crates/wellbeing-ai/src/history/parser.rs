use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::assessment::domain::LenientNumber;
use crate::assessment::{DailyRecord, Mood};

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<DailyRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<HistoryRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    stress_level: Option<u8>,
    #[serde(default, deserialize_with = "empty_as_none")]
    academic_pressure: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    sleep_hours: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    screen_time: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    physical_activity: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    wellbeing_index: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    exercise_logged: Option<String>,
}

impl HistoryRow {
    fn into_record(self) -> DailyRecord {
        DailyRecord {
            date: self.date.as_deref().and_then(parse_date),
            stress_level: self.stress_level,
            academic_pressure: self.academic_pressure,
            mood: self.mood.as_deref().map(parse_mood),
            sleep_hours: self.sleep_hours,
            screen_time: self.screen_time,
            physical_activity: self.physical_activity,
            wellbeing_index: self.wellbeing_index,
            exercise_logged: self.exercise_logged.as_deref().is_some_and(parse_flag),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Unparsable cells read as blank; the neutral defaults apply when the record is scored.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: LenientNumber,
{
    Ok(empty_string_as_none(deserializer)?.and_then(|raw| T::from_text(&raw)))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn parse_mood(value: &str) -> Mood {
    match value.trim().to_ascii_lowercase().as_str() {
        "amazing" => Mood::Amazing,
        "happy" => Mood::Happy,
        "okay" => Mood::Okay,
        "sad" => Mood::Sad,
        "stressed" => Mood::Stressed,
        _ => Mood::Unknown,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
