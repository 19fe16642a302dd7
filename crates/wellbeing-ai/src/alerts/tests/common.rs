use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::alerts::domain::{Alert, AlertId, StudentId, StudentRef};
use crate::alerts::evaluator::{AlertEvaluator, AlertRequest};
use crate::alerts::repository::{AlertRepository, ConsentRegistry, RepositoryError};
use crate::alerts::{AlertService, AlertThresholds};
use crate::assessment::{
    explain, CategoryScore, DailyRecord, Mood, PersonaKind, PersonaResult, RiskAssessment,
    ScoreBands, ScoreBreakdown, ScoringConfig, Trend, WellbeingIndex,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn later(minutes: i64) -> DateTime<Utc> {
    now() + Duration::minutes(minutes)
}

pub(super) fn student(counselor_id: Option<&str>) -> StudentRef {
    StudentRef {
        id: StudentId("stu-042".to_string()),
        name: "Asha".to_string(),
        counselor_id: counselor_id.map(str::to_string),
    }
}

pub(super) fn category(score: u8) -> CategoryScore {
    ScoreBands::default().category_score(i32::from(score), Vec::new())
}

/// Hand-built assessment so evaluator tests can pin each gated score independently.
pub(super) fn assessment(index: u8, mental_health: u8, lifestyle: u8) -> RiskAssessment {
    let bands = ScoreBands::default();
    let breakdown = ScoreBreakdown {
        mental_health,
        lifestyle,
        digital_wellbeing: 80,
        physical_health: 80,
    };
    let (color, level) = bands.classify(f64::from(index));

    RiskAssessment {
        mental_health: category(mental_health),
        lifestyle: category(lifestyle),
        digital_wellbeing: category(80),
        physical_health: category(80),
        wellbeing_index: WellbeingIndex {
            score: index,
            color,
            level,
            breakdown,
        },
        trend: Trend::stable(),
        persona: PersonaResult::from(PersonaKind::Balanced),
        explanations: explain(&breakdown),
        timestamp: now(),
    }
}

pub(super) fn history_with_indices(indices: &[u8]) -> Vec<DailyRecord> {
    indices
        .iter()
        .map(|index| DailyRecord {
            wellbeing_index: Some(*index),
            ..DailyRecord::default()
        })
        .collect()
}

pub(super) fn evaluate(
    assessment: &RiskAssessment,
    history: &[DailyRecord],
    sos_pressed: bool,
    parent_consent: bool,
) -> Vec<Alert> {
    let student = student(Some("counselor-7"));
    AlertEvaluator::new(AlertThresholds::default()).evaluate(
        &AlertRequest {
            student: &student,
            assessment,
            history,
            sos_pressed,
            parent_consent,
        },
        now(),
    )
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

pub(super) fn crisis_week() -> Vec<DailyRecord> {
    (0..7)
        .map(|_| DailyRecord {
            wellbeing_index: Some(30),
            ..crisis_record()
        })
        .collect()
}

pub(super) type MemoryService = AlertService<MemoryRepository, StaticConsent>;

pub(super) fn build_service(parent_consent: bool) -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AlertService::new(
        repository.clone(),
        Arc::new(StaticConsent(parent_consent)),
        ScoringConfig::default(),
        AlertThresholds::default(),
    );
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.alerts.lock().expect("repository mutex poisoned").len()
    }
}

impl AlertRepository for MemoryRepository {
    fn save(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        let mut alerts = self.alerts.lock().expect("repository mutex poisoned");
        if alerts.iter().any(|existing| existing.id == alert.id) {
            return Err(RepositoryError::Conflict);
        }
        alerts.push(alert.clone());
        Ok(alert)
    }

    fn update(&self, alert: Alert) -> Result<(), RepositoryError> {
        let mut alerts = self.alerts.lock().expect("repository mutex poisoned");
        let slot = alerts
            .iter_mut()
            .find(|existing| existing.id == alert.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = alert;
        Ok(())
    }

    fn fetch(&self, id: &AlertId) -> Result<Option<Alert>, RepositoryError> {
        let alerts = self.alerts.lock().expect("repository mutex poisoned");
        Ok(alerts.iter().find(|alert| &alert.id == id).cloned())
    }

    fn find(&self, predicate: &dyn Fn(&Alert) -> bool) -> Result<Vec<Alert>, RepositoryError> {
        let alerts = self.alerts.lock().expect("repository mutex poisoned");
        Ok(alerts.iter().filter(|alert| predicate(alert)).cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl AlertRepository for UnavailableRepository {
    fn save(&self, _alert: Alert) -> Result<Alert, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _alert: Alert) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AlertId) -> Result<Option<Alert>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _predicate: &dyn Fn(&Alert) -> bool) -> Result<Vec<Alert>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Memory store whose `fail_on`-th save (1-based) is rejected.
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    fail_on: usize,
    saves: AtomicUsize,
}

impl FlakyRepository {
    pub(super) fn failing_on(fail_on: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            fail_on,
            saves: AtomicUsize::new(0),
        }
    }
}

impl AlertRepository for FlakyRepository {
    fn save(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.save(alert)
    }

    fn update(&self, alert: Alert) -> Result<(), RepositoryError> {
        self.inner.update(alert)
    }

    fn fetch(&self, id: &AlertId) -> Result<Option<Alert>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find(&self, predicate: &dyn Fn(&Alert) -> bool) -> Result<Vec<Alert>, RepositoryError> {
        self.inner.find(predicate)
    }
}

pub(super) struct StaticConsent(pub(super) bool);

impl ConsentRegistry for StaticConsent {
    fn has_parent_consent(&self, _student_id: &StudentId) -> bool {
        self.0
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
