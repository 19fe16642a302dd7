use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use wellbeing_ai::alerts::{
    Alert, AlertId, AlertRepository, ConsentRegistry, RepositoryError, StudentId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Alerts in save order. Nothing is ever removed.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertRepository {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl AlertRepository for InMemoryAlertRepository {
    fn save(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        let mut guard = self.alerts.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == alert.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(alert.clone());
        Ok(alert)
    }

    fn update(&self, alert: Alert) -> Result<(), RepositoryError> {
        let mut guard = self.alerts.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == alert.id) {
            Some(slot) => {
                *slot = alert;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AlertId) -> Result<Option<Alert>, RepositoryError> {
        let guard = self.alerts.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|alert| &alert.id == id).cloned())
    }

    fn find(&self, predicate: &dyn Fn(&Alert) -> bool) -> Result<Vec<Alert>, RepositoryError> {
        let guard = self.alerts.lock().expect("repository mutex poisoned");
        Ok(guard.iter().filter(|alert| predicate(alert)).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConsentRegistry {
    granted: Arc<Mutex<HashSet<StudentId>>>,
}

impl InMemoryConsentRegistry {
    pub(crate) fn with_consent(students: impl IntoIterator<Item = StudentId>) -> Self {
        let registry = Self::default();
        for student in students {
            registry.grant(student);
        }
        registry
    }

    pub(crate) fn grant(&self, student: StudentId) {
        self.granted
            .lock()
            .expect("consent mutex poisoned")
            .insert(student);
    }
}

impl ConsentRegistry for InMemoryConsentRegistry {
    fn has_parent_consent(&self, student_id: &StudentId) -> bool {
        self.granted
            .lock()
            .expect("consent mutex poisoned")
            .contains(student_id)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
