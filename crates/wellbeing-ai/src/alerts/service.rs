use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assessment::{DailyRecord, RiskAssessment, RiskEngine, ScoringConfig};

use super::catalog;
use super::config::AlertThresholds;
use super::domain::{Alert, AlertId, AlertTier, ParentNotification, StudentId, StudentRef, TransitionError};
use super::evaluator::{AlertEvaluator, AlertRequest};
use super::repository::{AlertRepository, ConsentRegistry, RepositoryError};

/// A single check-in: today's record plus the history snapshot it should be judged against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub student: StudentRef,
    pub record: DailyRecord,
    #[serde(default)]
    pub history: Vec<DailyRecord>,
    #[serde(default)]
    pub sos_pressed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub assessment: RiskAssessment,
    pub alerts: Vec<Alert>,
    /// Alerts raised for this check-in that the repository rejected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsaved_alerts: Vec<Alert>,
    /// Today's record stamped with its index, for the caller to append to history.
    pub history_entry: DailyRecord,
}

/// Service composing the scoring engine, escalation evaluator, alert store and consent lookup.
pub struct AlertService<R, C> {
    engine: Arc<RiskEngine>,
    evaluator: Arc<AlertEvaluator>,
    repository: Arc<R>,
    consent: Arc<C>,
}

impl<R, C> AlertService<R, C>
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    pub fn new(
        repository: Arc<R>,
        consent: Arc<C>,
        scoring: ScoringConfig,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            engine: Arc::new(RiskEngine::new(scoring)),
            evaluator: Arc::new(AlertEvaluator::new(thresholds)),
            repository,
            consent,
        }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Assess a check-in, raise and persist any alerts it qualifies for.
    pub fn check_in(
        &self,
        request: CheckInRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, AlertServiceError> {
        let CheckInRequest {
            student,
            record,
            history,
            sos_pressed,
        } = request;

        let assessment = self.engine.assess(&record, &history, now);
        let parent_consent = self.consent.has_parent_consent(&student.id);
        let alert_request = AlertRequest {
            student: &student,
            assessment: &assessment,
            history: &history,
            sos_pressed,
            parent_consent,
        };

        debug!(
            student_id = %student.id,
            wellbeing_index = assessment.wellbeing_index.score,
            history_len = history.len(),
            "assessed check-in"
        );

        if self.evaluator.parent_alert_withheld(&alert_request) {
            warn!(
                student_id = %student.id,
                wellbeing_index = assessment.wellbeing_index.score,
                "parent alert withheld without consent"
            );
        }

        let mut alerts = Vec::new();
        let mut unsaved_alerts = Vec::new();
        let mut first_error = None;
        for alert in self.evaluator.evaluate(&alert_request, now) {
            match self.repository.save(alert.clone()) {
                Ok(stored) => {
                    info!(
                        student_id = %stored.student_id,
                        alert_id = %stored.id,
                        tier = stored.tier.level(),
                        alert_type = stored.alert_type.key(),
                        "alert raised"
                    );
                    alerts.push(stored);
                }
                Err(error) => {
                    warn!(
                        student_id = %alert.student_id,
                        alert_id = %alert.id,
                        alert_type = alert.alert_type.key(),
                        error = %error,
                        "alert could not be saved"
                    );
                    unsaved_alerts.push(alert);
                    first_error.get_or_insert(error);
                }
            }
        }

        // Only fail the check-in when nothing raised could be stored.
        if alerts.is_empty() {
            if let Some(error) = first_error {
                return Err(error.into());
            }
        }

        let history_entry = assessment.history_entry(&record);
        Ok(CheckInOutcome {
            assessment,
            alerts,
            unsaved_alerts,
            history_entry,
        })
    }

    pub fn acknowledge(
        &self,
        alert_id: &AlertId,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Alert, AlertServiceError> {
        let mut alert = self.get(alert_id)?;
        alert.acknowledge(actor, now)?;
        self.repository.update(alert.clone())?;

        info!(alert_id = %alert.id, actor, "alert acknowledged");
        Ok(alert)
    }

    pub fn resolve(
        &self,
        alert_id: &AlertId,
        actor: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Alert, AlertServiceError> {
        let mut alert = self.get(alert_id)?;
        alert.resolve(actor, notes, now)?;
        self.repository.update(alert.clone())?;

        info!(alert_id = %alert.id, actor, "alert resolved");
        Ok(alert)
    }

    pub fn get(&self, alert_id: &AlertId) -> Result<Alert, AlertServiceError> {
        let alert = self
            .repository
            .fetch(alert_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(alert)
    }

    /// Full audit history for a student, resolved alerts included.
    pub fn alerts_for_student(&self, student_id: &StudentId) -> Result<Vec<Alert>, AlertServiceError> {
        let alerts = self
            .repository
            .find(&|alert: &Alert| &alert.student_id == student_id)?;
        Ok(alerts)
    }

    /// Open counselor-tier alerts assigned to `assignee`.
    pub fn alerts_for_assignee(&self, assignee: &str) -> Result<Vec<Alert>, AlertServiceError> {
        let alerts = self.repository.find(&|alert: &Alert| {
            alert.tier >= AlertTier::Counselor
                && alert.is_open()
                && alert.assigned_to.as_deref() == Some(assignee)
        })?;
        Ok(alerts)
    }

    /// Supportive parent message for a tier 2+ alert; `None` for lower tiers.
    pub fn parent_notification(
        &self,
        alert_id: &AlertId,
    ) -> Result<Option<ParentNotification>, AlertServiceError> {
        let alert = self.get(alert_id)?;
        Ok(catalog::parent_notification(&alert))
    }
}

/// Error raised by the alert service.
#[derive(Debug, thiserror::Error)]
pub enum AlertServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
