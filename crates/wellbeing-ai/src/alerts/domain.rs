use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::{PersonaKind, RiskAssessment};

/// Identifier wrapper for students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for raised alerts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub String);

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a check-in belongs to and which counselor picks up their escalations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: StudentId,
    pub name: String,
    #[serde(default)]
    pub counselor_id: Option<String>,
}

/// Escalation level. Ordered so `tier >= AlertTier::Counselor` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AlertTier {
    SelfHelp,
    Counselor,
    Parent,
    Emergency,
}

impl AlertTier {
    pub const fn level(self) -> u8 {
        match self {
            AlertTier::SelfHelp => 0,
            AlertTier::Counselor => 1,
            AlertTier::Parent => 2,
            AlertTier::Emergency => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AlertTier::SelfHelp => "Self-Help",
            AlertTier::Counselor => "Counselor Notification",
            AlertTier::Parent => "Parent Alert",
            AlertTier::Emergency => "Institution Emergency",
        }
    }

    pub const fn action(self) -> &'static str {
        match self {
            AlertTier::SelfHelp => "show_resources",
            AlertTier::Counselor => "notify_counselor",
            AlertTier::Parent => "notify_parent",
            AlertTier::Emergency => "emergency_protocol",
        }
    }
}

impl From<AlertTier> for u8 {
    fn from(tier: AlertTier) -> Self {
        tier.level()
    }
}

impl TryFrom<u8> for AlertTier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AlertTier::SelfHelp),
            1 => Ok(AlertTier::Counselor),
            2 => Ok(AlertTier::Parent),
            3 => Ok(AlertTier::Emergency),
            other => Err(InvalidTier(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("alert tier must be between 0 and 3, got {0}")]
pub struct InvalidTier(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    WellbeingDeclining,
    SustainedLowWellbeing,
    MentalHealthRisk,
    CriticalWellbeing,
    EmergencySupportNeeded,
}

impl AlertType {
    pub const fn key(self) -> &'static str {
        match self {
            AlertType::WellbeingDeclining => "wellbeing_declining",
            AlertType::SustainedLowWellbeing => "sustained_low_wellbeing",
            AlertType::MentalHealthRisk => "mental_health_risk",
            AlertType::CriticalWellbeing => "critical_wellbeing",
            AlertType::EmergencySupportNeeded => "emergency_support_needed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AlertStatus::New => "new",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Forward-only: `new -> acknowledged -> resolved`, with `new -> resolved` allowed.
    const fn can_move_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::New, AlertStatus::Acknowledged)
                | (AlertStatus::New, AlertStatus::Resolved)
                | (AlertStatus::Acknowledged, AlertStatus::Resolved)
        )
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scores captured when the alert was raised. Never refreshed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub wellbeing_index: u8,
    pub mental_health: u8,
    pub lifestyle: u8,
    pub digital_wellbeing: u8,
    pub physical_health: u8,
    pub persona: PersonaKind,
}

impl From<&RiskAssessment> for RiskSnapshot {
    fn from(assessment: &RiskAssessment) -> Self {
        Self {
            wellbeing_index: assessment.wellbeing_index.score,
            mental_health: assessment.mental_health.score,
            lifestyle: assessment.lifestyle.score,
            digital_wellbeing: assessment.digital_wellbeing.score,
            physical_health: assessment.physical_health.score,
            persona: assessment.persona.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub title: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Helpline {
    pub name: String,
    pub number: String,
    pub available: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResource {
    pub kind: String,
    pub title: String,
    pub link: String,
}

/// Helplines are always present; content depends on the alert type and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBundle {
    pub helplines: Vec<Helpline>,
    pub content: Vec<ContentResource>,
}

/// One entry of an alert's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: AlertStatus,
    pub to: AlertStatus,
    pub actor: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("alert cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: AlertStatus,
    pub to: AlertStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub tier: AlertTier,
    pub alert_type: AlertType,
    pub student_id: StudentId,
    pub student_name: String,
    pub created_at: DateTime<Utc>,
    pub reason: String,
    pub recommended_action: RecommendedAction,
    pub resources: ResourceBundle,
    /// Parent consent as it stood when the alert was raised.
    pub consent_status: bool,
    pub risk_snapshot: RiskSnapshot,
    pub status: AlertStatus,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub transitions: Vec<StatusTransition>,
}

impl Alert {
    pub fn acknowledge(
        &mut self,
        actor: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.transition(AlertStatus::Acknowledged, actor.into(), at, None)
    }

    pub fn resolve(
        &mut self,
        actor: impl Into<String>,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.transition(AlertStatus::Resolved, actor.into(), at, notes)
    }

    pub fn is_open(&self) -> bool {
        self.status != AlertStatus::Resolved
    }

    fn transition(
        &mut self,
        to: AlertStatus,
        actor: String,
        at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<(), TransitionError> {
        let from = self.status;
        if !from.can_move_to(to) {
            return Err(TransitionError { from, to });
        }

        self.status = to;
        self.transitions.push(StatusTransition {
            from,
            to,
            actor,
            at,
            notes,
        });
        Ok(())
    }
}

/// Supportive message for a parent. Only produced for tier 2 and above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentNotification {
    pub alert_id: AlertId,
    pub title: String,
    pub message: String,
    pub tone: String,
    pub actionable: bool,
    pub suggestions: Vec<String>,
    pub counselor_contact: String,
}
