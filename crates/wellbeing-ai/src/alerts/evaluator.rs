use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::assessment::{DailyRecord, RiskAssessment};

use super::catalog;
use super::config::AlertThresholds;
use super::domain::{
    Alert, AlertId, AlertStatus, AlertTier, AlertType, RiskSnapshot, StudentRef,
};

/// Fallback assignee for counselor-tier alerts when the student has no named counselor.
pub const DEFAULT_ASSIGNEE: &str = "counselor";

/// Everything one evaluation reads. `history` excludes the record that produced `assessment`.
pub struct AlertRequest<'a> {
    pub student: &'a StudentRef,
    pub assessment: &'a RiskAssessment,
    pub history: &'a [DailyRecord],
    pub sos_pressed: bool,
    pub parent_consent: bool,
}

struct EscalationRule {
    tier: AlertTier,
    alert_type: AlertType,
    fires: fn(&AlertThresholds, &AlertRequest<'_>) -> bool,
}

fn wellbeing_declining(thresholds: &AlertThresholds, request: &AlertRequest<'_>) -> bool {
    let index = request.assessment.wellbeing_index.score;
    index >= thresholds.counselor_below && index < thresholds.self_help_below
}

fn sustained_low_wellbeing(thresholds: &AlertThresholds, request: &AlertRequest<'_>) -> bool {
    request.assessment.wellbeing_index.score < thresholds.counselor_below
        && is_sustained_low(
            request.history,
            thresholds.counselor_below,
            thresholds.sustained_window,
        )
}

fn mental_health_risk(thresholds: &AlertThresholds, request: &AlertRequest<'_>) -> bool {
    request.assessment.mental_health.score < thresholds.mental_health_below
}

fn critical_wellbeing(thresholds: &AlertThresholds, request: &AlertRequest<'_>) -> bool {
    request.assessment.wellbeing_index.score < thresholds.parent_below && request.parent_consent
}

fn emergency_support_needed(thresholds: &AlertThresholds, request: &AlertRequest<'_>) -> bool {
    request.sos_pressed
        || crisis_indicator_count(thresholds, request.assessment) >= thresholds.crisis_min_flags
}

/// Every rule is evaluated; a single check-in can raise several alerts at once.
const ESCALATION_RULES: [EscalationRule; 5] = [
    EscalationRule {
        tier: AlertTier::SelfHelp,
        alert_type: AlertType::WellbeingDeclining,
        fires: wellbeing_declining,
    },
    EscalationRule {
        tier: AlertTier::Counselor,
        alert_type: AlertType::SustainedLowWellbeing,
        fires: sustained_low_wellbeing,
    },
    EscalationRule {
        tier: AlertTier::Counselor,
        alert_type: AlertType::MentalHealthRisk,
        fires: mental_health_risk,
    },
    EscalationRule {
        tier: AlertTier::Parent,
        alert_type: AlertType::CriticalWellbeing,
        fires: critical_wellbeing,
    },
    EscalationRule {
        tier: AlertTier::Emergency,
        alert_type: AlertType::EmergencySupportNeeded,
        fires: emergency_support_needed,
    },
];

/// True when the last `window` history entries all carry an index below `bound`. Short
/// histories and entries without a recorded index fail the check.
pub fn is_sustained_low(history: &[DailyRecord], bound: u8, window: usize) -> bool {
    if window == 0 || history.len() < window {
        return false;
    }

    history[history.len() - window..]
        .iter()
        .all(|entry| entry.wellbeing_index.is_some_and(|index| index < bound))
}

pub fn crisis_indicator_count(thresholds: &AlertThresholds, assessment: &RiskAssessment) -> usize {
    [
        assessment.mental_health.score < thresholds.crisis_mental_health_below,
        assessment.lifestyle.score < thresholds.crisis_lifestyle_below,
        assessment.wellbeing_index.score < thresholds.crisis_index_below,
    ]
    .into_iter()
    .filter(|flag| *flag)
    .count()
}

/// Stateless tiered escalation over a finished assessment.
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Returns every alert the request qualifies for, lowest tier first.
    pub fn evaluate(&self, request: &AlertRequest<'_>, now: DateTime<Utc>) -> Vec<Alert> {
        ESCALATION_RULES
            .iter()
            .filter(|rule| (rule.fires)(&self.thresholds, request))
            .map(|rule| build_alert(rule.tier, rule.alert_type, request, now))
            .collect()
    }

    /// Whether a tier-2 alert would have fired had the parent consented.
    pub fn parent_alert_withheld(&self, request: &AlertRequest<'_>) -> bool {
        !request.parent_consent
            && request.assessment.wellbeing_index.score < self.thresholds.parent_below
    }
}

fn build_alert(
    tier: AlertTier,
    alert_type: AlertType,
    request: &AlertRequest<'_>,
    now: DateTime<Utc>,
) -> Alert {
    let assigned_to = (tier >= AlertTier::Counselor).then(|| {
        request
            .student
            .counselor_id
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string())
    });

    Alert {
        id: next_alert_id(now),
        tier,
        alert_type,
        student_id: request.student.id.clone(),
        student_name: request.student.name.clone(),
        created_at: now,
        reason: catalog::reason(alert_type, request.assessment),
        recommended_action: catalog::recommended_action(tier),
        resources: catalog::resources(alert_type),
        consent_status: request.parent_consent,
        risk_snapshot: RiskSnapshot::from(request.assessment),
        status: AlertStatus::New,
        assigned_to,
        transitions: Vec::new(),
    }
}

fn next_alert_id(now: DateTime<Utc>) -> AlertId {
    let suffix = Uuid::new_v4().simple().to_string();
    AlertId(format!("alert_{}_{}", now.timestamp_millis(), &suffix[..9]))
}
