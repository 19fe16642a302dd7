//! Static alert content: reasons, action plans, resources and parent messaging.

use crate::assessment::RiskAssessment;

use super::domain::{
    Alert, AlertTier, AlertType, ContentResource, Helpline, ParentNotification,
    RecommendedAction, ResourceBundle,
};

pub(crate) fn reason(alert_type: AlertType, assessment: &RiskAssessment) -> String {
    match alert_type {
        AlertType::WellbeingDeclining => format!(
            "Wellbeing score decreased to {}. Early intervention recommended.",
            assessment.wellbeing_index.score
        ),
        AlertType::SustainedLowWellbeing => {
            "Wellbeing score has remained below 40 for 3+ days. Consistent support needed."
                .to_string()
        }
        AlertType::MentalHealthRisk => {
            let score = assessment.mental_health.score;
            let factors = &assessment.mental_health.factors;
            if factors.is_empty() {
                format!("Mental health score is {score}.")
            } else {
                format!("Mental health score is {score}. {}.", factors.join(", "))
            }
        }
        AlertType::CriticalWellbeing => format!(
            "Critical wellbeing level detected ({}). Immediate attention recommended.",
            assessment.wellbeing_index.score
        ),
        AlertType::EmergencySupportNeeded => {
            "Emergency support requested or severe crisis indicators detected.".to_string()
        }
    }
}

pub(crate) fn recommended_action(tier: AlertTier) -> RecommendedAction {
    let (title, steps): (&str, [&str; 4]) = match tier {
        AlertTier::SelfHelp => (
            "Self-Help Resources",
            [
                "Review personalized wellness tips",
                "Try breathing exercises or meditation",
                "Connect with peer support groups",
                "Track improvements over next 3 days",
            ],
        ),
        AlertTier::Counselor => (
            "Counselor Check-In",
            [
                "Counselor will reach out within 24 hours",
                "Share your concerns openly",
                "Together create an action plan",
                "Follow-up scheduled automatically",
            ],
        ),
        AlertTier::Parent => (
            "Family Support",
            [
                "Parent notified with supportive message",
                "Counselor coordinates with family",
                "Regular check-ins scheduled",
                "Professional resources provided if needed",
            ],
        ),
        AlertTier::Emergency => (
            "Emergency Protocol",
            [
                "Immediate counselor alert",
                "Parents contacted immediately",
                "Emergency support numbers provided",
                "Institution support team activated",
            ],
        ),
    };

    RecommendedAction {
        title: title.to_string(),
        steps: steps.iter().map(|step| step.to_string()).collect(),
    }
}

const HELPLINES: [(&str, &str, &str); 2] = [
    ("National Mental Health Helpline", "1860-2662-345", "24/7"),
    ("NIMHANS Helpline", "080-46110007", "24/7"),
];

pub(crate) fn resources(alert_type: AlertType) -> ResourceBundle {
    let helplines = HELPLINES
        .iter()
        .map(|(name, number, available)| Helpline {
            name: name.to_string(),
            number: number.to_string(),
            available: available.to_string(),
        })
        .collect();

    let content: &[(&str, &str)] = match alert_type {
        AlertType::MentalHealthRisk => &[
            ("article", "Managing Academic Stress"),
            ("video", "Breathing Exercises for Anxiety"),
            ("counselor", "Book Counseling Session"),
        ],
        AlertType::WellbeingDeclining => &[
            ("article", "Building Healthy Daily Routines"),
            ("activity", "Join Wellness Challenge"),
        ],
        AlertType::SustainedLowWellbeing
        | AlertType::CriticalWellbeing
        | AlertType::EmergencySupportNeeded => &[],
    };

    ResourceBundle {
        helplines,
        content: content
            .iter()
            .map(|(kind, title)| ContentResource {
                kind: kind.to_string(),
                title: title.to_string(),
                link: "#".to_string(),
            })
            .collect(),
    }
}

const PARENT_SUGGESTIONS: [&str; 4] = [
    "Have a casual, non-judgmental chat",
    "Acknowledge their efforts, not just results",
    "Ensure they know help is available",
    "Maintain normal routines and boundaries",
];

/// Parent-facing copy for tier 2+ alerts. Lower tiers never reach a parent.
pub(crate) fn parent_notification(alert: &Alert) -> Option<ParentNotification> {
    if alert.tier < AlertTier::Parent {
        return None;
    }

    let name = &alert.student_name;
    let message = match alert.alert_type {
        AlertType::CriticalWellbeing => format!(
            "We noticed {name} might benefit from some extra support right now. Our counselor is \
             reaching out to help them build healthy routines. Your encouragement means a lot! 💚"
        ),
        AlertType::SustainedLowWellbeing => format!(
            "{name} is working through some challenges. Our team is providing support and \
             resources. Remember to celebrate small wins with them! 🌟"
        ),
        _ => "We're here to support your child's wellness journey.".to_string(),
    };

    Some(ParentNotification {
        alert_id: alert.id.clone(),
        title: "Supporting Your Child's Wellbeing".to_string(),
        message,
        tone: "supportive".to_string(),
        actionable: true,
        suggestions: PARENT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        counselor_contact: "Available for discussion if you have questions".to_string(),
    })
}
