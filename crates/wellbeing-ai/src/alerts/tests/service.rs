use std::sync::Arc;

use super::common::*;
use crate::alerts::domain::{AlertId, AlertStatus, AlertTier, AlertType, StudentId};
use crate::alerts::repository::{AlertRepository, RepositoryError};
use crate::alerts::{AlertService, AlertServiceError, AlertThresholds, CheckInRequest};
use crate::assessment::ScoringConfig;

fn crisis_check_in(sos_pressed: bool) -> CheckInRequest {
    CheckInRequest {
        student: student(Some("counselor-7")),
        record: crisis_record(),
        history: crisis_week(),
        sos_pressed,
    }
}

#[test]
fn check_in_persists_every_raised_alert() {
    let (service, repository) = build_service(false);

    let outcome = service
        .check_in(crisis_check_in(true), now())
        .expect("check-in succeeds");

    assert_eq!(outcome.assessment.wellbeing_index.score, 32);
    let types: Vec<AlertType> = outcome.alerts.iter().map(|alert| alert.alert_type).collect();
    assert_eq!(
        types,
        vec![
            AlertType::SustainedLowWellbeing,
            AlertType::MentalHealthRisk,
            AlertType::EmergencySupportNeeded,
        ]
    );
    assert_eq!(repository.len(), 3);
    assert_eq!(outcome.history_entry.wellbeing_index, Some(32));

    let stored = service
        .alerts_for_student(&StudentId("stu-042".to_string()))
        .expect("lookup succeeds");
    assert_eq!(stored, outcome.alerts);
}

#[test]
fn calm_check_in_raises_no_alerts() {
    let (service, repository) = build_service(true);
    let request = CheckInRequest {
        student: student(None),
        record: crate::assessment::DailyRecord {
            stress_level: Some(1),
            academic_pressure: Some(1),
            mood: Some(crate::assessment::Mood::Happy),
            sleep_hours: Some(8.0),
            screen_time: Some(2.0),
            physical_activity: Some(5),
            ..Default::default()
        },
        history: Vec::new(),
        sos_pressed: false,
    };

    let outcome = service.check_in(request, now()).expect("check-in succeeds");
    assert!(outcome.alerts.is_empty());
    assert_eq!(repository.len(), 0);
}

#[test]
fn acknowledge_then_resolve_records_trail() {
    let (service, _) = build_service(false);
    let outcome = service
        .check_in(crisis_check_in(false), now())
        .expect("check-in succeeds");
    let id = outcome.alerts[0].id.clone();

    let acknowledged = service
        .acknowledge(&id, "counselor-7", later(5))
        .expect("acknowledge succeeds");
    assert_eq!(acknowledged.status, AlertStatus::Acknowledged);

    let resolved = service
        .resolve(&id, "counselor-7", Some("Met with student".to_string()), later(60))
        .expect("resolve succeeds");
    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert_eq!(resolved.transitions.len(), 2);
    assert_eq!(resolved.transitions[0].at, later(5));
    assert_eq!(resolved.transitions[1].from, AlertStatus::Acknowledged);
    assert_eq!(resolved.transitions[1].notes.as_deref(), Some("Met with student"));

    let stored = service.get(&id).expect("alert stored");
    assert_eq!(stored, resolved);
}

#[test]
fn transitions_never_move_backwards() {
    let (service, _) = build_service(false);
    let outcome = service
        .check_in(crisis_check_in(false), now())
        .expect("check-in succeeds");
    let id = outcome.alerts[0].id.clone();

    service
        .resolve(&id, "counselor-7", None, later(1))
        .expect("new alerts can be resolved directly");

    let error = service
        .acknowledge(&id, "counselor-7", later(2))
        .expect_err("resolved alerts stay resolved");
    assert!(matches!(
        error,
        AlertServiceError::Transition(transition)
            if transition.from == AlertStatus::Resolved && transition.to == AlertStatus::Acknowledged
    ));

    let stored = service.get(&id).expect("alert stored");
    assert_eq!(stored.transitions.len(), 1);
}

#[test]
fn false_alarm_can_be_closed_without_acknowledging() {
    let (service, repository) = build_service(false);
    let outcome = service
        .check_in(crisis_check_in(false), now())
        .expect("check-in succeeds");
    let id = outcome.alerts[0].id.clone();

    let resolved = service
        .resolve(&id, "counselor-7", Some("False alarm".to_string()), later(3))
        .expect("new alerts can be resolved directly");

    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert_eq!(resolved.transitions.len(), 1);
    let transition = &resolved.transitions[0];
    assert_eq!(transition.from, AlertStatus::New);
    assert_eq!(transition.to, AlertStatus::Resolved);
    assert_eq!(transition.notes.as_deref(), Some("False alarm"));
    assert_eq!(repository.fetch(&id).expect("fetch"), Some(resolved));
}

#[test]
fn unknown_alert_is_not_found() {
    let (service, _) = build_service(false);
    let error = service
        .acknowledge(&AlertId("alert_missing".to_string()), "counselor-7", now())
        .expect_err("missing alert");

    assert!(matches!(
        error,
        AlertServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn counselor_queue_only_lists_open_assigned_escalations() {
    let (service, repository) = build_service(true);

    for alert in evaluate(&assessment(55, 30, 80), &[], false, true) {
        repository.save(alert).expect("saved");
    }
    let outcome = service
        .check_in(crisis_check_in(false), now())
        .expect("check-in succeeds");
    service
        .resolve(&outcome.alerts[0].id, "counselor-7", None, later(10))
        .expect("resolved");

    let queue = service
        .alerts_for_assignee("counselor-7")
        .expect("queue lookup succeeds");

    assert!(queue.iter().all(|alert| alert.tier >= AlertTier::Counselor));
    assert!(queue.iter().all(|alert| alert.status != AlertStatus::Resolved));
    assert_eq!(queue.len(), 2);
    assert!(service
        .alerts_for_assignee("someone-else")
        .expect("queue lookup succeeds")
        .is_empty());
}

#[test]
fn parent_notification_only_for_tier_two_and_up() {
    let (service, repository) = build_service(true);
    let alerts = evaluate(&assessment(25, 20, 20), &[], false, true);
    for alert in &alerts {
        repository.save(alert.clone()).expect("saved");
    }

    let counselor_alert = alerts
        .iter()
        .find(|alert| alert.tier == AlertTier::Counselor)
        .expect("counselor alert");
    assert!(service
        .parent_notification(&counselor_alert.id)
        .expect("lookup succeeds")
        .is_none());

    let parent_alert = alerts
        .iter()
        .find(|alert| alert.tier == AlertTier::Parent)
        .expect("parent alert");
    let notification = service
        .parent_notification(&parent_alert.id)
        .expect("lookup succeeds")
        .expect("tier 2 notification");
    assert_eq!(notification.alert_id, parent_alert.id);
    assert_eq!(notification.title, "Supporting Your Child's Wellbeing");
}

#[test]
fn repository_failures_surface_from_check_in() {
    let service = AlertService::new(
        Arc::new(UnavailableRepository),
        Arc::new(StaticConsent(false)),
        ScoringConfig::default(),
        AlertThresholds::default(),
    );

    let error = service
        .check_in(crisis_check_in(true), now())
        .expect_err("repository offline");
    assert!(matches!(
        error,
        AlertServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn partial_save_failure_keeps_the_stored_alerts() {
    let repository = Arc::new(FlakyRepository::failing_on(2));
    let service = AlertService::new(
        repository.clone(),
        Arc::new(StaticConsent(false)),
        ScoringConfig::default(),
        AlertThresholds::default(),
    );

    let outcome = service
        .check_in(crisis_check_in(true), now())
        .expect("check-in still succeeds");

    let saved: Vec<AlertType> = outcome.alerts.iter().map(|alert| alert.alert_type).collect();
    assert_eq!(
        saved,
        vec![AlertType::SustainedLowWellbeing, AlertType::EmergencySupportNeeded]
    );
    assert_eq!(outcome.unsaved_alerts.len(), 1);
    assert_eq!(outcome.unsaved_alerts[0].alert_type, AlertType::MentalHealthRisk);
    assert_eq!(repository.inner.len(), 2);
    assert_eq!(outcome.history_entry.wellbeing_index, Some(32));
}
