//! Tiered escalation: self-help, counselor, parent (with consent) and emergency alerts.

mod catalog;
mod config;
pub mod domain;
mod evaluator;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::AlertThresholds;
pub use domain::{
    Alert, AlertId, AlertStatus, AlertTier, AlertType, ContentResource, Helpline, InvalidTier,
    ParentNotification, RecommendedAction, ResourceBundle, RiskSnapshot, StatusTransition,
    StudentId, StudentRef, TransitionError,
};
pub use evaluator::{
    crisis_indicator_count, is_sustained_low, AlertEvaluator, AlertRequest, DEFAULT_ASSIGNEE,
};
pub use repository::{AlertRepository, ConsentRegistry, RepositoryError};
pub use router::alert_router;
pub use service::{AlertService, AlertServiceError, CheckInOutcome, CheckInRequest};
