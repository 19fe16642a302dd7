use super::domain::{Alert, AlertId, StudentId};

/// Append-only alert store. Alerts are saved once, updated on status transitions and never
/// deleted.
pub trait AlertRepository: Send + Sync {
    fn save(&self, alert: Alert) -> Result<Alert, RepositoryError>;
    fn update(&self, alert: Alert) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AlertId) -> Result<Option<Alert>, RepositoryError>;
    /// Matching alerts in the order they were saved.
    fn find(&self, predicate: &dyn Fn(&Alert) -> bool) -> Result<Vec<Alert>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("alert already exists")]
    Conflict,
    #[error("alert not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Parent consent lookup owned by an external store.
pub trait ConsentRegistry: Send + Sync {
    fn has_parent_consent(&self, student_id: &StudentId) -> bool;
}
