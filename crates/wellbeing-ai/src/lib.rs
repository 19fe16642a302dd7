//! Wellbeing scoring and escalation engine.
//!
//! Daily self-reports flow through [`assessment::RiskEngine`] into a
//! [`assessment::RiskAssessment`]; [`alerts::AlertEvaluator`] turns an assessment plus
//! history into tiered alerts, and [`alerts::AlertService`] persists them behind the
//! repository and consent traits. [`credits`] holds the point-economy policy.

pub mod alerts;
pub mod assessment;
pub mod config;
pub mod credits;
pub mod error;
pub mod history;
pub mod telemetry;
