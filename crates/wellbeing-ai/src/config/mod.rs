use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::alerts::{AlertThresholds, StudentId};
use crate::assessment::{CategoryWeights, ScoringConfig};
use crate::credits::CreditsConfig;

const WEIGHT_TOLERANCE: f64 = 0.001;

/// Deployment stage; only affects logging and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
    /// Students whose parents opted in to tier 2 alerts, seeded into the in-memory registry.
    pub parent_consent: Vec<StudentId>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let engine = EngineConfig {
            scoring: ScoringConfig {
                weights: load_weights()?,
                ..ScoringConfig::default()
            },
            ..EngineConfig::default()
        };

        let parent_consent = env::var("WELLBEING_PARENT_CONSENT")
            .map(|raw| parse_student_ids(&raw))
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine,
            parent_consent,
        })
    }
}

/// Immutable tuning shared by the scoring engine, escalation evaluator and credits policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub alerts: AlertThresholds,
    pub credits: CreditsConfig,
}

fn parse_student_ids(raw: &str) -> Vec<StudentId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| StudentId(id.to_string()))
        .collect()
}

/// Reads optional per-category weight overrides, falling back to the defaults.
fn load_weights() -> Result<CategoryWeights, ConfigError> {
    let defaults = CategoryWeights::default();
    let weights = CategoryWeights {
        mental_health: weight_from_env(
            "WELLBEING_WEIGHT_MENTAL_HEALTH",
            defaults.mental_health,
        )?,
        lifestyle: weight_from_env("WELLBEING_WEIGHT_LIFESTYLE", defaults.lifestyle)?,
        digital_wellbeing: weight_from_env(
            "WELLBEING_WEIGHT_DIGITAL",
            defaults.digital_wellbeing,
        )?,
        physical_health: weight_from_env("WELLBEING_WEIGHT_PHYSICAL", defaults.physical_health)?,
    };

    let total = weights.total();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::WeightsDoNotSumToOne { total });
    }

    Ok(weights)
}

fn weight_from_env(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(ConfigError::InvalidWeight { key, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { key: &'static str, value: String },
    WeightsDoNotSumToOne { total: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { key, value } => {
                write!(f, "{key} must be a non-negative number, got '{value}'")
            }
            ConfigError::WeightsDoNotSumToOne { total } => {
                write!(f, "category weights must sum to 1.0 (found {total:.3})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeight { .. }
            | ConfigError::WeightsDoNotSumToOne { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "WELLBEING_WEIGHT_MENTAL_HEALTH",
            "WELLBEING_WEIGHT_LIFESTYLE",
            "WELLBEING_WEIGHT_DIGITAL",
            "WELLBEING_WEIGHT_PHYSICAL",
            "WELLBEING_PARENT_CONSENT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine.scoring.weights, CategoryWeights::default());
        assert!(config.parent_consent.is_empty());
    }

    #[test]
    fn parent_consent_list_skips_blanks() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WELLBEING_PARENT_CONSENT", " stu-1, ,stu-2,");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.parent_consent,
            vec![StudentId("stu-1".to_string()), StudentId("stu-2".to_string())]
        );
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn weight_overrides_must_sum_to_one() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WELLBEING_WEIGHT_MENTAL_HEALTH", "0.5");
        match AppConfig::load() {
            Err(ConfigError::WeightsDoNotSumToOne { total }) => {
                assert!((total - 1.15).abs() < 1e-9)
            }
            other => panic!("expected weight sum error, got {other:?}"),
        }

        env::set_var("WELLBEING_WEIGHT_LIFESTYLE", "0.1");
        let config = AppConfig::load().expect("rebalanced weights load");
        assert_eq!(config.engine.scoring.weights.mental_health, 0.5);
        assert_eq!(config.engine.scoring.weights.lifestyle, 0.1);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_weight() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WELLBEING_WEIGHT_PHYSICAL", "heavy");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidWeight {
                key: "WELLBEING_WEIGHT_PHYSICAL",
                ..
            })
        ));
        reset_env();
    }
}
