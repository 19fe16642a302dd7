use crate::infra::{InMemoryAlertRepository, InMemoryConsentRegistry};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wellbeing_ai::alerts::{AlertService, CheckInRequest, StudentId, StudentRef};
use wellbeing_ai::assessment::DailyRecord;
use wellbeing_ai::config::AppConfig;
use wellbeing_ai::error::AppError;
use wellbeing_ai::history::HistoryImporter;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Today's check-in as a JSON object, e.g. '{"stress_level":4,"sleep_hours":6.5}'
    #[arg(long)]
    pub(crate) record: String,
    /// CSV export of earlier check-ins to judge today's record against
    #[arg(long)]
    pub(crate) history_csv: Option<PathBuf>,
    /// Treat the check-in as an SOS press
    #[arg(long)]
    pub(crate) sos: bool,
    /// Assume the student's parents have consented to tier 2 alerts
    #[arg(long)]
    pub(crate) parent_consent: bool,
    #[arg(long, default_value = "cli-student")]
    pub(crate) student_id: String,
    #[arg(long, default_value = "Student")]
    pub(crate) student_name: String,
    /// Counselor who should receive escalations
    #[arg(long)]
    pub(crate) counselor: Option<String>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let record: DailyRecord = serde_json::from_str(&args.record)?;
    let history = match &args.history_csv {
        Some(path) => HistoryImporter::from_path(path)?,
        None => Vec::new(),
    };

    let student = StudentRef {
        id: StudentId(args.student_id),
        name: args.student_name,
        counselor_id: args.counselor,
    };
    let consent = InMemoryConsentRegistry::with_consent(config.parent_consent.iter().cloned());
    if args.parent_consent {
        consent.grant(student.id.clone());
    }

    let service = AlertService::new(
        Arc::new(InMemoryAlertRepository::default()),
        Arc::new(consent),
        config.engine.scoring,
        config.engine.alerts,
    );
    let outcome = service.check_in(
        CheckInRequest {
            student,
            record,
            history,
            sos_pressed: args.sos,
        },
        Utc::now(),
    )?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
