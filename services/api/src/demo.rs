use crate::infra::{parse_date, InMemoryAlertRepository, InMemoryConsentRegistry};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use std::sync::Arc;
use wellbeing_ai::alerts::{AlertService, AlertTier, CheckInRequest, StudentId, StudentRef};
use wellbeing_ai::assessment::{DailyRecord, Mood};
use wellbeing_ai::config::AppConfig;
use wellbeing_ai::credits::{CreditsLedger, CreditsPolicy, EarnActivity};
use wellbeing_ai::error::AppError;

const DEMO_COUNSELOR: &str = "counselor-demo";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First check-in date (YYYY-MM-DD); defaults to seven days ago
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Run the week without parent consent on file
    #[arg(long)]
    pub(crate) without_consent: bool,
}

struct DemoDay {
    stress: u8,
    pressure: u8,
    mood: Mood,
    sleep: f64,
    screen: f64,
    activity: u32,
    exercised: bool,
}

const fn day(
    stress: u8,
    pressure: u8,
    mood: Mood,
    sleep: f64,
    screen: f64,
    activity: u32,
    exercised: bool,
) -> DemoDay {
    DemoDay {
        stress,
        pressure,
        mood,
        sleep,
        screen,
        activity,
        exercised,
    }
}

/// A good start to the week sliding into a crisis by day seven.
const DEMO_WEEK: [DemoDay; 7] = [
    day(2, 2, Mood::Happy, 8.0, 3.0, 5, true),
    day(2, 3, Mood::Okay, 7.5, 3.5, 4, true),
    day(3, 4, Mood::Okay, 6.5, 5.0, 3, true),
    day(4, 4, Mood::Sad, 5.5, 6.5, 2, false),
    day(4, 5, Mood::Stressed, 5.0, 7.5, 1, false),
    day(5, 5, Mood::Stressed, 4.5, 9.0, 0, false),
    day(5, 5, Mood::Stressed, 4.0, 10.0, 0, false),
];

impl DemoDay {
    fn record(&self, date: NaiveDate) -> DailyRecord {
        DailyRecord {
            date: Some(date),
            stress_level: Some(self.stress),
            academic_pressure: Some(self.pressure),
            mood: Some(self.mood),
            sleep_hours: Some(self.sleep),
            screen_time: Some(self.screen),
            physical_activity: Some(self.activity),
            wellbeing_index: None,
            exercise_logged: self.exercised,
        }
    }
}

fn evening(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(18)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let start = args
        .start
        .unwrap_or_else(|| Utc::now().date_naive() - Duration::days(7));

    let student = StudentRef {
        id: StudentId("demo-student".to_string()),
        name: "Maya".to_string(),
        counselor_id: Some(DEMO_COUNSELOR.to_string()),
    };
    let consent = InMemoryConsentRegistry::with_consent(config.parent_consent.iter().cloned());
    if !args.without_consent {
        consent.grant(student.id.clone());
    }
    let service = AlertService::new(
        Arc::new(InMemoryAlertRepository::default()),
        Arc::new(consent),
        config.engine.scoring,
        config.engine.alerts,
    );
    let policy = CreditsPolicy::new(config.engine.credits);
    let mut ledger = CreditsLedger::new();
    let mut history: Vec<DailyRecord> = Vec::new();

    println!(
        "Student wellbeing demo for {} ({} check-ins from {})",
        student.name,
        DEMO_WEEK.len(),
        start
    );

    for (offset, plan) in (0_i64..).zip(DEMO_WEEK.iter()) {
        let date = start + Duration::days(offset);
        let now = evening(date);
        let record = plan.record(date);

        let outcome = service.check_in(
            CheckInRequest {
                student: student.clone(),
                record: record.clone(),
                history: history.clone(),
                sos_pressed: false,
            },
            now,
        )?;
        let assessment = &outcome.assessment;
        println!(
            "\n{} | index {} ({}) {} {} | {}",
            date,
            assessment.wellbeing_index.score,
            assessment.wellbeing_index.level,
            assessment.trend.indicator,
            assessment.trend.change,
            assessment.persona.title
        );
        println!(
            "  MH {} | LS {} | DW {} | PH {}",
            assessment.mental_health.score,
            assessment.lifestyle.score,
            assessment.digital_wellbeing.score,
            assessment.physical_health.score
        );
        println!("  Focus: {}", assessment.explanations.main_factor);
        for alert in &outcome.alerts {
            println!(
                "  ALERT tier {} ({}) {:?}: {}",
                alert.tier.level(),
                alert.tier.name(),
                alert.alert_type,
                alert.reason
            );
        }

        history.push(outcome.history_entry);
        for activity in [
            EarnActivity::WellnessCheckIn,
            EarnActivity::GoodSleep,
            EarnActivity::LowScreenTime,
            EarnActivity::Exercise,
            EarnActivity::WeeklyStreak,
        ] {
            let award = ledger.earn(&policy, activity, &record, &history, now);
            if award.earned > 0 {
                println!("  +{} credits ({})", award.earned, award.reason);
            }
        }
    }

    let last_day = evening(start + Duration::days(DEMO_WEEK.len() as i64 - 1));
    println!(
        "\nCredits: balance {} | streak {} days",
        ledger.balance(),
        policy.streak(&history, last_day.date_naive())
    );
    for achievement in policy.achievements(ledger.total_earned()) {
        println!("  {} {}", achievement.badge, achievement.name);
    }
    match ledger.redeem(&policy, 50, "Meditation session", last_day) {
        Ok(redemption) => println!(
            "  Redeemed '{}' for {} credits, {} left",
            redemption.item, redemption.cost, redemption.remaining
        ),
        Err(err) => println!("  Redemption declined: {err}"),
    }

    let queue = service.alerts_for_assignee(DEMO_COUNSELOR)?;
    println!("\nCounselor queue for {DEMO_COUNSELOR}: {} open alert(s)", queue.len());
    for alert in &queue {
        println!(
            "  - {} tier {} {:?} [{}]",
            alert.id,
            alert.tier.level(),
            alert.alert_type,
            alert.status
        );
    }

    if let Some(parent_alert) = queue.iter().find(|alert| alert.tier >= AlertTier::Parent) {
        if let Some(notification) = service.parent_notification(&parent_alert.id)? {
            println!("\nParent notification: {}", notification.title);
            println!("  {}", notification.message);
            for suggestion in &notification.suggestions {
                println!("  * {suggestion}");
            }
        }
    }

    if let Some(first) = queue.first() {
        let follow_up = last_day + Duration::hours(1);
        let acknowledged = service.acknowledge(&first.id, DEMO_COUNSELOR, follow_up)?;
        let resolved = service.resolve(
            &acknowledged.id,
            DEMO_COUNSELOR,
            Some("Check-in call booked for tomorrow".to_string()),
            follow_up + Duration::minutes(30),
        )?;
        println!(
            "\nAlert {} moved through {} transition(s), now {}",
            resolved.id,
            resolved.transitions.len(),
            resolved.status
        );
    }

    Ok(())
}
