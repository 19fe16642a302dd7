use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::DailyRecord;

use super::ledger::{CreditTransaction, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EarnActivity {
    Exercise,
    GoodSleep,
    LowScreenTime,
    TaskCompletion,
    WellnessCheckIn,
    WeeklyStreak,
    ImprovedWellbeing,
}

impl EarnActivity {
    pub const ALL: [EarnActivity; 7] = [
        EarnActivity::Exercise,
        EarnActivity::GoodSleep,
        EarnActivity::LowScreenTime,
        EarnActivity::TaskCompletion,
        EarnActivity::WellnessCheckIn,
        EarnActivity::WeeklyStreak,
        EarnActivity::ImprovedWellbeing,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            EarnActivity::Exercise => "exercise",
            EarnActivity::GoodSleep => "goodSleep",
            EarnActivity::LowScreenTime => "lowScreenTime",
            EarnActivity::TaskCompletion => "taskCompletion",
            EarnActivity::WellnessCheckIn => "wellnessCheckIn",
            EarnActivity::WeeklyStreak => "weeklyStreak",
            EarnActivity::ImprovedWellbeing => "improvedWellbeing",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|activity| activity.key() == key)
    }

    pub const fn rule(self) -> EarningRule {
        let (points, validation) = match self {
            EarnActivity::Exercise => (15, ValidationStrategy::Consistency),
            EarnActivity::GoodSleep => (10, ValidationStrategy::Range),
            EarnActivity::LowScreenTime => (8, ValidationStrategy::Threshold),
            EarnActivity::TaskCompletion => (5, ValidationStrategy::Immediate),
            EarnActivity::WellnessCheckIn => (20, ValidationStrategy::Daily),
            EarnActivity::WeeklyStreak => (50, ValidationStrategy::Streak),
            EarnActivity::ImprovedWellbeing => (25, ValidationStrategy::Trend),
        };
        EarningRule { points, validation }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStrategy {
    Consistency,
    Range,
    Threshold,
    Immediate,
    Daily,
    Streak,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningRule {
    pub points: u32,
    pub validation: ValidationStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub reason: String,
}

impl Validation {
    fn pass(reason: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Result of an earn attempt. A rejected attempt is not an error; it simply earns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAward {
    pub activity: Option<EarnActivity>,
    pub earned: u32,
    pub reason: String,
}

/// What the validators read for one earn attempt.
#[derive(Debug, Clone, Copy)]
pub struct EarnContext<'a> {
    pub record: &'a DailyRecord,
    pub history: &'a [DailyRecord],
    pub today: NaiveDate,
    pub earned_today: u32,
    pub checked_in_today: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditsConfig {
    pub decay_rate: f64,
    pub decay_period_days: i64,
    pub max_daily_earning: u32,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.05,
            decay_period_days: 7,
            max_daily_earning: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub threshold: u32,
    pub badge: &'static str,
}

pub const ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        id: "first_100",
        name: "First 100 Credits",
        threshold: 100,
        badge: "🌟",
    },
    Achievement {
        id: "wellness_warrior",
        name: "Wellness Warrior",
        threshold: 500,
        badge: "⚡",
    },
    Achievement {
        id: "habit_champion",
        name: "Habit Champion",
        threshold: 1000,
        badge: "🏆",
    },
    Achievement {
        id: "wellbeing_master",
        name: "Wellbeing Master",
        threshold: 2000,
        badge: "👑",
    },
];

/// Where a balance sits among a cohort's balances. Tied balances share the best position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardPosition {
    pub position: usize,
    pub total: usize,
    pub badge: Option<&'static str>,
    /// Share of the cohort ranked below this position, rounded to a whole percent.
    pub percentile: u8,
}

const PODIUM_BADGES: [&str; 3] = ["🥇", "🥈", "🥉"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    pub item: String,
    pub cost: u32,
    pub remaining: u32,
    pub transaction: CreditTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionError {
    #[error("insufficient credits: balance {balance}, cost {cost}")]
    InsufficientCredits { balance: u32, cost: u32 },
}

const STREAK_GOAL: u32 = 7;
const CONSISTENCY_MIN_HISTORY: usize = 3;
const CONSISTENCY_MIN_DAYS: usize = 3;
const TREND_WINDOW: usize = 7;
const TREND_MIN_GAIN: i32 = 10;

/// Stateless earn/decay/redeem rules over an immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct CreditsPolicy {
    config: CreditsConfig,
}

impl CreditsPolicy {
    pub fn new(config: CreditsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CreditsConfig {
        &self.config
    }

    pub fn validate(&self, activity: EarnActivity, context: &EarnContext<'_>) -> Validation {
        match activity.rule().validation {
            ValidationStrategy::Consistency => validate_consistency(context.history),
            ValidationStrategy::Range => validate_sleep_range(context.record),
            ValidationStrategy::Threshold => validate_screen_time(context.record),
            ValidationStrategy::Immediate => Validation::pass("Task completed"),
            ValidationStrategy::Daily => validate_daily_check_in(context.checked_in_today),
            ValidationStrategy::Streak => {
                let streak = self.streak(context.history, context.today);
                if streak >= STREAK_GOAL {
                    Validation::pass(format!("{streak}-day streak achieved!"))
                } else {
                    Validation::fail(format!("Current streak: {streak} days (need {STREAK_GOAL})"))
                }
            }
            ValidationStrategy::Trend => validate_trend(context.history),
        }
    }

    /// Validates and then clamps the award to what is left of today's cap.
    pub fn award(&self, activity: EarnActivity, context: &EarnContext<'_>) -> CreditAward {
        let validation = self.validate(activity, context);
        if !validation.valid {
            return CreditAward {
                activity: Some(activity),
                earned: 0,
                reason: validation.reason,
            };
        }

        let cap = self.config.max_daily_earning;
        if context.earned_today >= cap {
            return CreditAward {
                activity: Some(activity),
                earned: 0,
                reason: "Daily earning limit reached".to_string(),
            };
        }

        CreditAward {
            activity: Some(activity),
            earned: activity.rule().points.min(cap - context.earned_today),
            reason: validation.reason,
        }
    }

    /// Like [`Self::award`] for a wire key; unknown keys earn nothing.
    pub fn award_for_key(&self, key: &str, context: &EarnContext<'_>) -> CreditAward {
        match EarnActivity::from_key(key) {
            Some(activity) => self.award(activity, context),
            None => CreditAward {
                activity: None,
                earned: 0,
                reason: "Unknown activity".to_string(),
            },
        }
    }

    /// Consecutive calendar days with an entry, counting back from `today`. Several entries on
    /// one day count once; a day without an entry ends the streak.
    pub fn streak(&self, history: &[DailyRecord], today: NaiveDate) -> u32 {
        let days: BTreeSet<NaiveDate> = history.iter().filter_map(|entry| entry.date).collect();

        let mut streak = 0;
        let mut expected = today;
        while days.contains(&expected) {
            streak += 1;
            match expected.pred_opt() {
                Some(previous) => expected = previous,
                None => break,
            }
        }
        streak
    }

    /// Balance after compounding decay for each whole period idle since `last_update`.
    pub fn decay(&self, balance: u32, last_update: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let periods = self.idle_periods(last_update, now);
        if periods == 0 {
            return balance;
        }

        let exponent = i32::try_from(periods).unwrap_or(i32::MAX);
        let factor = (1.0 - self.config.decay_rate).powi(exponent);
        (f64::from(balance) * factor).floor().max(0.0) as u32
    }

    pub(crate) fn idle_periods(&self, last_update: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let period = self.config.decay_period_days.max(1);
        let idle_days = (now - last_update).num_days();
        if idle_days < period {
            return 0;
        }
        u32::try_from(idle_days / period).unwrap_or(u32::MAX)
    }

    pub(crate) fn decay_period(&self) -> Duration {
        Duration::days(self.config.decay_period_days.max(1))
    }

    pub fn redeem(
        &self,
        balance: u32,
        cost: u32,
        item: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, RedemptionError> {
        if balance < cost {
            return Err(RedemptionError::InsufficientCredits { balance, cost });
        }

        Ok(Redemption {
            item: item.to_string(),
            cost,
            remaining: balance - cost,
            transaction: CreditTransaction {
                kind: TransactionKind::Redeem,
                amount: -i64::from(cost),
                activity: None,
                item: Some(item.to_string()),
                at: now,
            },
        })
    }

    pub fn achievements(&self, total_earned: u32) -> Vec<Achievement> {
        ACHIEVEMENTS
            .into_iter()
            .filter(|achievement| total_earned >= achievement.threshold)
            .collect()
    }

    /// Rank `user_credits` within `all_credits`. Returns `None` for an empty cohort or when the
    /// balance is not part of it.
    pub fn leaderboard_position(
        &self,
        user_credits: u32,
        all_credits: &[u32],
    ) -> Option<LeaderboardPosition> {
        let mut ranked = all_credits.to_vec();
        ranked.sort_unstable_by(|a, b| b.cmp(a));

        let position = ranked.iter().position(|credits| *credits == user_credits)? + 1;
        let total = ranked.len();
        let percentile = ((1.0 - position as f64 / total as f64) * 100.0).round() as u8;

        Some(LeaderboardPosition {
            position,
            total,
            badge: PODIUM_BADGES.get(position - 1).copied(),
            percentile,
        })
    }
}

fn validate_consistency(history: &[DailyRecord]) -> Validation {
    if history.len() < CONSISTENCY_MIN_HISTORY {
        return Validation::fail("Not enough history for consistency check");
    }

    let recent = &history[history.len().saturating_sub(7)..];
    let exercise_days = recent.iter().filter(|entry| entry.exercise_logged).count();
    if exercise_days >= CONSISTENCY_MIN_DAYS {
        Validation::pass("Consistent exercise pattern verified")
    } else {
        Validation::fail("Need more consistent exercise")
    }
}

fn validate_sleep_range(record: &DailyRecord) -> Validation {
    if record
        .sleep_hours
        .is_some_and(|hours| (7.0..=9.0).contains(&hours))
    {
        Validation::pass("Healthy sleep duration achieved")
    } else {
        Validation::fail("Sleep outside healthy range (7-9 hours)")
    }
}

fn validate_screen_time(record: &DailyRecord) -> Validation {
    if record
        .screen_time
        .is_some_and(|hours| (0.0..4.0).contains(&hours))
    {
        Validation::pass("Screen time below recommended limit")
    } else {
        Validation::fail("Screen time too high")
    }
}

fn validate_daily_check_in(checked_in_today: bool) -> Validation {
    if checked_in_today {
        Validation::fail("Already checked in today")
    } else {
        Validation::pass("Daily check-in completed")
    }
}

fn validate_trend(history: &[DailyRecord]) -> Validation {
    if history.len() < TREND_WINDOW {
        return Validation::fail("Not enough history for trend analysis");
    }

    let index_at = |position: usize| i32::from(history[position].wellbeing_index.unwrap_or(0));
    let recent = index_at(history.len() - 1);
    let previous = index_at(history.len() - TREND_WINDOW);

    if recent - previous >= TREND_MIN_GAIN {
        Validation::pass("Wellbeing significantly improved!")
    } else {
        Validation::fail("No significant wellbeing improvement yet")
    }
}
