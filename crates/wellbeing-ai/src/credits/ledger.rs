use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::DailyRecord;

use super::policy::{
    CreditAward, CreditsPolicy, EarnActivity, EarnContext, Redemption, RedemptionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Earn,
    Redeem,
    Decay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub kind: TransactionKind,
    /// Signed change to the balance.
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<EarnActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub at: DateTime<Utc>,
}

/// Running balance with an append-only transaction log. The balance never goes negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditsLedger {
    balance: u32,
    total_earned: u32,
    transactions: Vec<CreditTransaction>,
    last_update: Option<DateTime<Utc>>,
}

impl CreditsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn total_earned(&self) -> u32 {
        self.total_earned
    }

    pub fn transactions(&self) -> &[CreditTransaction] {
        &self.transactions
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn earned_on(&self, date: NaiveDate) -> u32 {
        self.transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Earn && tx.at.date_naive() == date)
            .map(|tx| u32::try_from(tx.amount).unwrap_or(0))
            .sum()
    }

    pub fn checked_in_on(&self, date: NaiveDate) -> bool {
        self.transactions.iter().any(|tx| {
            tx.kind == TransactionKind::Earn
                && tx.activity == Some(EarnActivity::WellnessCheckIn)
                && tx.at.date_naive() == date
        })
    }

    /// Applies any pending decay, then validates and records the award.
    pub fn earn(
        &mut self,
        policy: &CreditsPolicy,
        activity: EarnActivity,
        record: &DailyRecord,
        history: &[DailyRecord],
        now: DateTime<Utc>,
    ) -> CreditAward {
        self.apply_decay(policy, now);

        let today = now.date_naive();
        let context = EarnContext {
            record,
            history,
            today,
            earned_today: self.earned_on(today),
            checked_in_today: self.checked_in_on(today),
        };
        let award = policy.award(activity, &context);

        if award.earned > 0 {
            self.balance = self.balance.saturating_add(award.earned);
            self.total_earned = self.total_earned.saturating_add(award.earned);
            self.transactions.push(CreditTransaction {
                kind: TransactionKind::Earn,
                amount: i64::from(award.earned),
                activity: Some(activity),
                item: None,
                at: now,
            });
            self.last_update = Some(now);
        }

        award
    }

    /// Decays the balance for every whole idle period and returns the credits lost. The
    /// partial period left over keeps counting towards the next decay.
    pub fn apply_decay(&mut self, policy: &CreditsPolicy, now: DateTime<Utc>) -> u32 {
        let Some(last_update) = self.last_update else {
            return 0;
        };

        let periods = policy.idle_periods(last_update, now);
        if periods == 0 {
            return 0;
        }

        let decayed = policy.decay(self.balance, last_update, now);
        let lost = self.balance - decayed;
        self.balance = decayed;
        self.last_update = Some(last_update + policy.decay_period() * periods as i32);

        if lost > 0 {
            self.transactions.push(CreditTransaction {
                kind: TransactionKind::Decay,
                amount: -i64::from(lost),
                activity: None,
                item: None,
                at: now,
            });
        }
        lost
    }

    pub fn redeem(
        &mut self,
        policy: &CreditsPolicy,
        cost: u32,
        item: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, RedemptionError> {
        self.apply_decay(policy, now);

        let redemption = policy.redeem(self.balance, cost, item, now)?;
        self.balance = redemption.remaining;
        self.transactions.push(redemption.transaction.clone());
        self.last_update = Some(now);
        Ok(redemption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn daily_cap_spans_activities() {
        let policy = CreditsPolicy::default();
        let mut ledger = CreditsLedger::new();
        let record = DailyRecord::default();

        let first = ledger.earn(&policy, EarnActivity::WellnessCheckIn, &record, &[], morning());
        assert_eq!(first.earned, 20);

        let repeat = ledger.earn(&policy, EarnActivity::WellnessCheckIn, &record, &[], morning());
        assert_eq!(repeat.earned, 0);

        for _ in 0..16 {
            ledger.earn(&policy, EarnActivity::TaskCompletion, &record, &[], morning());
        }
        assert_eq!(ledger.earned_on(morning().date_naive()), 100);
        assert_eq!(ledger.balance(), 100);

        let tomorrow = morning() + Duration::days(1);
        let next_day = ledger.earn(&policy, EarnActivity::WellnessCheckIn, &record, &[], tomorrow);
        assert_eq!(next_day.earned, 20);
        assert_eq!(ledger.total_earned(), 120);
    }

    #[test]
    fn idle_balance_decays_before_redemption() {
        let policy = CreditsPolicy::default();
        let mut ledger = CreditsLedger::new();
        let record = DailyRecord::default();
        for _ in 0..10 {
            ledger.earn(&policy, EarnActivity::TaskCompletion, &record, &[], morning());
        }
        assert_eq!(ledger.balance(), 50);

        let later = morning() + Duration::days(15);
        let error = ledger
            .redeem(&policy, 50, "Premium Notebook", later)
            .expect_err("decayed below cost");
        assert_eq!(
            error,
            RedemptionError::InsufficientCredits {
                balance: 45,
                cost: 50
            }
        );
        assert_eq!(ledger.last_update(), Some(morning() + Duration::days(14)));

        let kinds: Vec<TransactionKind> = ledger.transactions().iter().map(|tx| tx.kind).collect();
        assert_eq!(kinds.last(), Some(&TransactionKind::Decay));

        let redemption = ledger
            .redeem(&policy, 30, "Pen Set", later)
            .expect("affordable");
        assert_eq!(redemption.remaining, 15);
        assert_eq!(ledger.balance(), 15);
    }
}
