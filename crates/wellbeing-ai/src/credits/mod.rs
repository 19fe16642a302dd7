//! Wellness credits: earn validation, daily cap, streaks, weekly decay and redemption.

mod ledger;
mod policy;

pub use ledger::{CreditTransaction, CreditsLedger, TransactionKind};
pub use policy::{
    Achievement, CreditAward, CreditsConfig, CreditsPolicy, EarnActivity, EarnContext,
    EarningRule, LeaderboardPosition, Redemption, RedemptionError, Validation,
    ValidationStrategy, ACHIEVEMENTS,
};
