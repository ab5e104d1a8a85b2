//! Streak and claim bookkeeping. All date-sensitive branches take an explicit
//! `today` so they stay deterministic under test; callers pass
//! [`today_local`].

use chrono::{Local, NaiveDate};

use crate::models::UserLedger;

/// Base payout for a claim; the current streak is added on top.
pub const BASE_CLAIM_TOKENS: u64 = 10;

/// The current calendar day in the local time zone. Streaks and claims both
/// work in whole local days.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Fold a completed session into the streak. Returns whether the ledger
/// changed and needs persisting.
///
/// Consecutive days extend the streak, a gap of two or more days restarts it
/// at 1, and a repeat session on the same day leaves it alone.
pub fn record_sleep_day(ledger: &mut UserLedger, today: NaiveDate) -> bool {
    let Some(last_sleep) = ledger.last_sleep_date else {
        ledger.streak = 1;
        ledger.last_sleep_date = Some(today);
        return true;
    };

    let diff_days = (today - last_sleep).num_days();
    if diff_days == 1 {
        ledger.streak += 1;
        ledger.last_sleep_date = Some(today);
        true
    } else if diff_days > 1 {
        ledger.streak = 1;
        ledger.last_sleep_date = Some(today);
        true
    } else {
        false
    }
}

/// Whether the claim action is currently permitted: a session must have
/// completed on a day other than today, and today's claim must not have been
/// taken yet. Testing mode bypasses both checks.
pub fn can_claim(ledger: &UserLedger, today: NaiveDate) -> bool {
    if ledger.testing_mode {
        return true;
    }

    match ledger.last_sleep_date {
        Some(last_sleep) => last_sleep != today && ledger.last_claim_date != Some(today),
        None => false,
    }
}

pub fn claim_amount(ledger: &UserLedger) -> u64 {
    BASE_CLAIM_TOKENS + u64::from(ledger.streak)
}

/// Apply a claim against `today`. Returns the tokens granted, or `None` when
/// not eligible. Testing mode skips the last-claim stamp so repeated claims
/// stay available; that is the intended operator-mode behavior.
pub fn apply_claim(ledger: &mut UserLedger, today: NaiveDate) -> Option<u64> {
    if !can_claim(ledger, today) {
        return None;
    }

    let amount = claim_amount(ledger);
    ledger.tokens += amount;
    if !ledger.testing_mode {
        ledger.last_claim_date = Some(today);
    }
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid test date")
    }

    #[test]
    fn first_session_starts_the_streak() {
        let mut ledger = UserLedger::default();
        assert!(record_sleep_day(&mut ledger, date("2024-01-01")));
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.last_sleep_date, Some(date("2024-01-01")));
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut ledger = UserLedger::default();
        let days = [
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-04",
            "2024-01-05",
        ];
        for (index, day) in days.iter().enumerate() {
            assert!(record_sleep_day(&mut ledger, date(day)));
            assert_eq!(ledger.streak, index as u32 + 1);
        }
    }

    #[test]
    fn gap_of_two_days_resets_the_streak() {
        let mut ledger = UserLedger {
            streak: 6,
            last_sleep_date: Some(date("2024-01-10")),
            ..UserLedger::default()
        };
        assert!(record_sleep_day(&mut ledger, date("2024-01-12")));
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.last_sleep_date, Some(date("2024-01-12")));
    }

    #[test]
    fn repeat_session_on_the_same_day_changes_nothing() {
        let mut ledger = UserLedger {
            streak: 3,
            last_sleep_date: Some(date("2024-01-10")),
            ..UserLedger::default()
        };
        assert!(!record_sleep_day(&mut ledger, date("2024-01-10")));
        assert_eq!(ledger.streak, 3);
        assert_eq!(ledger.last_sleep_date, Some(date("2024-01-10")));
    }

    #[test]
    fn claim_requires_a_prior_sleep_day() {
        let ledger = UserLedger::default();
        assert!(!can_claim(&ledger, date("2024-01-03")));
    }

    #[test]
    fn claim_blocked_when_last_sleep_was_today() {
        let ledger = UserLedger {
            last_sleep_date: Some(date("2024-01-03")),
            ..UserLedger::default()
        };
        assert!(!can_claim(&ledger, date("2024-01-03")));
    }

    #[test]
    fn claim_pays_base_plus_streak_and_stamps_the_day() {
        // streak 2, slept 2024-01-01, never claimed, today 2024-01-03
        let mut ledger = UserLedger {
            streak: 2,
            last_sleep_date: Some(date("2024-01-01")),
            tokens: 5,
            ..UserLedger::default()
        };
        let today = date("2024-01-03");

        assert!(can_claim(&ledger, today));
        assert_eq!(apply_claim(&mut ledger, today), Some(12));
        assert_eq!(ledger.tokens, 17);
        assert_eq!(ledger.last_claim_date, Some(today));
        assert!(!can_claim(&ledger, today));
    }

    #[test]
    fn second_claim_on_the_same_day_is_a_no_op() {
        let mut ledger = UserLedger {
            streak: 1,
            last_sleep_date: Some(date("2024-01-01")),
            ..UserLedger::default()
        };
        let today = date("2024-01-02");

        assert!(apply_claim(&mut ledger, today).is_some());
        let balance = ledger.tokens;
        assert_eq!(apply_claim(&mut ledger, today), None);
        assert_eq!(ledger.tokens, balance);
    }

    #[test]
    fn testing_mode_allows_unlimited_claims() {
        let mut ledger = UserLedger {
            streak: 2,
            testing_mode: true,
            ..UserLedger::default()
        };
        let today = date("2024-01-03");

        for round in 1..=3u64 {
            assert!(can_claim(&ledger, today));
            assert_eq!(apply_claim(&mut ledger, today), Some(12));
            assert_eq!(ledger.tokens, round * 12);
        }
        assert_eq!(ledger.last_claim_date, None);
    }
}
