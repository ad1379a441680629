//! Day-by-day budget simulation ("piggy bank" logic).
//!
//! The simulator is a pure function of the budget period, the ledger and the evaluation
//! instant. It replays every finished day of the period to find today's effective daily
//! limit:
//!
//! - the base limit is the disposable total (principal minus fixed spend) split evenly over
//!   the inclusive length of the period;
//! - a day spent below the current limit credits the difference to the piggy bank and leaves
//!   the limit unchanged;
//! - a day spent above the current limit lowers the limit by the overspend divided by the
//!   days still remaining after that day, so the cut is spread over the rest of the period;
//! - the piggy bank is reported as a safety buffer but never raises future limits.
//!
//! Underspending is rewarded with a visible buffer, overspending permanently tightens every
//! later day. Replaying from the first day on each call keeps the result consistent with
//! the ledger at the cost of O(period length) work.

use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::HashMap;

use crate::domain::models::budget::{BudgetPeriod, LedgerAggregates};
use crate::domain::models::transaction::Transaction;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// One replayed day of the period
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedDay {
    pub date: NaiveDate,
    pub spent: f64,
    pub limit_before: f64,
    pub limit_after: f64,
    pub piggy_bank: f64,
}

/// Result of simulating a budget at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSnapshot {
    pub days_left: u32,
    pub total_duration_days: u32,
    pub fixed_spent: f64,
    pub variable_spent: f64,
    pub disposable_total: f64,
    pub base_daily_limit: f64,
    /// Effective limit for today, never negative
    pub daily_limit: f64,
    pub safety_buffer: f64,
    pub spent_today: f64,
    pub left_today: f64,
    pub is_warning: bool,
    pub trace: Vec<SimulatedDay>,
}

pub struct BudgetSimulator;

impl BudgetSimulator {
    /// Simulate `period` against `ledger` as of `now`.
    ///
    /// `now` must already be expressed in the reference offset: its local date is "today".
    /// Fixed and variable totals are derived from the ledger rows inside the period, the
    /// counters stored on `period` are not consulted.
    pub fn simulate(
        period: &BudgetPeriod,
        ledger: &[Transaction],
        now: DateTime<FixedOffset>,
    ) -> BudgetSnapshot {
        let today = now.date_naive();
        let aggregates = LedgerAggregates::from_ledger(period.start_date, period.end_date, ledger);

        let total_duration_days = period.total_duration_days();
        let disposable_total = period.principal - aggregates.fixed_spent;
        let base_daily_limit = disposable_total / f64::from(total_duration_days);

        let daily_spend = Self::variable_spend_by_day(period, ledger);

        let mut current_limit = base_daily_limit;
        let mut piggy_bank = 0.0;
        let mut remaining_days = i64::from(total_duration_days);
        let mut trace = Vec::new();

        for date in period
            .start_date
            .iter_days()
            .take_while(|d| *d < today && *d <= period.end_date)
        {
            let spent = daily_spend.get(&date).copied().unwrap_or(0.0);
            let limit_before = current_limit;
            remaining_days -= 1;

            if spent < current_limit {
                piggy_bank += current_limit - spent;
            } else if spent > current_limit && remaining_days > 0 {
                let overspend = spent - current_limit;
                current_limit -= overspend / remaining_days as f64;
            }

            trace.push(SimulatedDay {
                date,
                spent,
                limit_before,
                limit_after: current_limit,
                piggy_bank,
            });
        }

        let daily_limit = current_limit.max(0.0);
        // Spending outside the period never counts against its limit
        let spent_today: f64 = if period.contains(today) {
            ledger
                .iter()
                .filter(|t| t.is_variable() && t.date == today)
                .map(|t| t.amount)
                .sum()
        } else {
            0.0
        };
        let left_today = daily_limit - spent_today;

        BudgetSnapshot {
            days_left: Self::days_left(period.end_date, now),
            total_duration_days,
            fixed_spent: aggregates.fixed_spent,
            variable_spent: aggregates.variable_spent,
            disposable_total,
            base_daily_limit,
            daily_limit,
            safety_buffer: piggy_bank,
            spent_today,
            left_today,
            is_warning: left_today < 0.0,
            trace,
        }
    }

    /// Whole days until the end of the final day (23:59:59.999), rounded up, at least 1
    pub fn days_left(end_date: NaiveDate, now: DateTime<FixedOffset>) -> u32 {
        let end_of_final_day = match end_date.and_hms_milli_opt(23, 59, 59, 999) {
            Some(end) => end,
            None => return 1,
        };
        let remaining_ms = (end_of_final_day - now.naive_local()).num_milliseconds();
        if remaining_ms <= 0 {
            return 1;
        }
        let days = (remaining_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
        u32::try_from(days).unwrap_or(u32::MAX).max(1)
    }

    fn variable_spend_by_day(period: &BudgetPeriod, ledger: &[Transaction]) -> HashMap<NaiveDate, f64> {
        let mut by_day: HashMap<NaiveDate, f64> = HashMap::new();
        for transaction in ledger
            .iter()
            .filter(|t| t.is_variable() && period.contains(t.date))
        {
            *by_day.entry(transaction.date).or_insert(0.0) += transaction.amount;
        }
        by_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::budget::BudgetStatus;
    use crate::domain::models::transaction::TransactionType;
    use chrono::TimeZone;

    const EPSILON: f64 = 1e-9;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2026, 10, d, h, m, s).unwrap()
    }

    fn period(start: u32, end: u32, principal: f64) -> BudgetPeriod {
        BudgetPeriod {
            name: "Test".to_string(),
            start_date: date(start),
            end_date: date(end),
            principal,
            fixed_spent: 0.0,
            variable_spent: 0.0,
            status: BudgetStatus::Active,
            created_at: "2026-10-01T00:00:00+07:00".to_string(),
            updated_at: "2026-10-01T00:00:00+07:00".to_string(),
        }
    }

    fn spend(d: u32, amount: f64) -> Transaction {
        tx(d, amount, TransactionType::Variable)
    }

    fn tx(d: u32, amount: f64, transaction_type: TransactionType) -> Transaction {
        Transaction {
            id: format!("t-{}-{}", d, amount),
            date: date(d),
            item: "item".to_string(),
            amount,
            category: "Other".to_string(),
            transaction_type,
            recorded_at: at(d, 12, 0, 0),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let budget = period(1, 10, 300.0);
        let ledger = vec![spend(1, 20.0), spend(2, 45.0)];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(3, 9, 0, 0));

        assert_eq!(snapshot.total_duration_days, 10);
        assert!((snapshot.base_daily_limit - 30.0).abs() < EPSILON);
        assert!((snapshot.daily_limit - 28.125).abs() < EPSILON);
        assert!((snapshot.safety_buffer - 10.0).abs() < EPSILON);
        assert_eq!(snapshot.trace.len(), 2);
        assert!((snapshot.trace[0].limit_after - 30.0).abs() < EPSILON);
        assert!((snapshot.trace[1].limit_after - 28.125).abs() < EPSILON);
    }

    #[test]
    fn test_no_spend_accumulates_full_base_limit() {
        let budget = period(1, 10, 300.0);
        for elapsed in 0..10u32 {
            let snapshot = BudgetSimulator::simulate(&budget, &[], at(1 + elapsed, 8, 0, 0));
            assert!((snapshot.daily_limit - snapshot.base_daily_limit).abs() < EPSILON);
            assert!((snapshot.safety_buffer - f64::from(elapsed) * 30.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_overspend_only_never_raises_limit() {
        let budget = period(1, 10, 300.0);
        let ledger: Vec<Transaction> = (1..=9).map(|d| spend(d, 30.0 + 5.0)).collect();

        let mut previous = f64::INFINITY;
        for d in 2..=10 {
            let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(d, 8, 0, 0));
            assert_eq!(snapshot.safety_buffer, 0.0);
            assert!(snapshot.daily_limit <= previous);
            previous = snapshot.daily_limit;
        }
        assert!(previous < 30.0);
    }

    #[test]
    fn test_limit_is_never_negative() {
        let budget = period(1, 10, 100.0);
        let ledger = vec![spend(1, 5_000.0), spend(2, 10_000.0), spend(3, 0.5)];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(5, 8, 0, 0));
        assert_eq!(snapshot.daily_limit, 0.0);
        assert!(snapshot.left_today <= 0.0);

        let over_principal = vec![tx(1, 1_000.0, TransactionType::Fixed)];
        let snapshot = BudgetSimulator::simulate(&budget, &over_principal, at(4, 8, 0, 0));
        assert!(snapshot.base_daily_limit < 0.0);
        assert_eq!(snapshot.daily_limit, 0.0);
    }

    #[test]
    fn test_exact_spend_changes_nothing() {
        let budget = period(1, 10, 300.0);
        let ledger = vec![spend(1, 30.0), spend(2, 30.0)];
        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(3, 8, 0, 0));
        assert!((snapshot.daily_limit - 30.0).abs() < EPSILON);
        assert_eq!(snapshot.safety_buffer, 0.0);
    }

    #[test]
    fn test_underspend_after_cut_credits_reduced_limit() {
        let budget = period(1, 10, 300.0);
        // Day 1 over by 18 (9 days remain) -> limit 28, day 2 spends 20 -> 8 into the bank
        let ledger = vec![spend(1, 48.0), spend(2, 20.0)];
        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(3, 8, 0, 0));
        assert!((snapshot.daily_limit - 28.0).abs() < EPSILON);
        assert!((snapshot.safety_buffer - 8.0).abs() < EPSILON);
    }

    #[test]
    fn test_fixed_spend_reduces_base_limit_only() {
        let mut budget = period(1, 10, 400.0);
        // Stored counters are ignored, the ledger is authoritative
        budget.fixed_spent = 999.0;
        let ledger = vec![tx(1, 100.0, TransactionType::Fixed), spend(1, 30.0)];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(2, 8, 0, 0));
        assert_eq!(snapshot.fixed_spent, 100.0);
        assert_eq!(snapshot.variable_spent, 30.0);
        assert!((snapshot.disposable_total - 300.0).abs() < EPSILON);
        assert!((snapshot.base_daily_limit - 30.0).abs() < EPSILON);
        assert_eq!(snapshot.safety_buffer, 0.0);
    }

    #[test]
    fn test_spent_today_and_warning() {
        let budget = period(1, 10, 300.0);
        let ledger = vec![
            spend(3, 25.0),
            spend(3, 10.0),
            tx(3, 500.0, TransactionType::Fixed),
        ];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(3, 20, 0, 0));
        let expected_base = (300.0 - 500.0) / 10.0;
        assert!((snapshot.base_daily_limit - expected_base).abs() < EPSILON);
        assert_eq!(snapshot.spent_today, 35.0);
        assert!(snapshot.is_warning);

        let budget = period(1, 10, 1_000.0);
        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(3, 20, 0, 0));
        assert!((snapshot.daily_limit - 50.0).abs() < EPSILON);
        assert!((snapshot.left_today - 15.0).abs() < EPSILON);
        assert!(!snapshot.is_warning);
    }

    #[test]
    fn test_days_left_rounds_up_and_floors_at_one() {
        let end = date(10);
        assert_eq!(BudgetSimulator::days_left(end, at(1, 0, 0, 0)), 10);
        assert_eq!(BudgetSimulator::days_left(end, at(10, 0, 0, 0)), 1);
        assert_eq!(BudgetSimulator::days_left(end, at(9, 23, 59, 59)), 2);

        let last_moment = offset()
            .with_ymd_and_hms(2026, 10, 10, 23, 59, 59)
            .unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(BudgetSimulator::days_left(end, last_moment), 1);
        assert_eq!(BudgetSimulator::days_left(end, at(20, 12, 0, 0)), 1);
    }

    #[test]
    fn test_single_day_period_is_finite() {
        let budget = period(5, 5, 50.0);
        let ledger = vec![spend(5, 80.0)];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(6, 8, 0, 0));
        assert!(snapshot.daily_limit.is_finite());
        assert_eq!(snapshot.daily_limit, 50.0);
        assert_eq!(snapshot.days_left, 1);
    }

    #[test]
    fn test_replay_stops_at_period_end() {
        let budget = period(1, 3, 90.0);
        let ledger = vec![spend(1, 10.0), spend(5, 200.0)];

        let snapshot = BudgetSimulator::simulate(&budget, &ledger, at(8, 8, 0, 0));
        assert_eq!(snapshot.trace.len(), 3);
        assert_eq!(snapshot.variable_spent, 10.0);
        assert!((snapshot.safety_buffer - 80.0).abs() < EPSILON);
    }

    #[test]
    fn test_before_period_start_uses_base_limit() {
        let budget = period(10, 19, 300.0);
        let snapshot = BudgetSimulator::simulate(&budget, &[], at(2, 8, 0, 0));
        assert!(snapshot.trace.is_empty());
        assert!((snapshot.daily_limit - 30.0).abs() < EPSILON);
        assert_eq!(snapshot.days_left, 18);
    }

    #[test]
    fn test_spending_outside_period_is_not_spent_today() {
        let budget = period(10, 19, 300.0);

        let before = BudgetSimulator::simulate(&budget, &[spend(2, 50.0)], at(2, 20, 0, 0));
        assert_eq!(before.spent_today, 0.0);
        assert!((before.left_today - 30.0).abs() < EPSILON);
        assert!(!before.is_warning);

        let after = BudgetSimulator::simulate(&budget, &[spend(25, 50.0)], at(25, 20, 0, 0));
        assert_eq!(after.spent_today, 0.0);
        assert!(!after.is_warning);
    }

    #[test]
    fn test_day_boundary_follows_reference_offset() {
        let budget = period(1, 10, 300.0);
        let ledger = vec![spend(2, 50.0)];

        // 2026-10-02 18:00 UTC is 2026-10-03 01:00 at UTC+7, so day 2 is already history
        let utc = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 2, 18, 0, 0)
            .unwrap();
        let snapshot = BudgetSimulator::simulate(&budget, &ledger, utc.with_timezone(&offset()));
        assert_eq!(snapshot.trace.len(), 2);
        assert_eq!(snapshot.spent_today, 0.0);
        assert!(snapshot.daily_limit < 30.0);
    }
}
