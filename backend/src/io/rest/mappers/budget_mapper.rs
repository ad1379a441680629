use crate::domain::budget_simulator::SimulatedDay;
use crate::domain::commands::budget::BudgetStatusView;
use crate::domain::models::budget::BudgetPeriod as DomainBudgetPeriod;
use shared::{
    BudgetLimits, BudgetPeriod as SharedBudgetPeriod, BudgetStatusDetails, BudgetStatusResponse,
    DailyBreakdownEntry,
};

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn to_dto(domain: DomainBudgetPeriod) -> SharedBudgetPeriod {
        SharedBudgetPeriod {
            status: domain.status.as_str().to_string(),
            name: domain.name,
            start_date: domain.start_date.format("%Y-%m-%d").to_string(),
            end_date: domain.end_date.format("%Y-%m-%d").to_string(),
            principal: domain.principal,
            fixed_spent: domain.fixed_spent,
            variable_spent: domain.variable_spent,
        }
    }

    /// Status for the dashboard. Spent figures come from the ledger, not the stored counters.
    pub fn to_status_response(view: BudgetStatusView) -> BudgetStatusResponse {
        let (budget, snapshot) = match view {
            BudgetStatusView::Inactive => return BudgetStatusResponse::inactive(),
            BudgetStatusView::Active { budget, snapshot } => (budget, snapshot),
        };

        BudgetStatusResponse {
            active: true,
            details: Some(BudgetStatusDetails {
                name: budget.name,
                start_date: budget.start_date.format("%Y-%m-%d").to_string(),
                end_date: budget.end_date.format("%Y-%m-%d").to_string(),
                principal: budget.principal,
                fixed_spent: snapshot.fixed_spent,
                variable_spent: snapshot.variable_spent,
                days_left: snapshot.days_left,
                total_days: snapshot.total_duration_days,
                disposable_total: snapshot.disposable_total,
                base_daily_limit: snapshot.base_daily_limit,
                limits: BudgetLimits {
                    daily: snapshot.daily_limit,
                    spent_today: snapshot.spent_today,
                    left_today: snapshot.left_today,
                    safety_buffer: snapshot.safety_buffer,
                    is_warning: snapshot.is_warning,
                },
            }),
        }
    }

    pub fn to_breakdown_entry(day: SimulatedDay) -> DailyBreakdownEntry {
        DailyBreakdownEntry {
            date: day.date.format("%Y-%m-%d").to_string(),
            spent: day.spent,
            limit_before: day.limit_before,
            limit_after: day.limit_after,
            piggy_bank: day.piggy_bank,
        }
    }
}
