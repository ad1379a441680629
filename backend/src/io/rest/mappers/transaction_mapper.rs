use crate::domain::commands::transactions::{
    CategorySummary, LogTransactionCommand, TransactionListResult,
};
use crate::domain::models::transaction::{
    Transaction as DomainTransaction, TransactionType as DomainTransactionType,
};
use shared::{
    CategorySummaryResponse, CategoryTotal, CreateTransactionRequest,
    Transaction as SharedTransaction, TransactionListResponse,
    TransactionType as SharedTransactionType,
};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            date: domain.date.format("%Y-%m-%d").to_string(),
            item: domain.item,
            amount: domain.amount,
            category: domain.category,
            transaction_type: Self::to_dto_type(domain.transaction_type),
            recorded_at: domain.recorded_at.to_rfc3339(),
        }
    }

    pub fn to_log_command(request: CreateTransactionRequest) -> LogTransactionCommand {
        LogTransactionCommand {
            item: request.item,
            amount: request.amount,
            category: request.category,
            transaction_type: request.transaction_type,
            date: request.date,
        }
    }

    pub fn to_list_response(result: TransactionListResult) -> TransactionListResponse {
        TransactionListResponse {
            data: result.transactions.into_iter().map(Self::to_dto).collect(),
            total: result.total,
        }
    }

    pub fn to_summary_response(summary: CategorySummary) -> CategorySummaryResponse {
        CategorySummaryResponse {
            period: summary.period.to_string(),
            categories: summary
                .categories
                .into_iter()
                .map(|c| CategoryTotal {
                    total: c.total(),
                    category: c.category,
                    fixed: c.fixed,
                    variable: c.variable,
                })
                .collect(),
            total: summary.total,
        }
    }

    fn to_dto_type(domain_type: DomainTransactionType) -> SharedTransactionType {
        match domain_type {
            DomainTransactionType::Fixed => SharedTransactionType::Fixed,
            DomainTransactionType::Variable => SharedTransactionType::Variable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    #[test]
    fn test_to_dto_uses_iso_dates() {
        let domain = DomainTransaction {
            id: "fx-1-abcd1234".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
            item: "Rent".to_string(),
            amount: 400.0,
            category: "Housing".to_string(),
            transaction_type: DomainTransactionType::Fixed,
            recorded_at: FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 2, 8, 30, 0)
                .unwrap(),
        };

        let dto = TransactionMapper::to_dto(domain);
        assert_eq!(dto.date, "2026-10-02");
        assert_eq!(dto.recorded_at, "2026-10-02T08:30:00+07:00");
        assert_eq!(dto.transaction_type, SharedTransactionType::Fixed);
    }
}
