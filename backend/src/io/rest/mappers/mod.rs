pub mod budget_mapper;
pub mod transaction_mapper;

pub use budget_mapper::BudgetMapper;
pub use transaction_mapper::TransactionMapper;
