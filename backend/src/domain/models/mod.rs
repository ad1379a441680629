pub mod budget;
pub mod period;
pub mod transaction;
