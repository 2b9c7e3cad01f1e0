pub mod champion;
pub mod financial;
pub mod ledger;
pub mod summary;
