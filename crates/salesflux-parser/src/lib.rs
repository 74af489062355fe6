pub mod errors;
mod columns;
mod loader;
pub mod model;

pub use columns::parse_date;
pub use errors::LoadError;
pub use loader::{load_transactions, parse_transactions};
pub use model::{TransactionTable, TABLE_COLUMNS};

#[cfg(test)]
mod tests;
