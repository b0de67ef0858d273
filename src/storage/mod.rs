//! In-memory stores owning the bank's state. Nothing here outlives the process.

mod account_registry;
mod mortgage_workbench;
mod transaction_ledger;
mod user_directory;

pub use account_registry::*;
pub use mortgage_workbench::*;
pub use transaction_ledger::*;
pub use user_directory::*;
