//! Moving bank state in and out of the process: JSON bootstrap files,
//! JSON snapshots and CSV exports.

pub mod export;
pub mod import;

pub use export::{BankSnapshot, Exporter};
pub use import::{load_bank, ImportError, ImportResult, Importer};
