use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::application::BankService;
use crate::domain::{Account, LedgerError, MortgageApplication, Transaction, User};
use crate::storage::{AccountRegistry, MortgageWorkbench, TransactionLedger, UserDirectory};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// A record that could not be imported
#[derive(Debug, Clone)]
pub struct ImportError {
    /// Top-level collection the record came from, e.g. `accounts`
    pub section: &'static str,
    /// Zero-based position inside that collection
    pub index: usize,
    pub error: String,
}

impl ImportResult {
    fn skip(&mut self, section: &'static str, index: usize, error: impl ToString) {
        let error = error.to_string();
        tracing::warn!(section, index, %error, "skipping bootstrap record");
        self.skipped += 1;
        self.errors.push(ImportError {
            section,
            index,
            error,
        });
    }
}

/// Raw shape of a bootstrap file. Records are decoded one at a time so a
/// single bad entry does not spoil the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BootstrapFile {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    accounts: Vec<Value>,
    #[serde(default)]
    transactions: Vec<Value>,
    #[serde(default)]
    mortgage_applications: Vec<Value>,
}

/// Build a bank from a JSON bootstrap file.
///
/// A missing file is not an error: the bank simply starts empty.
pub fn load_bank(
    path: impl AsRef<Path>,
    name: &str,
    location: &str,
) -> Result<(BankService, ImportResult)> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "bootstrap file not found, starting with an empty bank");
        return Ok((BankService::new(name, location), ImportResult::default()));
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open bootstrap file: {}", path.display()))?;
    let (bank, result) = Importer::new(name, location)
        .import_json(file)
        .with_context(|| format!("Failed to load bootstrap file: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        imported = result.imported,
        skipped = result.skipped,
        "bank loaded"
    );
    Ok((bank, result))
}

/// Importer assembling a bank's stores from serialized records
pub struct Importer {
    name: String,
    location: String,
    accounts: AccountRegistry,
    users: UserDirectory,
    ledger: TransactionLedger,
    mortgages: MortgageWorkbench,
    result: ImportResult,
}

impl Importer {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            accounts: AccountRegistry::new(),
            users: UserDirectory::new(),
            ledger: TransactionLedger::new(),
            mortgages: MortgageWorkbench::new(),
            result: ImportResult::default(),
        }
    }

    /// Seed account number generation, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.accounts = AccountRegistry::with_seed(seed);
        self
    }

    /// Import a bootstrap document or an exported snapshot.
    /// Malformed JSON fails the whole import; invalid records are skipped.
    pub fn import_json<R: Read>(mut self, reader: R) -> Result<(BankService, ImportResult)> {
        let file: BootstrapFile =
            serde_json::from_reader(reader).context("Bootstrap data is not valid JSON")?;

        for (index, value) in file.users.into_iter().enumerate() {
            let outcome = decode::<User>(value)
                .map_err(|e| e.to_string())
                .and_then(|user| self.users.insert(user).map(|_| ()).map_err(|e| e.to_string()));
            self.tally("users", index, outcome);
        }

        for (index, value) in file.accounts.into_iter().enumerate() {
            let outcome = decode::<Account>(value)
                .map_err(|e| e.to_string())
                .and_then(|account| self.restore_account(account).map_err(|e| e.to_string()));
            self.tally("accounts", index, outcome);
        }

        for (index, value) in file.transactions.into_iter().enumerate() {
            let outcome = decode::<Transaction>(value)
                .map_err(|e| e.to_string())
                .and_then(|tx| self.restore_transaction(tx).map_err(|e| e.to_string()));
            self.tally("transactions", index, outcome);
        }

        for (index, value) in file.mortgage_applications.into_iter().enumerate() {
            let outcome = decode::<MortgageApplication>(value)
                .map_err(|e| e.to_string())
                .and_then(|app| self.mortgages.insert(app).map(|_| ()).map_err(|e| e.to_string()));
            self.tally("mortgageApplications", index, outcome);
        }

        let bank = BankService::from_parts(
            self.name,
            self.location,
            self.accounts,
            self.users,
            self.ledger,
            self.mortgages,
        );
        Ok((bank, self.result))
    }

    fn tally(&mut self, section: &'static str, index: usize, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.result.imported += 1,
            Err(e) => self.result.skip(section, index, e),
        }
    }

    fn restore_account(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.users.get_by_id(account.owner_id()).is_none() {
            tracing::warn!(
                account = %account.account_number(),
                owner = %account.owner_id(),
                "account owner is not a registered user"
            );
        }
        self.accounts.insert(account).map(|_| ())
    }

    fn restore_transaction(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        let parties = [Some(tx.primary_account()), tx.recipient_account()];
        for id in parties.into_iter().flatten() {
            if self.accounts.get_by_id(id).is_none() {
                return Err(LedgerError::AccountNotFound(id.to_string()));
            }
        }
        self.ledger.restore(tx).map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}
