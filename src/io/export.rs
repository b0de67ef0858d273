use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::BankService;
use crate::domain::{Account, MortgageApplication, Transaction, TransactionKind, User};

pub const SNAPSHOT_VERSION: &str = "1";

/// Full bank state, also readable as a bootstrap file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub mortgage_applications: Vec<MortgageApplication>,
}

/// Exporter for converting bank data to JSON and CSV
pub struct Exporter<'a> {
    service: &'a BankService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BankService) -> Self {
        Self { service }
    }

    /// Capture the current state of every store.
    pub fn snapshot(&self) -> BankSnapshot {
        BankSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: Utc::now(),
            users: self.service.users().iter().cloned().collect(),
            accounts: self.service.accounts().iter().cloned().collect(),
            transactions: self.service.ledger().iter().cloned().collect(),
            mortgage_applications: self.service.mortgages().iter().cloned().collect(),
        }
    }

    /// Export the full snapshot as pretty JSON
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<BankSnapshot> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(snapshot)
    }

    /// Export account balances to CSV format
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "account_number",
            "name",
            "type",
            "owner",
            "balance",
        ])?;

        let mut count = 0;
        for account in self.service.accounts().iter() {
            let owner = self
                .service
                .users()
                .get_by_id(account.owner_id())
                .map(|user| user.username.clone())
                .unwrap_or_else(|| account.owner_id().to_string());

            let balance = format!("{:.2}", account.balance());
            csv_writer.write_record([
                account.account_number(),
                account.name(),
                account.account_type().as_str(),
                owner.as_str(),
                balance.as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export one account's statement to CSV format.
    /// Amounts are signed from the account's point of view.
    pub fn export_statement_csv<W: Write>(&self, account_number: &str, writer: W) -> Result<usize> {
        let account = self.service.get_account_by_number(account_number)?;
        let transactions = self.service.account_transactions(account_number)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "timestamp", "type", "amount", "counterparty"])?;

        let mut count = 0;
        for tx in &transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.timestamp.to_rfc3339(),
                tx.transaction_type().to_string(),
                format!("{:.2}", tx.effect_on(account.id())),
                self.counterparty(account, tx),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    fn counterparty(&self, account: &Account, tx: &Transaction) -> String {
        let other = match tx.kind {
            TransactionKind::Transfer { sender, recipient } if sender == account.id() => recipient,
            TransactionKind::Transfer { sender, .. } => sender,
            _ => return String::new(),
        };
        self.service
            .accounts()
            .get_by_id(other)
            .map(|acc| acc.account_number().to_string())
            .unwrap_or_else(|| other.to_string())
    }
}
