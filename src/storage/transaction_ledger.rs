//! Append-only audit trail of balance-affecting events.
//!
//! The ledger is the only component that changes balances: every successful
//! mutation is paired with exactly one appended [`Transaction`], and a failed
//! mutation appends nothing.

use crate::domain::{
    validate_amount, Account, AccountId, Amount, LedgerError, Transaction, TransactionId,
    TransactionKind, TransactionType,
};

#[derive(Debug, Default)]
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit into or withdraw from one account and record it.
    pub fn record_single(
        &mut self,
        account: &mut Account,
        transaction_type: TransactionType,
        amount: Amount,
    ) -> Result<&Transaction, LedgerError> {
        let kind = match transaction_type {
            TransactionType::Deposit => {
                account.deposit(amount)?;
                TransactionKind::Deposit {
                    account: account.id(),
                }
            }
            TransactionType::Withdrawal => {
                account.withdraw(amount)?;
                TransactionKind::Withdrawal {
                    account: account.id(),
                }
            }
            TransactionType::Transfer => {
                return Err(LedgerError::InvalidTransaction(
                    "a transfer needs a sender and a recipient".to_string(),
                ));
            }
        };

        Ok(self.append(Transaction::new(kind, amount)))
    }

    /// Move funds between two accounts and record a single transfer.
    pub fn record_transfer(
        &mut self,
        sender: &mut Account,
        recipient: &mut Account,
        amount: Amount,
    ) -> Result<&Transaction, LedgerError> {
        sender.transfer(recipient, amount)?;
        let kind = TransactionKind::Transfer {
            sender: sender.id(),
            recipient: recipient.id(),
        };
        Ok(self.append(Transaction::new(kind, amount)))
    }

    /// Append a historical record whose effect is already reflected in balances.
    pub fn restore(&mut self, transaction: Transaction) -> Result<&Transaction, LedgerError> {
        if validate_amount(transaction.amount).is_err() {
            return Err(LedgerError::InvalidTransaction(format!(
                "{} has an invalid amount",
                transaction.id
            )));
        }
        if self.contains_id(transaction.id) {
            return Err(LedgerError::InvalidTransaction(format!(
                "{} is already recorded",
                transaction.id
            )));
        }
        Ok(self.append(transaction))
    }

    fn append(&mut self, transaction: Transaction) -> &Transaction {
        self.transactions.push(transaction);
        &self.transactions[self.transactions.len() - 1]
    }

    fn contains_id(&self, id: TransactionId) -> bool {
        self.transactions.iter().any(|tx| tx.id == id)
    }

    /// Transactions the account took part in, oldest first.
    pub fn transactions_for(&self, account: AccountId) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |tx| tx.involves(account))
    }

    pub fn find_by_id(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.transactions
            .iter()
            .find(|tx| tx.id == id)
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))
    }

    pub fn is_recorded(&self, transaction: &Transaction) -> bool {
        self.transactions.contains(transaction)
    }

    /// Fail unless this exact record is part of the ledger.
    pub fn validate(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        if self.is_recorded(transaction) {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransaction(format!(
                "{} is not part of the ledger",
                transaction.id
            )))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
