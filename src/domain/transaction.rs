use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Amount};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which accounts a transaction touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit { account: AccountId },
    Withdrawal { account: AccountId },
    Transfer { sender: AccountId, recipient: AccountId },
}

/// Immutable audit record of one balance-affecting event.
///
/// Records are only created by the transaction ledger at the moment the
/// matching balance mutation succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub amount: Amount,
    pub kind: TransactionKind,
}

impl Transaction {
    pub(crate) fn new(kind: TransactionKind, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            amount,
            kind,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Deposit { .. } => TransactionType::Deposit,
            TransactionKind::Withdrawal { .. } => TransactionType::Withdrawal,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
        }
    }

    /// The account the event was initiated on (the sender for transfers).
    pub fn primary_account(&self) -> AccountId {
        match self.kind {
            TransactionKind::Deposit { account } | TransactionKind::Withdrawal { account } => {
                account
            }
            TransactionKind::Transfer { sender, .. } => sender,
        }
    }

    pub fn recipient_account(&self) -> Option<AccountId> {
        match self.kind {
            TransactionKind::Transfer { recipient, .. } => Some(recipient),
            _ => None,
        }
    }

    /// Returns true if the account is a party to this transaction
    pub fn involves(&self, account: AccountId) -> bool {
        self.primary_account() == account || self.recipient_account() == Some(account)
    }

    /// Signed effect of this transaction on the given account's balance.
    pub fn effect_on(&self, account: AccountId) -> Amount {
        match self.kind {
            TransactionKind::Deposit { account: a } if a == account => self.amount,
            TransactionKind::Withdrawal { account: a } if a == account => -self.amount,
            TransactionKind::Transfer { sender, .. } if sender == account => -self.amount,
            TransactionKind::Transfer { recipient, .. } if recipient == account => self.amount,
            _ => 0.0,
        }
    }
}
