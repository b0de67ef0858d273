use thiserror::Error;

use super::{Amount, ApplicationStatus, Capability};

/// Every way a ledger, workflow or directory operation can be refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid amount {amount}: amounts must be positive")]
    InvalidAmount { amount: Amount },

    #[error(
        "Insufficient funds in account #{account_number}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        account_number: String,
        balance: Amount,
        requested: Amount,
    },

    #[error("No account with #{0} was found")]
    AccountNotFound(String),

    #[error("Account already registered: {0}")]
    DuplicateAccount(String),

    #[error("Sender and recipient are the same account #{0}")]
    SameAccountTransfer(String),

    #[error("Could not allocate a free account number after {attempts} attempts")]
    AccountNumbersExhausted { attempts: usize },

    #[error("Incomplete application. Please provide all required information")]
    IncompleteApplication,

    #[error("Mortgage application not found: {0}")]
    ApplicationNotFound(String),

    #[error("Mortgage application already registered: {0}")]
    DuplicateApplication(String),

    #[error("Application #{id} is {from} and cannot become {to}")]
    IllegalTransition {
        id: String,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("User not found with the provided credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User '{0}' is deactivated")]
    UserInactive(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    #[error("User '{username}' is not allowed to {capability}")]
    Unauthorized {
        username: String,
        capability: Capability,
    },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}
