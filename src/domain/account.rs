use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_amount, Amount, LedgerError, UserId};

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Interest-bearing account for money set aside
    Savings,
    /// Everyday transactional account
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Checking => "checking",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(AccountType::Savings),
            "checking" => Some(AccountType::Checking),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer account. The balance can only change through [`Account::deposit`],
/// [`Account::withdraw`] and [`Account::transfer`], and never drops below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    account_number: String,
    account_name: String,
    account_type: AccountType,
    owner_id: UserId,
    balance: Amount,
}

impl Account {
    /// Open an empty account. The account number must be allocated by the registry.
    pub fn new(
        account_number: String,
        account_name: String,
        account_type: AccountType,
        owner_id: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number,
            account_name,
            account_type,
            owner_id,
            balance: 0.0,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn name(&self) -> &str {
        &self.account_name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Add funds and return the new balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        let amount = self.check_credit(amount)?;
        self.balance += amount;
        Ok(self.balance)
    }

    /// Remove funds and return the new balance.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        let amount = self.check_debit(amount)?;
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Move funds to `recipient` and return this account's new balance.
    ///
    /// Everything that can fail is checked before either balance is touched,
    /// so the credit and the debit always happen together.
    pub fn transfer(&mut self, recipient: &mut Account, amount: Amount) -> Result<Amount, LedgerError> {
        let amount = self.check_debit(amount)?;
        let amount = recipient.check_credit(amount)?;
        recipient.balance += amount;
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Validate that `amount` can be added without the balance leaving the
    /// range of finite numbers.
    pub fn check_credit(&self, amount: Amount) -> Result<Amount, LedgerError> {
        let amount = validate_amount(amount)?;
        if !(self.balance + amount).is_finite() {
            return Err(LedgerError::InvalidAmount { amount });
        }
        Ok(amount)
    }

    /// Validate that `amount` can be taken out of this account.
    pub fn check_debit(&self, amount: Amount) -> Result<Amount, LedgerError> {
        let amount = validate_amount(amount)?;
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account_number: self.account_number.clone(),
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(amount)
    }
}

/// Accounts are the same account when both the internal id and the account number match.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.account_number == other.account_number
    }
}

impl Eq for Account {}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.account_name, self.account_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account(number: &str) -> Account {
        Account::new(
            number.to_string(),
            "Everyday".to_string(),
            AccountType::Checking,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_account_type_roundtrip() {
        for at in [AccountType::Savings, AccountType::Checking] {
            let parsed = AccountType::from_str(at.as_str()).unwrap();
            assert_eq!(at, parsed);
        }
        assert_eq!(AccountType::from_str("SAVINGS"), Some(AccountType::Savings));
        assert_eq!(AccountType::from_str("brokerage"), None);
    }

    #[test]
    fn test_new_account_is_empty() {
        let account = sample_account("100000001");
        assert_eq!(account.balance(), 0.0);
        assert_eq!(account.account_number(), "100000001");
        assert_eq!(account.name(), "Everyday");
    }

    #[test]
    fn test_deposit_returns_new_balance() {
        let mut account = sample_account("100000001");
        assert_eq!(account.deposit(100.0), Ok(100.0));
        assert_eq!(account.deposit(25.5), Ok(125.5));
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        let mut account = sample_account("100000001");
        account.deposit(10.0).unwrap();

        for amount in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                account.deposit(amount),
                Err(LedgerError::InvalidAmount { .. })
            ));
            assert!(matches!(
                account.withdraw(amount),
                Err(LedgerError::InvalidAmount { .. })
            ));
        }
        assert_eq!(account.balance(), 10.0);
    }

    #[test]
    fn test_withdraw_more_than_balance_fails() {
        let mut account = sample_account("100000001");
        account.deposit(100.0).unwrap();

        let err = account.withdraw(150.0).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                account_number: "100000001".into(),
                balance: 100.0,
                requested: 150.0,
            }
        );
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = sample_account("100000001");
        account.deposit(40.0).unwrap();
        assert_eq!(account.withdraw(40.0), Ok(0.0));
    }

    #[test]
    fn test_transfer_moves_exact_amount() {
        let mut sender = sample_account("100000001");
        let mut recipient = sample_account("100000002");
        sender.deposit(100.0).unwrap();

        assert_eq!(sender.transfer(&mut recipient, 60.0), Ok(40.0));
        assert_eq!(sender.balance(), 40.0);
        assert_eq!(recipient.balance(), 60.0);
    }

    #[test]
    fn test_failed_transfer_changes_nothing() {
        let mut sender = sample_account("100000001");
        let mut recipient = sample_account("100000002");
        sender.deposit(10.0).unwrap();

        assert!(matches!(
            sender.transfer(&mut recipient, 11.0),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            sender.transfer(&mut recipient, -1.0),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(sender.balance(), 10.0);
        assert_eq!(recipient.balance(), 0.0);
    }

    #[test]
    fn test_credit_that_overflows_the_balance_is_refused() {
        let mut account = sample_account("100000001");
        account.deposit(f64::MAX).unwrap();

        assert_eq!(
            account.deposit(f64::MAX),
            Err(LedgerError::InvalidAmount { amount: f64::MAX })
        );
        assert_eq!(account.balance(), f64::MAX);

        let mut sender = sample_account("100000002");
        sender.deposit(f64::MAX).unwrap();
        assert!(matches!(
            sender.transfer(&mut account, f64::MAX),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(sender.balance(), f64::MAX);
        assert_eq!(account.balance(), f64::MAX);
    }

    #[test]
    fn test_equality_ignores_balance() {
        let account = sample_account("100000001");
        let mut copy = account.clone();
        copy.deposit(5.0).unwrap();
        assert_eq!(account, copy);

        let other = sample_account("100000001");
        assert_ne!(account, other);
    }

    #[test]
    fn test_json_field_names() {
        let account = sample_account("100000001");
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["accountNumber"], "100000001");
        assert_eq!(json["accountName"], "Everyday");
        assert_eq!(json["accountType"], "CHECKING");
        assert!(json.get("ownerId").is_some());
    }
}
