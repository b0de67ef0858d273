use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Account, AccountId, AccountType, Amount, LedgerError, UserId};

/// How many random draws to try before giving up on finding a free account number.
pub const MAX_NUMBER_ATTEMPTS: usize = 64;

const NUMBER_RANGE: std::ops::Range<u32> = 100_000_000..1_000_000_000;

/// Owns every account of the bank, in opening order.
#[derive(Debug)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
    rng: StdRng,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Registry with a reproducible account-number sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            accounts: Vec::new(),
            rng,
        }
    }

    /// Open a new empty account with a freshly allocated 9-digit account number.
    pub fn create_account(
        &mut self,
        name: String,
        owner_id: UserId,
        account_type: AccountType,
    ) -> Result<&Account, LedgerError> {
        let number = self.allocate_number()?;
        let account = Account::new(number, name, account_type, owner_id);
        self.accounts.push(account);
        Ok(&self.accounts[self.accounts.len() - 1])
    }

    /// Draw account numbers until one is not in use.
    fn allocate_number(&mut self) -> Result<String, LedgerError> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = self.rng.gen_range(NUMBER_RANGE).to_string();
            if !self.contains_number(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(number = %candidate, "account number collision, drawing again");
        }
        Err(LedgerError::AccountNumbersExhausted {
            attempts: MAX_NUMBER_ATTEMPTS,
        })
    }

    /// Register an existing account, e.g. one loaded at startup.
    pub fn insert(&mut self, account: Account) -> Result<&Account, LedgerError> {
        let balance = account.balance();
        if !balance.is_finite() || balance < 0.0 {
            return Err(LedgerError::InvalidAmount { amount: balance });
        }
        if self.get_by_id(account.id()).is_some() {
            return Err(LedgerError::DuplicateAccount(account.id().to_string()));
        }
        if self.contains_number(account.account_number()) {
            return Err(LedgerError::DuplicateAccount(
                account.account_number().to_string(),
            ));
        }
        self.accounts.push(account);
        Ok(&self.accounts[self.accounts.len() - 1])
    }

    pub fn contains_number(&self, account_number: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| account.account_number() == account_number)
    }

    pub fn get_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id() == id)
    }

    pub fn get_by_number(&self, account_number: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .iter()
            .find(|account| account.account_number() == account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    pub fn get_by_number_mut(&mut self, account_number: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .iter_mut()
            .find(|account| account.account_number() == account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    pub fn balance_of(&self, id: AccountId) -> Option<Amount> {
        self.get_by_id(id).map(Account::balance)
    }

    /// Borrow two distinct accounts mutably at once, looked up by account number.
    pub fn pair_mut(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<(&mut Account, &mut Account), LedgerError> {
        let i = self.position(first)?;
        let j = self.position(second)?;
        if i == j {
            return Err(LedgerError::SameAccountTransfer(first.to_string()));
        }

        if i < j {
            let (head, tail) = self.accounts.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.accounts.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }

    fn position(&self, account_number: &str) -> Result<usize, LedgerError> {
        self.accounts
            .iter()
            .position(|account| account.account_number() == account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    pub fn owned_by(&self, owner_id: UserId) -> impl Iterator<Item = &Account> {
        self.accounts
            .iter()
            .filter(move |account| account.is_owned_by(owner_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_create_account_starts_at_zero() {
        let mut registry = AccountRegistry::with_seed(7);
        let owner = Uuid::new_v4();

        let account = registry
            .create_account("Savings".into(), owner, AccountType::Savings)
            .unwrap();

        assert_eq!(account.balance(), 0.0);
        assert_eq!(account.owner_id(), owner);
        assert_eq!(account.account_number().len(), 9);
        assert!(account.account_number().chars().all(|c| c.is_ascii_digit()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_account_numbers_are_unique() {
        let mut registry = AccountRegistry::with_seed(1);
        let owner = Uuid::new_v4();
        for _ in 0..500 {
            registry
                .create_account("A".into(), owner, AccountType::Checking)
                .unwrap();
        }

        let mut numbers: Vec<&str> = registry.iter().map(|a| a.account_number()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 500);
    }

    #[test]
    fn test_colliding_number_is_redrawn() {
        // Two registries with the same seed draw the same first number.
        let mut reference = AccountRegistry::with_seed(42);
        let first_number = reference
            .create_account("Ref".into(), Uuid::new_v4(), AccountType::Savings)
            .unwrap()
            .account_number()
            .to_string();

        let mut registry = AccountRegistry::with_seed(42);
        let taken = Account::new(
            first_number.clone(),
            "Taken".into(),
            AccountType::Savings,
            Uuid::new_v4(),
        );
        registry.insert(taken).unwrap();

        let fresh = registry
            .create_account("Fresh".into(), Uuid::new_v4(), AccountType::Savings)
            .unwrap();
        assert_ne!(fresh.account_number(), first_number);
    }

    #[test]
    fn test_lookups() {
        let mut registry = AccountRegistry::with_seed(3);
        let account = registry
            .create_account("Main".into(), Uuid::new_v4(), AccountType::Checking)
            .unwrap()
            .clone();

        assert_eq!(registry.get_by_id(account.id()), Some(&account));
        assert_eq!(registry.get_by_id(Uuid::new_v4()), None);
        assert_eq!(
            registry.get_by_number(account.account_number()).unwrap(),
            &account
        );
        assert_eq!(
            registry.get_by_number("000000000"),
            Err(LedgerError::AccountNotFound("000000000".into()))
        );
        assert_eq!(registry.balance_of(account.id()), Some(0.0));
        assert_eq!(registry.balance_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_negative_balances() {
        let mut registry = AccountRegistry::with_seed(5);
        let account = registry
            .create_account("Main".into(), Uuid::new_v4(), AccountType::Checking)
            .unwrap()
            .clone();

        assert!(matches!(
            registry.insert(account.clone()),
            Err(LedgerError::DuplicateAccount(_))
        ));

        let json = format!(
            r#"{{"id":"{}","accountNumber":"222222222","accountName":"Bad","accountType":"SAVINGS","ownerId":"{}","balance":-1.0}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let negative: Account = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            registry.insert(negative),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_pair_mut_in_both_orders() {
        let mut registry = AccountRegistry::with_seed(9);
        let owner = Uuid::new_v4();
        let a = registry
            .create_account("A".into(), owner, AccountType::Checking)
            .unwrap()
            .account_number()
            .to_string();
        let b = registry
            .create_account("B".into(), owner, AccountType::Checking)
            .unwrap()
            .account_number()
            .to_string();

        let (first, second) = registry.pair_mut(&a, &b).unwrap();
        assert_eq!(first.account_number(), a);
        assert_eq!(second.account_number(), b);

        let (first, second) = registry.pair_mut(&b, &a).unwrap();
        assert_eq!(first.account_number(), b);
        assert_eq!(second.account_number(), a);

        assert_eq!(
            registry.pair_mut(&a, &a).unwrap_err(),
            LedgerError::SameAccountTransfer(a.clone())
        );
        assert!(matches!(
            registry.pair_mut(&a, "000000000"),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_owned_by() {
        let mut registry = AccountRegistry::with_seed(11);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        registry.create_account("A1".into(), alice, AccountType::Checking).unwrap();
        registry.create_account("B1".into(), bob, AccountType::Savings).unwrap();
        registry.create_account("A2".into(), alice, AccountType::Savings).unwrap();

        let names: Vec<&str> = registry.owned_by(alice).map(|a| a.name()).collect();
        assert_eq!(names, vec!["A1", "A2"]);
    }
}
