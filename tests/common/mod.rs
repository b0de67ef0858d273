// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bankea::application::BankService;
use bankea::domain::{Account, AccountType, Role, User};
use bankea::storage::{AccountRegistry, MortgageWorkbench, TransactionLedger, UserDirectory};
use tempfile::TempDir;

pub const BANK_NAME: &str = "Bankea";
pub const BANK_LOCATION: &str = "Main street";

/// Helper to create an empty bank with reproducible account numbers
pub fn test_bank() -> BankService {
    BankService::from_parts(
        BANK_NAME,
        BANK_LOCATION,
        AccountRegistry::with_seed(7),
        UserDirectory::new(),
        TransactionLedger::new(),
        MortgageWorkbench::new(),
    )
}

/// Helper to get a scratch directory for data files
pub fn temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Test fixture: one user per role plus two client accounts
pub struct StandardBank {
    pub bank: BankService,
    pub client: User,
    pub other_client: User,
    pub desk: User,
    pub credit: User,
    pub admin: User,
    pub checking: Account,
    pub savings: Account,
    pub foreign: Account,
}

impl StandardBank {
    pub fn create() -> Result<Self> {
        let mut bank = test_bank();

        let client = bank.create_user(
            "alice".into(),
            "alice-pw".into(),
            "alice@bankea.test".into(),
            Role::Client,
        )?;
        let other_client = bank.create_user(
            "bob".into(),
            "bob-pw".into(),
            "bob@bankea.test".into(),
            Role::Client,
        )?;
        let desk = bank.create_user(
            "desk".into(),
            "desk-pw".into(),
            "desk@bankea.test".into(),
            Role::CustomerService,
        )?;
        let credit = bank.create_user(
            "credit".into(),
            "credit-pw".into(),
            "credit@bankea.test".into(),
            Role::Credit,
        )?;
        let admin = bank.create_user(
            "admin".into(),
            "admin-pw".into(),
            "admin@bankea.test".into(),
            Role::Admin,
        )?;

        let checking = bank.create_account("Everyday".into(), client.id, AccountType::Checking)?;
        let savings = bank.create_account("Rainy day".into(), client.id, AccountType::Savings)?;
        let foreign = bank.create_account("Bob's".into(), other_client.id, AccountType::Checking)?;

        Ok(Self {
            bank,
            client,
            other_client,
            desk,
            credit,
            admin,
            checking,
            savings,
            foreign,
        })
    }

    /// Same fixture with the client's checking account funded
    pub fn funded(amount: f64) -> Result<Self> {
        let mut fixture = Self::create()?;
        fixture
            .bank
            .deposit(fixture.checking.account_number(), amount)?;
        Ok(fixture)
    }

    pub fn balance(&self, account: &Account) -> f64 {
        self.bank
            .get_account(account.id())
            .map(|acc| acc.balance())
            .unwrap_or(f64::NAN)
    }
}
