use crate::domain::{
    Account, AccountId, AccountType, Amount, ApplicationId, ApplicationStatus, Capability,
    LedgerError, MortgageApplication, Role, Transaction, TransactionId, TransactionType, User,
    UserId,
};
use crate::storage::{AccountRegistry, MortgageWorkbench, TransactionLedger, UserDirectory};

/// Application service providing the bank's operations.
/// This is the only interface the CLI (or any other front end) talks to.
#[derive(Debug)]
pub struct BankService {
    name: String,
    location: String,
    accounts: AccountRegistry,
    users: UserDirectory,
    ledger: TransactionLedger,
    mortgages: MortgageWorkbench,
}

/// Result of a deposit or withdrawal
#[derive(Debug, Clone)]
pub struct MovementResult {
    pub transaction: Transaction,
    pub account_number: String,
    pub balance: Amount,
}

/// Result of a transfer between two accounts
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub transaction: Transaction,
    pub sender_number: String,
    pub recipient_number: String,
    pub sender_balance: Amount,
    pub recipient_balance: Amount,
}

impl BankService {
    /// Create a bank with no users, accounts or history.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::from_parts(
            name,
            location,
            AccountRegistry::new(),
            UserDirectory::new(),
            TransactionLedger::new(),
            MortgageWorkbench::new(),
        )
    }

    /// Assemble a bank from stores built elsewhere.
    pub fn from_parts(
        name: impl Into<String>,
        location: impl Into<String>,
        accounts: AccountRegistry,
        users: UserDirectory,
        ledger: TransactionLedger,
        mortgages: MortgageWorkbench,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            accounts,
            users,
            ledger,
            mortgages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn mortgages(&self) -> &MortgageWorkbench {
        &self.mortgages
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account for an existing user.
    pub fn create_account(
        &mut self,
        name: String,
        owner_id: UserId,
        account_type: AccountType,
    ) -> Result<Account, LedgerError> {
        if self.users.get_by_id(owner_id).is_none() {
            return Err(LedgerError::UserNotFound(owner_id.to_string()));
        }

        let account = self
            .accounts
            .create_account(name, owner_id, account_type)?
            .clone();

        tracing::info!(
            account = %account.account_number(),
            owner = %owner_id,
            account_type = %account_type,
            "account opened"
        );
        Ok(account)
    }

    pub fn get_account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get_by_id(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    pub fn get_account_by_number(&self, account_number: &str) -> Result<&Account, LedgerError> {
        self.accounts.get_by_number(account_number)
    }

    pub fn balance_of(&self, id: AccountId) -> Result<Amount, LedgerError> {
        self.accounts
            .balance_of(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    pub fn accounts_owned_by(&self, owner_id: UserId) -> Vec<&Account> {
        self.accounts.owned_by(owner_id).collect()
    }

    // ========================
    // Money movements
    // ========================

    pub fn deposit(
        &mut self,
        account_number: &str,
        amount: Amount,
    ) -> Result<MovementResult, LedgerError> {
        self.record_single(account_number, TransactionType::Deposit, amount)
    }

    pub fn withdraw(
        &mut self,
        account_number: &str,
        amount: Amount,
    ) -> Result<MovementResult, LedgerError> {
        self.record_single(account_number, TransactionType::Withdrawal, amount)
    }

    fn record_single(
        &mut self,
        account_number: &str,
        transaction_type: TransactionType,
        amount: Amount,
    ) -> Result<MovementResult, LedgerError> {
        let account = self.accounts.get_by_number_mut(account_number)?;

        let transaction = match self.ledger.record_single(account, transaction_type, amount) {
            Ok(tx) => tx.clone(),
            Err(err) => {
                tracing::debug!(account = %account_number, %transaction_type, amount, error = %err, "movement refused");
                return Err(err);
            }
        };

        tracing::info!(
            account = %account_number,
            %transaction_type,
            amount,
            balance = account.balance(),
            transaction = %transaction.id,
            "movement recorded"
        );

        Ok(MovementResult {
            transaction,
            account_number: account_number.to_string(),
            balance: account.balance(),
        })
    }

    /// Move funds between two accounts identified by account number.
    pub fn transfer(
        &mut self,
        from_number: &str,
        to_number: &str,
        amount: Amount,
    ) -> Result<TransferResult, LedgerError> {
        let (sender, recipient) = self.accounts.pair_mut(from_number, to_number)?;

        let transaction = match self.ledger.record_transfer(sender, recipient, amount) {
            Ok(tx) => tx.clone(),
            Err(err) => {
                tracing::debug!(from = %from_number, to = %to_number, amount, error = %err, "transfer refused");
                return Err(err);
            }
        };

        tracing::info!(
            from = %from_number,
            to = %to_number,
            amount,
            transaction = %transaction.id,
            "transfer recorded"
        );

        Ok(TransferResult {
            transaction,
            sender_number: from_number.to_string(),
            recipient_number: to_number.to_string(),
            sender_balance: sender.balance(),
            recipient_balance: recipient.balance(),
        })
    }

    /// All transactions touching the account, oldest first.
    pub fn account_transactions(
        &self,
        account_number: &str,
    ) -> Result<Vec<&Transaction>, LedgerError> {
        let account = self.accounts.get_by_number(account_number)?;
        Ok(self.ledger.transactions_for(account.id()).collect())
    }

    pub fn find_transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.ledger.find_by_id(id)
    }

    pub fn validate_transaction(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        self.ledger.validate(transaction)
    }

    // ========================
    // Users
    // ========================

    pub fn create_user(
        &mut self,
        username: String,
        password: String,
        email: String,
        role: Role,
    ) -> Result<User, LedgerError> {
        let user = self
            .users
            .create_user(username, password, email, role)?
            .clone();
        tracing::info!(username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User, LedgerError> {
        match self.users.login(username, password) {
            Ok(user) => {
                tracing::debug!(username, "login succeeded");
                Ok(user.clone())
            }
            Err(err) => {
                tracing::debug!(username, error = %err, "login failed");
                Err(err)
            }
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<&User, LedgerError> {
        self.users
            .get_by_username(username)
            .ok_or_else(|| LedgerError::UserNotFound(username.to_string()))
    }

    pub fn deactivate_user(&mut self, username: &str) -> Result<User, LedgerError> {
        let user = self.users.deactivate(username)?.clone();
        tracing::info!(username, "user deactivated");
        Ok(user)
    }

    /// The single permission gate for front ends: may `actor` use `capability`,
    /// optionally on a specific account?
    pub fn authorize(
        &self,
        actor: &User,
        capability: Capability,
        account: Option<&Account>,
    ) -> Result<(), LedgerError> {
        if actor.can(capability, account) {
            Ok(())
        } else {
            tracing::debug!(username = %actor.username, %capability, "capability denied");
            Err(LedgerError::Unauthorized {
                username: actor.username.clone(),
                capability,
            })
        }
    }

    // ========================
    // Mortgage applications
    // ========================

    /// Submit an application on behalf of a registered user.
    /// An unknown username counts as a missing applicant.
    pub fn submit_mortgage_application(
        &mut self,
        applicant_username: &str,
        property_value: Amount,
        loan_amount: Amount,
        interest_rate: f64,
    ) -> Result<MortgageApplication, LedgerError> {
        let applicant = self.users.get_by_username(applicant_username);
        let application = self
            .mortgages
            .submit(applicant, property_value, loan_amount, interest_rate)?
            .clone();

        tracing::info!(
            application = %application.id,
            applicant = %applicant_username,
            loan_amount,
            "mortgage application submitted"
        );
        Ok(application)
    }

    pub fn pending_applications(&self) -> Vec<&MortgageApplication> {
        self.applications_by_status(ApplicationStatus::Pending)
    }

    pub fn applications_by_status(&self, status: ApplicationStatus) -> Vec<&MortgageApplication> {
        self.mortgages.find_by_status(status).collect()
    }

    pub fn get_application(&self, id: ApplicationId) -> Option<&MortgageApplication> {
        self.mortgages.find_by_id(id)
    }

    pub fn approve_application(
        &mut self,
        id: ApplicationId,
    ) -> Result<MortgageApplication, LedgerError> {
        let application = self.mortgages.approve(id)?.clone();
        tracing::info!(application = %id, "mortgage application approved");
        Ok(application)
    }

    pub fn reject_application(
        &mut self,
        id: ApplicationId,
    ) -> Result<MortgageApplication, LedgerError> {
        let application = self.mortgages.reject(id)?.clone();
        tracing::info!(application = %id, "mortgage application rejected");
        Ok(application)
    }

    pub fn cancel_application(
        &mut self,
        id: ApplicationId,
    ) -> Result<MortgageApplication, LedgerError> {
        let application = self.mortgages.cancel(id)?.clone();
        tracing::info!(application = %id, "mortgage application cancelled");
        Ok(application)
    }
}
