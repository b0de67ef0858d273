use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::application::BankService;
use crate::domain::{
    format_amount, parse_amount, Account, AccountType, Amount, ApplicationStatus, Capability,
    MortgageApplication, Role, Transaction, User,
};
use crate::io::{load_bank, Exporter};

/// Bankea - single-institution bank ledger
#[derive(Parser)]
#[command(name = "bankea")]
#[command(about = "Accounts, money movements and mortgage applications for a single bank")]
#[command(version)]
pub struct Cli {
    /// Bootstrap / snapshot file the bank is loaded from
    #[arg(short, long, default_value = "bank.json", global = true)]
    pub data: PathBuf,

    /// Username to log in with
    #[arg(short, long, global = true, env = "BANKEA_USER")]
    pub user: Option<String>,

    /// Password to log in with
    #[arg(short, long, global = true, env = "BANKEA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Write the bank back to the data file after a successful change
    #[arg(long, global = true)]
    pub save: bool,

    /// Bank name
    #[arg(long, default_value = "Bankea", global = true)]
    pub bank_name: String,

    /// Bank location
    #[arg(long, default_value = "Main street", global = true)]
    pub location: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Deposit funds into an account
    Deposit {
        /// Account number
        account: String,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw funds from an account
    Withdraw {
        /// Account number
        account: String,

        /// Amount to withdraw
        amount: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer
        amount: String,

        /// Sender account number
        #[arg(long)]
        from: String,

        /// Recipient account number
        #[arg(long)]
        to: String,
    },

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Mortgage application commands
    #[command(subcommand)]
    Mortgage(MortgageCommands),

    /// Export data to JSON or CSV
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Create {
        /// Account name
        name: String,

        /// Username of the account owner
        #[arg(long)]
        owner: String,

        /// Account type: savings, checking
        #[arg(short = 't', long = "type", default_value = "checking")]
        account_type: String,
    },

    /// Show account details and balance
    Show {
        /// Account number
        account: String,
    },

    /// List accounts owned by a user (defaults to the logged-in user)
    List {
        /// Owner username
        #[arg(long)]
        owner: Option<String>,
    },

    /// List the transactions of an account, oldest first
    Transactions {
        /// Account number
        account: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Create {
        username: String,

        /// Password for the new user
        #[arg(long = "new-password")]
        new_password: String,

        #[arg(long)]
        email: String,

        /// Role: client, customer-service, credit, admin
        #[arg(short, long, default_value = "client")]
        role: String,
    },

    /// Deactivate a user so they can no longer log in
    Deactivate { username: String },
}

#[derive(Subcommand)]
pub enum MortgageCommands {
    /// Submit a mortgage application for a user
    Submit {
        /// Applicant username
        applicant: String,

        #[arg(long)]
        property_value: f64,

        #[arg(long)]
        loan_amount: f64,

        /// Yearly interest rate in percent
        #[arg(long)]
        interest_rate: f64,
    },

    /// List applications awaiting a decision
    Pending,

    /// List applications with a given status
    List {
        /// Status: pending, approved, rejected, cancelled
        #[arg(short, long, default_value = "pending")]
        status: String,
    },

    /// Show an application
    Show { id: String },

    /// Approve a pending application
    Approve { id: String },

    /// Reject a pending application
    Reject { id: String },

    /// Cancel a pending application
    Cancel { id: String },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Full bank snapshot as JSON (readable as a data file)
    Snapshot {
        /// Output file (omit for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Accounts and balances as CSV
    Accounts {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// One account's statement as CSV
    Statement {
        /// Account number
        account: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Whether a command changed the bank and should be saved.
type Changed = bool;

impl Cli {
    pub fn run(self) -> Result<()> {
        let (mut bank, import) = load_bank(&self.data, &self.bank_name, &self.location)?;
        if !import.errors.is_empty() {
            eprintln!(
                "Warning: {} record(s) in {} could not be loaded",
                import.errors.len(),
                self.data.display()
            );
        }

        let actor = self.login(&bank)?;

        let changed = match self.command {
            Commands::Account(cmd) => run_account_command(&mut bank, &actor, cmd)?,
            Commands::Deposit { account, amount } => {
                let amount = parse_cli_amount(&amount)?;
                bank.authorize(
                    &actor,
                    Capability::MoveFunds,
                    Some(bank.get_account_by_number(&account)?),
                )?;
                let result = bank.deposit(&account, amount)?;
                println!(
                    "Deposited {} into #{}. New balance: {}",
                    format_amount(amount),
                    result.account_number,
                    format_amount(result.balance)
                );
                true
            }
            Commands::Withdraw { account, amount } => {
                let amount = parse_cli_amount(&amount)?;
                bank.authorize(
                    &actor,
                    Capability::MoveFunds,
                    Some(bank.get_account_by_number(&account)?),
                )?;
                let result = bank.withdraw(&account, amount)?;
                println!(
                    "Withdrew {} from #{}. New balance: {}",
                    format_amount(amount),
                    result.account_number,
                    format_amount(result.balance)
                );
                true
            }
            Commands::Transfer { amount, from, to } => {
                let amount = parse_cli_amount(&amount)?;
                bank.authorize(
                    &actor,
                    Capability::MoveFunds,
                    Some(bank.get_account_by_number(&from)?),
                )?;
                let result = bank.transfer(&from, &to, amount)?;
                println!(
                    "Transferred {} from #{} to #{}",
                    format_amount(amount),
                    result.sender_number,
                    result.recipient_number
                );
                println!("  #{}: {}", result.sender_number, format_amount(result.sender_balance));
                println!(
                    "  #{}: {}",
                    result.recipient_number,
                    format_amount(result.recipient_balance)
                );
                println!("  Transaction: {}", result.transaction.id);
                true
            }
            Commands::User(cmd) => run_user_command(&mut bank, &actor, cmd)?,
            Commands::Mortgage(cmd) => run_mortgage_command(&mut bank, &actor, cmd)?,
            Commands::Export(cmd) => {
                run_export_command(&bank, &actor, cmd)?;
                false
            }
        };

        if changed && self.save {
            save_bank(&bank, &self.data)?;
        }
        Ok(())
    }

    fn login(&self, bank: &BankService) -> Result<User> {
        let (Some(username), Some(password)) = (&self.user, &self.password) else {
            anyhow::bail!("Log in with --user and --password (or BANKEA_USER / BANKEA_PASSWORD)");
        };
        let user = bank.login(username, password)?;
        tracing::debug!(username = %user.username, role = %user.role, "session started");
        Ok(user)
    }
}

fn parse_cli_amount(input: &str) -> Result<Amount> {
    parse_amount(input).context("Invalid amount format. Use '50.00' or '50'")
}

fn parse_id(input: &str) -> Result<Uuid> {
    Uuid::parse_str(input).with_context(|| format!("Invalid application id: {}", input))
}

/// Stage the snapshot next to the data file, then move it over the target.
/// The previous file stays intact until the new one is complete.
fn save_bank(bank: &BankService, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage data file in: {}", dir.display()))?;
    Exporter::new(bank).export_json(&mut staged)?;
    staged
        .persist(path)
        .with_context(|| format!("Failed to write data file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "bank saved");
    eprintln!("Saved bank to {}", path.display());
    Ok(())
}

fn run_account_command(bank: &mut BankService, actor: &User, cmd: AccountCommands) -> Result<Changed> {
    match cmd {
        AccountCommands::Create {
            name,
            owner,
            account_type,
        } => {
            bank.authorize(actor, Capability::OpenAccount, None)?;
            let account_type = AccountType::from_str(&account_type).with_context(|| {
                format!(
                    "Invalid account type '{}'. Valid types: savings, checking",
                    account_type
                )
            })?;
            let owner_id = bank.get_user_by_username(&owner)?.id;
            let account = bank.create_account(name, owner_id, account_type)?;
            println!(
                "Created {} account {} for {}",
                account.account_type(),
                account,
                owner
            );
            Ok(true)
        }

        AccountCommands::Show { account } => {
            let account = bank.get_account_by_number(&account)?;
            bank.authorize(actor, Capability::ViewAccount, Some(account))?;
            print_account(bank, account);
            Ok(false)
        }

        AccountCommands::List { owner } => {
            let owner = match owner {
                Some(username) if username != actor.username => {
                    bank.authorize(actor, Capability::ViewAccount, None)?;
                    bank.get_user_by_username(&username)?.clone()
                }
                _ => actor.clone(),
            };

            let accounts = bank.accounts_owned_by(owner.id);
            if accounts.is_empty() {
                println!("No accounts found for {}.", owner.username);
                return Ok(false);
            }

            println!(
                "{:<12} {:<24} {:<10} {:>15}",
                "NUMBER", "NAME", "TYPE", "BALANCE"
            );
            println!("{}", "-".repeat(64));
            for account in accounts {
                println!(
                    "{:<12} {:<24} {:<10} {:>15}",
                    account.account_number(),
                    account.name(),
                    account.account_type(),
                    format_amount(account.balance())
                );
            }
            Ok(false)
        }

        AccountCommands::Transactions { account } => {
            let acc = bank.get_account_by_number(&account)?;
            bank.authorize(actor, Capability::ViewAccount, Some(acc))?;
            let transactions = bank.account_transactions(&account)?;

            if transactions.is_empty() {
                println!("No transactions for #{}.", account);
                return Ok(false);
            }
            for tx in transactions {
                print_transaction(bank, acc, tx);
            }
            Ok(false)
        }
    }
}

fn print_account(bank: &BankService, account: &Account) {
    println!("Account: {}", account);
    println!("  ID:       {}", account.id());
    println!("  Type:     {}", account.account_type());
    match bank.users().get_by_id(account.owner_id()) {
        Some(owner) => println!("  Owner:    {}", owner.username),
        None => println!("  Owner:    {}", account.owner_id()),
    }
    println!("  Balance:  {}", format_amount(account.balance()));
}

fn print_transaction(bank: &BankService, account: &Account, tx: &Transaction) {
    let counterparty = tx
        .recipient_account()
        .map(|recipient| {
            let other = if recipient == account.id() {
                tx.primary_account()
            } else {
                recipient
            };
            bank.accounts()
                .get_by_id(other)
                .map(|acc| format!("#{}", acc.account_number()))
                .unwrap_or_else(|| other.to_string())
        })
        .unwrap_or_default();

    println!(
        "{} {:<10} {:>15} {}",
        tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
        tx.transaction_type(),
        format_amount(tx.effect_on(account.id())),
        counterparty
    );
}

fn run_user_command(bank: &mut BankService, actor: &User, cmd: UserCommands) -> Result<Changed> {
    match cmd {
        UserCommands::Create {
            username,
            new_password,
            email,
            role,
        } => {
            let role = Role::from_str(&role).with_context(|| {
                format!(
                    "Invalid role '{}'. Valid roles: client, customer-service, credit, admin",
                    role
                )
            })?;
            bank.authorize(actor, Capability::RegisterUser, None)?;
            if role != Role::Client {
                bank.authorize(actor, Capability::AssignRole, None)?;
            }

            let user = bank.create_user(username, new_password, email, role)?;
            println!("Registered {} ({})", user.username, user.role);
            println!("  ID: {}", user.id);
            Ok(true)
        }

        UserCommands::Deactivate { username } => {
            bank.authorize(actor, Capability::AssignRole, None)?;
            let user = bank.deactivate_user(&username)?;
            println!("Deactivated {}", user.username);
            Ok(true)
        }
    }
}

fn run_mortgage_command(
    bank: &mut BankService,
    actor: &User,
    cmd: MortgageCommands,
) -> Result<Changed> {
    match cmd {
        MortgageCommands::Submit {
            applicant,
            property_value,
            loan_amount,
            interest_rate,
        } => {
            bank.authorize(actor, Capability::SubmitMortgage, None)?;
            let application = bank.submit_mortgage_application(
                &applicant,
                property_value,
                loan_amount,
                interest_rate,
            )?;
            println!("Submitted mortgage application {}", application.id);
            Ok(true)
        }

        MortgageCommands::Pending => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            print_applications(bank, &bank.pending_applications());
            Ok(false)
        }

        MortgageCommands::List { status } => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            let status = ApplicationStatus::from_str(&status).with_context(|| {
                format!(
                    "Invalid status '{}'. Valid statuses: pending, approved, rejected, cancelled",
                    status
                )
            })?;
            print_applications(bank, &bank.applications_by_status(status));
            Ok(false)
        }

        MortgageCommands::Show { id } => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            let id = parse_id(&id)?;
            let app = bank
                .get_application(id)
                .with_context(|| format!("Mortgage application not found: {}", id))?;
            print_application(bank, app);
            Ok(false)
        }

        MortgageCommands::Approve { id } => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            let app = bank.approve_application(parse_id(&id)?)?;
            println!("Application {} is now {}", app.id, app.status());
            Ok(true)
        }

        MortgageCommands::Reject { id } => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            let app = bank.reject_application(parse_id(&id)?)?;
            println!("Application {} is now {}", app.id, app.status());
            Ok(true)
        }

        MortgageCommands::Cancel { id } => {
            bank.authorize(actor, Capability::ReviewMortgage, None)?;
            let app = bank.cancel_application(parse_id(&id)?)?;
            println!("Application {} is now {}", app.id, app.status());
            Ok(true)
        }
    }
}

fn print_applications(bank: &BankService, applications: &[&MortgageApplication]) {
    if applications.is_empty() {
        println!("No applications found.");
        return;
    }

    println!(
        "{:<38} {:<16} {:>15} {:>15} {:>7} {:<10}",
        "ID", "APPLICANT", "PROPERTY", "LOAN", "RATE", "STATUS"
    );
    println!("{}", "-".repeat(106));
    for app in applications {
        println!(
            "{:<38} {:<16} {:>15} {:>15} {:>6.2}% {:<10}",
            app.id,
            applicant_name(bank, app),
            format_amount(app.property_value),
            format_amount(app.loan_amount),
            app.interest_rate,
            app.status()
        );
    }
}

fn applicant_name(bank: &BankService, app: &MortgageApplication) -> String {
    bank.users()
        .get_by_id(app.applicant)
        .map(|user| user.username.clone())
        .unwrap_or_else(|| app.applicant.to_string())
}

fn print_application(bank: &BankService, app: &MortgageApplication) {
    println!("Mortgage application {}", app.id);
    println!("  Applicant:      {}", applicant_name(bank, app));
    println!("  Property value: {}", format_amount(app.property_value));
    println!("  Loan amount:    {}", format_amount(app.loan_amount));
    println!("  Interest rate:  {:.2}%", app.interest_rate);
    println!("  Status:         {}", app.status());
    println!(
        "  Submitted:      {}",
        app.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(decided) = app.decided_at {
        println!("  Decided:        {}", decided.format("%Y-%m-%d %H:%M:%S"));
    }
}

fn run_export_command(bank: &BankService, actor: &User, cmd: ExportCommands) -> Result<()> {
    let exporter = Exporter::new(bank);

    let open = |output: Option<&Path>| -> Result<Box<dyn Write>> {
        match output {
            Some(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Ok(Box::new(file))
            }
            None => Ok(Box::new(stdout())),
        }
    };

    match cmd {
        ExportCommands::Snapshot { output } => {
            bank.authorize(actor, Capability::AssignRole, None)?;
            let snapshot = exporter.export_json(open(output.as_deref())?)?;
            if output.is_some() {
                eprintln!(
                    "Exported snapshot: {} users, {} accounts, {} transactions, {} mortgage applications",
                    snapshot.users.len(),
                    snapshot.accounts.len(),
                    snapshot.transactions.len(),
                    snapshot.mortgage_applications.len()
                );
            }
        }
        ExportCommands::Accounts { output } => {
            bank.authorize(actor, Capability::OpenAccount, None)?;
            let count = exporter.export_accounts_csv(open(output.as_deref())?)?;
            if output.is_some() {
                eprintln!("Exported {} accounts", count);
            }
        }
        ExportCommands::Statement { account, output } => {
            bank.authorize(
                actor,
                Capability::ViewAccount,
                Some(bank.get_account_by_number(&account)?),
            )?;
            let count = exporter.export_statement_csv(&account, open(output.as_deref())?)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bankea",
            "transfer",
            "25.50",
            "--from",
            "111111111",
            "--to",
            "222222222",
            "--user",
            "desk",
            "--password",
            "pw",
            "--save",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("desk"));
        assert!(cli.save);
        assert_eq!(cli.data, PathBuf::from("bank.json"));
        assert!(matches!(
            cli.command,
            Commands::Transfer { ref from, .. } if from == "111111111"
        ));
    }

    #[test]
    fn test_parse_cli_amount() {
        assert_eq!(parse_cli_amount("50").unwrap(), 50.0);
        assert!(parse_cli_amount("fifty").is_err());
    }
}
