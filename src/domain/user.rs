use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Account;

pub type UserId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Account holder; may only look at accounts they own
    Client,
    /// Front-desk staff handling accounts, money movements and new customers
    CustomerService,
    /// Credit department reviewing mortgage applications
    Credit,
    /// Administrator registering staff
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::CustomerService => "customer-service",
            Role::Credit => "credit",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "client" => Some(Role::Client),
            "customer-service" => Some(Role::CustomerService),
            "credit" => Some(Role::Credit),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether this role carries `capability` at all. Account ownership is
    /// checked separately by [`User::can`].
    pub fn grants(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::Client => matches!(capability, ViewAccount),
            Role::CustomerService => matches!(
                capability,
                ViewAccount | MoveFunds | OpenAccount | SubmitMortgage | RegisterUser
            ),
            Role::Credit => matches!(capability, ReviewMortgage),
            Role::Admin => matches!(capability, RegisterUser | AssignRole),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something a user may be permitted to do through the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewAccount,
    MoveFunds,
    OpenAccount,
    SubmitMortgage,
    ReviewMortgage,
    RegisterUser,
    /// Register users with a role other than client
    AssignRole,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Capability::ViewAccount => "view this account",
            Capability::MoveFunds => "move funds",
            Capability::OpenAccount => "open accounts",
            Capability::SubmitMortgage => "submit mortgage applications",
            Capability::ReviewMortgage => "review mortgage applications",
            Capability::RegisterUser => "register users",
            Capability::AssignRole => "assign staff roles",
        };
        write!(f, "{}", text)
    }
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Stored and compared verbatim.
    pub password: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl User {
    pub fn new(username: String, password: String, email: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password,
            email,
            role,
            active: true,
        }
    }

    pub fn is_inactive(&self) -> bool {
        !self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Check a capability, optionally against a specific account.
    ///
    /// Clients only see accounts they own; deactivated users can do nothing.
    pub fn can(&self, capability: Capability, account: Option<&Account>) -> bool {
        if self.is_inactive() || !self.role.grants(capability) {
            return false;
        }
        match (self.role, account) {
            (Role::Client, Some(account)) => account.is_owned_by(self.id),
            (Role::Client, None) => false,
            _ => true,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}
