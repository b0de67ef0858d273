use crate::domain::{LedgerError, Role, User, UserId};

/// Registered users. Usernames and emails are unique.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(
        &mut self,
        username: String,
        password: String,
        email: String,
        role: Role,
    ) -> Result<&User, LedgerError> {
        self.insert(User::new(username, password, email, role))
    }

    /// Register a user, refusing taken usernames and emails.
    pub fn insert(&mut self, user: User) -> Result<&User, LedgerError> {
        if self.get_by_username(&user.username).is_some() {
            return Err(LedgerError::UsernameTaken(user.username));
        }
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(LedgerError::EmailTaken(user.email));
        }
        self.users.push(user);
        Ok(&self.users[self.users.len() - 1])
    }

    pub fn get_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn get_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Look up a user by exact username and password.
    pub fn login(&self, username: &str, password: &str) -> Result<&User, LedgerError> {
        let user = self
            .users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .ok_or(LedgerError::InvalidCredentials)?;
        if user.is_inactive() {
            return Err(LedgerError::UserInactive(user.username.clone()));
        }
        Ok(user)
    }

    pub fn deactivate(&mut self, username: &str) -> Result<&User, LedgerError> {
        let user = self
            .users
            .iter_mut()
            .find(|user| user.username == username)
            .ok_or_else(|| LedgerError::UserNotFound(username.to_string()))?;
        user.deactivate();
        Ok(user)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        let mut users = UserDirectory::new();
        users
            .create_user(
                "alice".into(),
                "wonderland".into(),
                "alice@bankea.test".into(),
                Role::Client,
            )
            .unwrap();
        users
    }

    #[test]
    fn test_create_and_lookup() {
        let users = directory();
        let alice = users.get_by_username("alice").unwrap();
        assert_eq!(alice.role, Role::Client);
        assert_eq!(users.get_by_id(alice.id).unwrap().username, "alice");
        assert!(users.get_by_username("bob").is_none());
    }

    #[test]
    fn test_duplicate_username_or_email() {
        let mut users = directory();
        assert_eq!(
            users
                .create_user("alice".into(), "x".into(), "other@bankea.test".into(), Role::Client)
                .unwrap_err(),
            LedgerError::UsernameTaken("alice".into())
        );
        assert_eq!(
            users
                .create_user("alicia".into(), "x".into(), "alice@bankea.test".into(), Role::Client)
                .unwrap_err(),
            LedgerError::EmailTaken("alice@bankea.test".into())
        );
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_login() {
        let users = directory();
        assert_eq!(users.login("alice", "wonderland").unwrap().username, "alice");
        assert_eq!(
            users.login("alice", "wrong").unwrap_err(),
            LedgerError::InvalidCredentials
        );
        assert_eq!(
            users.login("nobody", "wonderland").unwrap_err(),
            LedgerError::InvalidCredentials
        );
    }

    #[test]
    fn test_deactivated_user_cannot_log_in() {
        let mut users = directory();
        users.deactivate("alice").unwrap();
        assert_eq!(
            users.login("alice", "wonderland").unwrap_err(),
            LedgerError::UserInactive("alice".into())
        );
        assert!(matches!(
            users.deactivate("bob"),
            Err(LedgerError::UserNotFound(_))
        ));
    }
}
