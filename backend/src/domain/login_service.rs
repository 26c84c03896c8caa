//! Account-backed implementation of the login port.
//!
//! Accounts are configured up front; there is no sign-up flow. A successful
//! login provisions the matching user row so dishes can reference it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{LoginService, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, Error, LoginCredentials, User, UserId};

const ADMIN_USER_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);

/// One account that may log in.
///
/// # Examples
/// ```
/// use dishshare::domain::DevAccount;
///
/// let admin = DevAccount::admin().expect("built-in account");
/// assert_eq!(admin.username, "admin");
/// assert_eq!(admin.user_id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
/// assert_eq!(admin.display_name.as_ref(), "Admin");
/// ```
#[derive(Debug, Clone)]
pub struct DevAccount {
    /// Login name compared verbatim.
    pub username: String,
    /// Plain-text password compared verbatim.
    pub password: String,
    /// Identifier of the user row provisioned on login.
    pub user_id: UserId,
    /// Display name written to the user row.
    pub display_name: DisplayName,
}

impl DevAccount {
    /// The built-in development account: `admin` / `password`.
    pub fn admin() -> Result<Self, Error> {
        let display_name = DisplayName::new("Admin")
            .map_err(|err| Error::internal(format!("invalid admin display name: {err}")))?;
        Ok(Self {
            username: "admin".to_owned(),
            password: "password".to_owned(),
            user_id: UserId::from_uuid(ADMIN_USER_ID),
            display_name,
        })
    }

    fn matches(&self, credentials: &LoginCredentials) -> bool {
        self.username == credentials.username() && self.password == credentials.password()
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Authenticates against a fixed account list and provisions user rows.
#[derive(Clone)]
pub struct AccountLoginService<U: ?Sized> {
    users: Arc<U>,
    accounts: Vec<DevAccount>,
}

impl<U: ?Sized> AccountLoginService<U> {
    /// Build a service that provisions users into `users` for `accounts`.
    pub fn new(users: Arc<U>, accounts: Vec<DevAccount>) -> Self {
        Self { users, accounts }
    }
}

#[async_trait]
impl<U> LoginService for AccountLoginService<U>
where
    U: UserRepository + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(account) = self.accounts.iter().find(|a| a.matches(credentials)) else {
            debug!(username = credentials.username(), "login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        };

        let user = User::new(account.user_id.clone(), account.display_name.clone());
        self.users
            .upsert(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %account.user_id, "user logged in");
        Ok(account.user_id.clone())
    }
}
