//! Account registration, login and profile management.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use fruit_porter_core::{AccountStatus, Email, EmailError, UserId};
use rust_decimal::Decimal;

use crate::db::{NewUser, UserRepository};
use crate::models::User;
use crate::store::Database;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("name must not be empty")]
    EmptyName,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("this account has been suspended")]
    AccountSuspended,
    #[error("account not found")]
    UserNotFound,
    #[error("password hashing failed")]
    PasswordHash,
}

#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

pub struct AuthService<'a> {
    db: &'a mut Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Creates an account. New accounts start with zero credit and the
    /// customer role.
    pub fn register(&mut self, registration: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        validate_password(&registration.password)?;

        let mut users = UserRepository::new(self.db);
        if users.find_by_email(&email).is_some() {
            return Err(AuthError::EmailTaken);
        }
        let id = users.insert(NewUser {
            email,
            password_hash: hash_password(&registration.password)?,
            name: name.to_owned(),
            phone: registration.phone,
            address: None,
            is_admin: false,
            credit: Decimal::ZERO,
        });
        users.find_by_id(id).ok_or(AuthError::UserNotFound)
    }

    /// Verifies credentials. A wrong email and a wrong password are
    /// indistinguishable to the caller.
    pub fn login(&mut self, email_raw: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email_raw).map_err(|_| AuthError::InvalidCredentials)?;
        let users = UserRepository::new(self.db);
        let user = users
            .find_by_email(&email)
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password) {
            return Err(AuthError::InvalidCredentials);
        }
        if user.status == AccountStatus::Suspended {
            return Err(AuthError::AccountSuspended);
        }
        Ok(user)
    }

    pub fn profile(&mut self, id: UserId) -> Result<User, AuthError> {
        UserRepository::new(self.db)
            .find_by_id(id)
            .ok_or(AuthError::UserNotFound)
    }

    pub fn update_profile(
        &mut self,
        id: UserId,
        name: String,
        phone: Option<String>,
        address: Option<String>,
    ) -> Result<User, AuthError> {
        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        let mut users = UserRepository::new(self.db);
        if users.update_profile(id, name, phone, address) == 0 {
            return Err(AuthError::UserNotFound);
        }
        users.find_by_id(id).ok_or(AuthError::UserNotFound)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

pub(crate) fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use crate::store::seed;

    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_owned(),
            password: "hunter2!".to_owned(),
            name: "New Customer".to_owned(),
            phone: None,
        }
    }

    #[test]
    fn register_then_login_round_trips() {
        let mut db = Database::empty();
        let mut auth = AuthService::new(&mut db);
        let created = auth
            .register(registration("customer@example.com"))
            .expect("registration succeeds");
        assert_eq!(created.credit, Decimal::ZERO);
        assert!(!created.is_admin);
        let logged_in = auth
            .login("customer@example.com", "hunter2!")
            .expect("login succeeds");
        assert_eq!(logged_in.id, created.id);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut db = Database::empty();
        let mut auth = AuthService::new(&mut db);
        auth.register(registration("taken@example.com"))
            .expect("first registration succeeds");
        let second = auth.register(registration("taken@example.com"));
        assert!(matches!(second, Err(AuthError::EmailTaken)));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut db = Database::empty();
        let mut auth = AuthService::new(&mut db);
        let result = auth.register(Registration {
            password: "short".to_owned(),
            ..registration("short@example.com")
        });
        assert!(matches!(result, Err(AuthError::PasswordTooShort)));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_identical() {
        let mut db = Database::seeded();
        let mut auth = AuthService::new(&mut db);
        let wrong_password = auth.login(seed::DEMO_EMAIL, "not-the-password");
        let unknown_email = auth.login("ghost@example.com", "demo123");
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn suspended_account_cannot_log_in() {
        let mut db = Database::seeded();
        if let Some(user) = db.users.iter_mut().find(|u| !u.is_admin) {
            user.status = AccountStatus::Suspended;
        }
        let mut auth = AuthService::new(&mut db);
        let result = auth.login(seed::DEMO_EMAIL, "demo123");
        assert!(matches!(result, Err(AuthError::AccountSuspended)));
    }

    #[test]
    fn update_profile_of_missing_user_fails() {
        let mut db = Database::empty();
        let mut auth = AuthService::new(&mut db);
        let result = auth.update_profile(UserId::new(99), "Name".to_owned(), None, None);
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }
}
