//! Authentication service.
//!
//! Password login and password changes for customers. New passwords are
//! always stored as Argon2id PHC strings. Rows imported from the previous
//! system may still hold bcrypt hashes or plain-text passwords; those are
//! accepted and re-hashed to Argon2 on the next successful login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::{info, warn};

use corner_shop_core::{CustomerId, Email};

use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::models::Customer;

/// Prefixes of bcrypt modular-crypt hashes.
const BCRYPT_PREFIXES: &[&str] = &["$2a$", "$2b$", "$2y$"];

/// Authentication service.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    min_password_length: usize,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, min_password_length: usize) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            min_password_length,
        }
    }

    /// Login with email and password.
    ///
    /// A legacy bcrypt or plain-text password is upgraded to an Argon2 hash
    /// after a successful match. Failure to store the upgrade does not fail the login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, AuthError> {
        let email = Email::parse(email)?;

        let (customer, stored) = self
            .customers
            .get_with_password_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        match verify_password(password, &stored) {
            PasswordCheck::Match => {}
            PasswordCheck::LegacyMatch => self.upgrade_legacy_password(&customer, password).await,
            PasswordCheck::Mismatch => return Err(AuthError::InvalidCredentials),
        }

        Ok(customer)
    }

    /// Change a customer's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CustomerNotFound` if the customer doesn't exist.
    /// Returns `AuthError::OldPasswordMismatch` if `old_password` is wrong.
    /// Returns `AuthError::WeakPassword` if `new_password` is too short.
    pub async fn change_password(
        &self,
        customer_id: CustomerId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, stored) = self
            .customers
            .get_with_password_by_id(customer_id)
            .await?
            .ok_or(AuthError::CustomerNotFound)?;

        if verify_password(old_password, &stored) == PasswordCheck::Mismatch {
            return Err(AuthError::OldPasswordMismatch);
        }

        validate_password(new_password, self.min_password_length)?;
        let password_hash = hash_password(new_password)?;

        self.customers
            .update_password(customer_id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::CustomerNotFound,
                other => AuthError::Repository(other),
            })?;

        info!(customer_id = %customer_id, "password changed");
        Ok(())
    }

    async fn upgrade_legacy_password(&self, customer: &Customer, password: &str) {
        let result = match hash_password(password) {
            Ok(hash) => self
                .customers
                .update_password(customer.id, &hash)
                .await
                .map_err(AuthError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(customer_id = %customer.id, "upgraded legacy password to argon2"),
            Err(e) => warn!(customer_id = %customer.id, error = %e, "legacy password upgrade failed"),
        }
    }
}

/// Outcome of checking a password against the stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Matched an Argon2 hash.
    Match,
    /// Matched a legacy bcrypt or plain-text value; the caller should re-hash it.
    LegacyMatch,
    /// Did not match, or the stored value is a malformed hash.
    Mismatch,
}

/// Check a candidate password against a stored value.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> PasswordCheck {
    if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
        return match bcrypt::verify(password, stored) {
            Ok(true) => PasswordCheck::LegacyMatch,
            Ok(false) => PasswordCheck::Mismatch,
            Err(e) => {
                warn!(error = %e, "stored bcrypt hash is malformed");
                PasswordCheck::Mismatch
            }
        };
    }

    if let Ok(parsed) = PasswordHash::new(stored) {
        return if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            PasswordCheck::Match
        } else {
            PasswordCheck::Mismatch
        };
    }

    if !stored.is_empty() && stored == password {
        PasswordCheck::LegacyMatch
    } else {
        PasswordCheck::Mismatch
    }
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is shorter than `min_length`.
pub fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {min_length} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}
