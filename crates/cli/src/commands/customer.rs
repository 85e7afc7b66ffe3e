//! Customer management commands.
//!
//! # Environment Variables
//!
//! - `SHOP_NEW_CUSTOMER_PASSWORD` - Password for the new customer (kept off
//!   the command line so it doesn't land in shell history)
//!
//! Password rules and the database URL come from the shared
//! [`ShopConfig`], so the CLI accepts exactly what the API accepts.

use secrecy::{ExposeSecret, SecretString};

use corner_shop_api::config::ShopConfig;
use corner_shop_api::db::RepositoryError;
use corner_shop_api::db::customers::{CustomerRepository, NewCustomer};
use corner_shop_api::services::auth::{hash_password, validate_password};
use corner_shop_core::Email;

use super::{CliError, connect, load_config};

const PASSWORD_VAR: &str = "SHOP_NEW_CUSTOMER_PASSWORD";

/// Arguments for `customer create`.
#[derive(Debug)]
pub struct CreateCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

/// Create a new customer.
///
/// # Returns
///
/// The ID of the created customer.
pub async fn create(args: CreateCustomer) -> Result<i32, CliError> {
    let config = load_config()?;

    let email = Email::parse(&args.email)?;
    let password = new_password(|key| std::env::var(key).ok(), &config)?;

    let pool = connect(&config).await?;

    tracing::info!("Creating customer: {}", email);

    let customer = CustomerRepository::new(&pool)
        .create(&NewCustomer {
            first_name: args.first_name,
            last_name: args.last_name,
            email,
            phone_number: args.phone,
            address: args.address,
            password_hash: hash_password(password.expose_secret())?,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => RepositoryError::Conflict(format!(
                "customer already exists with email: {}",
                args.email.trim()
            )),
            other => other,
        })?;

    tracing::info!(
        "Customer created successfully! ID: {}, Email: {}",
        customer.id,
        customer.email
    );

    Ok(customer.id.as_i32())
}

/// Read the new customer's password and check it against the configured rules.
fn new_password<F>(lookup: F, config: &ShopConfig) -> Result<SecretString, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let password = lookup(PASSWORD_VAR)
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar(PASSWORD_VAR))?;
    validate_password(password.expose_secret(), config.min_password_length)?;

    Ok(password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_api::services::AuthError;

    use super::*;

    fn config(min_length: &str) -> ShopConfig {
        ShopConfig::from_lookup(|key| match key {
            "SHOP_DATABASE_URL" => Some("postgres://localhost/shop".to_string()),
            "SHOP_MIN_PASSWORD_LENGTH" => Some(min_length.to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn password(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |key: &str| (key == PASSWORD_VAR).then(|| value.to_string())
    }

    #[test]
    fn test_password_uses_configured_min_length() {
        let config = config("12");

        let err = new_password(password("ten-chars!"), &config).unwrap_err();
        assert!(matches!(err, CliError::Auth(AuthError::WeakPassword(_))));

        let ok = new_password(password("twelve-chars"), &config).unwrap();
        assert_eq!(ok.expose_secret(), "twelve-chars");
    }

    #[test]
    fn test_missing_password() {
        let err = new_password(|_| None, &config("8")).unwrap_err();
        assert!(matches!(err, CliError::MissingEnvVar(PASSWORD_VAR)));
    }
}
