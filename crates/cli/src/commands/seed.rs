//! Seed the database with a demo catalogue and one demo customer.
//!
//! Safe to run repeatedly: products are matched by name and the customer by
//! email, and existing rows are left untouched.

use corner_shop_api::db::RepositoryError;
use corner_shop_api::db::customers::{CustomerRepository, NewCustomer};
use corner_shop_api::db::products::{NewProduct, ProductRepository};
use corner_shop_api::services::auth::hash_password;
use corner_shop_core::{Email, Price};

use super::{CliError, connect, load_config};

const DEMO_EMAIL: &str = "demo@cornershop.test";
const DEMO_PASSWORD: &str = "demo-password";

/// (name, description, price in cents, stock)
const DEMO_PRODUCTS: &[(&str, &str, i64, i32)] = &[
    ("Jasmine Rice 5kg", "Fragrant long-grain rice", 1250, 40),
    ("Fish Sauce 700ml", "Anchovy fish sauce", 325, 60),
    ("Coconut Milk 400ml", "Full fat, canned", 199, 120),
    ("Green Curry Paste", "Medium heat, 200g tub", 450, 25),
    ("Palm Sugar 500g", "Pressed palm sugar discs", 380, 0),
];

/// Insert the demo rows that don't exist yet.
pub async fn run() -> Result<(), CliError> {
    let config = load_config()?;
    let pool = connect(&config).await?;
    let products = ProductRepository::new(&pool);

    let mut inserted = 0_usize;
    for &(name, description, cents, stock) in DEMO_PRODUCTS {
        let new = NewProduct {
            name: name.to_string(),
            description: description.to_string(),
            price: Price::from_cents(cents)?,
            stock_quantity: stock,
        };
        if products.create_if_absent(&new).await?.is_some() {
            inserted += 1;
        }
    }
    tracing::info!(
        "Seeded {} of {} demo products",
        inserted,
        DEMO_PRODUCTS.len()
    );

    let customer = CustomerRepository::new(&pool)
        .create(&NewCustomer {
            first_name: "Demo".to_string(),
            last_name: "Customer".to_string(),
            email: Email::parse(DEMO_EMAIL)?,
            phone_number: "0800000000".to_string(),
            address: "1 Market Street".to_string(),
            password_hash: hash_password(DEMO_PASSWORD)?,
        })
        .await;

    match customer {
        Ok(customer) => tracing::info!(
            "Demo customer created: {} (ID {}), password '{}'",
            customer.email,
            customer.id,
            DEMO_PASSWORD
        ),
        Err(RepositoryError::Conflict(_)) => {
            tracing::info!("Demo customer {} already exists, skipping", DEMO_EMAIL);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
