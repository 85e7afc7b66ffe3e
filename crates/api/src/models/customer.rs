//! Customer domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::CustomerId;

/// A shop customer (domain type).
///
/// The stored password is deliberately not part of this type; it is only
/// loaded alongside the customer when a password check is required.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email address, exactly as stored.
    ///
    /// Rows imported from the previous system were never validated, so this
    /// is not guaranteed to be a well-formed [`corner_shop_core::Email`].
    pub email: String,
    /// Contact phone number (free-form).
    pub phone_number: String,
    /// Delivery address (free-form).
    pub address: String,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}
