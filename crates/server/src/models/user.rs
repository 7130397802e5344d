use chrono::{DateTime, Utc};
use fruit_porter_core::{AccountStatus, Email, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A registered account, customer or administrator.
///
/// The password hash never leaves the server: it is skipped during
/// serialization so a `User` can be returned from a handler directly.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_admin: bool,
    /// Store-credit balance used to pay for orders.
    pub credit: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}
