//! User domain types.

use chrono::{DateTime, Utc};

use grocery_core::{Email, UserId};

/// A registered site user (domain type).
///
/// The password hash is deliberately absent; it is only read by
/// [`UserRepository::get_password_hash`](crate::db::UserRepository::get_password_hash).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email address.
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
