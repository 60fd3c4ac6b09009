//! Domain models for the grocery list.
//!
//! These are validated domain types, separate from the database row types
//! in [`crate::db`] and the raw form types in [`crate::forms`].

pub mod item;
pub mod session;
pub mod store;
pub mod user;

pub use item::{GroceryItem, ItemInput, ItemWithStore};
pub use session::{CurrentUser, FlashLevel, FlashMessage, keys as session_keys};
pub use store::{GroceryStore, StoreInput};
pub use user::User;
