//! Core types for the grocery list.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the web application and the CLI.

pub mod category;
pub mod email;
pub mod id;
pub mod price;

pub use category::{CategoryError, ItemCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
