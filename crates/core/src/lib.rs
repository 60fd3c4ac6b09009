//! Grocery Core - Shared domain types.
//!
//! This crate provides the types used across the grocery list components:
//! - `web` - The server-rendered web application
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP. Anything that needs a store lookup (such as checking that a
//! store id still exists) lives in the web crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, item categories and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
