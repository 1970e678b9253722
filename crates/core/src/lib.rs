//! Bazaar Core - Shared domain types.
//!
//! This crate provides common types used across all Bazaar components:
//! - `api` - The public HTTP service
//! - `cli` - Command-line tools for migrations, seeding, and seller management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, emails,
//!   prices, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
