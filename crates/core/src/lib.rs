//! Spot My Ride Core - Shared types library.
//!
//! This crate provides common types used across all dashboard components:
//! - `admin` - Administrative web dashboard (login, users, notifications)
//! - `cli` - Command-line tools for managing admin credentials
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no document store access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
