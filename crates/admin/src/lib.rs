//! Spot My Ride admin library.
//!
//! This crate provides the admin dashboard as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Security
//!
//! This crate holds HIGH PRIVILEGE access:
//! - Read/write access to every collection of the mobile app's database
//! - Broadcast notifications to every registered device
//! - Admin credential management
//!
//! Only deploy behind TLS with a high-entropy `ADMIN_SESSION_SECRET`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
