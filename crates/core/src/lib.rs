//! Level-Up Core - Shared domain types.
//!
//! This crate provides the domain vocabulary used across the Level-Up Gaming
//! backend:
//! - `api` - The REST backend (stores, ledger, routes)
//! - `integration-tests` - Black-box API tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere, including inside the store's critical sections.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, points, emails,
//!   referral codes, roles, and the order status machine
//! - [`pricing`] - Checkout pricing rules (shipping, student discount,
//!   loyalty points accrual)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use types::*;
