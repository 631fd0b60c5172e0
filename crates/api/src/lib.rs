//! Level-Up Gaming API library.
//!
//! This crate provides the store backend as a library, allowing the server
//! to be embedded in tests and reused by the binary.
//!
//! # Architecture
//!
//! - Axum handlers over JSON bodies ([`routes`])
//! - In-memory store behind one `RwLock`, the transaction boundary ([`db`])
//! - Points ledger as the single authority over loyalty balances
//! - Argon2id password hashing ([`services::auth`])

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
