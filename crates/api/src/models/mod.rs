//! Domain models for the API.
//!
//! These are the records the in-memory store holds and the JSON bodies the
//! handlers return. Field names serialize in camelCase to match the
//! storefront clients; the password hash never serializes at all.

pub mod catalog;
pub mod content;
pub mod ledger;
pub mod order;
pub mod reward;
pub mod user;

pub use catalog::Product;
pub use content::{BlogPost, Event, Video};
pub use ledger::{LedgerEntry, LedgerSource};
pub use order::{Order, OrderItem, ProductSnapshot};
pub use reward::{Redemption, Reward, RewardSnapshot};
pub use user::{Address, User};
