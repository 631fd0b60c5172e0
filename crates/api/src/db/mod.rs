//! In-memory store operations.
//!
//! The process-lifetime store behind the API. Nothing persists across
//! restarts; startup seeds the primary admin and the reward catalog.
//!
//! ## Tables
//!
//! - `users` - Accounts, balances, referral codes
//! - `products` - The sale catalog
//! - `orders` - Placed orders (never deleted)
//! - `rewards` - The loyalty reward catalog
//! - `redemptions` - Completed redemptions (append-only)
//! - `ledger` - Point balance changes (append-only)
//! - `events`, `posts`, `videos` - Community content
//!
//! ## Transaction boundary
//!
//! All tables sit behind one `RwLock`. A mutating operation takes the write
//! guard once, checks every precondition, applies every related mutation and
//! releases. Multi-table operations (placing an order, redeeming a reward,
//! registering a referral) therefore commit entirely or not at all, and two
//! writers can never interleave into a negative or double-spent balance.
//! No guard is held across an await point.

pub mod blog;
pub mod events;
pub mod ledger;
pub mod orders;
pub mod products;
pub mod rewards;
pub mod seed;
pub mod users;
pub mod videos;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use uuid::Uuid;

use levelup_core::{OrderStatus, UserId};

use crate::models::{BlogPost, Event, LedgerEntry, Order, Product, Redemption, Reward, User, Video};

pub use blog::BlogRepository;
pub use events::EventRepository;
pub use ledger::LedgerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use rewards::RewardRepository;
pub use users::UserRepository;
pub use videos::VideoRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A field failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Balance too low for the requested debit.
    #[error("insufficient points: balance {balance}, requested {requested}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points the operation tried to take.
        requested: i64,
    },

    /// The status change is not in the order transition table.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the order is in.
        from: OrderStatus,
        /// Status the request asked for.
        to: OrderStatus,
    },

    /// The reward exists but is not active.
    #[error("reward is not active")]
    RewardInactive,

    /// An order needs at least one item.
    #[error("order has no items")]
    EmptyCart,

    /// The operation is not allowed on this account.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

// =============================================================================
// Tables
// =============================================================================

/// One in-memory table: insertion-ordered rows plus a uuid index.
///
/// Deletion closes the gap (`Vec::remove`), so listings keep insertion order
/// while point lookups stay indexed.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: Vec<T>,
    index: HashMap<Uuid, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    pub(crate) fn insert(&mut self, key: Uuid, row: T) {
        let pos = self.rows.len();
        self.rows.push(row);
        self.index.insert(key, pos);
    }

    pub(crate) fn get(&self, key: Uuid) -> Option<&T> {
        self.rows.get(*self.index.get(&key)?)
    }

    pub(crate) fn get_mut(&mut self, key: Uuid) -> Option<&mut T> {
        self.rows.get_mut(*self.index.get(&key)?)
    }

    pub(crate) fn contains(&self, key: Uuid) -> bool {
        self.index.contains_key(&key)
    }

    pub(crate) fn remove(&mut self, key: Uuid) -> Option<T> {
        let pos = self.index.remove(&key)?;
        let row = self.rows.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(row)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Every table in the store. One instance lives behind the [`Db`] lock.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Table<User>,
    pub(crate) products: Table<Product>,
    pub(crate) orders: Table<Order>,
    pub(crate) rewards: Table<Reward>,
    pub(crate) redemptions: Table<Redemption>,
    pub(crate) ledger: Table<LedgerEntry>,
    pub(crate) events: Table<Event>,
    pub(crate) posts: Table<BlogPost>,
    pub(crate) videos: Table<Video>,
    /// The seeded primary admin. Role change, deactivation and deletion of
    /// this account are forbidden.
    pub(crate) primary_admin: Option<UserId>,
}

// =============================================================================
// Db handle
// =============================================================================

/// Handle to the in-memory store.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct Db {
    inner: Arc<RwLock<Tables>>,
}

impl Db {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the read guard.
    ///
    /// Poisoned guards are recovered: no operation mutates before all of its
    /// checks pass, so a panicking writer cannot leave a half-applied
    /// transaction behind.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire the write guard, the transaction boundary.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_insert_get_remove() {
        let mut table: Table<&str> = Table::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        table.insert(a, "a");
        table.insert(b, "b");
        table.insert(c, "c");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b), Some(&"b"));

        // Removing from the middle keeps later keys reachable.
        assert_eq!(table.remove(b), Some("b"));
        assert_eq!(table.len(), 2);
        assert!(!table.contains(b));
        assert_eq!(table.get(a), Some(&"a"));
        assert_eq!(table.get(c), Some(&"c"));
        assert_eq!(table.remove(b), None);
    }

    #[test]
    fn test_table_iterates_in_insertion_order() {
        let mut table: Table<u32> = Table::default();
        let keys: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for (i, key) in keys.iter().enumerate() {
            table.insert(*key, u32::try_from(i).unwrap());
        }
        let middle = keys.get(2).copied().unwrap();
        table.remove(middle);

        let rows: Vec<u32> = table.iter().copied().collect();
        assert_eq!(rows, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_db_clones_share_tables() {
        let db = Db::new();
        let clone = db.clone();
        let key = Uuid::new_v4();

        db.write().videos.insert(
            key,
            crate::models::Video {
                id: levelup_core::VideoId::new(key),
                title: "shared".to_owned(),
                embed_url: String::new(),
                is_featured: false,
            },
        );

        assert!(clone.read().videos.contains(key));
    }
}
