//! The points ledger.
//!
//! Single authority over point balances. Registration bonuses, referral
//! bonuses, order credits, redemption debits and admin adjustments all pass
//! through [`apply_points`], which updates the balance and appends the audit
//! entry in one step. Nothing else in the store touches `User::points`.

use chrono::{DateTime, Utc};

use levelup_core::{LedgerEntryId, Points, PointsError, UserId};

use super::{Db, RepositoryError, Tables};
use crate::models::{LedgerEntry, LedgerSource};

/// Apply a signed delta to a user's balance inside an open transaction.
///
/// The caller holds the write guard. A zero delta succeeds and writes no
/// entry; any other delta updates the user row and appends a [`LedgerEntry`]
/// carrying the balance after the change.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
/// Returns `RepositoryError::InsufficientPoints` if the delta would take the
/// balance below zero; the balance is left untouched.
pub(crate) fn apply_points(
    tables: &mut Tables,
    user_id: UserId,
    delta: i64,
    source: LedgerSource,
    now: DateTime<Utc>,
) -> Result<Points, RepositoryError> {
    let balance = tables
        .users
        .get(user_id.as_uuid())
        .ok_or(RepositoryError::NotFound)?
        .points;

    if delta == 0 {
        return Ok(balance);
    }

    let updated = balance.checked_apply(delta).map_err(|err| match err {
        PointsError::Insufficient { .. } => RepositoryError::InsufficientPoints {
            balance: balance.as_i64(),
            requested: delta,
        },
        PointsError::Overflow => RepositoryError::Validation("point balance overflow".to_owned()),
    })?;

    // All checks passed; mutate the user row and the ledger together.
    if let Some(user) = tables.users.get_mut(user_id.as_uuid()) {
        user.points = updated;
    }
    let entry_id = LedgerEntryId::generate();
    tables.ledger.insert(
        entry_id.as_uuid(),
        LedgerEntry {
            id: entry_id,
            user_id,
            delta,
            source,
            balance_after: updated,
            created_at: now,
        },
    );

    Ok(updated)
}

/// Read-only access to the ledger.
pub struct LedgerRepository<'a> {
    db: &'a Db,
}

impl<'a> LedgerRepository<'a> {
    /// Create a new ledger repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List a user's ledger entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub fn history_for_user(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, RepositoryError> {
        let tables = self.db.read();
        if !tables.users.contains(user_id.as_uuid()) {
            return Err(RepositoryError::NotFound);
        }

        Ok(tables
            .ledger
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }
}
