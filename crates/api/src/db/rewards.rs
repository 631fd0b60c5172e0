//! Reward catalog and redemption repository.
//!
//! Redemption is one atomic unit: the point debit and the redemption record
//! commit together or not at all.

use chrono::Utc;
use serde::Deserialize;

use levelup_core::{RedemptionId, RewardId, RewardKind, UserId};

use super::{Db, RepositoryError, ledger};
use crate::models::{LedgerSource, Redemption, Reward, RewardSnapshot, User};

/// Season assigned when the client leaves it out.
const DEFAULT_SEASON: &str = "Standard";

/// Shortest reward name accepted.
const MIN_NAME_CHARS: usize = 3;

/// Input for creating a reward. Doubles as the request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReward {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RewardKind>,
    pub points_cost: Option<i64>,
    #[serde(default)]
    pub description: String,
    pub is_active: Option<bool>,
    pub season: Option<String>,
    pub image_url: Option<String>,
}

/// Partial reward update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RewardKind>,
    pub points_cost: Option<i64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub season: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for reward operations.
pub struct RewardRepository<'a> {
    db: &'a Db,
}

impl<'a> RewardRepository<'a> {
    /// Create a new reward repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List redeemable (active) rewards in insertion order.
    #[must_use]
    pub fn list_active(&self) -> Vec<Reward> {
        self.db
            .read()
            .rewards
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect()
    }

    /// List the whole catalog, inactive rewards included.
    #[must_use]
    pub fn list_all(&self) -> Vec<Reward> {
        self.db.read().rewards.iter().cloned().collect()
    }

    /// Add a reward to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the name is shorter than 3
    /// characters, the cost is below 1, or the image URL is missing.
    pub fn create(&self, new: NewReward) -> Result<Reward, RepositoryError> {
        let name = validate_name(new.name.as_deref())?;
        let points_cost = validate_cost(new.points_cost)?;
        let image_url = match new.image_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                return Err(RepositoryError::Validation(
                    "image URL is required".to_owned(),
                ));
            }
        };

        let id = RewardId::generate();
        let reward = Reward {
            id,
            name,
            kind: new.kind.unwrap_or(RewardKind::Product),
            points_cost,
            description: new.description,
            is_active: new.is_active.unwrap_or(true),
            season: new
                .season
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SEASON.to_owned()),
            image_url,
        };

        let mut tables = self.db.write();
        tables.rewards.insert(id.as_uuid(), reward.clone());

        Ok(reward)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such reward exists.
    /// Returns `RepositoryError::Validation` if a provided name is shorter
    /// than 3 characters or a provided cost is below 1.
    pub fn update(&self, id: RewardId, patch: RewardPatch) -> Result<Reward, RepositoryError> {
        if let Some(name) = patch.name.as_deref() {
            validate_name(Some(name))?;
        }
        if let Some(cost) = patch.points_cost {
            validate_cost(Some(cost))?;
        }

        let mut tables = self.db.write();
        let reward = tables
            .rewards
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = patch.name {
            reward.name = name;
        }
        if let Some(kind) = patch.kind {
            reward.kind = kind;
        }
        if let Some(points_cost) = patch.points_cost {
            reward.points_cost = points_cost;
        }
        if let Some(description) = patch.description {
            reward.description = description;
        }
        if let Some(is_active) = patch.is_active {
            reward.is_active = is_active;
        }
        if let Some(season) = patch.season {
            reward.season = season;
        }
        if let Some(image_url) = patch.image_url {
            reward.image_url = image_url;
        }

        Ok(reward.clone())
    }

    /// Remove a reward from the catalog.
    ///
    /// Past redemptions keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such reward exists.
    pub fn delete(&self, id: RewardId) -> Result<(), RepositoryError> {
        self.db
            .write()
            .rewards
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    /// Redeem a reward for a user: debit the cost through the ledger and
    /// record the redemption, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reward or the user does
    /// not exist.
    /// Returns `RepositoryError::RewardInactive` if the reward is disabled,
    /// regardless of the user's balance.
    /// Returns `RepositoryError::InsufficientPoints` if the balance cannot
    /// cover the cost; nothing is recorded and the balance is untouched.
    pub fn redeem(
        &self,
        user_id: UserId,
        reward_id: RewardId,
    ) -> Result<(User, Redemption), RepositoryError> {
        let mut tables = self.db.write();

        let reward = tables
            .rewards
            .get(reward_id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;
        if !reward.is_active {
            return Err(RepositoryError::RewardInactive);
        }
        let snapshot = RewardSnapshot::from(reward);
        let now = Utc::now();

        ledger::apply_points(
            &mut tables,
            user_id,
            -snapshot.points_cost,
            LedgerSource::RedemptionDebit { reward_id },
            now,
        )?;

        let redemption_id = RedemptionId::generate();
        let redemption = Redemption {
            id: redemption_id,
            user_id,
            reward: snapshot,
            created_at: now,
        };
        tables
            .redemptions
            .insert(redemption_id.as_uuid(), redemption.clone());

        let user = tables
            .users
            .get(user_id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        Ok((user, redemption))
    }

    /// List a user's redemptions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub fn redemptions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Redemption>, RepositoryError> {
        let tables = self.db.read();
        if !tables.users.contains(user_id.as_uuid()) {
            return Err(RepositoryError::NotFound);
        }

        Ok(tables
            .redemptions
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

fn validate_name(name: Option<&str>) -> Result<String, RepositoryError> {
    match name {
        Some(name) if name.trim().chars().count() >= MIN_NAME_CHARS => Ok(name.to_owned()),
        _ => Err(RepositoryError::Validation(format!(
            "name must be at least {MIN_NAME_CHARS} characters"
        ))),
    }
}

fn validate_cost(cost: Option<i64>) -> Result<i64, RepositoryError> {
    match cost {
        Some(cost) if cost >= 1 => Ok(cost),
        _ => Err(RepositoryError::Validation(
            "points cost must be at least 1".to_owned(),
        )),
    }
}
