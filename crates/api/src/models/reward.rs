//! Reward catalog and redemption types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use levelup_core::{RedemptionId, RewardId, RewardKind, UserId};

/// A redeemable reward in the loyalty catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    /// Points debited on redemption. Always at least 1.
    pub points_cost: i64,
    pub description: String,
    /// Inactive rewards stay listed for admins but cannot be redeemed.
    pub is_active: bool,
    pub season: String,
    pub image_url: String,
}

/// What a redemption remembers about the reward at redemption time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSnapshot {
    pub id: RewardId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    pub points_cost: i64,
}

impl From<&Reward> for RewardSnapshot {
    fn from(reward: &Reward) -> Self {
        Self {
            id: reward.id,
            name: reward.name.clone(),
            kind: reward.kind,
            points_cost: reward.points_cost,
        }
    }
}

/// A completed redemption. Append-only, written in the same critical
/// section as the point debit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: RedemptionId,
    pub user_id: UserId,
    pub reward: RewardSnapshot,
    pub created_at: DateTime<Utc>,
}
