//! Points ledger types.
//!
//! Every mutation of a user's point balance appends exactly one entry here.
//! The ledger is append-only; `balance_after` lets a reader audit any balance
//! by replaying entries without trusting the user row.

use chrono::{DateTime, Utc};
use serde::Serialize;

use levelup_core::{LedgerEntryId, OrderId, Points, RewardId, UserId};

/// Why a balance changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerSource {
    /// Base bonus granted at registration.
    RegistrationBonus,
    /// Bonus granted to both sides of a matched referral.
    #[serde(rename_all = "camelCase")]
    ReferralBonus {
        /// The account whose code was used.
        referrer: UserId,
        /// The newly registered account.
        referred: UserId,
    },
    /// Credit earned by placing an order.
    #[serde(rename_all = "camelCase")]
    OrderCredit { order_id: OrderId },
    /// Debit spent redeeming a reward.
    #[serde(rename_all = "camelCase")]
    RedemptionDebit { reward_id: RewardId },
    /// Manual adjustment from the admin panel.
    AdminAdjustment,
}

/// One append-only record of a balance change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub user_id: UserId,
    /// Signed change. Positive credits, negative debits. Never zero.
    pub delta: i64,
    pub source: LedgerSource,
    /// Balance immediately after this entry was applied.
    pub balance_after: Points,
    pub created_at: DateTime<Utc>,
}
