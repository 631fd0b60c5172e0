//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use levelup_core::{Email, Points, ReferralCode, Role, UserId};

/// A postal address.
///
/// Used both as the account address and as the shipping address on orders.
/// `street`, `city` and `region` are mandatory at registration; `zipCode`
/// stays optional because the original sign-up form never required it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Address {
    /// Whether every mandatory component is present and non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.street.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.region.trim().is_empty()
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique across the store).
    pub email: Email,
    /// Chilean national ID, stored verbatim.
    pub rut: String,
    /// Age in years.
    pub age: u8,
    /// Authorization role.
    pub role: Role,
    /// Loyalty point balance. Every change goes through the ledger.
    pub points: Points,
    /// This user's own referral code (unique across the store).
    pub referral_code: ReferralCode,
    /// Code of the account that referred this user, if any matched at
    /// registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<ReferralCode>,
    /// Whether the account qualifies for the Duoc student discount.
    /// Derived from the email domain at registration, never set directly.
    pub has_duoc_discount: bool,
    /// Account address.
    pub address: Address,
    /// Soft-delete flag. Deactivated accounts cannot log in.
    pub is_active: bool,
    /// Argon2id hash of the password. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
