//! Core types for the Level-Up Gaming backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod points;
pub mod referral;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Clp, ClpError};
pub use points::{Points, PointsError};
pub use referral::{ReferralCode, ReferralCodeError};
pub use role::Role;
pub use status::{OrderStatus, RewardKind};
