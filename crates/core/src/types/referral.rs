//! Referral codes.
//!
//! Every account owns a short shareable code. New registrations may name an
//! existing code, which pays a bonus to both sides of the referral.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ReferralCode`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralCodeError {
    /// The input string is empty.
    #[error("referral code cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("referral code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `A-Z0-9`.
    #[error("referral code may only contain letters and digits")]
    InvalidCharacter,
}

/// A shareable referral code, e.g. `ANA4821`.
///
/// Codes are uppercase ASCII letters and digits. Generated codes take the
/// first letters of the holder's name plus a four digit suffix; parsing
/// accepts any alphanumeric code so seeded accounts can carry fixed codes
/// like `ADMIN1000`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Maximum length of a referral code.
    pub const MAX_LENGTH: usize = 16;

    /// Number of letters taken from the holder's name.
    const PREFIX_LETTERS: usize = 3;

    /// Parse a `ReferralCode` from a string, folding to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 16 characters,
    /// or contains anything other than ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, ReferralCodeError> {
        if s.is_empty() {
            return Err(ReferralCodeError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ReferralCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReferralCodeError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Build a code from an account holder's name and a random seed.
    ///
    /// The prefix is the first three ASCII letters of the name, uppercased
    /// (fewer if the name has fewer). The seed is folded into the four digit
    /// range `1000..=9999`, so the result always parses.
    #[must_use]
    pub fn from_name(name: &str, seed: u32) -> Self {
        let prefix: String = name
            .chars()
            .filter(char::is_ascii_alphabetic)
            .take(Self::PREFIX_LETTERS)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let suffix = 1000 + seed % 9000;
        Self(format!("{prefix}{suffix}"))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReferralCode {
    type Err = ReferralCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
