//! Indonesian phone numbers normalized for WhatsApp deep links.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number contains no digits")]
    Empty,
    /// The digit count is outside the plausible range.
    #[error("phone number must have between {min} and {max} digits")]
    BadLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number in international format without the leading `+`,
/// as expected by `wa.me` links (e.g., `6281234567890`).
///
/// Parsing strips formatting characters and normalizes the Indonesian
/// dialing prefix:
///
/// - `0812...`  -> `62812...` (domestic trunk prefix replaced)
/// - `+62812...` -> `62812...`
/// - `62812...` -> unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digits for a plausible number.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum digits per E.164.
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or an implausible digit
    /// count after normalization.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        let normalized = if let Some(rest) = digits.strip_prefix('0') {
            format!("62{rest}")
        } else {
            digits
        };

        let len = normalized.len();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&len) {
            return Err(PhoneError::BadLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
