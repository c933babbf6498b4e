//! Vehicle Identification Number validation.

use std::fmt;

use crate::error::{Error, Result};

/// Number of characters in a modern VIN.
pub const VIN_LENGTH: usize = 17;

/// Letters never used in VIN encoding (too easily confused with 1, 0 and 9).
const EXCLUDED_LETTERS: [char; 3] = ['I', 'O', 'Q'];

/// A normalized (trimmed, uppercased) VIN that passed format validation.
///
/// Only the superficial format is checked; the check digit is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vin(String);

impl Vin {
    /// Normalize and validate `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVin`] when the normalized value is not exactly
    /// 17 alphanumeric characters or contains `I`, `O` or `Q`.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_uppercase();

        let valid = normalized.chars().count() == VIN_LENGTH
            && normalized.chars().all(char::is_alphanumeric)
            && !normalized.chars().any(|c| EXCLUDED_LETTERS.contains(&c));

        if valid {
            Ok(Self(normalized))
        } else {
            Err(Error::InvalidVin {
                input: input.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
