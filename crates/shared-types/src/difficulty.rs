//! Proof-of-work difficulty predicate.
//!
//! A hash satisfies the difficulty when its lowercase hexadecimal encoding
//! starts with the configured prefix (e.g. `"0000"`). Difficulty is fixed for
//! the lifetime of a ledger; there is no retargeting.

use crate::entities::Hash;
use crate::errors::TypesError;
use serde::{Deserialize, Serialize};

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "000";

/// Fixed hex-prefix difficulty target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Difficulty {
    prefix: String,
    nibbles: Vec<u8>,
}

impl Difficulty {
    /// Build a difficulty from a hex prefix.
    ///
    /// # Errors
    /// `InvalidDifficulty` if the prefix is longer than a digest or contains
    /// anything other than lowercase hex digits.
    pub fn from_prefix(prefix: impl Into<String>) -> Result<Self, TypesError> {
        let prefix = prefix.into();
        if prefix.len() > 64 {
            return Err(TypesError::InvalidDifficulty {
                prefix,
                reason: "longer than a 256-bit digest".to_string(),
            });
        }
        let nibbles = prefix
            .chars()
            .map(|c| match c {
                '0'..='9' | 'a'..='f' => c.to_digit(16).map(|d| d as u8),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>();
        match nibbles {
            Some(nibbles) => Ok(Self { prefix, nibbles }),
            None => Err(TypesError::InvalidDifficulty {
                prefix,
                reason: "only lowercase hex digits are allowed".to_string(),
            }),
        }
    }

    /// Difficulty requiring `n` leading zero hex digits.
    pub fn leading_zeros(n: usize) -> Result<Self, TypesError> {
        Self::from_prefix("0".repeat(n))
    }

    /// Empty prefix: every hash is sealed. Useful for tests and simulations.
    pub fn trivial() -> Self {
        Self {
            prefix: String::new(),
            nibbles: Vec::new(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Check if a hash meets the target.
    #[inline]
    pub fn is_satisfied_by(&self, hash: &Hash) -> bool {
        self.nibbles.iter().enumerate().all(|(i, expected)| {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            nibble == *expected
        })
    }

    /// Expected number of hash attempts to find a sealing nonce.
    pub fn expected_attempts(&self) -> f64 {
        16f64.powi(self.nibbles.len() as i32)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            nibbles: vec![0; DEFAULT_PREFIX.len()],
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_prefix(value)
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.prefix
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prefix '{}'", self.prefix)
    }
}
