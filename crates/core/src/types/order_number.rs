//! Human-readable order numbers.

use core::fmt;

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Prefix shared by all order numbers.
const PREFIX: &str = "FP";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 6;

/// A unique, human-readable order number.
///
/// Format: `FP<yymmdd><6 alphanumeric>`, e.g. `FP260830K3QX9A`. The date
/// component makes support lookups easy; the random suffix makes numbers
/// unguessable enough for a small shop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a fresh order number for the given timestamp.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();

        Self(format!(
            "{PREFIX}{:02}{:02}{:02}{suffix}",
            now.year() % 100,
            now.month(),
            now.day()
        ))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
