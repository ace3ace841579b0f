//! Currency amounts as rendered by the storefront.
//!
//! Listing cells encode amounts as `Rs. <amount>` with optional digit
//! grouping, either Western (`Rs. 1,200,000`) or Indian (`Rs. 12,00,000`).
//! Parsing is strict: anything that does not fit that shape is a
//! [`MoneyParseError`], never a silent `NaN`.
//!
//! `+` and [`Sum`] saturate at the `i64` bounds. Totals built from page text
//! go through [`Money::checked_add`] instead, so an out-of-range sum is an
//! error rather than a clamped value.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Currency prefix rendered in front of every amount
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Minor units per major unit (paise per rupee)
const MINOR_PER_MAJOR: i64 = 100;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(concat!(
            r"^\s*(?:Rs\.?\s*)?(-)?",
            r"(\d{1,3}(?:,\d{3})+|\d{1,2}(?:,\d{2})*,\d{3}|\d+)",
            r"(?:\.(\d{1,2}))?\s*$",
        ))
        .unwrap()
    })
}

/// Error produced when currency text cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    /// The text was empty or whitespace
    #[error("empty currency text")]
    Empty,

    /// The text did not match `Rs. [-]<digits>[.<cents>]`
    #[error("malformed currency text: {input:?}")]
    Malformed {
        /// The offending input
        input: String,
    },

    /// The amount does not fit in the money representation
    #[error("currency amount out of range: {input:?}")]
    Overflow {
        /// The offending input
        input: String,
    },
}

/// An amount of money held in minor units
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money {
    minor: i64,
}

impl Money {
    /// Zero
    pub const ZERO: Self = Self { minor: 0 };

    /// Create from minor units
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self { minor }
    }

    /// Create from whole major units
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self {
            minor: major * MINOR_PER_MAJOR,
        }
    }

    /// Amount in minor units
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    /// Amount as floating-point major units
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.minor as f64 / MINOR_PER_MAJOR as f64
    }

    /// Checked addition
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.minor.checked_add(other.minor) {
            Some(minor) => Some(Self { minor }),
            None => None,
        }
    }

    /// Parse storefront currency text such as `Rs. 1,200` or `500.50`
    ///
    /// # Errors
    ///
    /// Returns [`MoneyParseError`] for empty, malformed, or oversized input
    pub fn parse(text: &str) -> Result<Self, MoneyParseError> {
        if text.trim().is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let captures = amount_pattern()
            .captures(text)
            .ok_or_else(|| MoneyParseError::Malformed {
                input: text.to_string(),
            })?;

        let negative = captures.get(1).is_some();
        let whole = captures
            .get(2)
            .map(|m| m.as_str().replace(',', ""))
            .unwrap_or_default();
        let major: i64 = whole.parse().map_err(|_| MoneyParseError::Overflow {
            input: text.to_string(),
        })?;

        let fraction = match captures.get(3).map(|m| m.as_str()) {
            Some(digits) if digits.len() == 1 => digits.parse::<i64>().unwrap_or(0) * 10,
            Some(digits) => digits.parse::<i64>().unwrap_or(0),
            None => 0,
        };

        let minor = if negative {
            (-major)
                .checked_mul(MINOR_PER_MAJOR)
                .and_then(|m| m.checked_sub(fraction))
        } else {
            major
                .checked_mul(MINOR_PER_MAJOR)
                .and_then(|m| m.checked_add(fraction))
        };
        minor
            .map(Self::from_minor)
            .ok_or_else(|| MoneyParseError::Overflow {
                input: text.to_string(),
            })
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            minor: self.minor.saturating_add(rhs.minor),
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let fraction = abs % MINOR_PER_MAJOR as u64;

        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if fraction == 0 {
            write!(f, "{CURRENCY_PREFIX} {sign}{grouped}")
        } else {
            write!(f, "{CURRENCY_PREFIX} {sign}{grouped}.{fraction:02}")
        }
    }
}
