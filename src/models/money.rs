//! Money type for representing currency amounts
//!
//! Internally stores amounts in the currency's minor unit (i64) to avoid
//! floating-point precision issues. Provides safe arithmetic operations,
//! half-up percentage scaling and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored in minor units (hundredths of the
/// currency unit: cents, haléře, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from user input and validation, in minor
    /// units (10^13 whole units). Sums of many such amounts stay within i64.
    pub const MAX_ABS_MINOR: i64 = 1_000_000_000_000_000;

    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use monthly_budget::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use monthly_budget::models::Money;
    /// let salary = Money::from_major(65_000);
    /// assert_eq!(salary.minor(), 6_500_000);
    /// ```
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor units portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Check that the magnitude is at most [`Money::MAX_ABS_MINOR`]
    pub const fn is_within_limit(&self) -> bool {
        self.0 >= -Self::MAX_ABS_MINOR && self.0 <= Self::MAX_ABS_MINOR
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Scale by `percent / 100`, rounding half-up to the minor unit
    ///
    /// Halves round away from zero so that `-x` scales to exactly `-(x scaled)`.
    ///
    /// # Examples
    /// ```
    /// use monthly_budget::models::Money;
    /// assert_eq!(Money::from_minor(1001).percent(50).minor(), 501);
    /// assert_eq!(Money::from_minor(100).percent(33).minor(), 33);
    /// ```
    pub fn percent(&self, percent: u32) -> Self {
        Self(div_round_half_up(
            i128::from(self.0) * i128::from(percent),
            100,
        ))
    }

    /// Divide into `parts` equal parts, rounding half-up to the minor unit
    pub fn split_even(&self, parts: u32) -> Self {
        if parts == 0 {
            return Self::zero();
        }
        Self(div_round_half_up(i128::from(self.0), i128::from(parts)))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "10,50", "1 234,50", "10", "10 Kč".
    /// Integers are whole units. More than two decimals, explicit `+` signs
    /// and magnitudes above [`Money::MAX_ABS_MINOR`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let cleaned: String = s
            .trim()
            .trim_end_matches("Kč")
            .trim_end_matches("CZK")
            .trim_start_matches('$')
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '_')
            .collect();

        let (negative, s) = if let Some(stripped) = cleaned.strip_prefix('-') {
            (true, stripped.trim_start_matches('$'))
        } else {
            (false, cleaned.as_str())
        };

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let s = s.replace(',', ".");
        let invalid = || MoneyParseError::InvalidFormat(original.to_string());
        let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

        let (whole, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
        if !digits(whole) || !digits(frac) || (whole.is_empty() && frac.is_empty()) {
            return Err(invalid());
        }
        // At most two decimals
        if frac.len() > 2 {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyParseError::OutOfRange(original.to_string()))?
        };
        let frac_minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac_minor))
            .filter(|m| *m <= Self::MAX_ABS_MINOR)
            .ok_or_else(|| MoneyParseError::OutOfRange(original.to_string()))?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Format with a currency code suffix, e.g. `65000.00 CZK`
    pub fn format_with_currency(&self, currency: &str) -> String {
        format!("{} {}", self, currency)
    }
}

/// Integer division rounding half away from zero
fn div_round_half_up(numerator: i128, denominator: i128) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let adjust = if remainder.abs() * 2 >= denominator.abs() {
        numerator.signum() * denominator.signum()
    } else {
        0
    };
    (quotient + adjust) as i64
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_negative() {
            format!("-{}.{:02}", self.major().abs(), self.minor_part())
        } else {
            format!("{}.{:02}", self.major(), self.minor_part())
        };
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Money amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
