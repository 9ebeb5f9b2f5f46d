//! # Money
//!
//! Prices, stock values and revenue are counted in minor units (kobo,
//! cents) held in an `i64`. Floats never enter: operator input is parsed
//! from text and every total is an exact integer sum.
//!
//! Validation caps quantity and price so a single line value always fits.
//! Sums and products saturate at the `i64` bounds; they never panic or wrap.
//!
//! ```text
//!   "480"     ──parse──►  Money(48000)  ──Display──►  "480.00"
//!   "480.5"   ──parse──►  Money(48050)  ──Display──►  "480.50"
//!
//!   item.total_value()  = price × quantity
//!   sale.line_total()   = sale_price × quantity
//! ```
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price: Money = "480".parse().unwrap();
//! assert_eq!((price * 3).to_string(), "1440.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use crate::error::ValidationError;

/// An amount in minor currency units.
///
/// Signed so that differences stay representable. Stored prices are kept
/// non-negative by validation and by the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// ```rust
    /// # use stockroom_core::money::Money;
    /// assert_eq!(Money::from_cents(1099).to_string(), "10.99");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// A whole amount with no minor part, e.g. `from_major(500)` is 500.00.
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    pub const fn zero() -> Self {
        Money(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero.
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The two digits after the point, always positive.
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

/// `major.minor` with no currency symbol; the console adds the configured one.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", self.major().abs(), self.cents_part())
    }
}

/// Accepts `500`, `500.5` and `500.50`. Signs, exponents and a third
/// decimal place are rejected.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let text = s.trim();
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if whole.is_empty() || !all_digits(whole) {
            return Err(invalid("expected digits like 500 or 500.50"));
        }
        if fraction.len() > 2 || !all_digits(fraction) {
            return Err(invalid("at most two decimal places"));
        }

        let units: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        // "5" after the point means fifty
        let minor = format!("{fraction:0<2}")
            .parse::<i64>()
            .map_err(|_| invalid("bad decimals"))?;

        units
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

/// Price times quantity, saturating.
impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}
