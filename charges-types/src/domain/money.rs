//! Fixed-point monetary values.
//!
//! Every value is rounded to two fractional digits (half-to-even) when it is
//! constructed and is immutable afterwards. Arithmetic returns new values.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of fractional digits kept by every money type.
pub const MONEY_SCALE: u32 = 2;

/// Largest representable amount: 999999999.99.
pub fn max_money() -> Decimal {
    Decimal::new(99_999_999_999, MONEY_SCALE)
}

/// Smallest positive amount: 0.01.
pub fn min_positive_money() -> Decimal {
    Decimal::new(1, MONEY_SCALE)
}

fn round(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Rounds `value` and checks it against the inclusive `[min, max]` range.
fn bounded(value: Decimal, min: Decimal, max: Decimal, what: &str) -> Result<Decimal, DomainError> {
    let rounded = round(value);
    if rounded < min || rounded > max {
        return Err(DomainError::Validation(format!(
            "{} must be between {} and {}, got {}",
            what, min, max, rounded
        )));
    }
    Ok(rounded)
}

fn parse_decimal(s: &str, what: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(s.trim())
        .map_err(|_| DomainError::Validation(format!("{} is not a valid decimal: {:?}", what, s)))
}

/// A strictly positive amount in `[0.01, 999999999.99]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PositiveMoney(Decimal);

/// Amount requested by callers (charges, deposits).
pub type Amount = PositiveMoney;

impl PositiveMoney {
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        bounded(value, min_positive_money(), max_money(), "amount").map(Self)
    }

    /// Parses a decimal string such as `"10.50"`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Self::new(parse_decimal(s, "amount")?)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PositiveMoney {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveMoney> for Decimal {
    fn from(money: PositiveMoney) -> Self {
        money.0
    }
}

impl fmt::Display for PositiveMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative account balance in `[0.00, 999999999.99]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Balance(Decimal);

impl Balance {
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        bounded(value, Decimal::ZERO, max_money(), "balance").map(Self)
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        Self::new(parse_decimal(s, "balance")?)
    }

    pub fn zero() -> Self {
        Self(round(Decimal::ZERO))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns a new balance increased by `amount`.
    ///
    /// Fails with a validation error if the result exceeds the upper bound.
    pub fn add(&self, amount: PositiveMoney) -> Result<Balance, DomainError> {
        Balance::new(self.0 + amount.value())
    }

    /// Returns a new balance decreased by `amount`.
    ///
    /// Fails with `InsufficientBalance` if the result would be negative.
    pub fn subtract(&self, amount: PositiveMoney) -> Result<Balance, DomainError> {
        if self.0 < amount.value() {
            return Err(DomainError::InsufficientBalance {
                available: self.0,
                requested: amount.value(),
            });
        }
        Balance::new(self.0 - amount.value())
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Balance {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
