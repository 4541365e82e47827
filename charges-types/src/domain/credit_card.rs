//! Credit card value object.

use std::fmt;

use serde::{Serialize, Serializer};

use super::time::TimeMillis;
use crate::error::DomainError;

/// Card number: 13 to 19 digits, spaces and dashes ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("card number must contain only digits"));
        }
        if !(13..=19).contains(&digits.len()) {
            return Err(DomainError::validation("card number must have 13 to 19 digits"));
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Last four digits, the rest replaced by `*`.
    pub fn masked(&self) -> String {
        let visible = &self.0[self.0.len() - 4..];
        format!("{}{}", "*".repeat(self.0.len() - 4), visible)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber({})", self.masked())
    }
}

/// Expiration month, valid through the last day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExpirationDate {
    year: i32,
    month: u32,
}

impl ExpirationDate {
    /// Parses `MM/YY` or `MM/YYYY`.
    ///
    /// Two-digit years belong to the century of `now`. Dates before the month
    /// of `now` are rejected.
    pub fn parse(raw: &str, now: TimeMillis) -> Result<Self, DomainError> {
        let invalid = || DomainError::validation("expiration date must be MM/YY or MM/YYYY");

        let (mm, yy) = raw.trim().split_once('/').ok_or_else(invalid)?;
        if mm.len() != 2 || !(yy.len() == 2 || yy.len() == 4) {
            return Err(invalid());
        }
        if !mm.chars().chain(yy.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = mm.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation("expiration month must be 01 to 12"));
        }

        let (current_year, current_month) = now.year_month();
        let mut year: i32 = yy.parse().map_err(|_| invalid())?;
        if yy.len() == 2 {
            year += current_year - current_year.rem_euclid(100);
        }

        if (year, month) < (current_year, current_month) {
            return Err(DomainError::validation("card is expired"));
        }

        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl Serialize for ExpirationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Card verification value: 3 or 4 digits. Checked on input, never retained.
fn validate_cvv(raw: &str) -> Result<(), DomainError> {
    let cvv = raw.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("cvv must have 3 or 4 digits"));
    }
    Ok(())
}

/// Raw card fields as supplied by a caller.
#[derive(Debug, Clone)]
pub struct CreditCardFields<'a> {
    pub number: &'a str,
    pub expiration_date: &'a str,
    pub cvv: &'a str,
}

/// A complete, validated credit card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditCard {
    #[serde(serialize_with = "serialize_masked_number")]
    number: CardNumber,
    expiration_date: ExpirationDate,
}

fn serialize_masked_number<S: Serializer>(number: &CardNumber, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&number.masked())
}

impl CreditCard {
    pub fn new(fields: CreditCardFields<'_>, now: TimeMillis) -> Result<Self, DomainError> {
        let number = CardNumber::new(fields.number)?;
        let expiration_date = ExpirationDate::parse(fields.expiration_date, now)?;
        validate_cvv(fields.cvv)?;
        Ok(Self {
            number,
            expiration_date,
        })
    }

    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    pub fn expiration_date(&self) -> ExpirationDate {
        self.expiration_date
    }
}
