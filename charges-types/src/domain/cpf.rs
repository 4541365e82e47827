//! Brazilian individual taxpayer number (CPF).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const CPF_LEN: usize = 11;

/// A validated CPF, stored as 11 digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Parses a CPF written as `12345678909` or `123.456.789-09`.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed
            .chars()
            .any(|c| !(c.is_ascii_digit() || c == '.' || c == '-'))
        {
            return Err(DomainError::Validation(
                "CPF must contain only digits, '.' and '-'".into(),
            ));
        }

        let digits: Vec<u32> = trimmed.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != CPF_LEN {
            return Err(DomainError::Validation(format!(
                "CPF must have {} digits, got {}",
                CPF_LEN,
                digits.len()
            )));
        }

        let normalized: String = digits.iter().filter_map(|d| char::from_digit(*d, 10)).collect();
        if !has_valid_check_digits(&digits) {
            return Err(DomainError::Validation(format!(
                "invalid CPF: {}",
                mask(&normalized)
            )));
        }

        Ok(Self(normalized))
    }

    /// The 11 digits, unformatted.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// `123.456.789-09`
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[0..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..11]
        )
    }

    /// `***.456.789-**`, safe for logs and error messages.
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

fn mask(digits: &str) -> String {
    format!("***.{}.{}-**", &digits[3..6], &digits[6..9])
}

/// Modulo-11 check over the first nine digits, then the first ten.
///
/// Sequences of a single repeated digit pass the arithmetic but are not
/// issued, so they are rejected.
fn has_valid_check_digits(digits: &[u32]) -> bool {
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

fn check_digit(window: &[u32]) -> u32 {
    let top_weight = window.len() as u32 + 1;
    let sum: u32 = window
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 { 0 } else { rest }
}

impl TryFrom<String> for Cpf {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

// Debug never prints the full number.
impl fmt::Debug for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cpf({})", self.masked())
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        let cpf = Cpf::new("00000000191").unwrap();
        assert_eq!(cpf.digits(), "00000000191");
    }

    #[test]
    fn test_formatted_input_is_normalized() {
        let cpf = Cpf::new("529.982.247-25").unwrap();
        assert_eq!(cpf.digits(), "52998224725");
        assert_eq!(cpf.formatted(), "529.982.247-25");
    }

    #[test]
    fn test_bad_check_digit() {
        assert!(matches!(
            Cpf::new("00000000107"),
            Err(DomainError::Validation(_))
        ));
        assert!(Cpf::new("52998224724").is_err());
    }

    #[test]
    fn test_repeated_digits_rejected() {
        for d in 0..=9 {
            let raw = d.to_string().repeat(11);
            assert!(Cpf::new(&raw).is_err(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn test_wrong_length_and_characters() {
        assert!(Cpf::new("1234567890").is_err());
        assert!(Cpf::new("123456789012").is_err());
        assert!(Cpf::new("5299822472a").is_err());
        assert!(Cpf::new("").is_err());
    }

    #[test]
    fn test_masking() {
        let cpf = Cpf::new("52998224725").unwrap();
        assert_eq!(cpf.masked(), "***.982.247-**");
        assert_eq!(format!("{:?}", cpf), "Cpf(***.982.247-**)");
        assert_eq!(cpf.to_string(), "***.982.247-**");
    }

    #[test]
    fn test_error_message_is_masked() {
        let err = Cpf::new("52998224724").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("***.982.247-**"));
        assert!(!msg.contains("52998224724"));
    }
}
