//! User aggregate.

use serde::Serialize;

use super::cpf::Cpf;
use super::identity::{UserId, assign_once};
use super::money::{Balance, PositiveMoney};
use super::person::{EmailAddress, PersonName};
use super::time::TimeMillis;
use crate::error::{DomainError, IdentityError};

/// Fields of a user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: PersonName,
    pub cpf: Cpf,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: TimeMillis,
}

/// A registered user and owner of an internal balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: Option<UserId>,
    name: PersonName,
    cpf: Cpf,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: String,
    balance: Balance,
    created_at: TimeMillis,
}

impl User {
    /// Creates a user with a zero balance.
    pub fn new(new: NewUser) -> Result<Self, DomainError> {
        if new.password_hash.is_empty() {
            return Err(DomainError::validation("password hash must not be empty"));
        }
        Ok(Self {
            id: None,
            name: new.name,
            cpf: new.cpf,
            email: new.email,
            password_hash: new.password_hash,
            balance: Balance::zero(),
            created_at: new.created_at,
        })
    }

    /// Assigns the storage id. Callable once.
    pub fn finalize_creation(&mut self, id: UserId) -> Result<(), IdentityError> {
        assign_once(&mut self.id, id, "user")
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn created_at(&self) -> TimeMillis {
        self.created_at
    }

    pub fn increase_balance(&mut self, amount: PositiveMoney) -> Result<(), DomainError> {
        self.balance = self.balance.add(amount)?;
        Ok(())
    }

    /// Fails with `InsufficientBalance` and leaves the balance untouched when
    /// funds are short.
    pub fn decrease_balance(&mut self, amount: PositiveMoney) -> Result<(), DomainError> {
        self.balance = self.balance.subtract(amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_user() -> User {
        User::new(NewUser {
            name: PersonName::new("Maria Silva").unwrap(),
            cpf: Cpf::new("52998224725").unwrap(),
            email: EmailAddress::new("maria@example.com").unwrap(),
            password_hash: "salt$hash".into(),
            created_at: TimeMillis::new(0).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_user_starts_with_zero_balance() {
        let user = new_user();
        assert_eq!(user.balance(), Balance::zero());
        assert!(user.id().is_none());
    }

    #[test]
    fn test_increase_and_decrease() {
        let mut user = new_user();
        user.increase_balance(PositiveMoney::new(dec!(100)).unwrap())
            .unwrap();
        user.decrease_balance(PositiveMoney::new(dec!(30.50)).unwrap())
            .unwrap();
        assert_eq!(user.balance().value(), dec!(69.50));
    }

    #[test]
    fn test_decrease_insufficient_keeps_balance() {
        let mut user = new_user();
        user.increase_balance(PositiveMoney::new(dec!(5)).unwrap())
            .unwrap();
        let result = user.decrease_balance(PositiveMoney::new(dec!(5.01)).unwrap());
        assert!(matches!(result, Err(DomainError::InsufficientBalance { .. })));
        assert_eq!(user.balance().value(), dec!(5.00));
    }

    #[test]
    fn test_finalize_creation_once() {
        let mut user = new_user();
        user.finalize_creation(UserId::new(1).unwrap()).unwrap();
        assert!(user.finalize_creation(UserId::new(2).unwrap()).is_err());
        assert_eq!(user.id(), Some(UserId::new(1).unwrap()));
    }

    #[test]
    fn test_serialize_hides_password_hash() {
        let json = serde_json::to_value(new_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["cpf"], "52998224725");
    }
}
