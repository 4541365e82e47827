//! Deposit domain model.

use serde::Serialize;

use super::identity::{DepositId, UserId, assign_once};
use super::money::PositiveMoney;
use super::time::TimeMillis;
use crate::error::IdentityError;

/// Funds added to a user's balance from outside the system.
///
/// Never mutated after creation, apart from receiving its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deposit {
    id: Option<DepositId>,
    user_id: UserId,
    amount: PositiveMoney,
    created_at: TimeMillis,
}

impl Deposit {
    pub fn new(user_id: UserId, amount: PositiveMoney, created_at: TimeMillis) -> Self {
        Self {
            id: None,
            user_id,
            amount,
            created_at,
        }
    }

    /// Assigns the storage id. Callable once.
    pub fn finalize_creation(&mut self, id: DepositId) -> Result<(), IdentityError> {
        assign_once(&mut self.id, id, "deposit")
    }

    pub fn id(&self) -> Option<DepositId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> PositiveMoney {
        self.amount
    }

    pub fn created_at(&self) -> TimeMillis {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_creation() {
        let mut deposit = Deposit::new(
            UserId::new(4).unwrap(),
            PositiveMoney::new(dec!(25)).unwrap(),
            TimeMillis::new(100).unwrap(),
        );
        assert!(deposit.id().is_none());

        deposit.finalize_creation(DepositId::new(1).unwrap()).unwrap();
        assert_eq!(deposit.id(), Some(DepositId::new(1).unwrap()));
        assert!(deposit.finalize_creation(DepositId::new(2).unwrap()).is_err());
    }
}
