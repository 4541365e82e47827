//! Surrogate identifiers assigned by storage at insert time.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, IdentityError};

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Creates an id, rejecting zero and negative values.
            pub fn new(value: i64) -> Result<Self, DomainError> {
                if value <= 0 {
                    return Err(DomainError::Validation(format!(
                        "{} id must be positive, got {}",
                        $entity, value
                    )));
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| {
                    DomainError::Validation(format!("invalid {} id: {:?}", $entity, s))
                })?;
                Self::new(value)
            }
        }
    };
}

surrogate_id!(
    /// Identifier of a [`User`](super::User).
    UserId,
    "user"
);
surrogate_id!(
    /// Identifier of a [`Charge`](super::Charge).
    ChargeId,
    "charge"
);
surrogate_id!(
    /// Identifier of a [`Payment`](super::Payment).
    PaymentId,
    "payment"
);
surrogate_id!(
    /// Identifier of a [`Deposit`](super::Deposit).
    DepositId,
    "deposit"
);

/// Assigns `id` to an unset identity slot.
///
/// Entities call this from their `finalize_creation`; a second call is a
/// programmer error.
pub(crate) fn assign_once<I: Copy + Into<i64>>(
    slot: &mut Option<I>,
    id: I,
    entity: &'static str,
) -> Result<(), IdentityError> {
    if let Some(existing) = slot {
        return Err(IdentityError::AlreadyAssigned {
            entity,
            id: (*existing).into(),
        });
    }
    *slot = Some(id);
    Ok(())
}
